//! Knowledge base engine: expansion, analysis, path selection and ingestion

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

use leavekb_core::{
    EmbeddingProvider, Error, IngestionReport, KnowledgeRecord, KnowledgeRetriever, KnowledgeStats,
    Result, Snippet, VectorIndex,
};

use crate::analyzer::QueryAnalyzer;
use crate::config::KnowledgeBaseConfig;
use crate::ingest::{DEFAULT_BATCH_SIZE, IngestionPipeline, load_records_from_path};
use crate::local_index::LocalVectorIndex;
use crate::search::{category_scoped_search, ranked_search};

/// Retrieval engine over an embedding provider and a vector index
pub struct KnowledgeBase<E: EmbeddingProvider + ?Sized, V: VectorIndex + ?Sized> {
    embedder: Arc<E>,
    index: Arc<V>,
    analyzer: QueryAnalyzer,
    batch_size: usize,
}

impl<E: EmbeddingProvider + ?Sized, V: VectorIndex + ?Sized> KnowledgeBase<E, V> {
    /// Create a knowledge base over already-initialized collaborators
    pub fn new(embedder: Arc<E>, index: Arc<V>) -> Self {
        Self {
            embedder,
            index,
            analyzer: QueryAnalyzer::new(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_analyzer(mut self, analyzer: QueryAnalyzer) -> Self {
        self.analyzer = analyzer;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn index(&self) -> &Arc<V> {
        &self.index
    }

    pub fn embedder(&self) -> &Arc<E> {
        &self.embedder
    }
}

impl<E: EmbeddingProvider + ?Sized> KnowledgeBase<E, LocalVectorIndex> {
    /// Open the persisted knowledge base described by `config`.
    ///
    /// Init order: stray storage generations are reclaimed, then the surviving
    /// generation is loaded. Nothing is read from the index before that.
    pub fn open(config: &KnowledgeBaseConfig, embedder: Arc<E>) -> Result<Self> {
        let index = LocalVectorIndex::open(&config.collection_name, &config.storage_path)?;
        Ok(Self::new(embedder, Arc::new(index)).with_batch_size(config.batch_size))
    }

    /// Persist the index and release the knowledge base
    pub async fn shutdown(self) -> Result<()> {
        self.index.flush().await?;
        info!(collection = self.index.name(), "Knowledge base shut down");
        Ok(())
    }
}

/// Open the knowledge base and load the configured knowledge source into it.
///
/// A missing or malformed source fails before the index is touched.
pub async fn initialize_knowledge_base<E: EmbeddingProvider + ?Sized + 'static>(
    config: &KnowledgeBaseConfig,
    embedder: Arc<E>,
) -> Result<KnowledgeBase<E, LocalVectorIndex>> {
    info!(path = %config.knowledge_path.display(), "Initializing knowledge base");

    let records = load_records_from_path(&config.knowledge_path).await?;
    let kb = KnowledgeBase::open(config, embedder)?;
    kb.load(records).await?;

    let stats = kb.stats().await?;
    info!(
        documents = stats.document_count,
        collection = %stats.collection_name,
        "Knowledge base ready"
    );
    Ok(kb)
}

#[async_trait]
impl<E, V> KnowledgeRetriever for KnowledgeBase<E, V>
where
    E: EmbeddingProvider + ?Sized + 'static,
    V: VectorIndex + ?Sized + 'static,
{
    async fn search(
        &self,
        query: &str,
        top_k: usize,
        category: Option<&str>,
    ) -> Result<Vec<Snippet>> {
        if top_k == 0 {
            return Ok(Vec::new());
        }
        if category.is_some_and(|c| c.trim().is_empty()) {
            return Err(Error::InvalidInput(
                "category filter must not be blank".to_string(),
            ));
        }

        let analyzed = self.analyzer.analyze(query);
        let vector = self.embedder.encode_one(&analyzed.expanded_text).await?;

        if analyzed.wants_category_scope(category) {
            if let Some(detected) = analyzed.detected_category {
                let scoped =
                    category_scoped_search(self.index.as_ref(), &vector, &analyzed, detected, top_k)
                        .await?;
                if !scoped.is_empty() {
                    return Ok(scoped);
                }
                debug!(category = detected, "Category-scoped search found nothing, falling back");
            }
        }

        ranked_search(self.index.as_ref(), &vector, &analyzed, category, top_k).await
    }

    async fn stats(&self) -> Result<KnowledgeStats> {
        Ok(KnowledgeStats {
            document_count: self.index.count().await?,
            collection_name: self.index.name().to_string(),
        })
    }

    async fn load(&self, records: Vec<KnowledgeRecord>) -> Result<IngestionReport> {
        IngestionPipeline::new(self.embedder.clone(), self.index.clone())
            .with_batch_size(self.batch_size)
            .run(records)
            .await
    }
}
