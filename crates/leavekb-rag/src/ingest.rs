//! Knowledge ingestion pipeline

use std::path::Path;
use std::sync::Arc;
use tracing::info;

use leavekb_core::{
    DocumentMetadata, EmbeddingProvider, Error, IndexEntry, IngestionReport, KnowledgeDocument,
    KnowledgeRecord, Result, VectorIndex,
};

pub const DEFAULT_BATCH_SIZE: usize = 32;

/// Parse a knowledge source: a JSON array of `{content, category}` objects
pub fn parse_records(json: &str) -> Result<Vec<KnowledgeRecord>> {
    serde_json::from_str(json)
        .map_err(|e| Error::Configuration(format!("Malformed knowledge source: {}", e)))
}

/// Read and parse a knowledge source file
pub async fn load_records_from_path(path: impl AsRef<Path>) -> Result<Vec<KnowledgeRecord>> {
    let path = path.as_ref();
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        Error::Configuration(format!(
            "Cannot read knowledge source {}: {}",
            path.display(),
            e
        ))
    })?;

    let records = parse_records(&content)?;
    info!(path = %path.display(), records = records.len(), "Read knowledge source");
    Ok(records)
}

fn validate(records: &[KnowledgeRecord]) -> Result<()> {
    if records.is_empty() {
        return Err(Error::Configuration(
            "Knowledge source contains no records".to_string(),
        ));
    }

    for (i, record) in records.iter().enumerate() {
        if record.content.trim().is_empty() {
            return Err(Error::Configuration(format!("Record {} has empty content", i)));
        }
        if record.category.trim().is_empty() {
            return Err(Error::Configuration(format!("Record {} has empty category", i)));
        }
    }

    Ok(())
}

/// Bulk loader with full-replace semantics
pub struct IngestionPipeline<E: EmbeddingProvider + ?Sized, V: VectorIndex + ?Sized> {
    embedder: Arc<E>,
    index: Arc<V>,
    batch_size: usize,
}

impl<E: EmbeddingProvider + ?Sized, V: VectorIndex + ?Sized> IngestionPipeline<E, V> {
    pub fn new(embedder: Arc<E>, index: Arc<V>) -> Self {
        Self {
            embedder,
            index,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Embed every record, in order, before the index is touched
    async fn embed_all(&self, records: &[KnowledgeRecord]) -> Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(records.len());

        for batch in records.chunks(self.batch_size) {
            let texts: Vec<String> = batch.iter().map(|r| r.content.clone()).collect();
            let embedded = self.embedder.encode(&texts).await?;
            if embedded.len() != texts.len() {
                return Err(Error::Embedding(format!(
                    "Provider returned {} vectors for {} texts",
                    embedded.len(),
                    texts.len()
                )));
            }
            vectors.extend(embedded);
        }

        Ok(vectors)
    }

    /// Ingest `records`, replacing the whole collection if it is non-empty.
    ///
    /// Validation and embedding both happen before the index is modified, so a
    /// malformed source or an embedding failure leaves the prior index as it
    /// was.
    pub async fn run(&self, records: Vec<KnowledgeRecord>) -> Result<IngestionReport> {
        validate(&records)?;

        info!(
            documents = records.len(),
            model = self.embedder.model_id(),
            "Embedding knowledge records"
        );
        let vectors = self.embed_all(&records).await?;

        let entries: Vec<IndexEntry> = records
            .into_iter()
            .zip(vectors)
            .enumerate()
            .map(|(position, (record, vector))| {
                let document = KnowledgeDocument {
                    id: KnowledgeDocument::id_for(position),
                    content: record.content,
                    category: record.category,
                };
                IndexEntry {
                    id: document.id,
                    vector,
                    metadata: DocumentMetadata {
                        category: document.category,
                        doc_id: position,
                    },
                    document: document.content,
                }
            })
            .collect();
        let documents_indexed = entries.len();

        let replaced_previous = self.index.count().await? > 0;
        if replaced_previous {
            info!(collection = self.index.name(), "Collection not empty, replacing it");
            self.index.replace_all(entries).await?;
        } else {
            self.index.upsert(entries).await?;
        }

        info!(documents = documents_indexed, "Knowledge loaded into vector index");
        Ok(IngestionReport {
            documents_indexed,
            replaced_previous,
        })
    }
}
