//! Knowledge retriever trait, the surface exposed to the orchestration layer

use async_trait::async_trait;

use crate::{IngestionReport, KnowledgeRecord, KnowledgeStats, Result, Snippet};

/// Trait for knowledge retrievers
///
/// An empty result is not an error: callers decide how to answer without
/// retrieved context.
#[async_trait]
pub trait KnowledgeRetriever: Send + Sync {
    /// Ordered snippets relevant to `query`, at most `top_k` of them
    async fn search(
        &self,
        query: &str,
        top_k: usize,
        category: Option<&str>,
    ) -> Result<Vec<Snippet>>;

    /// Statistics about the underlying collection
    async fn stats(&self) -> Result<KnowledgeStats>;

    /// Replace the knowledge set with `records`
    async fn load(&self, records: Vec<KnowledgeRecord>) -> Result<IngestionReport>;
}
