//! Embedding provider trait

use async_trait::async_trait;

use crate::Result;

/// Trait for embedding providers (local hashing, HTTP services, etc.)
///
/// Implementations must preserve input order and return identical vectors for
/// identical input.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Encode a batch of texts into vectors, one per input
    async fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Encode a single text
    async fn encode_one(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.encode(&[text.to_string()]).await?;
        vectors
            .pop()
            .ok_or_else(|| crate::Error::Embedding("Provider returned no vector".to_string()))
    }

    /// Length of the vectors this provider produces
    fn dimension(&self) -> usize;

    /// Identifier of the underlying model
    fn model_id(&self) -> &str;
}
