//! Vector index trait and types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{DocumentMetadata, Result};

/// A single stored item: id, vector, metadata and the document text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub id: String,
    pub vector: Vec<f32>,
    pub metadata: DocumentMetadata,
    pub document: String,
}

/// A nearest-neighbor hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexHit {
    pub id: String,
    pub document: String,
    pub metadata: DocumentMetadata,
    /// Smaller is more similar; never negative
    pub distance: f32,
}

/// Metadata equality filter applied by the index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetadataFilter {
    Category(String),
}

impl MetadataFilter {
    pub fn category(category: impl Into<String>) -> Self {
        MetadataFilter::Category(category.into())
    }

    /// Whether the given metadata passes this filter
    pub fn matches(&self, metadata: &DocumentMetadata) -> bool {
        match self {
            MetadataFilter::Category(category) => metadata.category == *category,
        }
    }
}

/// Trait for vector indexes
///
/// Hits from `query` are ordered nearest-first by the index's own metric.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Collection name
    fn name(&self) -> &str;

    /// Insert or overwrite entries by id
    async fn upsert(&self, entries: Vec<IndexEntry>) -> Result<()>;

    /// Nearest-neighbor query, optionally restricted by a metadata filter
    async fn query(
        &self,
        vector: &[f32],
        k: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<IndexHit>>;

    /// Number of stored entries
    async fn count(&self) -> Result<usize>;

    /// Drop the whole collection and recreate it empty
    async fn reset(&self) -> Result<()>;

    /// Replace the whole collection with `entries`.
    ///
    /// All or nothing: on error the collection must still hold exactly what it
    /// held before the call. A `reset` followed by `upsert` does not qualify.
    async fn replace_all(&self, entries: Vec<IndexEntry>) -> Result<()>;
}
