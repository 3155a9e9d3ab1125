//! Data model shared across the knowledge base

use serde::{Deserialize, Serialize};

/// One entry of a knowledge source, as read from the knowledge JSON file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeRecord {
    pub content: String,
    pub category: String,
}

impl KnowledgeRecord {
    pub fn new(content: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            category: category.into(),
        }
    }
}

/// A record after ingestion. Never mutated; identity is `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeDocument {
    pub id: String,
    pub content: String,
    pub category: String,
}

impl KnowledgeDocument {
    /// Id assigned to the record at `position` in the ingested sequence
    pub fn id_for(position: usize) -> String {
        format!("doc_{}", position)
    }
}

/// Metadata stored alongside every vector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub category: String,
    pub doc_id: usize,
}

/// A retrieved knowledge snippet handed back to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snippet {
    pub content: String,
    pub category: String,
    pub distance: f32,
}

/// Knowledge base statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeStats {
    pub document_count: usize,
    pub collection_name: String,
}

/// Outcome of a successful ingestion run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestionReport {
    pub documents_indexed: usize,
    /// Whether a non-empty index was replaced wholesale
    pub replaced_previous: bool,
}
