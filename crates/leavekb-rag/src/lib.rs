//! Retrieval and ingestion engine for LeaveKB
//!
//! Turns a free-form leave question into an ordered set of knowledge snippets:
//!
//! ```text
//! raw query -> SynonymExpander -> QueryAnalyzer
//!           -> category-scoped search (detected category, no UI-help intent)
//!           -> general ranked search (fallback, or caller filter present)
//!           -> snippets
//! ```
//!
//! Also provides the full-replace ingestion pipeline, a persisted local vector
//! index and a deterministic offline embedder.

pub mod analyzer;
pub mod config;
mod engine;
pub mod hash_embedder;
pub mod ingest;
pub mod lexicon;
pub mod local_index;
pub mod ranking;
pub mod search;
pub mod storage;
pub mod synonyms;

#[cfg(test)]
mod tests;

pub use analyzer::{AnalyzedQuery, IntentFlags, QueryAnalyzer};
pub use config::{EmbedderKind, KnowledgeBaseConfig};
pub use engine::{KnowledgeBase, initialize_knowledge_base};
pub use hash_embedder::HashEmbedder;
pub use ingest::{IngestionPipeline, load_records_from_path, parse_records};
pub use local_index::LocalVectorIndex;
pub use synonyms::{Expansion, SynonymExpander};

// Re-export core types for convenience
pub use leavekb_core::{
    EmbeddingProvider, Error, IndexEntry, IndexHit, IngestionReport, KnowledgeRecord,
    KnowledgeRetriever, KnowledgeStats, MetadataFilter, Result, Snippet, VectorIndex,
};
