//! Core traits and types for LeaveKB
//!
//! This crate defines the data model shared by the retrieval engine and its
//! collaborators, plus the capability-facing interfaces for embedding
//! providers, vector indexes and knowledge retrievers. Implementations live in
//! `leavekb-rag` and `leavekb-embed`.

pub mod embedding;
pub mod error;
pub mod retriever;
pub mod types;
pub mod vector_index;

pub use embedding::EmbeddingProvider;
pub use error::{Error, Result};
pub use retriever::KnowledgeRetriever;
pub use types::*;
pub use vector_index::{IndexEntry, IndexHit, MetadataFilter, VectorIndex};
