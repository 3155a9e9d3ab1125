//! Knowledge base configuration

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use leavekb_core::{Error, Result};

use crate::hash_embedder::DEFAULT_DIMENSION;
use crate::ingest::DEFAULT_BATCH_SIZE;

pub const DEFAULT_STORAGE_PATH: &str = "knowledge/vectordb";
pub const DEFAULT_KNOWLEDGE_PATH: &str = "knowledge/qa_knowledge.json";
pub const DEFAULT_COLLECTION: &str = "leave_system_knowledge";
pub const DEFAULT_TOP_K: usize = 3;

/// Which embedding provider the binary wires in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedderKind {
    /// Offline hashing embedder
    Hash,
    /// OpenAI-compatible embedding service
    Http,
}

impl EmbedderKind {
    pub fn parse(s: &str) -> Option<EmbedderKind> {
        match s.trim().to_lowercase().as_str() {
            "hash" | "local" => Some(EmbedderKind::Hash),
            "http" | "remote" => Some(EmbedderKind::Http),
            _ => None,
        }
    }
}

/// Configuration for the knowledge base
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeBaseConfig {
    pub storage_path: PathBuf,
    pub knowledge_path: PathBuf,
    pub collection_name: String,
    pub default_top_k: usize,
    pub embedder: EmbedderKind,
    pub embedding_dimension: usize,
    pub batch_size: usize,
}

impl Default for KnowledgeBaseConfig {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
            knowledge_path: PathBuf::from(DEFAULT_KNOWLEDGE_PATH),
            collection_name: DEFAULT_COLLECTION.to_string(),
            default_top_k: DEFAULT_TOP_K,
            embedder: EmbedderKind::Hash,
            embedding_dimension: DEFAULT_DIMENSION,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

fn parse_positive(key: &str, value: &str) -> Result<usize> {
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(Error::Configuration(format!(
            "{} must be a positive integer, got '{}'",
            key, value
        ))),
    }
}

impl KnowledgeBaseConfig {
    /// Create configuration from environment variables (and `.env`)
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup("LEAVEKB_STORAGE_PATH") {
            config.storage_path = PathBuf::from(path);
        }
        if let Some(path) = lookup("LEAVEKB_KNOWLEDGE_PATH") {
            config.knowledge_path = PathBuf::from(path);
        }
        if let Some(name) = lookup("LEAVEKB_COLLECTION") {
            config.collection_name = name;
        }
        if let Some(top_k) = lookup("LEAVEKB_TOP_K") {
            config.default_top_k = parse_positive("LEAVEKB_TOP_K", &top_k)?;
        }
        if let Some(kind) = lookup("LEAVEKB_EMBEDDER") {
            config.embedder = EmbedderKind::parse(&kind).ok_or_else(|| {
                Error::Configuration(format!(
                    "LEAVEKB_EMBEDDER must be 'hash' or 'http', got '{}'",
                    kind
                ))
            })?;
        }
        if let Some(dim) = lookup("LEAVEKB_EMBEDDING_DIM") {
            config.embedding_dimension = parse_positive("LEAVEKB_EMBEDDING_DIM", &dim)?;
        }
        if let Some(batch) = lookup("LEAVEKB_EMBEDDING_BATCH") {
            config.batch_size = parse_positive("LEAVEKB_EMBEDDING_BATCH", &batch)?;
        }

        Ok(config)
    }

    pub fn with_storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_path = path.into();
        self
    }

    pub fn with_knowledge_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.knowledge_path = path.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = KnowledgeBaseConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.storage_path, PathBuf::from("knowledge/vectordb"));
        assert_eq!(config.collection_name, "leave_system_knowledge");
        assert_eq!(config.default_top_k, 3);
        assert_eq!(config.embedder, EmbedderKind::Hash);
    }

    #[test]
    fn test_overrides() {
        let config = KnowledgeBaseConfig::from_lookup(lookup(&[
            ("LEAVEKB_STORAGE_PATH", "/var/lib/leavekb"),
            ("LEAVEKB_TOP_K", "5"),
            ("LEAVEKB_EMBEDDER", "HTTP"),
            ("LEAVEKB_EMBEDDING_BATCH", "8"),
        ]))
        .unwrap();

        assert_eq!(config.storage_path, PathBuf::from("/var/lib/leavekb"));
        assert_eq!(config.default_top_k, 5);
        assert_eq!(config.embedder, EmbedderKind::Http);
        assert_eq!(config.batch_size, 8);
    }

    #[test]
    fn test_invalid_values_are_configuration_errors() {
        for pairs in [
            [("LEAVEKB_TOP_K", "0")],
            [("LEAVEKB_TOP_K", "three")],
            [("LEAVEKB_EMBEDDER", "chroma")],
            [("LEAVEKB_EMBEDDING_DIM", "-1")],
        ] {
            let result = KnowledgeBaseConfig::from_lookup(lookup(&pairs));
            assert!(matches!(result, Err(Error::Configuration(_))), "{:?}", pairs);
        }
    }

    #[test]
    fn test_builder_overrides() {
        let config = KnowledgeBaseConfig::default()
            .with_storage_path("/tmp/kb")
            .with_knowledge_path("/tmp/kb.json");

        assert_eq!(config.storage_path, PathBuf::from("/tmp/kb"));
        assert_eq!(config.knowledge_path, PathBuf::from("/tmp/kb.json"));
    }
}
