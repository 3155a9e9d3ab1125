//! Embedding service configuration

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use leavekb_core::{Error, Result};

pub const DEFAULT_API_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "paraphrase-multilingual-MiniLM-L12-v2";
pub const DEFAULT_DIMENSION: usize = 384;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Configuration for the HTTP embedding client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    pub api_url: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub dimension: usize,
    pub timeout: Duration,
}

impl EmbeddingConfig {
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
        let mut config = Self::new(DEFAULT_API_URL, DEFAULT_MODEL);

        if let Some(url) = lookup("EMBEDDING_API_URL") {
            config.api_url = url;
        }
        if let Some(model) = lookup("EMBEDDING_MODEL") {
            config.model = model;
        }
        config.api_key = lookup("EMBEDDING_API_KEY").filter(|k| !k.is_empty());

        if let Some(raw) = lookup("EMBEDDING_DIMENSION") {
            config.dimension = match raw.trim().parse::<usize>() {
                Ok(d) if d > 0 => d,
                _ => {
                    return Err(Error::Configuration(format!(
                        "EMBEDDING_DIMENSION must be a positive integer, got '{}'",
                        raw
                    )));
                }
            };
        }

        Ok(config)
    }

    /// Create configuration with explicit values
    pub fn new(api_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            model: model.into(),
            api_key: None,
            dimension: DEFAULT_DIMENSION,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    /// Full URL of the embeddings endpoint
    pub fn endpoint(&self) -> String {
        format!("{}/v1/embeddings", self.api_url.trim_end_matches('/'))
    }
}
