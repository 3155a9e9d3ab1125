//! HTTP embedding client implementation

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use leavekb_core::{EmbeddingProvider, Error, Result};

use crate::config::EmbeddingConfig;

/// Client for an OpenAI-compatible embeddings endpoint
pub struct HttpEmbeddingClient {
    config: EmbeddingConfig,
    client: Client,
}

#[derive(Serialize)]
pub(crate) struct EmbeddingRequest<'a> {
    pub model: &'a str,
    pub input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

impl HttpEmbeddingClient {
    /// Create a new client from configuration
    pub fn new(config: EmbeddingConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Create a new client from environment variables
    pub fn from_env() -> Result<Self> {
        let config = EmbeddingConfig::from_env()?;
        Self::new(config)
    }

    pub fn config(&self) -> &EmbeddingConfig {
        &self.config
    }

    /// Decode a response body into vectors ordered like the request input
    pub(crate) fn parse_response(&self, body: &str, expected: usize) -> Result<Vec<Vec<f32>>> {
        let response: EmbeddingResponse = serde_json::from_str(body)
            .map_err(|e| Error::Embedding(format!("Unexpected embedding response: {}", e)))?;

        if response.data.len() != expected {
            return Err(Error::Embedding(format!(
                "Embedding service returned {} vectors for {} inputs",
                response.data.len(),
                expected
            )));
        }

        let mut slots: Vec<Option<Vec<f32>>> = vec![None; expected];
        for item in response.data {
            if item.embedding.len() != self.config.dimension {
                return Err(Error::Embedding(format!(
                    "Expected dimension {}, got {}",
                    self.config.dimension,
                    item.embedding.len()
                )));
            }
            let slot = match slots.get_mut(item.index) {
                Some(slot) if slot.is_none() => slot,
                _ => {
                    return Err(Error::Embedding(format!(
                        "Invalid or duplicate embedding index {}",
                        item.index
                    )));
                }
            };
            *slot = Some(item.embedding);
        }

        Ok(slots.into_iter().flatten().collect())
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingClient {
    async fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request_body = EmbeddingRequest {
            model: &self.config.model,
            input: texts,
        };

        let mut request = self
            .client
            .post(self.config.endpoint())
            .header("Accept", "application/json")
            .json(&request_body);
        if let Some(api_key) = &self.config.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(Error::Embedding(format!(
                "Embedding request failed with status {}: {}",
                status, error_text
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        debug!(inputs = texts.len(), model = %self.config.model, "Received embeddings");
        self.parse_response(&body, texts.len())
    }

    fn dimension(&self) -> usize {
        self.config.dimension
    }

    fn model_id(&self) -> &str {
        &self.config.model
    }
}
