//! Deterministic offline embedder.
//!
//! Hashes character unigrams, character bigrams and whitespace-separated words
//! into a fixed number of buckets and L2-normalizes the result. Chinese text
//! has no word boundaries, so characters carry most of the signal. Buckets
//! come from md5 digests, which are stable across builds and platforms.

use async_trait::async_trait;

use leavekb_core::{EmbeddingProvider, Error, Result};

pub const DEFAULT_DIMENSION: usize = 384;

const UNIGRAM_WEIGHT: f32 = 1.0;
const BIGRAM_WEIGHT: f32 = 0.8;
const WORD_WEIGHT: f32 = 0.5;

pub struct HashEmbedder {
    dimension: usize,
    model_id: String,
}

impl HashEmbedder {
    pub fn new(dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(Error::Configuration(
                "Embedding dimension must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            dimension,
            model_id: format!("hash-ngram-{}", dimension),
        })
    }

    fn bucket(&self, feature: &str) -> usize {
        let digest = md5::compute(feature.as_bytes());
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&digest.0[..8]);
        (u64::from_le_bytes(bytes) % self.dimension as u64) as usize
    }

    /// Embed one text
    pub fn embed(&self, text: &str) -> Vec<f32> {
        let normalized = text.to_lowercase();
        let chars: Vec<char> = normalized.chars().filter(|c| c.is_alphanumeric()).collect();
        let mut embedding = vec![0.0f32; self.dimension];

        for c in &chars {
            let idx = self.bucket(&format!("u:{}", c));
            embedding[idx] += UNIGRAM_WEIGHT;
        }

        for window in chars.windows(2) {
            let idx = self.bucket(&format!("b:{}{}", window[0], window[1]));
            embedding[idx] += BIGRAM_WEIGHT;
        }

        for word in normalized.split_whitespace() {
            let idx = self.bucket(&format!("w:{}", word));
            embedding[idx] += WORD_WEIGHT;
        }

        let magnitude: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for val in embedding.iter_mut() {
                *val /= magnitude;
            }
        }

        embedding
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self {
            dimension: DEFAULT_DIMENSION,
            model_id: format!("hash-ngram-{}", DEFAULT_DIMENSION),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    async fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.embed(text)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
