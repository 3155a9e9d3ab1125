//! HTTP embedding provider for LeaveKB
//!
//! This crate provides an `EmbeddingProvider` backed by an OpenAI-compatible
//! `/v1/embeddings` endpoint (Ollama, vLLM, text-embeddings-inference, ...).

mod client;
mod config;


pub use client::HttpEmbeddingClient;
pub use config::EmbeddingConfig;

// Re-export core types for convenience
pub use leavekb_core::{EmbeddingProvider, Error, Result};
