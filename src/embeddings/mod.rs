//! Embeddings generation module
//!
//! Provides text embedding generation against external providers:
//! - OpenAI-compatible batch endpoints
//! - Ollama (local models, one prompt per call)
//!
//! # Examples
//!
//! ```rust,no_run
//! use smartapply::embeddings::EmbeddingService;
//! use smartapply::config::AppConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let service = EmbeddingService::new(&config)?;
//!
//!     let embedding = service.generate("Hello, world!").await?;
//!     println!("Generated embedding with {} dimensions", embedding.len());
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod generator;

pub use client::EmbeddingClient;
pub use client::EmbeddingProvider;
pub use generator::EmbeddingService;

use async_trait::async_trait;

use crate::errors::Result;

/// Default embedding dimension for MiniLM-class sentence encoders
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

/// Maximum batch size for embedding generation
pub const MAX_BATCH_SIZE: usize = 100;

/// Embedding collaborator boundary
///
/// Implementations return one normalized vector per input text, in input
/// order; empty input yields empty output.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// Configuration for embedding generation
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub provider: EmbeddingProvider,
    pub model: String,
    pub dimension: usize,
    pub endpoint: String,
    pub api_key: Option<String>,
}

impl EmbeddingConfig {
    pub fn from_app_config(config: &crate::config::AppConfig) -> Self {
        let provider = if config.embeddings.provider == "openai" {
            EmbeddingProvider::OpenAI
        } else {
            EmbeddingProvider::Ollama
        };

        Self {
            provider,
            model: config.embeddings.model.clone(),
            dimension: config.embeddings.dimension,
            endpoint: config.embeddings.endpoint.clone(),
            api_key: if config.embeddings.api_key.is_empty() {
                None
            } else {
                Some(config.embeddings.api_key.clone())
            },
        }
    }
}
