//! Embedding generation service with normalization and batch splitting

use std::sync::Arc;

use async_trait::async_trait;

use super::client::EmbeddingClient;
use super::Embedder;
use super::EmbeddingConfig;
use super::MAX_BATCH_SIZE;
use crate::errors::Result;

/// Service for generating normalized embeddings
pub struct EmbeddingService {
    client: Arc<EmbeddingClient>,
    config: EmbeddingConfig,
}

impl EmbeddingService {
    /// Create a new embedding service
    pub fn new(config: &crate::config::AppConfig) -> Result<Self> {
        Self::from_config(EmbeddingConfig::from_app_config(config))
    }

    /// Create from custom config
    pub fn from_config(config: EmbeddingConfig) -> Result<Self> {
        let client = EmbeddingClient::new(
            config.provider,
            config.model.clone(),
            config.endpoint.clone(),
            config.api_key.clone(),
        )?;

        Ok(Self {
            client: Arc::new(client),
            config,
        })
    }

    /// Generate a normalized embedding for a single text
    pub async fn generate(&self, text: &str) -> Result<Vec<f32>> {
        let mut embedding = self.client.generate(text).await?;
        normalize(&mut embedding);
        Ok(embedding)
    }

    /// Generate normalized embeddings for multiple texts in batch
    pub async fn generate_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut embeddings = Vec::with_capacity(texts.len());
        for batch in texts.chunks(MAX_BATCH_SIZE) {
            let refs: Vec<&str> = batch.iter().map(String::as_str).collect();
            embeddings.extend(self.client.generate_batch(refs).await?);
        }

        for embedding in &mut embeddings {
            normalize(embedding);
        }
        Ok(embeddings)
    }

    /// Configured embedding dimension
    pub fn dimension(&self) -> usize {
        self.config.dimension
    }
}

#[async_trait]
impl Embedder for EmbeddingService {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.generate_batch(texts).await
    }
}

/// L2-normalize a vector in place; zero vectors are left untouched
fn normalize(vector: &mut [f32]) {
    let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > f32::EPSILON {
        for v in vector.iter_mut() {
            *v /= norm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_produces_unit_vector() {
        let mut v = vec![3.0, 4.0];
        normalize(&mut v);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-6);
    }

    #[test]
    fn normalize_leaves_zero_vector_alone() {
        let mut v = vec![0.0, 0.0, 0.0];
        normalize(&mut v);
        assert_eq!(v, vec![0.0, 0.0, 0.0]);
    }

    #[tokio::test]
    async fn ollama_fan_out_surfaces_errors_through_trait() {
        use crate::embeddings::EmbeddingProvider;

        // Unreachable endpoint so the concurrent per-text requests each fail
        // fast; the first error must propagate through `Embedder::embed`.
        let service = EmbeddingService::from_config(EmbeddingConfig {
            provider: EmbeddingProvider::Ollama,
            model: "all-minilm".to_string(),
            dimension: 4,
            endpoint: "http://127.0.0.1:9".to_string(),
            api_key: None,
        })
        .unwrap();

        let embedder: Arc<dyn Embedder> = Arc::new(service);
        let texts = vec!["first chunk".to_string(), "second chunk".to_string()];
        assert!(embedder.embed(&texts).await.is_err());
    }
}
