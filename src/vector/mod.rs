//! Vector store boundary
//!
//! The store is namespaced shared infrastructure: every match request writes
//! its chunks under a fresh namespace, so concurrent requests never read each
//! other's vectors.

pub mod pinecone;

pub use pinecone::PineconeStore;

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;

use crate::errors::Result;

/// One embedded chunk as stored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorRecord {
    pub id: String,
    pub values: Vec<f32>,
    pub metadata: RecordMetadata,
}

/// Metadata carried with every record for mapping matches back to chunks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordMetadata {
    pub doc_id: String,
    // Stores echo numeric metadata back as floats
    #[serde(deserialize_with = "chunk_id_from_number")]
    pub chunk_id: usize,
    pub text: String,
}

fn chunk_id_from_number<'de, D>(deserializer: D) -> std::result::Result<usize, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    Ok(value as usize)
}

/// A ranked match from a similarity query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredMatch {
    pub id: String,
    pub score: f32,
    pub metadata: Option<RecordMetadata>,
}

/// Vector store collaborator boundary
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Upsert records into a namespace
    async fn upsert(&self, namespace: &str, records: Vec<VectorRecord>) -> Result<()>;

    /// Query the `top_k` nearest records in a namespace, most relevant first
    async fn query(&self, namespace: &str, vector: Vec<f32>, top_k: usize)
        -> Result<Vec<ScoredMatch>>;
}
