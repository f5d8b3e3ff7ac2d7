//! Shared domain types

use serde::Deserialize;
use serde::Serialize;

/// A bounded-length piece of a source document with positional metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    pub doc_id: String,
    pub chunk_id: usize,
}

/// A chunk returned from the vector store, ranked by relevance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedChunk {
    #[serde(flatten)]
    pub chunk: Chunk,
    pub score: f32,
}

/// A learning resource suggested by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub title: String,
    pub url: String,
}
