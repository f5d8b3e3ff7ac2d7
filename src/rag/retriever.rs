//! Namespace-scoped retrieval

use std::sync::Arc;

use tracing::debug;

use crate::embeddings::Embedder;
use crate::errors::Result;
use crate::errors::SmartApplyError;
use crate::models::Chunk;
use crate::models::RetrievedChunk;
use crate::vector::VectorStore;

/// Default number of chunks returned per query
pub const DEFAULT_TOP_K: usize = 5;

/// Retriever handle over one vector-store namespace
pub struct Retriever {
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn Embedder>,
    namespace: String,
    top_k: usize,
}

impl Retriever {
    /// Create a retriever for a namespace
    ///
    /// A misconfigured handle is a hard error, propagated to the caller; an
    /// unreachable store already failed at connect time.
    pub fn new(
        store: Arc<dyn VectorStore>,
        embedder: Arc<dyn Embedder>,
        namespace: &str,
        top_k: usize,
    ) -> Result<Self> {
        if namespace.trim().is_empty() {
            return Err(SmartApplyError::RetrieverInit(
                "namespace must not be empty".to_string(),
            ));
        }
        if top_k == 0 {
            return Err(SmartApplyError::RetrieverInit(
                "top_k must be positive".to_string(),
            ));
        }

        debug!("Retriever ready for namespace '{namespace}' with top_k={top_k}");
        Ok(Self {
            store,
            embedder,
            namespace: namespace.to_string(),
            top_k,
        })
    }

    /// Return the nearest chunks for a query, most relevant first
    pub async fn retrieve(&self, query: &str) -> Result<Vec<RetrievedChunk>> {
        let embeddings = self.embedder.embed(&[query.to_string()]).await?;
        let vector = embeddings.into_iter().next().ok_or_else(|| {
            SmartApplyError::Embedding("No embedding returned for query".to_string())
        })?;

        let matches = self
            .store
            .query(&self.namespace, vector, self.top_k)
            .await?;

        let chunks = matches
            .into_iter()
            .filter_map(|m| {
                m.metadata.map(|md| RetrievedChunk {
                    chunk: Chunk {
                        text: md.text,
                        doc_id: md.doc_id,
                        chunk_id: md.chunk_id,
                    },
                    score: m.score,
                })
            })
            .collect();

        Ok(chunks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crate::vector::ScoredMatch;
    use crate::vector::VectorRecord;

    struct NullStore;

    #[async_trait]
    impl VectorStore for NullStore {
        async fn upsert(&self, _: &str, _: Vec<VectorRecord>) -> Result<()> {
            Ok(())
        }
        async fn query(&self, _: &str, _: Vec<f32>, _: usize) -> Result<Vec<ScoredMatch>> {
            Ok(Vec::new())
        }
    }

    struct NullEmbedder;

    #[async_trait]
    impl Embedder for NullEmbedder {
        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|_| vec![0.0; 4]).collect())
        }
    }

    #[test]
    fn rejects_empty_namespace() {
        let result = Retriever::new(Arc::new(NullStore), Arc::new(NullEmbedder), "  ", 5);
        assert!(matches!(result, Err(SmartApplyError::RetrieverInit(_))));
    }

    #[test]
    fn rejects_zero_top_k() {
        let result = Retriever::new(Arc::new(NullStore), Arc::new(NullEmbedder), "ns", 0);
        assert!(matches!(result, Err(SmartApplyError::RetrieverInit(_))));
    }

    #[tokio::test]
    async fn empty_store_yields_no_chunks() {
        let retriever =
            Retriever::new(Arc::new(NullStore), Arc::new(NullEmbedder), "ns", 5).unwrap();
        let chunks = retriever.retrieve("anything").await.unwrap();
        assert!(chunks.is_empty());
    }
}
