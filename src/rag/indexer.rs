//! Document indexing into namespaced vector-store partitions

use std::sync::Arc;

use tracing::error;
use tracing::info;
use tracing::warn;

use crate::embeddings::Embedder;
use crate::errors::Result;
use crate::text::TextChunker;
use crate::vector::RecordMetadata;
use crate::vector::VectorRecord;
use crate::vector::VectorStore;

/// Chunks, embeds, and upserts documents under a namespace
pub struct DocumentIndexer {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
    chunker: TextChunker,
}

impl DocumentIndexer {
    pub fn new(embedder: Arc<dyn Embedder>, store: Arc<dyn VectorStore>) -> Self {
        Self {
            embedder,
            store,
            chunker: TextChunker::default(),
        }
    }

    /// Index one document; returns whether anything was actually indexed
    ///
    /// Empty input and zero-chunk results are skipped. Embedding and upsert
    /// failures are logged and absorbed rather than propagated: the match
    /// request proceeds with thinner retrieval context, and the flag tells
    /// the caller that happened.
    pub async fn index(&self, doc_id: &str, raw_text: &str, namespace: &str) -> bool {
        if raw_text.trim().is_empty() {
            warn!("Skipped empty text for doc_id={doc_id}");
            return false;
        }

        let chunks = self.chunker.chunk(raw_text);
        if chunks.is_empty() {
            warn!("No chunks produced for doc_id={doc_id}");
            return false;
        }

        info!(
            "Adding {} chunks to namespace '{}' for doc_id={}",
            chunks.len(),
            namespace,
            doc_id
        );

        match self.embed_and_upsert(doc_id, chunks, namespace).await {
            Ok(count) => {
                info!("Indexed {count} chunks into namespace '{namespace}'");
                true
            }
            Err(e) => {
                error!("Failed to index doc_id={doc_id}: {e}");
                false
            }
        }
    }

    async fn embed_and_upsert(
        &self,
        doc_id: &str,
        chunks: Vec<String>,
        namespace: &str,
    ) -> Result<usize> {
        let embeddings = self.embedder.embed(&chunks).await?;

        let records: Vec<VectorRecord> = chunks
            .into_iter()
            .zip(embeddings)
            .enumerate()
            .map(|(chunk_id, (text, values))| VectorRecord {
                id: format!("{doc_id}-{chunk_id}"),
                values,
                metadata: RecordMetadata {
                    doc_id: doc_id.to_string(),
                    chunk_id,
                    text,
                },
            })
            .collect();

        let count = records.len();
        self.store.upsert(namespace, records).await?;
        Ok(count)
    }
}
