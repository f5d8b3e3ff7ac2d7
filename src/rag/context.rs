//! Context assembly for stuffed generation

use crate::models::RetrievedChunk;

/// Formats retrieved chunks into a context block for the model
#[derive(Debug, Clone, Default)]
pub struct ContextAssembler;

impl ContextAssembler {
    /// Render chunks as a numbered context block, retrieval order preserved
    pub fn assemble(&self, chunks: &[RetrievedChunk]) -> String {
        let mut context = String::new();
        for (idx, retrieved) in chunks.iter().enumerate() {
            context.push_str(&format!(
                "[{}] ({}#{})\n{}\n\n",
                idx + 1,
                retrieved.chunk.doc_id,
                retrieved.chunk.chunk_id,
                retrieved.chunk.text
            ));
        }
        context
    }

    /// Stuff all chunks plus the instruction prompt into one model input
    pub fn stuff(&self, chunks: &[RetrievedChunk], prompt: &str) -> String {
        format!(
            "Use the following retrieved context when it is relevant:\n\n{}{prompt}",
            self.assemble(chunks)
        )
    }
}
