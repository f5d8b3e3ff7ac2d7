//! Matching orchestrator
//!
//! Ties the whole flow together for one request: strip markup, index both
//! documents under a fresh namespace, retrieve context, generate, parse.
//! The direct (non-retrieval) prompt is the fallback whenever retrieval
//! comes back empty or the RAG output cannot be parsed.

use std::sync::Arc;

use serde_json::Value;
use tracing::info;
use tracing::warn;

use crate::embeddings::Embedder;
use crate::errors::Result;
use crate::errors::SmartApplyError;
use crate::llm::build_match_prompt;
use crate::llm::LanguageModel;
use crate::rag::extract_json;
use crate::rag::normalize_report;
use crate::rag::ContextAssembler;
use crate::rag::DocumentIndexer;
use crate::rag::Retriever;
use crate::rag::DEFAULT_TOP_K;
use crate::text::html_to_text;
use crate::vector::VectorStore;

/// Retrieval query is the first line of the job description, capped here
const QUERY_PREFIX_LEN: usize = 200;

/// Resume/JD matching service
///
/// Holds the long-lived collaborator handles, constructed once at startup
/// and shared across requests; per-request isolation comes solely from the
/// namespace each call passes in.
pub struct MatchService {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
    llm: Arc<dyn LanguageModel>,
    indexer: DocumentIndexer,
    assembler: ContextAssembler,
    top_k: usize,
}

impl MatchService {
    /// Create from existing services
    pub fn from_services(
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn VectorStore>,
        llm: Arc<dyn LanguageModel>,
    ) -> Self {
        let indexer = DocumentIndexer::new(embedder.clone(), store.clone());
        Self {
            embedder,
            store,
            llm,
            indexer,
            assembler: ContextAssembler,
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Produce a match report for a resume and a job description
    ///
    /// Inputs may be HTML or plain text. `namespace` must be fresh for this
    /// request; it is never cleaned up afterwards.
    pub async fn match_resume_to_jd(
        &self,
        resume_text: &str,
        jd_text: &str,
        namespace: &str,
    ) -> Result<Value> {
        let resume_plain = html_to_text(resume_text);
        let jd_plain = html_to_text(jd_text);

        let doc_id = format!("session-{namespace}");
        let resume_indexed = self
            .indexer
            .index(&format!("{doc_id}-resume"), &resume_plain, namespace)
            .await;
        let jd_indexed = self
            .indexer
            .index(&format!("{doc_id}-jd"), &jd_plain, namespace)
            .await;
        if !resume_indexed || !jd_indexed {
            warn!(
                "Indexing incomplete (resume: {resume_indexed}, jd: {jd_indexed}), \
                 retrieval context may be thin"
            );
        }

        let retriever = Retriever::new(
            self.store.clone(),
            self.embedder.clone(),
            namespace,
            self.top_k,
        )?;

        let query: String = jd_plain
            .lines()
            .next()
            .unwrap_or("")
            .chars()
            .take(QUERY_PREFIX_LEN)
            .collect();
        info!("Querying retriever with: {query}");

        let retrieved = retriever.retrieve(&query).await?;
        info!("Retrieved {} chunks of context", retrieved.len());

        if retrieved.is_empty() {
            warn!("No retrieval context found, using direct prompt");
            return self.direct_generate(&resume_plain, &jd_plain).await;
        }

        let prompt = build_match_prompt(&resume_plain, &jd_plain);
        let stuffed = self.assembler.stuff(&retrieved, &prompt);

        match self.llm.generate(&stuffed).await {
            Ok(raw) => {
                if let Some(mut report) = extract_json(&raw) {
                    normalize_report(&mut report);
                    Ok(report)
                } else {
                    warn!("Unparseable chain output, falling back to direct prompt");
                    self.direct_generate(&resume_plain, &jd_plain).await
                }
            }
            Err(e) => {
                warn!("RAG generation failed ({e}), falling back to direct prompt");
                self.direct_generate(&resume_plain, &jd_plain).await
            }
        }
    }

    /// Direct path: one model call over the plain texts, no retrieval
    ///
    /// Unparseable output is a hard error here - there is nothing left to
    /// fall back to.
    pub async fn direct_generate(&self, resume_plain: &str, jd_plain: &str) -> Result<Value> {
        let prompt = build_match_prompt(resume_plain, jd_plain);
        let raw = self.llm.generate(&prompt).await?;

        match extract_json(&raw) {
            Some(mut report) => {
                normalize_report(&mut report);
                Ok(report)
            }
            None => Err(SmartApplyError::OutputParse(
                "Failed to parse model output from direct prompt".to_string(),
            )),
        }
    }
}
