//! RAG (Retrieval-Augmented Generation) module
//!
//! End-to-end matching flow: index a resume and a job description into a
//! per-request vector-store namespace, retrieve the most relevant chunks,
//! generate a structured fit assessment with a language model, and parse the
//! free-form output defensively with a direct (non-retrieval) fallback.

pub mod context;
pub mod indexer;
pub mod matcher;
pub mod output;
pub mod retriever;

pub use context::ContextAssembler;
pub use indexer::DocumentIndexer;
pub use matcher::MatchService;
pub use output::extract_json;
pub use output::normalize_report;
pub use output::normalize_resources;
pub use retriever::Retriever;
pub use retriever::DEFAULT_TOP_K;

/// Keys every surfaced match report must contain
pub const REQUIRED_REPORT_KEYS: [&str; 4] =
    ["score", "advice", "missing_skills", "resume_suggestions"];
