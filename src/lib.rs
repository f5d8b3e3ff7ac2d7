pub mod api;
pub mod config;
pub mod embeddings;
pub mod errors;
pub mod llm;
pub mod logging;
pub mod models;
pub mod rag;
pub mod text;
pub mod vector;

pub use config::AppConfig;
pub use errors::*;
