//! API request handlers

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::error;
use tracing::info;
use uuid::Uuid;

use crate::api::types::*;
use crate::embeddings::Embedder;
use crate::llm::LanguageModel;
use crate::rag::MatchService;
use crate::vector::VectorStore;

/// Shared application state
///
/// Collaborator handles are constructed once at startup and shared by
/// reference into every request.
#[derive(Clone)]
pub struct AppState {
    pub embedder: Arc<dyn Embedder>,
    pub store: Arc<dyn VectorStore>,
    pub llm: Arc<dyn LanguageModel>,
}

/// Root liveness handler
pub async fn root() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "SmartApply backend is running.".to_string(),
    })
}

/// Health check handler
pub async fn health() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok".to_string(),
    })
}

/// Match a resume against a job description
pub async fn match_resume(
    State(state): State<AppState>,
    Json(req): Json<MatchRequest>,
) -> Result<Json<MatchResponse>, (StatusCode, Json<ErrorResponse>)> {
    // Fresh namespace per request: concurrent matches never share index state
    let namespace = Uuid::new_v4().to_string();
    info!("POST /api/match/ (namespace {namespace})");

    let service = MatchService::from_services(
        state.embedder.clone(),
        state.store.clone(),
        state.llm.clone(),
    );

    let result = service
        .match_resume_to_jd(&req.resume_text, &req.jd_text, &namespace)
        .await
        .and_then(|report| MatchResponse::from_report(&report));

    match result {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            error!("Error matching resume: {e}");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(format!("Matching failed: {e}"))),
            ))
        }
    }
}
