//! HTTP server implementation

use std::sync::Arc;

use tower_http::cors::Any;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::handlers::AppState;
use crate::api::routes;
use crate::config::AppConfig;
use crate::embeddings::EmbeddingService;
use crate::llm::LlmService;
use crate::vector::PineconeStore;
use crate::Result;

/// Start the API server
pub async fn serve_api(config: &AppConfig, host: String, port: u16, enable_cors: bool) -> Result<()> {
    info!("Starting SmartApply API server...");

    // Initialize long-lived services; an unreachable vector store fails here,
    // before the listener comes up
    let embedder = Arc::new(EmbeddingService::new(config)?);
    let store = Arc::new(
        PineconeStore::connect(&config.vector_store, config.embedding_dimension()).await?,
    );
    let llm = Arc::new(LlmService::new(&config.llm)?);

    let state = AppState {
        embedder,
        store,
        llm,
    };

    let mut app = routes::app_routes(state).layer(TraceLayer::new_for_http());

    if enable_cors {
        info!("CORS enabled");
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("API server listening on http://{addr}");
    info!("Available endpoints:");
    info!("  GET  /            - Liveness");
    info!("  GET  /health      - Health check");
    info!("  POST /api/match/  - Resume/JD match");

    axum::serve(listener, app).await?;

    Ok(())
}
