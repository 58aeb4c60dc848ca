//! HTTP server setup and routing
//!
//! Sets up the Axum server with routes for job submission, the progress
//! stream, and artifact retrieval.

use crate::collab::Collaborators;
use crate::error::{Error, Result};
use crate::pipeline::background::BackgroundResolver;
use crate::state::SharedState;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

/// Shared application context passed to all handlers
#[derive(Clone)]
pub struct AppContext {
    pub state: Arc<SharedState>,
    pub collaborators: Collaborators,
    pub resolver: BackgroundResolver,
    pub output_dir: PathBuf,
}

/// Create the API router
pub fn create_router(ctx: AppContext) -> Router {
    Router::new()
        // Health check (no prefix for health endpoint)
        .route("/health", get(handlers_health))
        // API routes
        .nest(
            "/api",
            Router::new()
                .route("/story", post(super::handlers::submit_story))
                .route("/progress/:job_id", get(super::progress::progress_stream))
                .route("/audio/:job_id", get(super::handlers::download_audio))
                .route("/emotions/:job_id", get(super::handlers::get_emotions)),
        )
        .with_state(ctx)
        // Enable CORS for local clients
        .layer(CorsLayer::permissive())
}

async fn handlers_health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "module": "storymix-gen",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Run the HTTP API server until shutdown
pub async fn run(ctx: AppContext, port: u16) -> Result<()> {
    let app = create_router(ctx);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::Http(format!("Failed to bind to {}: {}", addr, e)))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::Http(format!("Server error: {}", e)))?;

    Ok(())
}
