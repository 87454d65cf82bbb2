//! HTTP surface
//!
//! [`create_router`] assembles the feature routers under `/api/v1` together
//! with the health endpoint and the middleware stack.

pub mod response;

use axum::{extract::State, http::Uri, response::IntoResponse, routing::get, Json, Router};
use serde_json::json;
use tower_http::compression::CompressionLayer;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::features::{self, FeatureState};
use crate::middleware;
use crate::repository::SharedRepository;

/// Build the application router with all routes and middleware
pub fn create_router(repo: SharedRepository, config: &Config) -> Router {
    let state = FeatureState {
        repo: repo.clone(),
        retention_cap: config.datasets.retention_cap,
    };

    let api_v1 = features::router(state, config.server.max_upload_bytes)
        .merge(Router::new().route("/health", get(health)).with_state(repo));

    Router::new()
        .route("/", get(root))
        .nest("/api/v1", api_v1)
        .fallback(not_found)
        // Apply layers from innermost to outermost
        .layer(CompressionLayer::new())
        .layer(middleware::tracing_layer())
        .layer(middleware::cors_layer(&config.cors))
}

async fn root() -> impl IntoResponse {
    Json(json!({
        "name": "eqlens",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running"
    }))
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}

/// Health check handler
async fn health(State(repo): State<SharedRepository>) -> AppResult<impl IntoResponse> {
    repo.health_check()
        .await
        .map_err(|e| AppError::Unavailable(format!("storage check failed: {e}")))?;

    Ok(Json(json!({ "status": "ok" })))
}
