//! HTTP surface: `POST /classify` and `GET /health` on an axum router.

pub mod handlers;
pub mod models;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::Classifier;

/// Shared read-only state for request handlers.
pub struct AppState {
    pub classifier: Classifier,
}

/// Builds the application router. CORS is permissive because the service
/// fronts a browser app served from a different origin.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/classify", post(handlers::classify))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
