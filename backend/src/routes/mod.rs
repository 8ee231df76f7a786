//! Route definitions for the farm dashboard server

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/lifecycle", lifecycle_routes())
}

/// Crop lifecycle routes
fn lifecycle_routes() -> Router<AppState> {
    Router::new()
        .route("/thresholds", get(handlers::get_thresholds))
        .route("/derive", post(handlers::derive_lifecycle))
        .route("/batch", post(handlers::derive_lifecycle_batch))
        .route("/summary", post(handlers::summarize_lifecycles))
        .route("/transition", post(handlers::check_transition))
}
