//! Farm Dashboard - Backend Server
//!
//! Derives crop lifecycle view-models (growth progress, harvest countdown,
//! stage labels, risk alerts) for the farm management dashboard.

use axum::{routing::get, Router};
use shared::{LifecycleDeriver, LifecycleResult};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod extract;
mod handlers;
mod routes;
mod services;

pub use config::Config;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub deriver: LifecycleDeriver,
}

impl AppState {
    /// Build state, rejecting inconsistent lifecycle thresholds
    pub fn new(config: Config) -> LifecycleResult<Self> {
        let deriver = config.lifecycle.deriver()?;
        Ok(Self {
            config: Arc::new(config),
            deriver,
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "farm_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::load()?;

    tracing::info!("Starting Farm Dashboard Server");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!("Lifecycle thresholds: {:?}", config.lifecycle.thresholds());

    let host = config.server.host.clone();
    let port = config.server.port;

    // Create application state
    let state = AppState::new(config).map_err(error::AppError::from)?;

    // Build application
    let app = create_app(state);

    // Start server
    let listener = tokio::net::TcpListener::bind((host.as_str(), port)).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Farm Dashboard API v1.0"
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
