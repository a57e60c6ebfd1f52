pub mod config;
pub mod controllers;
pub mod engine;
pub mod models;
pub mod services;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

// Shared state for the whole application
pub struct AppState {
    pub engine: engine::Engine,
    pub config: config::Config,
}

impl AppState {
    pub fn new(config: config::Config) -> Arc<Self> {
        let engine = engine::Engine::new(config.holds.clone(), config.feed.clone());
        Arc::new(Self { engine, config })
    }
}

/// Builds the full router; used by `main` and by the integration tests.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "Seat Holds API v1.0" }))
        .route("/health", get(|| async { "OK" }))
        .nest("/api", controllers::routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
