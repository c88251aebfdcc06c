//! Web server module.
//!
//! This module provides the HTTP surface of the relay:
//! - `GET /push` publishes the fixed message to the configured topic
//! - `POST /read` receives SNS HTTP deliveries
//! - `GET /health` for load balancer health checks

pub mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub use handlers::{health, push, read, AppState, HealthResponse};

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/push", get(push))
        .route("/read", post(read))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
