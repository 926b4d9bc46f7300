//! Route definitions for the Terragrids auth API

mod auth;

use axum::{routing::get, Router};

use crate::handlers::health;
use crate::middleware;
use crate::state::AppState;

pub use auth::auth_routes;

/// Service-level routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
}

/// Assemble the application router with request tracing
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(auth_routes())
        .with_state(state)
        .layer(axum::middleware::from_fn(middleware::request_tracing))
}
