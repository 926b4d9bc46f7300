//! Service banner and health check

use axum::{extract::State, Json};
use serde::Serialize;

use crate::db;
use crate::state::AppState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub store: String,
    pub version: String,
}

/// GET / - Service banner
pub async fn root() -> &'static str {
    "terragrids auth api"
}

/// GET /health - Challenge store connectivity
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let store = match &state.db_pool {
        Some(pool) => match db::check_health(pool).await {
            Ok(()) => "connected".to_string(),
            Err(e) => format!("error: {}", e),
        },
        None => state.auth_service.store().backend().to_string(),
    };

    let status = if store.starts_with("error") {
        "unhealthy"
    } else {
        "healthy"
    };

    Json(HealthResponse {
        status: status.to_string(),
        store,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
