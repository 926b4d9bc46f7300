//! Application state shared across handlers

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::auth::AuthService;
use crate::config::Environment;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub admin_wallets: Arc<Vec<String>>,
    pub environment: Environment,
    pub db_pool: Option<PgPool>,
}

impl AppState {
    pub fn new(
        auth_service: Arc<AuthService>,
        admin_wallets: Vec<String>,
        environment: Environment,
        db_pool: Option<PgPool>,
    ) -> Self {
        Self {
            auth_service,
            admin_wallets: Arc::new(admin_wallets),
            environment,
            db_pool,
        }
    }

    /// Whether a wallet is listed as an admin
    pub fn is_admin_wallet(&self, wallet: &str) -> bool {
        self.admin_wallets.iter().any(|w| w == wallet)
    }
}

impl FromRef<AppState> for Arc<AuthService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.auth_service.clone()
    }
}
