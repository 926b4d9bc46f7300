//! Authentication middleware
//!
//! Extractors that run the bearer token verifier and expose the authenticated
//! wallet to handlers. Every successful extraction consumes the nonce the
//! token was signed over.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use std::sync::Arc;

use crate::auth::AuthService;
use crate::error::ApiError;
use crate::state::AppState;

/// Wallet address authenticated by the request's bearer token
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(AuthenticatedWallet(wallet): AuthenticatedWallet) -> String {
///     format!("Hello, {}", wallet)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthenticatedWallet(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedWallet
where
    Arc<AuthService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_service = Arc::<AuthService>::from_ref(state);

        let Some(authorization) = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
        else {
            return Err(auth_service.verifier().reject_missing_header().into());
        };

        let wallet = auth_service.authenticate(authorization).await?;

        Ok(AuthenticatedWallet(wallet))
    }
}

/// Authenticated wallet that is also listed in `ADMIN_WALLETS`
#[derive(Debug, Clone)]
pub struct AdminWallet(pub String);

#[async_trait]
impl FromRequestParts<AppState> for AdminWallet {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthenticatedWallet(wallet) =
            AuthenticatedWallet::from_request_parts(parts, state).await?;

        if !state.is_admin_wallet(&wallet) {
            tracing::warn!(wallet = %wallet, "Non-admin wallet attempted admin action");
            return Err(ApiError::UserUnauthorized);
        }

        Ok(AdminWallet(wallet))
    }
}
