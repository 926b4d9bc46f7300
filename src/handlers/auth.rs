//! Authentication HTTP handlers
//!
//! Endpoints for wallet-based authentication.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use validator::Validate;

use super::{AdminWallet, AuthenticatedWallet};
use crate::error::ApiError;
use crate::models::{AccountResponse, ChallengeRequest, ChallengeResponse};
use crate::state::AppState;

/// POST /auth/challenge - Issue a nonce for wallet authentication
pub async fn request_challenge(
    State(state): State<AppState>,
    payload: Result<Json<ChallengeRequest>, JsonRejection>,
) -> Result<Json<ChallengeResponse>, ApiError> {
    let Json(req) = payload?;
    let wallet = req
        .wallet
        .as_deref()
        .ok_or_else(|| ApiError::MissingParameter("wallet".to_string()))?;
    req.validate()?;

    let challenge = state
        .auth_service
        .issue_challenge(wallet)
        .await
        .map_err(|e| ApiError::from(e).redacted(state.environment.is_production()))?;

    Ok(Json(challenge))
}

/// GET /auth/me - Identity of the wallet behind the bearer token
pub async fn get_current_account(
    State(state): State<AppState>,
    AuthenticatedWallet(wallet): AuthenticatedWallet,
) -> Json<AccountResponse> {
    let admin = state.is_admin_wallet(&wallet);
    Json(AccountResponse {
        account: wallet,
        admin,
    })
}

/// GET /auth/admin - Succeeds only for wallets listed in `ADMIN_WALLETS`
pub async fn get_admin_account(AdminWallet(wallet): AdminWallet) -> Json<AccountResponse> {
    Json(AccountResponse {
        account: wallet,
        admin: true,
    })
}
