//! Authentication models

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use validator::Validate;

/// Outstanding login nonce for a wallet (one per wallet)
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone, PartialEq, Eq)]
pub struct AuthChallenge {
    pub wallet_address: String,
    pub nonce: String,
}

// ============================================================================
// Request/Response DTOs
// ============================================================================

/// Request for an authentication challenge
#[derive(Debug, Deserialize, Validate)]
pub struct ChallengeRequest {
    #[validate(length(equal = 58))]
    pub wallet: Option<String>,
}

/// Response containing the issued challenge
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeResponse {
    pub wallet: String,
    pub nonce: String,
    pub expires_at: DateTime<Utc>,
}

/// Identity of the authenticated caller
#[derive(Debug, Serialize, Deserialize)]
pub struct AccountResponse {
    pub account: String,
    pub admin: bool,
}
