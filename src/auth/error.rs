//! Authentication errors
//!
//! Clients only ever see [`AuthError`]. [`VerifyFailure`] records which check
//! rejected a token and is used for logging.

use thiserror::Error;

use super::envelope::EnvelopeError;
use super::store::StoreError;

/// Client-facing authentication outcome
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid token")]
    TokenInvalid,

    #[error("Token expired")]
    TokenExpired,
}

/// Internal reason a token was rejected
#[derive(Error, Debug)]
pub enum VerifyFailure {
    #[error("Authorization header missing")]
    MissingHeader,

    #[error("Authorization header must be '<scheme> <token>'")]
    MalformedHeader,

    #[error("Malformed token: {0}")]
    MalformedToken(EnvelopeError),

    #[error("Malformed auth message: {0}")]
    MalformedMessage(EnvelopeError),

    #[error("Unexpected service '{0}'")]
    ServiceMismatch(String),

    #[error("Auth account does not match claimed wallet")]
    AccountMismatch,

    #[error("Nonce has no parseable expiry")]
    MissingExpiry,

    #[error("Nonce expired at {0}")]
    NonceExpired(i64),

    #[error("Nonce expiry {0} exceeds the maximum challenge lifetime")]
    NonceTooFarInFuture(i64),

    #[error("Envelope is not a self-addressed sentinel-round envelope")]
    EnvelopeShape,

    #[error("No outstanding challenge for wallet")]
    ChallengeNotFound,

    #[error("Nonce does not match outstanding challenge")]
    NonceMismatch,

    #[error("Invalid wallet address: {0}")]
    InvalidAddress(String),

    #[error("Signature verification failed")]
    BadSignature,

    #[error("Challenge already consumed")]
    AlreadyConsumed,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl VerifyFailure {
    /// Collapse into the two outcomes exposed to clients
    pub fn into_auth_error(self) -> AuthError {
        match self {
            VerifyFailure::MissingExpiry
            | VerifyFailure::NonceExpired(_)
            | VerifyFailure::NonceTooFarInFuture(_) => AuthError::TokenExpired,
            _ => AuthError::TokenInvalid,
        }
    }
}

impl From<VerifyFailure> for AuthError {
    fn from(failure: VerifyFailure) -> Self {
        failure.into_auth_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_failures_map_to_token_expired() {
        assert_eq!(
            VerifyFailure::NonceExpired(0).into_auth_error(),
            AuthError::TokenExpired
        );
        assert_eq!(
            VerifyFailure::NonceTooFarInFuture(0).into_auth_error(),
            AuthError::TokenExpired
        );
        assert_eq!(
            VerifyFailure::MissingExpiry.into_auth_error(),
            AuthError::TokenExpired
        );
    }

    #[test]
    fn test_everything_else_maps_to_token_invalid() {
        let failures = vec![
            VerifyFailure::MissingHeader,
            VerifyFailure::MalformedHeader,
            VerifyFailure::ServiceMismatch("other".to_string()),
            VerifyFailure::AccountMismatch,
            VerifyFailure::EnvelopeShape,
            VerifyFailure::ChallengeNotFound,
            VerifyFailure::NonceMismatch,
            VerifyFailure::BadSignature,
            VerifyFailure::AlreadyConsumed,
            VerifyFailure::Store(StoreError::Unavailable("down".to_string())),
        ];

        for failure in failures {
            assert_eq!(failure.into_auth_error(), AuthError::TokenInvalid);
        }
    }

    #[test]
    fn test_client_messages() {
        assert_eq!(AuthError::TokenInvalid.to_string(), "Invalid token");
        assert_eq!(AuthError::TokenExpired.to_string(), "Token expired");
    }
}
