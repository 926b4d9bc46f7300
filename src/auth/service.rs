//! Authentication service
//!
//! Issues wallet challenges and authenticates bearer tokens against them.

use std::sync::Arc;

use chrono::{Duration, Utc};
use thiserror::Error;

use crate::models::ChallengeResponse;

use super::crypto::{decode_address, CryptoError};
use super::error::AuthError;
use super::nonce::ChallengeNonce;
use super::store::{ChallengeStore, StoreError};
use super::verifier::{AuthVerifier, ProtocolSettings};

/// Challenge issuance errors
#[derive(Error, Debug)]
pub enum ChallengeError {
    #[error("Invalid wallet address: {0}")]
    InvalidWalletAddress(#[from] CryptoError),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn ChallengeStore>,
    verifier: AuthVerifier,
    challenge_ttl: Duration,
}

impl AuthService {
    /// Create a new AuthService
    pub fn new(
        store: Arc<dyn ChallengeStore>,
        settings: ProtocolSettings,
        challenge_ttl: Duration,
    ) -> Self {
        Self {
            verifier: AuthVerifier::new(store.clone(), settings),
            store,
            challenge_ttl,
        }
    }

    /// Issue a fresh challenge for a wallet, replacing any outstanding one
    pub async fn issue_challenge(&self, wallet: &str) -> Result<ChallengeResponse, ChallengeError> {
        decode_address(wallet)?;

        let nonce = ChallengeNonce::generate(self.challenge_ttl, Utc::now());
        self.store.put(wallet, &nonce.to_string()).await?;

        tracing::info!(wallet = %wallet, expires_at = %nonce.expires_at(), "Challenge issued");

        Ok(ChallengeResponse {
            wallet: wallet.to_string(),
            nonce: nonce.to_string(),
            expires_at: nonce.expires_at(),
        })
    }

    /// Authenticate an `Authorization` header value
    pub async fn authenticate(&self, authorization: &str) -> Result<String, AuthError> {
        self.verifier.verify(authorization).await
    }

    pub fn verifier(&self) -> &AuthVerifier {
        &self.verifier
    }

    pub fn store(&self) -> &Arc<dyn ChallengeStore> {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::crypto::encode_address;
    use crate::auth::nonce::expiry_millis;
    use crate::auth::store::InMemoryChallengeStore;

    fn service(store: Arc<InMemoryChallengeStore>) -> AuthService {
        AuthService::new(store, ProtocolSettings::default(), Duration::minutes(5))
    }

    #[tokio::test]
    async fn test_issue_challenge_stores_nonce() {
        let store = Arc::new(InMemoryChallengeStore::new());
        let wallet = encode_address(&[3u8; 32]);

        let before = Utc::now().timestamp_millis();
        let response = service(store.clone()).issue_challenge(&wallet).await.unwrap();

        let stored = store.get(&wallet).await.unwrap().unwrap();
        assert_eq!(stored.nonce, response.nonce);
        assert_eq!(response.wallet, wallet);

        let expiry = expiry_millis(&response.nonce).unwrap();
        assert!(expiry >= before + 5 * 60 * 1000);
        assert_eq!(response.expires_at.timestamp_millis(), expiry);
    }

    #[tokio::test]
    async fn test_reissue_overwrites_challenge() {
        let store = Arc::new(InMemoryChallengeStore::new());
        let service = service(store.clone());
        let wallet = encode_address(&[3u8; 32]);

        let first = service.issue_challenge(&wallet).await.unwrap();
        let second = service.issue_challenge(&wallet).await.unwrap();

        assert_ne!(first.nonce, second.nonce);
        assert_eq!(store.get(&wallet).await.unwrap().unwrap().nonce, second.nonce);
    }

    #[tokio::test]
    async fn test_issue_challenge_rejects_invalid_wallet() {
        let store = Arc::new(InMemoryChallengeStore::new());
        let result = service(store.clone()).issue_challenge("ADDR1").await;

        assert!(matches!(result, Err(ChallengeError::InvalidWalletAddress(_))));
        assert!(store.get("ADDR1").await.unwrap().is_none());
    }
}
