//! Shared helpers for building signed bearer tokens

#![allow(dead_code)]

use chrono::{Duration, Utc};
use ed25519_dalek::SigningKey;

use terragrids_auth::auth::{
    encode_address, AuthEnvelope, AuthMessage, SignedEnvelope, DEFAULT_NOTE_TAG,
    DEFAULT_SERVICE_NAME,
};

/// A wallet with a deterministic ed25519 key
pub struct TestWallet {
    pub key: SigningKey,
    pub address: String,
}

impl TestWallet {
    pub fn new(seed: u8) -> Self {
        let key = SigningKey::from_bytes(&[seed; 32]);
        let address = encode_address(&key.verifying_key().to_bytes());
        Self { key, address }
    }

    pub fn message(&self, nonce: &str) -> AuthMessage {
        AuthMessage {
            service: DEFAULT_SERVICE_NAME.to_string(),
            auth_acc: self.address.clone(),
            nonce: nonce.to_string(),
        }
    }

    /// Self-addressed sentinel-round envelope carrying `message`
    pub fn envelope_with(&self, message: &AuthMessage) -> AuthEnvelope {
        AuthEnvelope::for_wallet(&self.address, message.to_note(DEFAULT_NOTE_TAG).unwrap())
    }

    pub fn envelope(&self, nonce: &str) -> AuthEnvelope {
        self.envelope_with(&self.message(nonce))
    }

    pub fn sign(&self, envelope: AuthEnvelope) -> SignedEnvelope {
        envelope.sign(&self.key).unwrap()
    }

    /// `Authorization` header claiming this wallet
    pub fn header_for(&self, signed: &SignedEnvelope) -> String {
        format!("Bearer {}", signed.to_bearer_token(&self.address).unwrap())
    }

    pub fn valid_header(&self, nonce: &str) -> String {
        self.header_for(&self.sign(self.envelope(nonce)))
    }
}

/// Nonce in the issued format expiring `millis` from now
pub fn nonce_expiring_in(millis: i64) -> String {
    let expiry = Utc::now() + Duration::milliseconds(millis);
    format!("abc123-{}", expiry.timestamp_millis())
}
