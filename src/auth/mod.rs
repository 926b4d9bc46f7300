//! Authentication module for Terragrids
//!
//! Wallet holders prove control of their key by signing a self-addressed,
//! non-executable envelope that embeds a server-issued nonce.
//! - Challenge issuance and single-slot challenge storage per wallet
//! - Bearer token verification with single-use nonce consumption

mod crypto;
mod envelope;
mod error;
mod nonce;
mod service;
mod store;
mod verifier;

pub use crypto::{decode_address, encode_address, verify_signature, CryptoError, ADDRESS_LENGTH};
pub use envelope::{
    AuthEnvelope, AuthMessage, AuthToken, EnvelopeError, SignedEnvelope, SENTINEL_ROUND,
};
pub use error::{AuthError, VerifyFailure};
pub use nonce::{expiry_millis, ChallengeNonce, NONCE_SEPARATOR};
pub use service::{AuthService, ChallengeError};
pub use store::{ChallengeStore, InMemoryChallengeStore, PgChallengeStore, StoreError};
pub use verifier::{AuthVerifier, ProtocolSettings, DEFAULT_NOTE_TAG, DEFAULT_SERVICE_NAME};
