//! Bearer token and signed envelope codec
//!
//! The bearer token is base64 of `{"account", "authentication"}` where
//! `authentication` is the base64 of a signed envelope. The envelope is
//! shaped like a transaction (sender, receiver, validity rounds, note) but
//! is only ever used as a signature carrier.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use ed25519_dalek::{Signer, SigningKey};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validity round every authentication envelope must be pinned to
pub const SENTINEL_ROUND: u64 = 1;

/// Domain separation prefix for signable envelope bytes
const SIGNING_PREFIX: &[u8] = b"TX";

/// Errors raised while decoding tokens, envelopes, or embedded messages
#[derive(Error, Debug)]
pub enum EnvelopeError {
    #[error("Invalid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Note is not valid UTF-8")]
    NoteNotUtf8,

    #[error("Note does not start with tag '{0}'")]
    MissingNoteTag(String),
}

/// Outer structure of a bearer token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthToken {
    /// Wallet the client claims to authenticate as
    pub account: String,
    /// Base64 of the signed envelope bytes
    pub authentication: String,
}

impl AuthToken {
    /// Decode the token part of an `Authorization` header
    pub fn decode(token: &str) -> Result<Self, EnvelopeError> {
        let bytes = STANDARD.decode(token)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub fn encode(&self) -> Result<String, EnvelopeError> {
        Ok(STANDARD.encode(serde_json::to_vec(self)?))
    }

    /// Decode the embedded signed envelope
    pub fn signed_envelope(&self) -> Result<SignedEnvelope, EnvelopeError> {
        let bytes = STANDARD.decode(&self.authentication)?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// The transaction-shaped payload covered by the signature
///
/// Field order is part of the signable representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthEnvelope {
    pub from: String,
    pub to: String,
    pub first_valid: u64,
    pub last_valid: u64,
    #[serde(with = "base64_bytes")]
    pub note: Vec<u8>,
}

impl AuthEnvelope {
    /// Build a self-addressed envelope pinned to the sentinel round
    pub fn for_wallet(wallet: &str, note: Vec<u8>) -> Self {
        Self {
            from: wallet.to_string(),
            to: wallet.to_string(),
            first_valid: SENTINEL_ROUND,
            last_valid: SENTINEL_ROUND,
            note,
        }
    }

    /// Canonical bytes the signature is computed over
    pub fn signable_bytes(&self) -> Result<Vec<u8>, EnvelopeError> {
        let body = serde_json::to_vec(self)?;
        let mut bytes = Vec::with_capacity(SIGNING_PREFIX.len() + body.len());
        bytes.extend_from_slice(SIGNING_PREFIX);
        bytes.extend_from_slice(&body);
        Ok(bytes)
    }

    /// Extract the authentication message carried in the note
    pub fn auth_message(&self, note_tag: &str) -> Result<AuthMessage, EnvelopeError> {
        let note = std::str::from_utf8(&self.note).map_err(|_| EnvelopeError::NoteNotUtf8)?;
        let encoded = note
            .strip_prefix(note_tag)
            .ok_or_else(|| EnvelopeError::MissingNoteTag(note_tag.to_string()))?;
        let decoded = STANDARD.decode(encoded)?;
        Ok(serde_json::from_slice(&decoded)?)
    }

    pub fn sign(self, signing_key: &SigningKey) -> Result<SignedEnvelope, EnvelopeError> {
        let signature = signing_key.sign(&self.signable_bytes()?);
        Ok(SignedEnvelope {
            txn: self,
            sig: signature.to_bytes().to_vec(),
        })
    }
}

/// An envelope together with its raw signature bytes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedEnvelope {
    pub txn: AuthEnvelope,
    #[serde(with = "base64_bytes")]
    pub sig: Vec<u8>,
}

impl SignedEnvelope {
    /// Wrap this envelope into a bearer token claiming `account`
    pub fn to_bearer_token(&self, account: &str) -> Result<String, EnvelopeError> {
        AuthToken {
            account: account.to_string(),
            authentication: STANDARD.encode(serde_json::to_vec(self)?),
        }
        .encode()
    }
}

/// The claim embedded in an envelope note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthMessage {
    pub service: String,
    #[serde(rename = "authAcc")]
    pub auth_acc: String,
    pub nonce: String,
}

impl AuthMessage {
    /// Render as note bytes: the tag followed by base64 JSON
    pub fn to_note(&self, note_tag: &str) -> Result<Vec<u8>, EnvelopeError> {
        let encoded = STANDARD.encode(serde_json::to_vec(self)?);
        Ok(format!("{}{}", note_tag, encoded).into_bytes())
    }
}

mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}
