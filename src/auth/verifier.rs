//! Auth token verifier
//!
//! The request-time gate. A bearer token is accepted at most once per issued
//! challenge: every structural and claim check runs before the store is
//! touched, the signature is verified before the challenge is consumed, and
//! a failed attempt never consumes a challenge.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use super::crypto::{decode_address, verify_signature};
use super::envelope::{AuthToken, SignedEnvelope, SENTINEL_ROUND};
use super::error::{AuthError, VerifyFailure};
use super::nonce::expiry_millis;
use super::store::ChallengeStore;

/// Default `service` literal expected in auth messages
pub const DEFAULT_SERVICE_NAME: &str = "terragrids.org";

/// Default note prefix carrying the auth message
pub const DEFAULT_NOTE_TAG: &str = "arc14";

/// Protocol constants shared by challenge issuance and verification
#[derive(Debug, Clone)]
pub struct ProtocolSettings {
    pub service_name: String,
    pub note_tag: String,
    /// Upper bound on how far in the future a nonce may expire
    pub max_challenge_lifetime: Duration,
}

impl Default for ProtocolSettings {
    fn default() -> Self {
        Self {
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            note_tag: DEFAULT_NOTE_TAG.to_string(),
            max_challenge_lifetime: Duration::minutes(10),
        }
    }
}

/// Verifies bearer tokens against the challenge store
#[derive(Clone)]
pub struct AuthVerifier {
    store: Arc<dyn ChallengeStore>,
    settings: ProtocolSettings,
}

impl AuthVerifier {
    pub fn new(store: Arc<dyn ChallengeStore>, settings: ProtocolSettings) -> Self {
        Self { store, settings }
    }

    pub fn settings(&self) -> &ProtocolSettings {
        &self.settings
    }

    /// Authenticate an `Authorization` header value, returning the wallet
    pub async fn verify(&self, authorization: &str) -> Result<String, AuthError> {
        self.verify_at(authorization, Utc::now()).await
    }

    /// Same as [`AuthVerifier::verify`] with an explicit clock
    pub async fn verify_at(
        &self,
        authorization: &str,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        match self.check(authorization, now).await {
            Ok(wallet) => {
                tracing::info!(wallet = %wallet, "Wallet authenticated");
                Ok(wallet)
            }
            Err(rejection) => Err(self.reject(rejection.failure, rejection.wallet.as_deref())),
        }
    }

    /// Reject a request that carried no readable `Authorization` header
    pub fn reject_missing_header(&self) -> AuthError {
        self.reject(VerifyFailure::MissingHeader, None)
    }

    fn reject(&self, failure: VerifyFailure, wallet: Option<&str>) -> AuthError {
        match &failure {
            VerifyFailure::Store(e) => {
                tracing::error!(wallet = ?wallet, error = %e, "Challenge store failure during authentication");
            }
            _ => {
                tracing::warn!(wallet = ?wallet, reason = %failure, "Authentication rejected");
            }
        }
        failure.into_auth_error()
    }

    async fn check(&self, authorization: &str, now: DateTime<Utc>) -> Result<String, Rejection> {
        let (wallet, signed) = decode_header(authorization).map_err(Rejection::anonymous)?;

        self.check_claims(&wallet, signed, now)
            .await
            .map_err(|failure| Rejection {
                failure,
                wallet: Some(wallet.clone()),
            })?;

        Ok(wallet)
    }

    async fn check_claims(
        &self,
        wallet: &str,
        signed: SignedEnvelope,
        now: DateTime<Utc>,
    ) -> Result<(), VerifyFailure> {
        let txn = signed.txn;

        // 3. Embedded auth message
        let message = txn
            .auth_message(&self.settings.note_tag)
            .map_err(VerifyFailure::MalformedMessage)?;

        // 4. Claims
        if message.service != self.settings.service_name {
            return Err(VerifyFailure::ServiceMismatch(message.service));
        }
        if message.auth_acc != wallet {
            return Err(VerifyFailure::AccountMismatch);
        }

        // 5. Expiry window: strictly in the future, within the max lifetime
        let expiry = expiry_millis(&message.nonce).ok_or(VerifyFailure::MissingExpiry)?;
        let now_millis = now.timestamp_millis();
        if now_millis >= expiry {
            return Err(VerifyFailure::NonceExpired(expiry));
        }
        let latest = now_millis.saturating_add(self.settings.max_challenge_lifetime.num_milliseconds());
        if expiry > latest {
            return Err(VerifyFailure::NonceTooFarInFuture(expiry));
        }

        // 6. Non-executable envelope shape
        let well_formed = txn.first_valid == SENTINEL_ROUND
            && txn.last_valid == SENTINEL_ROUND
            && txn.from == txn.to
            && txn.from == wallet;
        if !well_formed {
            return Err(VerifyFailure::EnvelopeShape);
        }

        // 7. Bind to the server-issued challenge
        let challenge = self
            .store
            .get(wallet)
            .await?
            .ok_or(VerifyFailure::ChallengeNotFound)?;
        if challenge.nonce != message.nonce {
            return Err(VerifyFailure::NonceMismatch);
        }

        // 8. Signature by the key behind the sender address
        let public_key =
            decode_address(&txn.from).map_err(|e| VerifyFailure::InvalidAddress(e.to_string()))?;
        let signable = txn
            .signable_bytes()
            .map_err(VerifyFailure::MalformedToken)?;
        if !verify_signature(&public_key, &signable, &signed.sig) {
            return Err(VerifyFailure::BadSignature);
        }

        // 9. Single use: only the request that removes the challenge wins
        if !self.store.consume(wallet, &message.nonce).await? {
            return Err(VerifyFailure::AlreadyConsumed);
        }

        Ok(())
    }
}

/// A failed check and the wallet the token claimed, once it could be decoded
#[derive(Debug)]
struct Rejection {
    failure: VerifyFailure,
    wallet: Option<String>,
}

impl Rejection {
    fn anonymous(failure: VerifyFailure) -> Self {
        Self {
            failure,
            wallet: None,
        }
    }
}

/// Steps 1 and 2: split `<scheme> <token>` and decode the signed envelope
fn decode_header(authorization: &str) -> Result<(String, SignedEnvelope), VerifyFailure> {
    let parts: Vec<&str> = authorization.split(' ').collect();
    let [_scheme, token] = parts.as_slice() else {
        return Err(VerifyFailure::MalformedHeader);
    };

    let token = AuthToken::decode(token).map_err(VerifyFailure::MalformedToken)?;
    let signed = token
        .signed_envelope()
        .map_err(VerifyFailure::MalformedToken)?;

    Ok((token.account, signed))
}
