//! Challenge nonces
//!
//! A nonce is `<random>-<expiresAtMillis>`: a CSPRNG component rendered as
//! lowercase hex, then the absolute expiry in Unix epoch milliseconds.

use std::fmt;

use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::RngCore;

/// Separator between the random component and the expiry suffix
pub const NONCE_SEPARATOR: char = '-';

const RANDOM_BYTES: usize = 32;

/// A server-issued challenge nonce
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeNonce {
    random: String,
    expires_at_millis: i64,
}

impl ChallengeNonce {
    /// Generate a fresh nonce expiring `ttl` after `now`
    ///
    /// An expiry past the representable range saturates at the latest instant.
    pub fn generate(ttl: Duration, now: DateTime<Utc>) -> Self {
        let mut bytes = [0u8; RANDOM_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);

        Self {
            random: hex::encode(bytes),
            expires_at_millis: now
                .checked_add_signed(ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC)
                .timestamp_millis(),
        }
    }

    pub fn expires_at_millis(&self) -> i64 {
        self.expires_at_millis
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.expires_at_millis)
            .single()
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

impl fmt::Display for ChallengeNonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.random, NONCE_SEPARATOR, self.expires_at_millis)
    }
}

/// Extract the expiry suffix (epoch millis) from a nonce string
///
/// Returns `None` when there is no separator or the suffix is not an integer.
pub fn expiry_millis(nonce: &str) -> Option<i64> {
    let (_, expiry) = nonce.split_once(NONCE_SEPARATOR)?;
    expiry.parse::<i64>().ok()
}
