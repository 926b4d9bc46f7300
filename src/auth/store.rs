//! Auth challenge store
//!
//! Holds at most one outstanding nonce per wallet address. Issuing a new
//! challenge overwrites the previous one; successful verification removes it.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::models::AuthChallenge;

/// Storage failure, distinct from "no challenge"
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Challenge store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Unavailable(e.to_string())
    }
}

/// Single-slot-per-wallet storage for login nonces
#[async_trait]
pub trait ChallengeStore: Send + Sync {
    /// Look up the outstanding challenge, `Ok(None)` when there is none
    async fn get(&self, wallet_address: &str) -> Result<Option<AuthChallenge>, StoreError>;

    /// Store a challenge, replacing any previous one for the wallet
    async fn put(&self, wallet_address: &str, nonce: &str) -> Result<(), StoreError>;

    /// Remove the challenge for the wallet; a no-op when none exists
    async fn delete(&self, wallet_address: &str) -> Result<(), StoreError>;

    /// Atomically remove the challenge only if it still holds `nonce`
    ///
    /// Returns whether a record was removed.
    async fn consume(&self, wallet_address: &str, nonce: &str) -> Result<bool, StoreError>;

    /// Short backend label for health reporting
    fn backend(&self) -> &'static str;
}

/// Process-local store used in tests and development
#[derive(Clone, Default)]
pub struct InMemoryChallengeStore {
    challenges: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryChallengeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChallengeStore for InMemoryChallengeStore {
    async fn get(&self, wallet_address: &str) -> Result<Option<AuthChallenge>, StoreError> {
        let challenges = self.challenges.read().await;
        Ok(challenges
            .get(wallet_address)
            .map(|nonce| AuthChallenge {
                wallet_address: wallet_address.to_string(),
                nonce: nonce.clone(),
            }))
    }

    async fn put(&self, wallet_address: &str, nonce: &str) -> Result<(), StoreError> {
        let mut challenges = self.challenges.write().await;
        challenges.insert(wallet_address.to_string(), nonce.to_string());
        Ok(())
    }

    async fn delete(&self, wallet_address: &str) -> Result<(), StoreError> {
        let mut challenges = self.challenges.write().await;
        challenges.remove(wallet_address);
        Ok(())
    }

    async fn consume(&self, wallet_address: &str, nonce: &str) -> Result<bool, StoreError> {
        let mut challenges = self.challenges.write().await;
        match challenges.get(wallet_address) {
            Some(stored) if stored == nonce => {
                challenges.remove(wallet_address);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

/// PostgreSQL-backed store over the `auth_challenges` table
#[derive(Clone)]
pub struct PgChallengeStore {
    db_pool: PgPool,
}

impl PgChallengeStore {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    pub fn db_pool(&self) -> &PgPool {
        &self.db_pool
    }
}

#[async_trait]
impl ChallengeStore for PgChallengeStore {
    async fn get(&self, wallet_address: &str) -> Result<Option<AuthChallenge>, StoreError> {
        let challenge = sqlx::query_as::<_, AuthChallenge>(
            r#"
            SELECT wallet_address, nonce
            FROM auth_challenges
            WHERE wallet_address = $1
            "#,
        )
        .bind(wallet_address)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(challenge)
    }

    async fn put(&self, wallet_address: &str, nonce: &str) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO auth_challenges (wallet_address, nonce, created_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (wallet_address)
            DO UPDATE SET nonce = EXCLUDED.nonce, created_at = EXCLUDED.created_at
            "#,
        )
        .bind(wallet_address)
        .bind(nonce)
        .execute(&self.db_pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, wallet_address: &str) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            DELETE FROM auth_challenges WHERE wallet_address = $1
            "#,
        )
        .bind(wallet_address)
        .execute(&self.db_pool)
        .await?;

        Ok(())
    }

    async fn consume(&self, wallet_address: &str, nonce: &str) -> Result<bool, StoreError> {
        let rows_affected = sqlx::query(
            r#"
            DELETE FROM auth_challenges
            WHERE wallet_address = $1 AND nonce = $2
            "#,
        )
        .bind(wallet_address)
        .bind(nonce)
        .execute(&self.db_pool)
        .await?
        .rows_affected();

        // Zero rows means another request already consumed this nonce
        Ok(rows_affected == 1)
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_missing_challenge_is_none() {
        let store = InMemoryChallengeStore::new();
        assert!(store.get("W").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_overwrites_previous_challenge() {
        let store = InMemoryChallengeStore::new();
        store.put("W", "n1-1").await.unwrap();
        store.put("W", "n2-2").await.unwrap();

        let challenge = store.get("W").await.unwrap().unwrap();
        assert_eq!(challenge.nonce, "n2-2");
        assert_eq!(challenge.wallet_address, "W");
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = InMemoryChallengeStore::new();
        store.put("W", "n1-1").await.unwrap();

        store.delete("W").await.unwrap();
        store.delete("W").await.unwrap();
        assert!(store.get("W").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_consume_requires_matching_nonce() {
        let store = InMemoryChallengeStore::new();
        store.put("W", "n1-1").await.unwrap();

        assert!(!store.consume("W", "other-1").await.unwrap());
        assert!(store.get("W").await.unwrap().is_some());

        assert!(store.consume("W", "n1-1").await.unwrap());
        assert!(!store.consume("W", "n1-1").await.unwrap());
        assert!(store.get("W").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_wallets_are_isolated() {
        let store = InMemoryChallengeStore::new();
        store.put("A", "a-1").await.unwrap();
        store.put("B", "b-1").await.unwrap();

        store.delete("A").await.unwrap();
        assert_eq!(store.get("B").await.unwrap().unwrap().nonce, "b-1");
    }
}
