//! One-time Token Ledger
//!
//! Per-token state machine over a [`TtlStore`]:
//!
//! ```text
//! Unverified --verify--> Verified --use_token--> absent
//! Unverified --use_token--> NotVerified
//! absent     --any-----> NotFound
//! ```
//!
//! "Absent" covers never issued, evicted and already consumed alike.

use crate::domain::repository::{StoreError, TtlStore};
use crate::domain::value_objects::TargetBits;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Attempts at the verify compare-and-swap before giving up
const MAX_VERIFY_ATTEMPTS: usize = 3;

pub type LedgerResult<T> = Result<T, LedgerError>;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("token not found")]
    NotFound,

    #[error("token is not verified")]
    NotVerified,

    /// The record kept changing under a verify
    #[error("token record contended")]
    Contended,

    #[error("token record codec error: {0}")]
    Codec(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Ledger entry as persisted in the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub target_bits: TargetBits,
    pub verified: bool,
}

impl TokenRecord {
    fn encode(&self) -> LedgerResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    fn decode(bytes: &[u8]) -> LedgerResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Single-use token ledger
#[derive(Debug)]
pub struct TokenLedger<S> {
    store: S,
}

impl<S> TokenLedger<S>
where
    S: TtlStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Record a fresh, unverified token, replacing any previous record
    pub async fn put(&self, key: &str, target_bits: TargetBits) -> LedgerResult<()> {
        let record = TokenRecord {
            target_bits,
            verified: false,
        };
        self.store.put(key, record.encode()?).await?;
        Ok(())
    }

    /// Difficulty recorded for the token
    pub async fn get(&self, key: &str) -> LedgerResult<TargetBits> {
        let (_, record) = self.load(key).await?;
        Ok(record.target_bits)
    }

    /// Mark the token verified. Idempotent.
    ///
    /// The write is conditional on the record being unchanged since it was
    /// read, so a concurrent `use_token` can never be undone.
    pub async fn verify(&self, key: &str) -> LedgerResult<()> {
        for _ in 0..MAX_VERIFY_ATTEMPTS {
            let (raw, mut record) = self.load(key).await?;
            if record.verified {
                return Ok(());
            }

            record.verified = true;
            if self
                .store
                .compare_and_swap(key, &raw, record.encode()?)
                .await?
            {
                tracing::debug!(token = %key, "Token verified");
                return Ok(());
            }
            tracing::debug!(token = %key, "Token record changed during verify, retrying");
        }
        Err(LedgerError::Contended)
    }

    /// Consume a verified token. Succeeds at most once per token.
    pub async fn use_token(&self, key: &str) -> LedgerResult<()> {
        let (_, record) = self.load(key).await?;
        if !record.verified {
            return Err(LedgerError::NotVerified);
        }

        // Only the caller whose delete removed the record wins
        if !self.store.delete(key).await? {
            return Err(LedgerError::NotFound);
        }
        tracing::debug!(token = %key, "Token consumed");
        Ok(())
    }

    async fn load(&self, key: &str) -> LedgerResult<(Vec<u8>, TokenRecord)> {
        let raw = self.store.get(key).await?.ok_or(LedgerError::NotFound)?;
        let record = TokenRecord::decode(&raw)?;
        Ok((raw, record))
    }
}
