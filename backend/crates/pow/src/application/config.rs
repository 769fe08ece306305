//! Application Configuration
//!
//! Configuration for the PoW application layer.

use crate::domain::value_objects::TargetBits;
use crate::error::{PowError, PowResult};
use chrono::{DateTime, Utc};
use std::time::Duration;

/// PoW application configuration
#[derive(Clone)]
pub struct PowConfig {
    /// Random bytes behind each token id
    pub token_id_len: usize,
    /// Difficulty in leading zero bits
    pub target_bits: TargetBits,
    /// Lifetime of a challenge bearer token
    pub challenge_ttl: Duration,
    /// Lifetime of an access bearer token
    pub access_ttl: Duration,
    /// Minimum time a ledger entry stays readable
    pub ledger_retention: Duration,
    /// HMAC key for bearer tokens
    pub token_secret: Vec<u8>,
}

impl std::fmt::Debug for PowConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PowConfig")
            .field("token_id_len", &self.token_id_len)
            .field("target_bits", &self.target_bits)
            .field("challenge_ttl", &self.challenge_ttl)
            .field("access_ttl", &self.access_ttl)
            .field("ledger_retention", &self.ledger_retention)
            .field("token_secret", &"<redacted>")
            .finish()
    }
}

impl Default for PowConfig {
    fn default() -> Self {
        Self {
            token_id_len: 16,
            target_bits: TargetBits::DEFAULT,
            challenge_ttl: Duration::from_secs(10),
            access_ttl: Duration::from_secs(10),
            ledger_retention: Duration::from_secs(10),
            token_secret: vec![0u8; 32],
        }
    }
}

impl PowConfig {
    /// Create config with a random token secret (for development)
    pub fn with_random_secret() -> Self {
        Self {
            token_secret: platform::crypto::random_bytes(32),
            ..Default::default()
        }
    }

    /// Whether a ledger entry may be evicted while a bearer token that
    /// references it is still valid
    pub fn retention_shorter_than_tokens(&self) -> bool {
        self.ledger_retention < self.challenge_ttl || self.ledger_retention < self.access_ttl
    }

    /// Expiry for a challenge token minted now
    pub fn challenge_expiry(&self) -> PowResult<DateTime<Utc>> {
        expiry_after(self.challenge_ttl)
    }

    /// Expiry for an access token minted now
    pub fn access_expiry(&self) -> PowResult<DateTime<Utc>> {
        expiry_after(self.access_ttl)
    }
}

fn expiry_after(ttl: Duration) -> PowResult<DateTime<Utc>> {
    chrono::Duration::from_std(ttl)
        .ok()
        .and_then(|ttl| Utc::now().checked_add_signed(ttl))
        .ok_or_else(|| PowError::Internal(format!("token lifetime {ttl:?} out of range")))
}
