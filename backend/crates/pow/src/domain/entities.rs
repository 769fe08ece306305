//! Domain Entities
//!
//! Core business entities for the PoW domain.

use crate::domain::claims::ChallengeClaims;
use crate::domain::value_objects::TargetBits;
use chrono::Utc;
use platform::crypto::random_token_id;

/// Challenge entity - a puzzle issued to a client. Immutable once minted.
///
/// Its difficulty is stored twice (signed claims and ledger record) and both
/// copies must agree when the solution comes back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    pub token_id: String,
    /// Unix seconds
    pub issued_at: i64,
    pub target_bits: TargetBits,
}

impl Challenge {
    /// Mint a challenge with `entropy_bytes` bytes of random token id
    pub fn issue(entropy_bytes: usize, target_bits: TargetBits) -> Self {
        Self {
            token_id: random_token_id(entropy_bytes),
            issued_at: Utc::now().timestamp(),
            target_bits,
        }
    }

    pub fn claims(&self) -> ChallengeClaims {
        ChallengeClaims {
            timestamp: self.issued_at,
            token: self.token_id.clone(),
            target_bits: self.target_bits,
        }
    }
}

impl From<ChallengeClaims> for Challenge {
    fn from(claims: ChallengeClaims) -> Self {
        Self {
            token_id: claims.token,
            issued_at: claims.timestamp,
            target_bits: claims.target_bits,
        }
    }
}
