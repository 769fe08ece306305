//! Hashcash Proof of Work
//!
//! Pure domain logic for the puzzle. The solver iterates; the verifier
//! recomputes exactly one digest, so server cost is independent of difficulty.

use crate::domain::value_objects::TargetBits;
use platform::crypto::sha256;
use std::time::Instant;

/// Highest nonce the solver will try.
pub const MAX_NONCE: u64 = i64::MAX as u64;

/// Inputs of one puzzle: `payload || be64(timestamp) || be64(target_bits) || be64(nonce)`
#[derive(Debug, Clone, Copy)]
pub struct PowJob<'a> {
    pub payload: &'a [u8],
    pub timestamp: i64,
    pub target_bits: TargetBits,
}

/// Result of a bounded search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowOutcome {
    /// Solution when `solved`, otherwise the last nonce tried
    pub nonce: u64,
    /// Digest of the last nonce tried (all zeros if none was tried)
    pub hash: [u8; 32],
    pub solved: bool,
}

impl<'a> PowJob<'a> {
    pub fn new(payload: &'a [u8], timestamp: i64, target_bits: TargetBits) -> Self {
        Self {
            payload,
            timestamp,
            target_bits,
        }
    }

    /// Digest for a candidate nonce (all integers big-endian)
    pub fn hash(&self, nonce: u64) -> [u8; 32] {
        let mut data = Vec::with_capacity(self.payload.len() + 24);
        data.extend_from_slice(self.payload);
        data.extend_from_slice(&self.timestamp.to_be_bytes());
        data.extend_from_slice(&u64::from(self.target_bits).to_be_bytes());
        data.extend_from_slice(&nonce.to_be_bytes());
        sha256(&data)
    }

    /// Search nonces from zero until the digest falls below the target or
    /// `deadline` passes. The deadline is checked before every hash.
    pub fn calculate(&self, deadline: Instant) -> PowOutcome {
        let mut outcome = PowOutcome {
            nonce: 0,
            hash: [0u8; 32],
            solved: false,
        };

        for nonce in 0..MAX_NONCE {
            if Instant::now() >= deadline {
                break;
            }

            outcome.nonce = nonce;
            outcome.hash = self.hash(nonce);
            if below_target(&outcome.hash, self.target_bits) {
                outcome.solved = true;
                break;
            }
        }

        outcome
    }

    /// Single-hash check of a claimed solution
    pub fn verify(&self, nonce: u64) -> bool {
        below_target(&self.hash(nonce), self.target_bits)
    }
}

/// Count leading zero bits of a big-endian 256-bit digest
pub fn count_leading_zero_bits(hash: &[u8; 32]) -> u32 {
    let mut count = 0u32;
    for &byte in hash {
        if byte == 0 {
            count += 8;
        } else {
            count += byte.leading_zeros();
            break;
        }
    }
    count
}

/// `digest < 2^(256 - bits)`, i.e. at least `bits` leading zero bits
pub fn below_target(hash: &[u8; 32], target_bits: TargetBits) -> bool {
    count_leading_zero_bits(hash) >= u32::from(target_bits.bits())
}
