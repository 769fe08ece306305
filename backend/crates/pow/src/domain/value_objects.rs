//! Domain Value Objects
//!
//! Immutable value types for the PoW domain.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Difficulty of a hashcash puzzle, in leading zero bits of the digest.
///
/// The threshold is `2^(256 - bits)`, so the shift is only defined for
/// `1..=255`; construction rejects everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct TargetBits(u8);

impl TargetBits {
    pub const DEFAULT: TargetBits = TargetBits(14);
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 255;

    pub fn new(bits: u64) -> Option<Self> {
        u8::try_from(bits)
            .ok()
            .filter(|b| (Self::MIN..=Self::MAX).contains(b))
            .map(Self)
    }

    pub fn bits(&self) -> u8 {
        self.0
    }
}

impl Default for TargetBits {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<TargetBits> for u64 {
    fn from(t: TargetBits) -> Self {
        u64::from(t.0)
    }
}

impl TryFrom<u64> for TargetBits {
    type Error = InvalidTargetBits;

    fn try_from(bits: u64) -> Result<Self, Self::Error> {
        Self::new(bits).ok_or(InvalidTargetBits(bits))
    }
}

impl fmt::Display for TargetBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("target bits {0} outside 1..=255")]
pub struct InvalidTargetBits(pub u64);
