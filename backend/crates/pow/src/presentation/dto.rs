//! API DTOs (Data Transfer Objects)
//!
//! Shared by the server handlers and the client, so both sides agree on
//! field names.

use crate::domain::value_objects::TargetBits;
use serde::{Deserialize, Serialize};

/// Response for GET /challenge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeResponse {
    pub timestamp: i64,
    pub token: String,
    pub target_bits: TargetBits,
    pub jwt: String,
}

/// Request for POST /challenge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedeemRequest {
    pub nonce: u64,
}

/// Response for POST /challenge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedeemResponse {
    pub jwt: String,
}
