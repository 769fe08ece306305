//! Typed Claim Shapes
//!
//! The two claim sets that travel inside bearer tokens. Generic claim maps
//! are decoded into one of these exactly once, at the protocol boundary.

use crate::domain::bearer_token::Claims;
use crate::domain::value_objects::TargetBits;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Conversion between a typed claim shape and the generic claim map
pub trait ClaimShape: Serialize + DeserializeOwned {
    fn to_claims(&self) -> Result<Claims, serde_json::Error> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            _ => Err(serde::ser::Error::custom("claims must serialize to an object")),
        }
    }

    /// Extra members such as `exp` are ignored
    fn from_claims(claims: Claims) -> Result<Self, serde_json::Error> {
        serde_json::from_value(Value::Object(claims))
    }
}

/// Claims of a challenge bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeClaims {
    pub timestamp: i64,
    pub token: String,
    pub target_bits: TargetBits,
}

impl ClaimShape for ChallengeClaims {}

/// Claims of an access bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    pub token: String,
    pub is_verify: bool,
}

impl AccessClaims {
    pub fn verified(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            is_verify: true,
        }
    }
}

impl ClaimShape for AccessClaims {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Claims {
        match value {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_challenge_claims_wire_names() {
        let claims = ChallengeClaims {
            timestamp: 1_700_000_000,
            token: "abc".into(),
            target_bits: TargetBits::new(14).unwrap(),
        }
        .to_claims()
        .unwrap();

        assert_eq!(
            Value::Object(claims),
            json!({"timestamp": 1_700_000_000i64, "token": "abc", "target_bits": 14})
        );
    }

    #[test]
    fn test_challenge_claims_ignore_exp() {
        let claims = map(json!({"timestamp": 5, "token": "k", "target_bits": 3, "exp": 99}));
        let parsed = ChallengeClaims::from_claims(claims).unwrap();
        assert_eq!(parsed.token, "k");
        assert_eq!(parsed.target_bits.bits(), 3);
    }

    #[test]
    fn test_challenge_claims_reject_bad_target_bits() {
        for bits in [0, 256, 10_000] {
            let claims = map(json!({"timestamp": 5, "token": "k", "target_bits": bits}));
            assert!(ChallengeClaims::from_claims(claims).is_err());
        }
    }

    #[test]
    fn test_challenge_claims_reject_mistyped_fields() {
        let claims = map(json!({"timestamp": "5", "token": "k", "target_bits": 3}));
        assert!(ChallengeClaims::from_claims(claims).is_err());

        let claims = map(json!({"timestamp": 5, "token": 7, "target_bits": 3}));
        assert!(ChallengeClaims::from_claims(claims).is_err());
    }

    #[test]
    fn test_shapes_do_not_cross_decode() {
        let access = AccessClaims::verified("k").to_claims().unwrap();
        assert!(ChallengeClaims::from_claims(access).is_err());

        let challenge = map(json!({"timestamp": 5, "token": "k", "target_bits": 3}));
        assert!(AccessClaims::from_claims(challenge).is_err());
    }
}
