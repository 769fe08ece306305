//! Signed Bearer Tokens
//!
//! A minimal HS256 JWT: `base64url(header).base64url(payload).base64url(mac)`,
//! all segments unpadded. The payload is a flat claims object that always
//! carries a numeric `exp` (unix seconds).

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use platform::crypto::{from_base64url, to_base64url};
use serde::Deserialize;
use serde_json::{Map, Value};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Generic claim set carried by a bearer token
pub type Claims = Map<String, Value>;

/// Name of the mandatory expiry claim
pub const EXP_CLAIM: &str = "exp";

pub type TokenResult<T> = Result<T, TokenError>;

#[derive(Debug, Error)]
pub enum TokenError {
    /// Not three `.`-separated segments
    #[error("malformed token")]
    Malformed,

    /// `exp` missing, non-numeric or in the past
    #[error("token is expired")]
    Expired,

    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("invalid token signature")]
    InvalidSignature,

    #[error("invalid signing key")]
    InvalidKey,

    #[error("invalid token encoding: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("invalid token json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Signing algorithms understood by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Hs256,
}

impl Algorithm {
    pub fn from_name(name: &str) -> TokenResult<Self> {
        match name {
            "HS256" => Ok(Algorithm::Hs256),
            other => Err(TokenError::UnsupportedAlgorithm(other.to_string())),
        }
    }

    /// Fixed header JSON for this algorithm
    fn header_json(&self) -> &'static str {
        match self {
            Algorithm::Hs256 => r#"{"typ":"JWT","alg":"HS256"}"#,
        }
    }
}

#[derive(Deserialize)]
struct Header {
    alg: String,
}

/// Creates and verifies signed claim sets with a single shared secret
#[derive(Clone)]
pub struct BearerTokenService {
    mac: HmacSha256,
}

impl std::fmt::Debug for BearerTokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BearerTokenService").finish_non_exhaustive()
    }
}

impl BearerTokenService {
    pub fn new(secret: &[u8]) -> TokenResult<Self> {
        let mac = HmacSha256::new_from_slice(secret).map_err(|_| TokenError::InvalidKey)?;
        Ok(Self { mac })
    }

    /// Sign `claims` plus `exp = expiry` into a compact token
    pub fn create_token(
        &self,
        claims: &Claims,
        expiry: DateTime<Utc>,
        alg: Algorithm,
    ) -> TokenResult<String> {
        let mut payload = claims.clone();
        payload.insert(EXP_CLAIM.to_string(), Value::from(expiry.timestamp()));

        let header_b64 = to_base64url(alg.header_json().as_bytes());
        let payload_b64 = to_base64url(&serde_json::to_vec(&payload)?);

        match alg {
            Algorithm::Hs256 => {
                let signature = self.hs256(&header_b64, &payload_b64);
                Ok(format!(
                    "{header_b64}.{payload_b64}.{}",
                    to_base64url(&signature)
                ))
            }
        }
    }

    /// Check structure, expiry and signature; return the claims (including `exp`)
    pub fn verify(&self, token: &str) -> TokenResult<Claims> {
        let segments: Vec<&str> = token.split('.').collect();
        let [header_b64, payload_b64, signature_b64] = segments[..] else {
            return Err(TokenError::Malformed);
        };

        let claims: Claims = serde_json::from_slice(&from_base64url(payload_b64)?)?;
        let exp = claims
            .get(EXP_CLAIM)
            .and_then(Value::as_i64)
            .ok_or(TokenError::Expired)?;
        if exp < Utc::now().timestamp() {
            return Err(TokenError::Expired);
        }

        let header: Header = serde_json::from_slice(&from_base64url(header_b64)?)?;
        match Algorithm::from_name(&header.alg)? {
            Algorithm::Hs256 => {
                let signature =
                    from_base64url(signature_b64).map_err(|_| TokenError::InvalidSignature)?;
                let mut mac = self.mac.clone();
                mac.update(header_b64.as_bytes());
                mac.update(b".");
                mac.update(payload_b64.as_bytes());
                mac.verify_slice(&signature)
                    .map_err(|_| TokenError::InvalidSignature)?;
            }
        }

        Ok(claims)
    }

    fn hs256(&self, header_b64: &str, payload_b64: &str) -> [u8; 32] {
        let mut mac = self.mac.clone();
        mac.update(header_b64.as_bytes());
        mac.update(b".");
        mac.update(payload_b64.as_bytes());
        mac.finalize().into_bytes().into()
    }
}
