//! PoW Error Types
//!
//! Every failure of the challenge-response protocol is a [`PowError`]. The
//! variants keep full detail for logs; every variant renders the same HTTP
//! response.

use crate::domain::bearer_token::TokenError;
use crate::domain::ledger::LedgerError;
use crate::domain::value_objects::TargetBits;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// PoW-specific result type alias
pub type PowResult<T> = Result<T, PowError>;

/// Where in the pipeline a request was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Malformed input, rejected before touching the ledger or PoW
    Validation,
    /// Bad signature, expired claims, unsupported algorithm
    Cryptographic,
    /// PoW failure, ledger state, claim shape or difficulty mismatch
    Protocol,
    /// Backing store fault
    Storage,
    /// Server-side fault unrelated to the request
    Internal,
}

#[derive(Debug, Error)]
pub enum PowError {
    /// No `Authorization: Bearer` header
    #[error("Missing bearer token")]
    MissingBearer,

    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    #[error("Bearer token rejected: {0}")]
    Token(#[from] TokenError),

    /// Claims do not have the expected shape
    #[error("Unexpected claims: {0}")]
    InvalidClaims(#[source] serde_json::Error),

    #[error("Access claims are not marked verified")]
    UnverifiedClaims,

    /// Invalid nonce (hash does not meet difficulty)
    #[error("Invalid nonce: hash does not meet difficulty requirement")]
    InvalidNonce,

    #[error("Target bits mismatch: claimed {claimed}, recorded {recorded}")]
    TargetBitsMismatch {
        claimed: TargetBits,
        recorded: TargetBits,
    },

    #[error("Ledger rejected token: {0}")]
    Ledger(#[from] LedgerError),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PowError {
    pub fn class(&self) -> ErrorClass {
        match self {
            PowError::MissingBearer | PowError::MalformedBody(_) => ErrorClass::Validation,
            PowError::Token(_) => ErrorClass::Cryptographic,
            PowError::InvalidClaims(_)
            | PowError::UnverifiedClaims
            | PowError::InvalidNonce
            | PowError::TargetBitsMismatch { .. } => ErrorClass::Protocol,
            PowError::Ledger(LedgerError::NotFound)
            | PowError::Ledger(LedgerError::NotVerified)
            | PowError::Ledger(LedgerError::Contended) => ErrorClass::Protocol,
            PowError::Ledger(LedgerError::Store(_)) | PowError::Ledger(LedgerError::Codec(_)) => {
                ErrorClass::Storage
            }
            PowError::Internal(_) => ErrorClass::Internal,
        }
    }

    /// Status for the challenge endpoints: one opaque code for every failure
    pub fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self.class() {
            ErrorClass::Storage | ErrorClass::Internal => {
                tracing::error!(error = %self, class = ?self.class(), "PoW request failed");
            }
            ErrorClass::Cryptographic | ErrorClass::Protocol => {
                tracing::warn!(error = %self, class = ?self.class(), "PoW request rejected");
            }
            ErrorClass::Validation => {
                tracing::debug!(error = %self, "PoW request rejected");
            }
        }
    }
}

impl IntoResponse for PowError {
    fn into_response(self) -> Response {
        self.log();
        let status = self.status_code();
        // Return empty body for security (don't leak details)
        (status, ()).into_response()
    }
}
