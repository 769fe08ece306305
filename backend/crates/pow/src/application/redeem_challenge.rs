//! Redeem Challenge Use Case
//!
//! Turns a solved challenge into a single-use access token.

use crate::application::config::PowConfig;
use crate::domain::bearer_token::{Algorithm, BearerTokenService};
use crate::domain::claims::{AccessClaims, ChallengeClaims, ClaimShape};
use crate::domain::entities::Challenge;
use crate::domain::hashcash::PowJob;
use crate::domain::ledger::TokenLedger;
use crate::domain::repository::TtlStore;
use crate::error::{PowError, PowResult};
use std::sync::Arc;

/// Input DTO for redeem challenge
#[derive(Debug, Clone)]
pub struct RedeemChallengeInput {
    /// Challenge bearer token from the `Authorization` header
    pub bearer: String,
    pub nonce: u64,
}

/// Output DTO for redeem challenge
#[derive(Debug, Clone)]
pub struct RedeemChallengeOutput {
    /// Signed access bearer token
    pub jwt: String,
}

/// Redeem Challenge Use Case
pub struct RedeemChallengeUseCase<S>
where
    S: TtlStore,
{
    ledger: Arc<TokenLedger<S>>,
    tokens: Arc<BearerTokenService>,
    config: Arc<PowConfig>,
}

impl<S> RedeemChallengeUseCase<S>
where
    S: TtlStore,
{
    pub fn new(
        ledger: Arc<TokenLedger<S>>,
        tokens: Arc<BearerTokenService>,
        config: Arc<PowConfig>,
    ) -> Self {
        Self {
            ledger,
            tokens,
            config,
        }
    }

    pub async fn execute(&self, input: RedeemChallengeInput) -> PowResult<RedeemChallengeOutput> {
        let claims = self.tokens.verify(&input.bearer)?;
        let challenge: Challenge = ChallengeClaims::from_claims(claims)
            .map_err(PowError::InvalidClaims)?
            .into();

        // Single hash, whatever the difficulty
        let job = PowJob::new(
            challenge.token_id.as_bytes(),
            challenge.issued_at,
            challenge.target_bits,
        );
        if !job.verify(input.nonce) {
            tracing::warn!(
                token = %challenge.token_id,
                nonce = input.nonce,
                "Invalid nonce"
            );
            return Err(PowError::InvalidNonce);
        }

        let recorded = self.ledger.get(&challenge.token_id).await?;
        if recorded != challenge.target_bits {
            return Err(PowError::TargetBitsMismatch {
                claimed: challenge.target_bits,
                recorded,
            });
        }

        self.ledger.verify(&challenge.token_id).await?;

        let access = AccessClaims::verified(challenge.token_id.as_str())
            .to_claims()
            .map_err(|e| PowError::Internal(format!("encode access claims: {e}")))?;
        let jwt = self
            .tokens
            .create_token(&access, self.config.access_expiry()?, Algorithm::Hs256)
            .map_err(|e| PowError::Internal(format!("sign access token: {e}")))?;

        tracing::info!(token = %challenge.token_id, "PoW verification successful");

        Ok(RedeemChallengeOutput { jwt })
    }
}
