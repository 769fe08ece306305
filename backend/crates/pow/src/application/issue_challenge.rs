//! Issue Challenge Use Case

use crate::application::config::PowConfig;
use crate::domain::bearer_token::{Algorithm, BearerTokenService};
use crate::domain::claims::ClaimShape;
use crate::domain::entities::Challenge;
use crate::domain::ledger::TokenLedger;
use crate::domain::repository::TtlStore;
use crate::domain::value_objects::TargetBits;
use crate::error::{PowError, PowResult};
use std::sync::Arc;

/// Output DTO for issue challenge
#[derive(Debug, Clone)]
pub struct IssueChallengeOutput {
    pub timestamp: i64,
    pub token: String,
    pub target_bits: TargetBits,
    /// Signed challenge bearer token
    pub jwt: String,
}

/// Issue Challenge Use Case
pub struct IssueChallengeUseCase<S>
where
    S: TtlStore,
{
    ledger: Arc<TokenLedger<S>>,
    tokens: Arc<BearerTokenService>,
    config: Arc<PowConfig>,
}

impl<S> IssueChallengeUseCase<S>
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

    pub async fn execute(&self) -> PowResult<IssueChallengeOutput> {
        let challenge = Challenge::issue(self.config.token_id_len, self.config.target_bits);

        self.ledger
            .put(&challenge.token_id, challenge.target_bits)
            .await?;

        let claims = challenge
            .claims()
            .to_claims()
            .map_err(|e| PowError::Internal(format!("encode challenge claims: {e}")))?;
        let jwt = self
            .tokens
            .create_token(&claims, self.config.challenge_expiry()?, Algorithm::Hs256)
            .map_err(|e| PowError::Internal(format!("sign challenge token: {e}")))?;

        tracing::info!(
            token = %challenge.token_id,
            target_bits = %challenge.target_bits,
            "Issued challenge"
        );

        Ok(IssueChallengeOutput {
            timestamp: challenge.issued_at,
            token: challenge.token_id,
            target_bits: challenge.target_bits,
            jwt,
        })
    }
}
