//! Admit Access Use Case

use crate::domain::bearer_token::BearerTokenService;
use crate::domain::claims::{AccessClaims, ClaimShape};
use crate::domain::ledger::TokenLedger;
use crate::domain::repository::TtlStore;
use crate::error::{PowError, PowResult};
use std::sync::Arc;

/// Admit Access Use Case
///
/// A valid signature is not enough: the referenced ledger entry must still be
/// verified, and admission consumes it.
pub struct AdmitAccessUseCase<S>
where
    S: TtlStore,
{
    ledger: Arc<TokenLedger<S>>,
    tokens: Arc<BearerTokenService>,
}

impl<S> AdmitAccessUseCase<S>
where
    S: TtlStore,
{
    pub fn new(ledger: Arc<TokenLedger<S>>, tokens: Arc<BearerTokenService>) -> Self {
        Self { ledger, tokens }
    }

    /// Admit the bearer of an access token exactly once
    pub async fn admit(&self, bearer: &str) -> PowResult<()> {
        let claims = self.tokens.verify(bearer)?;
        let access = AccessClaims::from_claims(claims).map_err(PowError::InvalidClaims)?;
        if !access.is_verify {
            return Err(PowError::UnverifiedClaims);
        }

        self.ledger.use_token(&access.token).await?;

        tracing::info!(token = %access.token, "Access granted");
        Ok(())
    }
}
