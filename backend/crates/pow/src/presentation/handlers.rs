//! HTTP Handlers

use crate::application::config::PowConfig;
use crate::application::issue_challenge::IssueChallengeUseCase;
use crate::application::redeem_challenge::{RedeemChallengeInput, RedeemChallengeUseCase};
use crate::domain::bearer_token::BearerTokenService;
use crate::domain::ledger::TokenLedger;
use crate::domain::repository::TtlStore;
use crate::error::{PowError, PowResult};
use crate::presentation::dto::{ChallengeResponse, RedeemRequest, RedeemResponse};
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::HeaderMap;
use platform::bearer::extract_bearer_token;
use std::sync::Arc;

/// Shared state for PoW handlers and the access middleware
pub struct PowAppState<S> {
    pub ledger: Arc<TokenLedger<S>>,
    pub tokens: Arc<BearerTokenService>,
    pub config: Arc<PowConfig>,
}

impl<S> Clone for PowAppState<S> {
    fn clone(&self) -> Self {
        Self {
            ledger: self.ledger.clone(),
            tokens: self.tokens.clone(),
            config: self.config.clone(),
        }
    }
}

impl<S> PowAppState<S>
where
    S: TtlStore,
{
    pub fn new(store: S, config: PowConfig) -> PowResult<Self> {
        let tokens = BearerTokenService::new(&config.token_secret)
            .map_err(|e| PowError::Internal(format!("token service: {e}")))?;
        Ok(Self {
            ledger: Arc::new(TokenLedger::new(store)),
            tokens: Arc::new(tokens),
            config: Arc::new(config),
        })
    }
}

/// GET /challenge
pub async fn issue_challenge<S>(
    State(state): State<PowAppState<S>>,
) -> PowResult<Json<ChallengeResponse>>
where
    S: TtlStore + Send + Sync + 'static,
{
    let use_case = IssueChallengeUseCase::new(
        state.ledger.clone(),
        state.tokens.clone(),
        state.config.clone(),
    );

    let output = use_case.execute().await?;

    Ok(Json(ChallengeResponse {
        timestamp: output.timestamp,
        token: output.token,
        target_bits: output.target_bits,
        jwt: output.jwt,
    }))
}

/// POST /challenge
pub async fn redeem_challenge<S>(
    State(state): State<PowAppState<S>>,
    headers: HeaderMap,
    body: Result<Json<RedeemRequest>, JsonRejection>,
) -> PowResult<Json<RedeemResponse>>
where
    S: TtlStore + Send + Sync + 'static,
{
    let Json(req) = body.map_err(|e| PowError::MalformedBody(e.body_text()))?;
    let bearer = extract_bearer_token(&headers).ok_or(PowError::MissingBearer)?;

    let use_case = RedeemChallengeUseCase::new(
        state.ledger.clone(),
        state.tokens.clone(),
        state.config.clone(),
    );

    let output = use_case
        .execute(RedeemChallengeInput {
            bearer: bearer.to_string(),
            nonce: req.nonce,
        })
        .await?;

    Ok(Json(RedeemResponse { jwt: output.jwt }))
}
