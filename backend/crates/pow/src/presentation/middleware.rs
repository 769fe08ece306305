//! PoW Middleware

use crate::application::admit_access::AdmitAccessUseCase;
use crate::domain::repository::TtlStore;
use crate::presentation::handlers::PowAppState;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use platform::bearer::extract_bearer_token;

/// Middleware that admits a request only against a fresh access token.
///
/// Every failure, storage faults included, is the same empty 401.
pub async fn require_access_token<S>(
    State(state): State<PowAppState<S>>,
    req: Request,
    next: Next,
) -> Response
where
    S: TtlStore + Send + Sync + 'static,
{
    let Some(bearer) = extract_bearer_token(req.headers()).map(str::to_owned) else {
        tracing::debug!("No access bearer token");
        return unauthorized();
    };

    let use_case = AdmitAccessUseCase::new(state.ledger.clone(), state.tokens.clone());

    match use_case.admit(&bearer).await {
        Ok(()) => next.run(req).await,
        Err(e) => {
            e.log();
            unauthorized()
        }
    }
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, [("X-PoW-Required", "true")]).into_response()
}
