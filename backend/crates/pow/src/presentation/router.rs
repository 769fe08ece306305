//! PoW Router

use crate::domain::repository::TtlStore;
use crate::presentation::handlers::{self, PowAppState};
use crate::presentation::middleware::require_access_token;
use axum::{Router, middleware, routing::get};

/// Challenge endpoints: `GET /challenge` issues, `POST /challenge` redeems
pub fn pow_router<S>(state: PowAppState<S>) -> Router
where
    S: TtlStore + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/challenge",
            get(handlers::issue_challenge::<S>).post(handlers::redeem_challenge::<S>),
        )
        .with_state(state)
}

/// Put every route of `resource` behind the single-use access gate
pub fn protect<S>(resource: Router, state: PowAppState<S>) -> Router
where
    S: TtlStore + Send + Sync + 'static,
{
    resource.route_layer(middleware::from_fn_with_state(
        state,
        require_access_token::<S>,
    ))
}
