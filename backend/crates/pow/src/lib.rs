//! PoW (Proof of Work) Gate
//!
//! Clean Architecture structure:
//! - `domain/` - Hashcash, bearer tokens, claim shapes, token ledger, store trait
//! - `application/` - Use cases (issue, redeem, admit)
//! - `infra/` - Store implementations (in-process generational, Redis)
//! - `presentation/` - HTTP handlers, access middleware, router
//!
//! ## Security Model
//! - The server is the sole authority for token ids, timestamps and difficulty
//! - Verifying a solution costs one hash regardless of difficulty
//! - Every token id is redeemed at most once and admits at most one request
//! - Any failure, storage faults included, rejects the request

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::PowConfig;
pub use domain::hashcash::{PowJob, PowOutcome};
pub use domain::repository::{StoreError, TtlStore};
pub use domain::value_objects::TargetBits;
pub use error::{PowError, PowResult};
pub use infra::generational::GenerationalStore;
pub use infra::redis_store::RedisStore;
pub use presentation::handlers::PowAppState;
pub use presentation::router::{pow_router, protect};
