//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain entities (Challenge)
//! - Domain value objects (TargetBits)
//! - Domain services (hashcash, bearer tokens, claim shapes, token ledger)
//! - Repository traits (TTL store capability)

pub mod bearer_token;
pub mod claims;
pub mod entities;
pub mod hashcash;
pub mod ledger;
pub mod repository;
pub mod value_objects;
