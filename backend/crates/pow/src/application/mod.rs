//! Application Layer - Use Cases
//!
//! This layer orchestrates domain logic and infrastructure.
//! Contains use case implementations.

pub mod admit_access;
pub mod config;
pub mod issue_challenge;
pub mod redeem_challenge;
