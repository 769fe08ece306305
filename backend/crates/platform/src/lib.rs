//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (SHA-256, base64url, secure randomness)
//! - Bearer token extraction from HTTP headers
//! - Environment variable parsing for the binaries

pub mod bearer;
pub mod crypto;
pub mod env;
