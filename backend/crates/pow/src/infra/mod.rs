//! Infrastructure Layer - Store implementations

pub mod generational;
pub mod redis_store;
