//! Repository Traits
//!
//! Interfaces for data persistence. Implementations are in the infrastructure layer.

use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

/// Backing store fault (unreachable, protocol error, poisoned state)
#[derive(Debug, Error)]
#[error("store backend error: {0}")]
pub struct StoreError(#[source] pub Box<dyn std::error::Error + Send + Sync>);

impl StoreError {
    pub fn backend<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self(Box::new(err))
    }
}

/// Key-value store over opaque bytes whose entries live for a bounded
/// retention window.
///
/// Entries must stay readable for at least the retention window after their
/// last write and may disappear at any point after that.
#[trait_variant::make(TtlStore: Send)]
pub trait LocalTtlStore {
    /// Current value, `None` if never written, evicted or deleted
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Write (or overwrite) a value
    async fn put(&self, key: &str, value: Vec<u8>) -> StoreResult<()>;

    /// Remove a value; `true` if this call removed it
    async fn delete(&self, key: &str) -> StoreResult<bool>;

    /// Replace the value only if it still equals `expected`; `true` if written
    async fn compare_and_swap(
        &self,
        key: &str,
        expected: &[u8],
        value: Vec<u8>,
    ) -> StoreResult<bool>;
}
