//! In-process generational store
//!
//! Two maps, `current` and `previous`. Every retention interval a background
//! task moves `current` into `previous` and starts a fresh `current`, dropping
//! what was in `previous`. An entry therefore stays readable for at least one
//! and at most two retention intervals after its last write, and memory never
//! holds more than two intervals' worth of writes.

use crate::domain::repository::{StoreResult, TtlStore};
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::{Instant, MissedTickBehavior};

const MIN_RETENTION: Duration = Duration::from_millis(1);

#[derive(Debug, Default)]
struct Generations {
    current: HashMap<String, Vec<u8>>,
    previous: HashMap<String, Vec<u8>>,
}

impl Generations {
    fn lookup(&self, key: &str) -> Option<&Vec<u8>> {
        self.current.get(key).or_else(|| self.previous.get(key))
    }

    fn insert(&mut self, key: &str, value: Vec<u8>) {
        self.previous.remove(key);
        self.current.insert(key.to_string(), value);
    }

    fn rotate(&mut self) {
        self.previous = std::mem::take(&mut self.current);
    }
}

/// Shared handle; clones see the same data
#[derive(Debug, Clone)]
pub struct GenerationalStore {
    inner: Arc<RwLock<Generations>>,
    retention: Duration,
}

impl GenerationalStore {
    /// Create the store and start its rotation task.
    ///
    /// Must be called inside a Tokio runtime. The task ends on the first tick
    /// after the last handle is dropped.
    pub fn new(retention: Duration) -> Self {
        let store = Self {
            inner: Arc::new(RwLock::new(Generations::default())),
            retention: retention.max(MIN_RETENTION),
        };
        spawn_rotation(Arc::downgrade(&store.inner), store.retention);
        store
    }

    pub fn retention(&self) -> Duration {
        self.retention
    }

    /// Number of entries across both generations
    pub async fn len(&self) -> usize {
        let generations = self.inner.read().await;
        generations.current.len() + generations.previous.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn spawn_rotation(inner: Weak<RwLock<Generations>>, period: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let Some(inner) = inner.upgrade() else {
                tracing::debug!("Generational store dropped, stopping rotation");
                break;
            };
            let mut generations = inner.write().await;
            let evicted = generations.previous.len();
            generations.rotate();
            tracing::trace!(evicted, "Rotated store generations");
        }
    });
}

impl TtlStore for GenerationalStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.inner.read().await.lookup(key).cloned())
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> StoreResult<()> {
        self.inner.write().await.insert(key, value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        let mut generations = self.inner.write().await;
        let in_current = generations.current.remove(key).is_some();
        let in_previous = generations.previous.remove(key).is_some();
        Ok(in_current || in_previous)
    }

    async fn compare_and_swap(
        &self,
        key: &str,
        expected: &[u8],
        value: Vec<u8>,
    ) -> StoreResult<bool> {
        let mut generations = self.inner.write().await;
        if generations.lookup(key).map(Vec::as_slice) != Some(expected) {
            return Ok(false);
        }
        generations.insert(key, value);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_delete() {
        let store = GenerationalStore::new(Duration::from_secs(60));
        store.put("k", b"v".to_vec()).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(b"v".to_vec()));

        assert!(store.delete("k").await.unwrap());
        assert_eq!(store.get("k").await.unwrap(), None);
        assert!(!store.delete("k").await.unwrap());
    }

    #[tokio::test]
    async fn test_compare_and_swap() {
        let store = GenerationalStore::new(Duration::from_secs(60));
        assert!(!store.compare_and_swap("k", b"a", b"b".to_vec()).await.unwrap());

        store.put("k", b"a".to_vec()).await.unwrap();
        assert!(!store.compare_and_swap("k", b"x", b"b".to_vec()).await.unwrap());
        assert!(store.compare_and_swap("k", b"a", b"b".to_vec()).await.unwrap());
        assert_eq!(store.get("k").await.unwrap(), Some(b"b".to_vec()));
    }

    #[tokio::test]
    async fn test_retention_clamped_to_minimum() {
        let store = GenerationalStore::new(Duration::ZERO);
        assert_eq!(store.retention(), MIN_RETENTION);
        assert!(store.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rotation_releases_memory() {
        let store = GenerationalStore::new(Duration::from_millis(50));
        store.put("a", b"1".to_vec()).await.unwrap();
        store.put("b", b"2".to_vec()).await.unwrap();
        assert_eq!(store.len().await, 2);

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(store.len().await, 2);

        tokio::time::sleep(Duration::from_millis(90)).await;
        assert!(store.is_empty().await);
    }

    #[test]
    fn test_rotation_keeps_one_generation() {
        let mut generations = Generations::default();
        generations.insert("k", b"v".to_vec());

        generations.rotate();
        assert_eq!(generations.lookup("k"), Some(&b"v".to_vec()));

        generations.rotate();
        assert_eq!(generations.lookup("k"), None);
    }

    #[test]
    fn test_write_in_previous_moves_to_current() {
        let mut generations = Generations::default();
        generations.insert("k", b"old".to_vec());
        generations.rotate();
        generations.insert("k", b"new".to_vec());

        assert!(generations.previous.is_empty());
        assert_eq!(generations.lookup("k"), Some(&b"new".to_vec()));
    }
}
