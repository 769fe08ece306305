//! Redis-backed store
//!
//! Lets several server instances share one ledger. Every write sets the key
//! TTL to the retention window; compare-and-swap runs as a Lua script so the
//! read and the conditional write are atomic on the server.

use crate::domain::repository::{StoreError, StoreResult, TtlStore};
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Script};
use std::time::Duration;

const KEY_PREFIX: &str = "pow:token:";

const CAS_SCRIPT: &str = r#"
if redis.call('GET', KEYS[1]) == ARGV[1] then
    redis.call('SET', KEYS[1], ARGV[2], 'EX', ARGV[3])
    return 1
end
return 0
"#;

#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
    retention_secs: u64,
    cas: Script,
}

impl RedisStore {
    pub async fn connect(url: &str, retention: Duration) -> StoreResult<Self> {
        let client = redis::Client::open(url).map_err(StoreError::backend)?;
        let conn = ConnectionManager::new(client)
            .await
            .map_err(StoreError::backend)?;

        tracing::info!(url = %url, "Connected to Redis token store");

        Ok(Self {
            conn,
            retention_secs: retention_secs(retention),
            cas: Script::new(CAS_SCRIPT),
        })
    }

    fn key(key: &str) -> String {
        format!("{KEY_PREFIX}{key}")
    }
}

/// Redis `EX` takes whole seconds and rejects zero
fn retention_secs(retention: Duration) -> u64 {
    retention.as_secs_f64().ceil().max(1.0) as u64
}

impl TtlStore for RedisStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();
        conn.get(Self::key(key)).await.map_err(StoreError::backend)
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        conn.set_ex(Self::key(key), value, self.retention_secs)
            .await
            .map_err(StoreError::backend)
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        let mut conn = self.conn.clone();
        let removed: u64 = conn
            .del(Self::key(key))
            .await
            .map_err(StoreError::backend)?;
        Ok(removed > 0)
    }

    async fn compare_and_swap(
        &self,
        key: &str,
        expected: &[u8],
        value: Vec<u8>,
    ) -> StoreResult<bool> {
        let mut conn = self.conn.clone();
        let swapped: i64 = self
            .cas
            .key(Self::key(key))
            .arg(expected)
            .arg(value)
            .arg(self.retention_secs)
            .invoke_async(&mut conn)
            .await
            .map_err(StoreError::backend)?;
        Ok(swapped == 1)
    }
}
