//! Redis-backed [`TtlStore`].
//!
//! Uses a [`ConnectionManager`] so the store is cheaply cloneable and
//! reconnects transparently. TTLs are carried at millisecond precision
//! (`SET PX` / `PTTL`); prefix scans use cursor-based `SCAN MATCH` so
//! revocation never blocks the server on large keyspaces.

use std::time::Duration;

use async_trait::async_trait;
use redis::{AsyncCommands, aio::ConnectionManager};
use tokenvault_core::{DeletePipeline, StoreError, TtlStore};

/// How many keys a single `SCAN` iteration asks Redis for.
const SCAN_COUNT: usize = 100;

/// TTL store over a managed Redis connection.
#[derive(Clone)]
pub struct RedisStore {
    manager: ConnectionManager,
}

impl RedisStore {
    /// Connects to Redis and verifies the connection with a `PING`.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(url).map_err(map_err)?;
        let mut manager = ConnectionManager::new(client).await.map_err(map_err)?;

        let _: String =
            redis::cmd("PING").query_async(&mut manager).await.map_err(map_err)?;

        Ok(Self { manager })
    }

    /// PTTL returns -2 for a missing key and -1 for a key without expiry;
    /// both mean "no live TTL-bound record" here, as does 0.
    fn parse_pttl(millis: i64) -> Option<Duration> {
        u64::try_from(millis).ok().filter(|&m| m > 0).map(Duration::from_millis)
    }
}

fn map_err(err: redis::RedisError) -> StoreError {
    if err.is_io_error() || err.is_connection_dropped() || err.is_connection_refusal() {
        StoreError::Unavailable(err.to_string())
    } else {
        StoreError::Command(err.to_string())
    }
}

#[async_trait]
impl TtlStore for RedisStore {
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError> {
        let mut conn = self.manager.clone();
        let millis = u64::try_from(ttl.as_millis())
            .map_err(|_| StoreError::Command(format!("TTL out of range: {ttl:?}")))?;

        let () = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("PX")
            .arg(millis)
            .query_async(&mut conn)
            .await
            .map_err(map_err)?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.manager.clone();
        conn.get(key).await.map_err(map_err)
    }

    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        let mut conn = self.manager.clone();
        let deleted: u64 = conn.del(key).await.map_err(map_err)?;
        Ok(deleted > 0)
    }

    async fn remaining_ttl(&self, key: &str) -> Result<Option<Duration>, StoreError> {
        let mut conn = self.manager.clone();
        let millis: i64 = redis::cmd("PTTL").arg(key).query_async(&mut conn).await.map_err(map_err)?;
        Ok(Self::parse_pttl(millis))
    }

    async fn get_with_ttl(&self, key: &str) -> Result<Option<(String, Duration)>, StoreError> {
        let mut conn = self.manager.clone();

        // One round trip for value + TTL; the pair is read atomically so
        // the TTL always describes the returned value.
        let (value, millis): (Option<String>, i64) = redis::pipe()
            .atomic()
            .get(key)
            .cmd("PTTL")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(map_err)?;

        match (value, Self::parse_pttl(millis)) {
            (Some(value), Some(ttl)) => Ok(Some((value, ttl))),
            _ => Ok(None),
        }
    }

    async fn scan_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let mut conn = self.manager.clone();
        let pattern = format!("{prefix}*");
        let mut keys = Vec::new();
        let mut cursor: u64 = 0;

        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_COUNT)
                .query_async(&mut conn)
                .await
                .map_err(map_err)?;

            keys.extend(batch);
            cursor = next;
            if cursor == 0 {
                break;
            }
        }

        Ok(keys)
    }

    async fn execute(&self, pipeline: DeletePipeline) -> Result<u64, StoreError> {
        if pipeline.is_empty() {
            return Ok(0);
        }

        let mut conn = self.manager.clone();
        let mut pipe = redis::pipe();
        for key in pipeline.into_keys() {
            pipe.del(key);
        }

        let counts: Vec<u64> = pipe
            .query_async(&mut conn)
            .await
            .map_err(|e| StoreError::Pipeline(e.to_string()))?;

        Ok(counts.iter().sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pttl_sentinels_mean_no_ttl() {
        assert_eq!(RedisStore::parse_pttl(-2), None, "missing key");
        assert_eq!(RedisStore::parse_pttl(-1), None, "no expiry set");
        assert_eq!(RedisStore::parse_pttl(0), None);
        assert_eq!(RedisStore::parse_pttl(1_500), Some(Duration::from_millis(1_500)));
    }
}
