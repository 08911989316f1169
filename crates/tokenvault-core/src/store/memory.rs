//! In-memory TTL store for testing and simulation.

#![allow(clippy::disallowed_types, reason = "Synchronous in-memory operations only")]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;

use super::{DeletePipeline, TtlStore};
use crate::{env::Environment, error::StoreError};

/// In-memory TTL store implementation for testing and simulation.
///
/// Backed by a `HashMap` with per-entry expiry instants taken from the
/// injected [`Environment`], so expiry is deterministic under a virtual
/// clock. Expired entries are purged lazily on access. State is wrapped in
/// Arc<Mutex<>> to allow Clone and concurrent access; uses
/// `lock().expect()` which will panic if the mutex is poisoned -
/// acceptable for test code.
#[derive(Clone)]
pub struct MemoryStore<E: Environment> {
    env: E,
    inner: Arc<Mutex<HashMap<String, Entry<E::Instant>>>>,
}

struct Entry<I> {
    value: String,
    expires_at: I,
}

impl<E: Environment> MemoryStore<E> {
    /// Create an empty store reading time from `env`.
    pub fn new(env: E) -> Self {
        Self { env, inner: Arc::new(Mutex::new(HashMap::new())) }
    }

    /// Number of live (unexpired) keys.
    ///
    /// Useful for debugging and testing.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned. Acceptable for test code.
    #[allow(clippy::expect_used)]
    pub fn live_len(&self) -> usize {
        let now = self.env.now();
        let inner = self.inner.lock().expect("Mutex poisoned");
        inner.values().filter(|e| e.expires_at > now).count()
    }
}

#[async_trait]
impl<E: Environment> TtlStore for MemoryStore<E> {
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned. Acceptable for test code.
    #[allow(clippy::expect_used)]
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError> {
        let expires_at = self.env.now() + ttl;
        let mut inner = self.inner.lock().expect("Mutex poisoned");

        inner.insert(key.to_string(), Entry { value: value.to_string(), expires_at });

        Ok(())
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned. Acceptable for test code.
    #[allow(clippy::expect_used)]
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.get_with_ttl(key).await?.map(|(value, _)| value))
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned. Acceptable for test code.
    #[allow(clippy::expect_used)]
    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        let now = self.env.now();
        let mut inner = self.inner.lock().expect("Mutex poisoned");

        match inner.remove(key) {
            Some(entry) => Ok(entry.expires_at > now),
            None => Ok(false),
        }
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned. Acceptable for test code.
    #[allow(clippy::expect_used)]
    async fn remaining_ttl(&self, key: &str) -> Result<Option<Duration>, StoreError> {
        Ok(self.get_with_ttl(key).await?.map(|(_, ttl)| ttl))
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned. Acceptable for test code.
    #[allow(clippy::expect_used)]
    async fn get_with_ttl(&self, key: &str) -> Result<Option<(String, Duration)>, StoreError> {
        let now = self.env.now();
        let mut inner = self.inner.lock().expect("Mutex poisoned");

        match inner.get(key) {
            Some(entry) if entry.expires_at > now => {
                Ok(Some((entry.value.clone(), entry.expires_at - now)))
            },
            Some(_) => {
                // Lazy expiry: the entry's TTL has elapsed, drop it now.
                inner.remove(key);
                Ok(None)
            },
            None => Ok(None),
        }
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned. Acceptable for test code.
    #[allow(clippy::expect_used)]
    async fn scan_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let now = self.env.now();
        let inner = self.inner.lock().expect("Mutex poisoned");

        Ok(inner
            .iter()
            .filter(|(key, entry)| key.starts_with(prefix) && entry.expires_at > now)
            .map(|(key, _)| key.clone())
            .collect())
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned. Acceptable for test code.
    #[allow(clippy::expect_used)]
    async fn execute(&self, pipeline: DeletePipeline) -> Result<u64, StoreError> {
        let now = self.env.now();
        let mut inner = self.inner.lock().expect("Mutex poisoned");

        let mut deleted = 0u64;
        for key in pipeline.into_keys() {
            if let Some(entry) = inner.remove(&key) {
                if entry.expires_at > now {
                    deleted += 1;
                }
            }
        }

        Ok(deleted)
    }
}
