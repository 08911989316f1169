//! Storage abstraction over an external TTL key-value store.
//!
//! Trait-based abstraction for the narrow command set the vault needs:
//! per-key atomic operations (set/get/delete/ttl) plus two best-effort
//! multi-key operations (prefix scan, delete pipeline). Correctness is
//! delegated to the store's per-key atomicity; no in-process locks are
//! layered on top.

mod chaotic;
mod memory;

use std::time::Duration;

use async_trait::async_trait;
pub use chaotic::ChaoticStore;
pub use memory::MemoryStore;

use crate::error::StoreError;

/// A batch of delete commands executed in one round trip.
///
/// Reduces latency for bulk revocation but provides **no cross-key
/// atomicity**: a failure mid-batch may leave some keys deleted and others
/// not. Obtain one via [`TtlStore::pipeline`], queue keys with
/// [`delete`](Self::delete), and run it with [`TtlStore::execute`].
#[derive(Debug, Default)]
pub struct DeletePipeline {
    keys: Vec<String>,
}

impl DeletePipeline {
    /// Create an empty pipeline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a key for deletion.
    pub fn delete(&mut self, key: impl Into<String>) {
        self.keys.push(key.into());
    }

    /// Number of queued deletes.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// True if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Consume the pipeline, yielding the queued keys in insertion order.
    #[must_use]
    pub fn into_keys(self) -> Vec<String> {
        self.keys
    }
}

/// Narrow interface over an external TTL-capable key-value store.
///
/// Must be Clone (shared across request handlers), Send + Sync, and fully
/// async: every method maps to at most one store round trip and observes
/// caller cancellation by future drop - implementations must not detach
/// work that survives a dropped call.
///
/// Expiry is the store's job: a key whose TTL has elapsed behaves exactly
/// like an absent key through every method here.
#[async_trait]
pub trait TtlStore: Clone + Send + Sync + 'static {
    /// Store `value` under `key` with the given time-to-live.
    ///
    /// Overwrites any existing value and resets its TTL. A zero or
    /// near-zero `ttl` is accepted; the store may expire the key
    /// immediately.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError>;

    /// Fetch the value under `key`. `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Delete `key`. Returns whether a live key was removed.
    ///
    /// Idempotent: deleting an absent key succeeds with `false`.
    async fn delete(&self, key: &str) -> Result<bool, StoreError>;

    /// Remaining time-to-live of `key`. `None` if absent or expired.
    async fn remaining_ttl(&self, key: &str) -> Result<Option<Duration>, StoreError>;

    /// Fetch value and remaining TTL together, in one round trip.
    ///
    /// Used by the secret read path to avoid a race between a `get` and a
    /// separate `remaining_ttl` call. `None` if absent or expired.
    async fn get_with_ttl(&self, key: &str) -> Result<Option<(String, Duration)>, StoreError>;

    /// Enumerate all live keys starting with `prefix`.
    ///
    /// Cursor-based, **not** a point-in-time snapshot: keys written
    /// concurrently with an in-flight scan may or may not be observed.
    /// Accepted as best-effort semantics.
    async fn scan_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError>;

    /// Execute a delete pipeline in one round trip.
    ///
    /// Returns the number of live keys actually removed. A
    /// [`StoreError::Pipeline`] means the batch itself failed to run;
    /// deletion of individual absent keys is not an error.
    async fn execute(&self, pipeline: DeletePipeline) -> Result<u64, StoreError>;

    /// Start an empty delete pipeline.
    fn pipeline(&self) -> DeletePipeline {
        DeletePipeline::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_queues_in_order() {
        let mut pipeline = DeletePipeline::new();
        assert!(pipeline.is_empty());

        pipeline.delete("a");
        pipeline.delete("b");

        assert_eq!(pipeline.len(), 2);
        assert_eq!(pipeline.into_keys(), vec!["a".to_string(), "b".to_string()]);
    }
}
