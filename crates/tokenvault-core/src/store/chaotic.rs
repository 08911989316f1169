//! Chaotic store wrapper for fault injection testing
//!
//! Store wrapper that randomly fails operations to test error handling and
//! surfacing. Used to verify that store failures propagate as typed
//! [`StoreError`]s instead of being swallowed.

#![allow(clippy::disallowed_types, reason = "Locking simple RNG state")]

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;

use super::{DeletePipeline, TtlStore};
use crate::error::StoreError;

/// Chaotic store wrapper that randomly injects failures.
///
/// Delegates to an underlying store but fails operations based on a
/// configured failure rate. Single-command failures surface as
/// [`StoreError::Unavailable`]; pipeline executions fail as
/// [`StoreError::Pipeline`], matching what a dropped connection looks like
/// in each case. Uses Arc<Mutex<>> for the RNG state, making it Clone and
/// thread-safe.
#[derive(Clone)]
pub struct ChaoticStore<S: TtlStore> {
    inner: S,
    /// Failure rate (0.0 = never fail, 1.0 = always fail)
    failure_rate: f64,
    /// RNG state for deterministic chaos
    rng: Arc<Mutex<ChaoticRng>>,
    /// Operation counter for assertions on round-trip counts
    operation_count: Arc<Mutex<usize>>,
}

/// Simple deterministic RNG for chaos injection
///
/// Linear congruential generator (LCG) for fast, deterministic randomness,
/// so chaos tests are reproducible with the same seed.
struct ChaoticRng {
    state: u64,
}

impl ChaoticRng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Generate next random value [0.0, 1.0)
    fn next(&mut self) -> f64 {
        // LCG constants from Numerical Recipes
        const A: u64 = 1_664_525;
        const C: u64 = 1_013_904_223;
        const M: u64 = 1u64 << 32;

        self.state = (A.wrapping_mul(self.state).wrapping_add(C)) % M;
        (self.state as f64) / (M as f64)
    }

    /// Check if we should fail (returns true with probability = `failure_rate`)
    fn should_fail(&mut self, failure_rate: f64) -> bool {
        self.next() < failure_rate
    }
}

impl<S: TtlStore> ChaoticStore<S> {
    /// Create a new chaotic store wrapper.
    ///
    /// # Panics
    ///
    /// Panics if `failure_rate` is not in [0.0, 1.0]
    pub fn new(inner: S, failure_rate: f64) -> Self {
        Self::with_seed(inner, failure_rate, 0x1234_5678_9ABC_DEF0)
    }

    /// Create with explicit seed for reproducible chaos.
    ///
    /// # Panics
    ///
    /// Panics if `failure_rate` is not in [0.0, 1.0]
    pub fn with_seed(inner: S, failure_rate: f64, seed: u64) -> Self {
        assert!(
            (0.0..=1.0).contains(&failure_rate),
            "failure_rate must be between 0.0 and 1.0, got {failure_rate}"
        );

        Self {
            inner,
            failure_rate,
            rng: Arc::new(Mutex::new(ChaoticRng::new(seed))),
            operation_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Underlying store (for checking state after chaos).
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Total number of store operations attempted.
    pub fn operation_count(&self) -> usize {
        #[allow(clippy::expect_used)]
        *self.operation_count.lock().expect("operation_count mutex poisoned")
    }

    /// Record an operation and decide whether it fails.
    fn inject_fault(&self) -> bool {
        #[allow(clippy::expect_used)]
        {
            *self.operation_count.lock().expect("operation_count mutex poisoned") += 1;
            self.rng.lock().expect("ChaoticRng mutex poisoned").should_fail(self.failure_rate)
        }
    }
}

#[async_trait]
impl<S: TtlStore> TtlStore for ChaoticStore<S> {
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError> {
        if self.inject_fault() {
            return Err(StoreError::Unavailable("chaotic failure injection".to_string()));
        }
        self.inner.set(key, value, ttl).await
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        if self.inject_fault() {
            return Err(StoreError::Unavailable("chaotic failure injection".to_string()));
        }
        self.inner.get(key).await
    }

    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        if self.inject_fault() {
            return Err(StoreError::Unavailable("chaotic failure injection".to_string()));
        }
        self.inner.delete(key).await
    }

    async fn remaining_ttl(&self, key: &str) -> Result<Option<Duration>, StoreError> {
        if self.inject_fault() {
            return Err(StoreError::Unavailable("chaotic failure injection".to_string()));
        }
        self.inner.remaining_ttl(key).await
    }

    async fn get_with_ttl(&self, key: &str) -> Result<Option<(String, Duration)>, StoreError> {
        if self.inject_fault() {
            return Err(StoreError::Unavailable("chaotic failure injection".to_string()));
        }
        self.inner.get_with_ttl(key).await
    }

    async fn scan_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        if self.inject_fault() {
            return Err(StoreError::Unavailable("chaotic failure injection".to_string()));
        }
        self.inner.scan_prefix(prefix).await
    }

    async fn execute(&self, pipeline: DeletePipeline) -> Result<u64, StoreError> {
        if self.inject_fault() {
            return Err(StoreError::Pipeline("chaotic failure injection".to_string()));
        }
        self.inner.execute(pipeline).await
    }
}
