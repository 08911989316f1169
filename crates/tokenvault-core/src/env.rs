//! Environment abstraction for deterministic testing.
//!
//! Decouples vault logic from system resources (time, randomness). TTL
//! expiry is time-driven, so tests inject a virtual clock ([`ManualEnv`])
//! while production uses real time and OS entropy ([`SystemEnv`]).

#![allow(clippy::disallowed_types, reason = "Synchronous clock/RNG state only")]

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

/// Abstract environment providing time and randomness.
///
/// # Safety
///
/// Implementations MUST guarantee:
///
/// - `now()` never goes backwards
/// - `random_bytes()` uses cryptographically secure entropy in production
pub trait Environment: Clone + Send + Sync + 'static {
    /// The specific instant type used by this environment.
    ///
    /// Production environments use `std::time::Instant`; test environments
    /// use virtual time.
    type Instant: Copy
        + Ord
        + Send
        + Sync
        + std::ops::Add<Duration, Output = Self::Instant>
        + std::ops::Sub<Output = Duration>;

    /// Current time (monotonic).
    fn now(&self) -> Self::Instant;

    /// Sleeps for the specified duration.
    ///
    /// Used by driver/test code only, never by vault logic itself.
    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send;

    /// Fills the provided buffer with random bytes.
    fn random_bytes(&self, buffer: &mut [u8]);
}

/// Production environment using system time and cryptographic RNG.
///
/// # Panics
///
/// Panics if the OS RNG fails. This is intentional - a process without
/// functioning cryptographic randomness cannot mint tokens or nonces
/// securely, and RNG failure indicates OS-level problems.
#[derive(Clone, Default)]
pub struct SystemEnv;

impl SystemEnv {
    /// Create a new system environment.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Environment for SystemEnv {
    type Instant = std::time::Instant;

    fn now(&self) -> Self::Instant {
        std::time::Instant::now()
    }

    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }

    #[allow(clippy::expect_used)]
    fn random_bytes(&self, buffer: &mut [u8]) {
        getrandom::fill(buffer)
            .expect("invariant: OS RNG failure is unrecoverable - cannot operate securely");
    }
}

/// Deterministic environment with a virtual clock and seeded RNG.
///
/// Time only moves when [`advance`](Self::advance) is called (or through
/// `sleep`, which advances the clock instead of waiting). Randomness comes
/// from a seeded LCG, so token values and nonces are reproducible. For
/// tests and simulation only - the RNG is not cryptographic.
#[derive(Clone)]
pub struct ManualEnv {
    inner: Arc<Mutex<ManualEnvInner>>,
}

struct ManualEnvInner {
    /// Virtual time elapsed since environment creation
    elapsed: Duration,
    /// LCG state
    rng_state: u64,
}

impl ManualEnv {
    /// Create an environment at time zero with a fixed default seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(0x1234_5678_9ABC_DEF0)
    }

    /// Create with an explicit RNG seed for reproducible runs.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ManualEnvInner {
                elapsed: Duration::ZERO,
                rng_state: seed,
            })),
        }
    }

    /// Advance the virtual clock.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned. Acceptable for test code.
    #[allow(clippy::expect_used)]
    pub fn advance(&self, duration: Duration) {
        let mut inner = self.inner.lock().expect("Mutex poisoned");
        inner.elapsed += duration;
    }
}

impl Default for ManualEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualEnvInner {
    /// Next LCG output (constants from Numerical Recipes).
    fn next_u64(&mut self) -> u64 {
        const A: u64 = 6_364_136_223_846_793_005;
        const C: u64 = 1_442_695_040_888_963_407;
        self.rng_state = A.wrapping_mul(self.rng_state).wrapping_add(C);
        self.rng_state
    }
}

impl Environment for ManualEnv {
    // Virtual instants are durations since environment creation; Duration
    // satisfies the Ord/Add/Sub bounds directly.
    type Instant = Duration;

    #[allow(clippy::expect_used)]
    fn now(&self) -> Self::Instant {
        self.inner.lock().expect("Mutex poisoned").elapsed
    }

    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send {
        let env = self.clone();
        async move {
            env.advance(duration);
        }
    }

    #[allow(clippy::expect_used)]
    fn random_bytes(&self, buffer: &mut [u8]) {
        let mut inner = self.inner.lock().expect("Mutex poisoned");
        for chunk in buffer.chunks_mut(8) {
            let bytes = inner.next_u64().to_be_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_env_time_advances() {
        let env = SystemEnv::new();

        let t1 = env.now();
        std::thread::sleep(Duration::from_millis(10));
        let t2 = env.now();

        assert!(t2 > t1, "Time should advance");
    }

    #[test]
    fn system_env_random_bytes_are_random() {
        let env = SystemEnv::new();

        let mut bytes1 = [0u8; 32];
        let mut bytes2 = [0u8; 32];

        env.random_bytes(&mut bytes1);
        env.random_bytes(&mut bytes2);

        assert_ne!(bytes1, bytes2, "Random bytes should differ");
    }

    #[test]
    fn manual_env_time_is_frozen_until_advanced() {
        let env = ManualEnv::new();
        let t1 = env.now();
        let t2 = env.now();
        assert_eq!(t1, t2);

        env.advance(Duration::from_secs(5));
        assert_eq!(env.now() - t1, Duration::from_secs(5));
    }

    #[tokio::test]
    async fn manual_env_sleep_advances_clock() {
        let env = ManualEnv::new();
        env.sleep(Duration::from_secs(30)).await;
        assert_eq!(env.now(), Duration::from_secs(30));
    }

    #[test]
    fn manual_env_rng_is_reproducible() {
        let env1 = ManualEnv::with_seed(42);
        let env2 = ManualEnv::with_seed(42);

        let mut a = [0u8; 16];
        let mut b = [0u8; 16];
        env1.random_bytes(&mut a);
        env2.random_bytes(&mut b);

        assert_eq!(a, b, "Same seed should produce same bytes");
    }

    #[test]
    fn manual_env_clones_share_state() {
        let env = ManualEnv::new();
        let clone = env.clone();

        env.advance(Duration::from_secs(7));
        assert_eq!(clone.now(), Duration::from_secs(7));
    }

    #[test]
    fn manual_env_fills_odd_sized_buffers() {
        let env = ManualEnv::new();
        let mut bytes = [0u8; 13];
        env.random_bytes(&mut bytes);
        assert!(bytes.iter().any(|&b| b != 0));
    }
}
