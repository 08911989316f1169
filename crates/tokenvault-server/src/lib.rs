//! Tokenvault production server.
//!
//! Production glue around [`tokenvault_core`]: a Redis-backed
//! [`TtlStore`](tokenvault_core::TtlStore) implementation and an HTTP API
//! over the vault operations, using Axum for routing and Tokio for the
//! async runtime.
//!
//! # Components
//!
//! - [`RedisStore`]: TTL store over a Redis connection manager
//! - [`router`]: the HTTP surface (token issue/validate/revoke, secret
//!   store/fetch/delete)
//! - [`BearerToken`]: typed bearer-token extraction from the
//!   `Authorization` header
//! - [`ApiError`]: vault-error to HTTP status mapping with generic bodies
//!
//! The HTTP layer owns status mapping, logging, and request-ID
//! correlation; all lifecycle semantics live in the core.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod error;
mod extract;
pub mod middleware;
mod redis_store;
mod routes;

use std::time::Duration;

pub use error::ApiError;
pub use extract::BearerToken;
pub use redis_store::RedisStore;
pub use routes::router;
use tokenvault_core::TokenConfig;

/// Server configuration for the production runtime.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Address to bind to (e.g., "0.0.0.0:8888")
    pub bind_address: String,
    /// Redis connection URL
    pub redis_url: String,
    /// Token TTL policy (default and maximum lifetimes)
    pub token: TokenConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8888".to_string(),
            redis_url: "redis://127.0.0.1:6379".to_string(),
            token: TokenConfig::default(),
        }
    }
}

/// Whole seconds for a TTL as reported over the API, rounded up.
///
/// A record with 9.8s left reports 10: rounding down would claim a
/// just-written 10s secret has 9s, and would report 0 for a live key.
pub(crate) fn ttl_secs(ttl: Duration) -> u64 {
    let secs = ttl.as_secs();
    if ttl.subsec_nanos() > 0 { secs + 1 } else { secs }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ttl_secs_rounds_up() {
        assert_eq!(ttl_secs(Duration::from_secs(10)), 10);
        assert_eq!(ttl_secs(Duration::from_millis(9_800)), 10);
        assert_eq!(ttl_secs(Duration::from_millis(200)), 1);
        assert_eq!(ttl_secs(Duration::ZERO), 0);
    }
}
