//! Token issuance configuration and session types.

use std::time::Duration;

use crate::{env::Environment, error::VaultError};

/// Number of random bytes in a freshly minted token (hex-encoded to 64
/// characters).
pub(crate) const TOKEN_BYTES: usize = 32;

/// Value stored under the fingerprint key as the token's liveness marker.
///
/// The value is meaningless; presence and remaining TTL are what matter.
pub(crate) const MARKER_VALUE: &str = "1";

/// TTL policy for token issuance.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// TTL granted when the caller does not request one.
    pub default_ttl: Duration,
    /// Upper bound on requestable TTLs.
    pub max_ttl: Duration,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self { default_ttl: Duration::from_secs(900), max_ttl: Duration::from_secs(3600) }
    }
}

impl TokenConfig {
    /// Decide the TTL to grant for an issuance request.
    ///
    /// # Errors
    ///
    /// [`VaultError::Validation`] for a zero TTL or one above
    /// [`max_ttl`](Self::max_ttl). Out-of-range requests are rejected, not
    /// clamped.
    pub fn grant(&self, requested: Option<Duration>) -> Result<Duration, VaultError> {
        match requested {
            None => Ok(self.default_ttl),
            Some(ttl) if ttl.is_zero() => {
                Err(VaultError::Validation("ttl must be positive".to_string()))
            },
            Some(ttl) if ttl > self.max_ttl => Err(VaultError::Validation(format!(
                "ttl exceeds maximum of {}s",
                self.max_ttl.as_secs()
            ))),
            Some(ttl) => Ok(ttl),
        }
    }
}

/// A freshly issued token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// The opaque caller-held credential. Never persisted in raw form; this
    /// is the only copy that will ever exist.
    pub token: String,
    /// The token's fingerprint (storage namespace).
    pub fingerprint: String,
    /// The granted lifetime.
    pub ttl: Duration,
}

/// A successfully authenticated token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    /// Fingerprint of the presented token.
    pub fingerprint: String,
    /// The marker's remaining TTL at authentication time. Writes performed
    /// under this session must not outlive it.
    pub remaining: Duration,
}

/// Mint a random token: `TOKEN_BYTES` bytes of entropy, hex-encoded.
pub(crate) fn random_token<E: Environment>(env: &E) -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    env.random_bytes(&mut bytes);
    hex::encode(bytes)
}
