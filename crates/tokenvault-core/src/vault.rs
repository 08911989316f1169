//! Vault orchestration.
//!
//! Couples the four concerns no other layer is allowed to touch
//! separately: token authentication, per-token key derivation,
//! authenticated encryption, and TTL-bound persistence. Every secret write
//! re-reads the token marker's remaining TTL and uses it as the secret's
//! TTL, which is the mechanism guaranteeing that no secret outlives its
//! token.

use std::{sync::Arc, time::Duration};

use tokenvault_crypto::{NONCE_SIZE, ServerSecret, derive_key, fingerprint, open, seal};

use crate::{
    env::Environment,
    error::VaultError,
    path,
    store::TtlStore,
    token::{AuthSession, IssuedToken, MARKER_VALUE, TokenConfig, random_token},
};

/// Outcome of a successful secret write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSecret {
    /// The caller-supplied key path the secret was stored under.
    pub key_path: String,
    /// The TTL assigned to the record: the owning token's remaining life at
    /// write time.
    pub ttl: Duration,
}

/// Outcome of a successful secret read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedSecret {
    /// The decrypted plaintext.
    pub value: String,
    /// The record's remaining TTL at read time.
    pub ttl: Duration,
}

/// The secret lifecycle manager.
///
/// Holds the process-wide [`ServerSecret`] (read-only, shared across all
/// concurrent callers without synchronization), the backing store, and the
/// TTL policy. Clone is cheap; clones share the secret and the store.
///
/// All operations are async and observe caller cancellation by future
/// drop: no operation detaches work, so dropping a call mid-flight stops
/// before the next store round trip. The vault performs no retries.
#[derive(Clone)]
pub struct Vault<S: TtlStore, E: Environment> {
    secret: Arc<ServerSecret>,
    store: S,
    env: E,
    config: TokenConfig,
}

impl<S: TtlStore, E: Environment> Vault<S, E> {
    /// Create a vault over `store` with the given TTL policy.
    pub fn new(secret: Arc<ServerSecret>, store: S, env: E, config: TokenConfig) -> Self {
        Self { secret, store, env, config }
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Issue a fresh token.
    ///
    /// Mints 32 random bytes (hex-encoded), derives the fingerprint, and
    /// writes the liveness marker with the granted TTL. The raw token is
    /// returned to the caller and never persisted.
    ///
    /// # Errors
    ///
    /// - [`VaultError::Validation`]: zero or over-maximum requested TTL
    /// - [`VaultError::Store`]: marker write failed
    pub async fn issue_token(
        &self,
        requested_ttl: Option<Duration>,
    ) -> Result<IssuedToken, VaultError> {
        let ttl = self.config.grant(requested_ttl)?;

        let token = random_token(&self.env);
        let fp = fingerprint(&self.secret, &token);

        self.store.set(&fp, MARKER_VALUE, ttl).await?;

        tracing::debug!(fingerprint = %fp, ttl_secs = ttl.as_secs(), "token issued");

        Ok(IssuedToken { token, fingerprint: fp, ttl })
    }

    /// Authenticate a presented token.
    ///
    /// Returns the fingerprint and the marker's remaining TTL, for callers
    /// that must propagate it into subsequent writes.
    ///
    /// # Errors
    ///
    /// [`VaultError::Authentication`] if the marker is absent or its TTL
    /// has elapsed. The error does not say which.
    pub async fn authenticate(&self, token: &str) -> Result<AuthSession, VaultError> {
        let fp = fingerprint(&self.secret, token);

        match self.store.remaining_ttl(&fp).await? {
            Some(remaining) if !remaining.is_zero() => {
                Ok(AuthSession { fingerprint: fp, remaining })
            },
            _ => Err(VaultError::Authentication),
        }
    }

    /// Encrypt and store a secret under the token's namespace.
    ///
    /// The record's TTL is the token's remaining TTL observed by the
    /// liveness check, never a caller-supplied value. If the token expires
    /// between the check and the write, the write still succeeds and the
    /// store expires the record immediately; closing that race entirely
    /// would need a transactional primitive the store is not assumed to
    /// have.
    ///
    /// # Errors
    ///
    /// - [`VaultError::Validation`]: empty key path
    /// - [`VaultError::Authentication`]: token expired or unknown
    /// - [`VaultError::Store`]: write failed
    pub async fn store_secret(
        &self,
        token: &str,
        key_path: &str,
        plaintext: &str,
    ) -> Result<StoredSecret, VaultError> {
        if key_path.is_empty() {
            return Err(VaultError::Validation("namespace and key cannot be empty".to_string()));
        }

        // TTL check first: no write happens for a dead token.
        let session = self.authenticate(token).await?;
        let storage_key = path::secret_key(&session.fingerprint, key_path)?;

        let key = derive_key(&self.secret, token);
        let mut nonce = [0u8; NONCE_SIZE];
        self.env.random_bytes(&mut nonce);
        let blob = seal(plaintext.as_bytes(), &key, nonce);

        self.store.set(&storage_key, &blob, session.remaining).await?;

        tracing::debug!(
            fingerprint = %session.fingerprint,
            ttl_secs = session.remaining.as_secs(),
            "secret stored"
        );

        Ok(StoredSecret { key_path: key_path.to_string(), ttl: session.remaining })
    }

    /// Fetch and decrypt a secret.
    ///
    /// Value and remaining TTL are read in one pipelined round trip; a
    /// record whose TTL reached zero is treated identically to an absent
    /// one.
    ///
    /// # Errors
    ///
    /// - [`VaultError::Validation`]: empty key path
    /// - [`VaultError::Authentication`]: token expired or unknown
    /// - [`VaultError::NotFound`]: secret absent or TTL-expired
    /// - [`VaultError::Crypto`]: blob malformed or tag mismatch
    pub async fn fetch_secret(
        &self,
        token: &str,
        key_path: &str,
    ) -> Result<FetchedSecret, VaultError> {
        if key_path.is_empty() {
            return Err(VaultError::Validation("namespace and key cannot be empty".to_string()));
        }

        let session = self.authenticate(token).await?;
        let storage_key = path::secret_key(&session.fingerprint, key_path)?;

        let Some((blob, ttl)) = self.store.get_with_ttl(&storage_key).await? else {
            return Err(VaultError::NotFound);
        };
        if ttl.is_zero() {
            return Err(VaultError::NotFound);
        }

        let key = derive_key(&self.secret, token);
        let plaintext = open(&blob, &key)?;

        let value = String::from_utf8(plaintext).map_err(|_| {
            VaultError::Crypto(tokenvault_crypto::CryptoError::Malformed {
                reason: "plaintext is not valid UTF-8".to_string(),
            })
        })?;

        Ok(FetchedSecret { value, ttl })
    }

    /// Delete a secret.
    ///
    /// Idempotent: deleting an already-absent path succeeds.
    ///
    /// # Errors
    ///
    /// - [`VaultError::Validation`]: empty key path
    /// - [`VaultError::Authentication`]: token expired or unknown
    /// - [`VaultError::Store`]: delete command failed
    pub async fn delete_secret(&self, token: &str, key_path: &str) -> Result<(), VaultError> {
        if key_path.is_empty() {
            return Err(VaultError::Validation("namespace and key cannot be empty".to_string()));
        }

        let session = self.authenticate(token).await?;
        let storage_key = path::secret_key(&session.fingerprint, key_path)?;

        self.store.delete(&storage_key).await?;

        Ok(())
    }

    /// Revoke a token and delete every key under its fingerprint.
    ///
    /// Enumerates `{fingerprint}*` (the marker plus all secret records)
    /// with a best-effort prefix scan, then deletes everything found in one
    /// pipeline. Returns the number of keys deleted; zero discovered keys
    /// is a successful no-op.
    ///
    /// Revocation does not require a live marker: revoking an
    /// already-expired token still sweeps any surviving secret records.
    /// The scan is not a snapshot, so keys written concurrently may
    /// survive; a partial deletion is finished by the next invocation. No
    /// automatic retry on pipeline failure.
    ///
    /// # Errors
    ///
    /// [`VaultError::Store`]: scan failed, or the pipeline failed to
    /// execute.
    pub async fn revoke_token(&self, token: &str) -> Result<u64, VaultError> {
        let fp = fingerprint(&self.secret, token);

        let keys = self.store.scan_prefix(&fp).await?;
        if keys.is_empty() {
            return Ok(0);
        }

        let mut pipeline = self.store.pipeline();
        for key in &keys {
            pipeline.delete(key.clone());
        }

        let enumerated = keys.len();
        let deleted = self.store.execute(pipeline).await?;

        tracing::info!(fingerprint = %fp, enumerated, deleted, "token revoked");

        Ok(deleted)
    }
}
