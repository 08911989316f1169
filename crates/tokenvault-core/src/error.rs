//! Error types for the tokenvault core.
//!
//! Strongly-typed errors per layer: store errors (backend unreachable,
//! command or pipeline failure) and vault errors (the caller-facing
//! taxonomy). Lower layers return typed errors; the orchestration layer
//! never swallows one silently.

use thiserror::Error;
use tokenvault_crypto::CryptoError;

/// Errors from the backing TTL key-value store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Backend unreachable (connection refused, dropped, timed out).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A single command was rejected or failed server-side.
    #[error("store command failed: {0}")]
    Command(String),

    /// A pipelined batch failed to execute.
    ///
    /// Individual deletes inside a successfully executed pipeline are
    /// best-effort; this variant means the batch itself did not run.
    #[error("pipeline execution failed: {0}")]
    Pipeline(String),
}

impl StoreError {
    /// Returns true if this error is transient and may succeed on retry.
    ///
    /// The core performs no retries itself; retry policy belongs to the
    /// calling layer, which can use this to decide.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// Caller-facing error taxonomy for vault operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VaultError {
    /// Malformed input: empty key path, out-of-range TTL request.
    ///
    /// Reported immediately, never retried.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Missing, unknown, or expired token.
    ///
    /// A unit variant with one fixed message: callers cannot distinguish
    /// missing from expired from unknown.
    #[error("invalid or expired token")]
    Authentication,

    /// Cryptographic failure: malformed blob or tag mismatch.
    ///
    /// Hard failure; no partial plaintext is ever returned. Logged
    /// internally, reported generically to external callers.
    #[error("crypto failure: {0}")]
    Crypto(#[from] CryptoError),

    /// Backing store failure.
    #[error("store failure: {0}")]
    Store(#[from] StoreError),

    /// Secret absent or TTL-expired; callers cannot tell which.
    #[error("secret not found")]
    NotFound,
}
