//! Secret storage-key resolution.
//!
//! Secret records live under `{fingerprint}:secret:{key_path}`. The
//! fingerprint prefix is what lets revocation enumerate everything a token
//! owns with a single prefix scan, so every secret write and read must go
//! through [`secret_key`] - never hand-build storage keys.

use crate::error::VaultError;

/// Build the namespaced storage key for a secret.
///
/// Deterministic: `{fingerprint}:secret:{key_path}`. Performs no
/// normalization; callers strip a leading path separator with
/// [`normalize_key_path`] before resolving.
///
/// # Errors
///
/// [`VaultError::Validation`] if either part is empty.
pub fn secret_key(fingerprint: &str, key_path: &str) -> Result<String, VaultError> {
    if fingerprint.is_empty() || key_path.is_empty() {
        return Err(VaultError::Validation("namespace and key cannot be empty".to_string()));
    }

    Ok(format!("{fingerprint}:secret:{key_path}"))
}

/// Strip a single leading `/` from a caller-supplied key path.
///
/// HTTP wildcard captures arrive as `/db/pass`; the stored path is
/// `db/pass`. Only one separator is stripped, and nothing else is
/// normalized.
#[must_use]
pub fn normalize_key_path(raw: &str) -> &str {
    raw.strip_prefix('/').unwrap_or(raw)
}
