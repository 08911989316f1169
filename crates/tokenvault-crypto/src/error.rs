//! Crypto error types.

use thiserror::Error;

/// Errors that can occur while opening a ciphertext blob.
///
/// Sealing cannot fail: AEAD encryption with a valid key and nonce always
/// succeeds, and derivation is infallible given a constructed
/// [`crate::ServerSecret`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// The blob is not valid base64 or is shorter than the nonce prefix.
    #[error("malformed ciphertext blob: {reason}")]
    Malformed {
        /// What made the blob unparseable
        reason: String,
    },

    /// The Poly1305 tag did not verify.
    ///
    /// Either the blob was tampered with or it was sealed under a different
    /// token's key; the error does not say which. No partial plaintext is
    /// ever returned.
    #[error("authentication failed")]
    AuthenticationFailed,
}
