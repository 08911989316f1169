//! Secret-value encryption using ChaCha20-Poly1305
//!
//! All functions are pure - the random nonce must be provided by the caller.
//! This keeps the crate deterministic under test; production callers draw
//! nonces from the OS RNG per call.
//!
//! Blob layout: `base64(nonce ‖ ciphertext ‖ tag)` with a 12-byte nonce
//! prefix. The layout is self-describing, so a blob can be opened with
//! nothing but the blob and the token-derived key.

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use chacha20poly1305::{
    ChaCha20Poly1305, Nonce,
    aead::{Aead, KeyInit},
};

use crate::{derive::CipherKey, error::CryptoError};

/// Size of the nonce prefix in bytes (ChaCha20-Poly1305 standard)
pub const NONCE_SIZE: usize = 12;

/// Poly1305 tag size (16 bytes)
#[allow(dead_code)]
const POLY1305_TAG_SIZE: usize = 16;

/// Seal a plaintext under a token-derived key.
///
/// Returns the base64-encoded blob `nonce ‖ ciphertext ‖ tag`.
///
/// # Security
///
/// - The nonce MUST be fresh per call; callers draw it from a
///   cryptographically secure source in production
/// - Authenticated encryption: any bit flip in the stored blob is rejected
///   at open time
pub fn seal(plaintext: &[u8], key: &CipherKey, nonce: [u8; NONCE_SIZE]) -> String {
    let cipher = ChaCha20Poly1305::new(key.key().into());

    let Ok(ciphertext) = cipher.encrypt(Nonce::from_slice(&nonce), plaintext) else {
        unreachable!("ChaCha20-Poly1305 encryption cannot fail with valid inputs");
    };

    let mut blob = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    blob.extend_from_slice(&nonce);
    blob.extend_from_slice(&ciphertext);

    BASE64.encode(blob)
}

/// Open a sealed blob under a token-derived key.
///
/// Returns the plaintext.
///
/// # Errors
///
/// - [`CryptoError::Malformed`]: not base64, or shorter than the nonce
/// - [`CryptoError::AuthenticationFailed`]: tag mismatch (wrong token's key
///   or tampered blob - the error does not say which)
pub fn open(blob: &str, key: &CipherKey) -> Result<Vec<u8>, CryptoError> {
    let data = BASE64
        .decode(blob)
        .map_err(|e| CryptoError::Malformed { reason: format!("invalid base64: {e}") })?;

    if data.len() < NONCE_SIZE {
        return Err(CryptoError::Malformed {
            reason: format!("blob is {} bytes, shorter than the {NONCE_SIZE}-byte nonce", data.len()),
        });
    }

    let (nonce, ciphertext) = data.split_at(NONCE_SIZE);
    let cipher = ChaCha20Poly1305::new(key.key().into());

    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| CryptoError::AuthenticationFailed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{derive::derive_key, secret::ServerSecret};

    fn key_for(token: &str) -> CipherKey {
        derive_key(&ServerSecret::from_bytes([0x42; 32]), token)
    }

    #[test]
    fn seal_open_roundtrip() {
        let key = key_for("token-a");
        let blob = seal(b"hunter2", &key, [0xAB; NONCE_SIZE]);
        let plaintext = open(&blob, &key).unwrap();
        assert_eq!(plaintext, b"hunter2");
    }

    #[test]
    fn seal_open_empty_plaintext() {
        let key = key_for("token-a");
        let blob = seal(b"", &key, [0x00; NONCE_SIZE]);
        assert_eq!(open(&blob, &key).unwrap(), b"");
    }

    #[test]
    fn seal_open_large_plaintext() {
        let key = key_for("token-a");
        let plaintext = vec![0x42u8; 64 * 1024];
        let blob = seal(&plaintext, &key, [0xFF; NONCE_SIZE]);
        assert_eq!(open(&blob, &key).unwrap(), plaintext);
    }

    #[test]
    fn blob_length_accounts_for_nonce_and_tag() {
        let key = key_for("token-a");
        let plaintext = b"test message";
        let blob = seal(plaintext, &key, [0x00; NONCE_SIZE]);

        let raw = BASE64.decode(blob).unwrap();
        assert_eq!(raw.len(), NONCE_SIZE + plaintext.len() + POLY1305_TAG_SIZE);
    }

    #[test]
    fn wrong_token_key_fails_authentication() {
        // Cross-token isolation: a blob sealed under one token must not open
        // under another token's derived key.
        let blob = seal(b"secret value", &key_for("token-a"), [0x01; NONCE_SIZE]);

        let result = open(&blob, &key_for("token-b"));
        assert_eq!(result, Err(CryptoError::AuthenticationFailed));
    }

    #[test]
    fn tampered_blob_fails_authentication() {
        let key = key_for("token-a");
        let blob = seal(b"original", &key, [0x02; NONCE_SIZE]);

        let mut raw = BASE64.decode(blob).unwrap();
        raw[NONCE_SIZE] ^= 0xFF;
        let tampered = BASE64.encode(raw);

        assert_eq!(open(&tampered, &key), Err(CryptoError::AuthenticationFailed));
    }

    #[test]
    fn invalid_base64_is_malformed() {
        let result = open("not!!valid@@base64", &key_for("token-a"));
        assert!(matches!(result, Err(CryptoError::Malformed { .. })));
    }

    #[test]
    fn undersized_blob_is_malformed() {
        // 8 raw bytes: valid base64, shorter than the 12-byte nonce.
        let short = BASE64.encode([0u8; 8]);
        let result = open(&short, &key_for("token-a"));
        assert!(matches!(result, Err(CryptoError::Malformed { .. })));
    }

    #[test]
    fn different_nonces_produce_different_blobs() {
        let key = key_for("token-a");
        let blob1 = seal(b"same plaintext", &key, [0x00; NONCE_SIZE]);
        let blob2 = seal(b"same plaintext", &key, [0x01; NONCE_SIZE]);
        assert_ne!(blob1, blob2);
    }
}
