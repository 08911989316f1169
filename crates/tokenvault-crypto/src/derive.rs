//! Fingerprint and cipher-key derivation using labeled HKDF
//!
//! Both values are derived from the same (server secret, token) pair but
//! under distinct context labels, so the fingerprint - which is visible to
//! the backing store as a key namespace - carries no information about the
//! cipher key protecting the stored values.

use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::Zeroize;

use crate::secret::ServerSecret;

/// Label for fingerprint (authentication namespace) derivation
const AUTH_LABEL: &[u8] = b"tokenvaultAuthV1";

/// Label for cipher-key derivation
const ENC_LABEL: &[u8] = b"tokenvaultEncV1";

/// A 256-bit symmetric key derived for one token.
///
/// Used for ChaCha20-Poly1305 sealing and opening. Zeroized on drop; derive
/// it where needed rather than caching it.
#[derive(Clone)]
pub struct CipherKey {
    key: [u8; 32],
}

impl CipherKey {
    /// 32-byte symmetric key for ChaCha20-Poly1305 AEAD.
    pub fn key(&self) -> &[u8; 32] {
        &self.key
    }
}

impl Drop for CipherKey {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

impl std::fmt::Debug for CipherKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CipherKey(..)")
    }
}

/// Derive the fingerprint of a token.
///
/// The fingerprint is the hex-encoded 32-byte HKDF output under the auth
/// label: 64 lowercase hex characters. It serves both as the token's
/// liveness-marker key and as the namespace prefix for the token's secret
/// records. It is not reversible to the token.
///
/// # Security
///
/// - Deterministic: same (secret, token) always produces the same value
/// - Two different tokens collide with negligible probability (256-bit
///   output width)
/// - Derived under a different label than [`derive_key`], so a leaked
///   fingerprint never weakens the cipher key
pub fn fingerprint(secret: &ServerSecret, token: &str) -> String {
    hex::encode(expand(secret, AUTH_LABEL, token))
}

/// Derive the cipher key for a token.
///
/// Same HKDF construction as [`fingerprint`] but under the enc label; the
/// two outputs are computationally unrelated.
pub fn derive_key(secret: &ServerSecret, token: &str) -> CipherKey {
    CipherKey { key: expand(secret, ENC_LABEL, token) }
}

/// HKDF-SHA256 expand of `token` under `label`, keyed by the server secret.
fn expand(secret: &ServerSecret, label: &[u8], token: &str) -> [u8; 32] {
    let hkdf = Hkdf::<Sha256>::new(None, secret.as_bytes());

    // Info parameter: label || token bytes. Tokens are fixed-length hex in
    // practice, so no length prefix is needed to keep encodings injective
    // per label.
    let mut info = Vec::with_capacity(label.len() + token.len());
    info.extend_from_slice(label);
    info.extend_from_slice(token.as_bytes());

    let mut out = [0u8; 32];
    let Ok(()) = hkdf.expand(&info, &mut out) else {
        unreachable!("32 bytes is a valid HKDF-SHA256 output length");
    };

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_secret() -> ServerSecret {
        ServerSecret::from_bytes([0x42; 32])
    }

    #[test]
    fn fingerprint_is_64_hex_chars() {
        let fp = fingerprint(&test_secret(), "some-token");
        assert_eq!(fp.len(), 64);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn fingerprint_is_deterministic() {
        let secret = test_secret();
        assert_eq!(fingerprint(&secret, "tok"), fingerprint(&secret, "tok"));
    }

    #[test]
    fn different_tokens_produce_different_fingerprints() {
        let secret = test_secret();
        assert_ne!(fingerprint(&secret, "token-a"), fingerprint(&secret, "token-b"));
    }

    #[test]
    fn different_secrets_produce_different_fingerprints() {
        let a = ServerSecret::from_bytes([1; 32]);
        let b = ServerSecret::from_bytes([2; 32]);
        assert_ne!(fingerprint(&a, "tok"), fingerprint(&b, "tok"));
    }

    #[test]
    fn fingerprint_and_key_are_domain_separated() {
        // The hex-decoded fingerprint must not equal the cipher key: the two
        // labels put them in unrelated derivation domains.
        let secret = test_secret();
        let fp_bytes = hex::decode(fingerprint(&secret, "tok")).unwrap();
        let key = derive_key(&secret, "tok");
        assert_ne!(fp_bytes.as_slice(), key.key().as_slice());
    }

    #[test]
    fn derive_key_is_deterministic() {
        let secret = test_secret();
        assert_eq!(derive_key(&secret, "tok").key(), derive_key(&secret, "tok").key());
    }

    #[test]
    fn different_tokens_produce_different_keys() {
        let secret = test_secret();
        assert_ne!(derive_key(&secret, "token-a").key(), derive_key(&secret, "token-b").key());
    }

    #[test]
    fn debug_does_not_print_key() {
        let key = derive_key(&test_secret(), "tok");
        assert_eq!(format!("{key:?}"), "CipherKey(..)");
    }

    #[test]
    fn empty_token_still_derives() {
        // Degenerate input: the vault validates tokens before derivation,
        // but derivation itself must not panic on any string.
        let secret = test_secret();
        let _ = fingerprint(&secret, "");
        let _ = derive_key(&secret, "");
    }
}
