//! Process-wide server secret.

use zeroize::Zeroize;

/// Process-wide key material for fingerprint and cipher-key derivation.
///
/// Generated once at process start, held read-only for the process lifetime,
/// and never persisted. Losing it invalidates every outstanding token and
/// secret, which is acceptable: tokens are short-lived by construction.
///
/// Constructed once and passed by reference (typically behind an `Arc`) into
/// every component that derives keys. There is deliberately no global
/// accessor and no setter.
pub struct ServerSecret {
    bytes: [u8; Self::LEN],
}

impl ServerSecret {
    /// Length of the secret in bytes.
    pub const LEN: usize = 32;

    /// Generate a fresh secret from OS entropy.
    ///
    /// # Panics
    ///
    /// Panics if the OS RNG fails. This is intentional - a process without
    /// functioning cryptographic randomness cannot operate securely, and
    /// RNG failure indicates OS-level problems.
    #[allow(clippy::expect_used)]
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; Self::LEN];
        getrandom::fill(&mut bytes)
            .expect("invariant: OS RNG failure is unrecoverable - cannot derive keys securely");
        Self { bytes }
    }

    /// Construct from explicit bytes.
    ///
    /// For tests and deterministic harnesses. Production code should use
    /// [`generate`](Self::generate).
    #[must_use]
    pub fn from_bytes(bytes: [u8; Self::LEN]) -> Self {
        Self { bytes }
    }

    /// Raw key material, for use as HKDF input keying material.
    pub(crate) fn as_bytes(&self) -> &[u8; Self::LEN] {
        &self.bytes
    }
}

impl Drop for ServerSecret {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

// Key material must never leak through logs or panic messages.
impl std::fmt::Debug for ServerSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ServerSecret(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_produces_distinct_secrets() {
        let a = ServerSecret::generate();
        let b = ServerSecret::generate();
        assert_ne!(a.as_bytes(), b.as_bytes(), "two generated secrets should differ");
    }

    #[test]
    fn from_bytes_round_trips() {
        let secret = ServerSecret::from_bytes([7u8; 32]);
        assert_eq!(secret.as_bytes(), &[7u8; 32]);
    }

    #[test]
    fn debug_does_not_print_material() {
        let secret = ServerSecret::from_bytes([0xAB; 32]);
        let rendered = format!("{secret:?}");
        assert!(!rendered.contains("ab"), "debug output must not contain key bytes");
        assert_eq!(rendered, "ServerSecret(..)");
    }
}
