//! Tokenvault Cryptographic Primitives
//!
//! Cryptographic building blocks for tokenvault. Pure functions with
//! deterministic outputs. Callers provide random nonces for deterministic
//! testing.
//!
//! # Key Lifecycle
//!
//! A single [`ServerSecret`] is generated once at process start and injected
//! by reference into every component that derives keys. Each client token is
//! expanded into two independent values under distinct HKDF labels:
//!
//! ```text
//! Server Secret (process lifetime, never persisted)
//!        │
//!        ├── HKDF("auth" label, token) → Fingerprint (hex, public namespace)
//!        │
//!        └── HKDF("enc" label, token)  → Cipher Key (256-bit, private)
//!                │
//!                ▼
//!         AEAD Encryption → base64(nonce ‖ ciphertext)
//! ```
//!
//! # Security
//!
//! Domain Separation:
//! - The fingerprint doubles as a storage namespace and is visible to the
//!   backing store; the cipher key never leaves the process
//! - Distinct HKDF context labels guarantee that learning one value reveals
//!   nothing about the other
//!
//! Cross-Token Isolation:
//! - Each token derives a unique cipher key; a blob sealed under token A
//!   fails tag verification when opened under token B
//! - Failed authentication tag -> reject blob, never partial plaintext
//!
//! Key Hygiene:
//! - `ServerSecret` and `CipherKey` are zeroized on drop
//! - Neither type exposes key material through `Debug`

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod cipher;
mod derive;
mod error;
mod secret;

pub use cipher::{NONCE_SIZE, open, seal};
pub use derive::{CipherKey, derive_key, fingerprint};
pub use error::CryptoError;
pub use secret::ServerSecret;
