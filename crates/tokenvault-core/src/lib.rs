//! Tokenvault core logic.
//!
//! The lifecycle manager coupling token authentication, per-token key
//! derivation, authenticated encryption, and TTL-bound persistence against
//! an external TTL-capable key-value store. The coupling invariant this
//! crate exists to enforce: **no secret outlives the token it is bound to**.
//!
//! # Architecture
//!
//! - [`Vault`]: orchestration facade - issue/authenticate tokens,
//!   store/fetch/delete secrets, revoke a token and everything under it
//! - [`TtlStore`]: narrow async interface over the external store
//!   (get/set/delete/ttl/scan/pipeline); [`MemoryStore`] and
//!   [`ChaoticStore`] implementations live here, the Redis-backed
//!   production implementation lives in the server crate
//! - [`Environment`]: time and randomness injection so expiry behavior is
//!   deterministic under test
//!
//! # Storage layout
//!
//! ```text
//! {fingerprint}                    = "1"            (token marker, TTL = token life)
//! {fingerprint}:secret:{path}      = sealed blob    (TTL ≤ token's remaining life)
//! ```
//!
//! The marker's TTL is the authoritative remaining life of the token. Every
//! secret write derives its TTL from the marker's remaining TTL at write
//! time, never from a caller-supplied value.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod env;
mod error;
pub mod path;
pub mod store;
mod token;
mod vault;

pub use env::{Environment, ManualEnv, SystemEnv};
pub use error::{StoreError, VaultError};
pub use store::{ChaoticStore, DeletePipeline, MemoryStore, TtlStore};
pub use token::{AuthSession, IssuedToken, TokenConfig};
pub use vault::{FetchedSecret, StoredSecret, Vault};
