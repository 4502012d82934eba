//! Storage contracts for revocation and replay state.
//!
//! Both stores are key-presence-with-expiry: an added key stays observable
//! for at least its ttl and is absent before it is added. The token service
//! never locks anything itself; consistency under concurrent verification is
//! the store's responsibility.
//!
//! # Key layout
//!
//! Stores sharing one keyspace should namespace entries with
//! [`blacklist_key`] and [`nonce_key`]:
//!
//! - `jwt:jti-blacklist:<jti>`
//! - `jwt:nonce:<nonce>`
//!
//! # Implementations
//!
//! - `secure-jwt-memory` - in-process store

pub mod blacklist;
pub mod nonce;

pub use blacklist::BlacklistStorage;
pub use nonce::NonceStorage;

/// Key prefix for revoked token ids.
pub const BLACKLIST_KEY_PREFIX: &str = "jwt:jti-blacklist:";

/// Key prefix for consumed nonces.
pub const NONCE_KEY_PREFIX: &str = "jwt:nonce:";

/// Returns the store key for a revoked token id.
#[must_use]
pub fn blacklist_key(jti: &str) -> String {
    format!("{BLACKLIST_KEY_PREFIX}{jti}")
}

/// Returns the store key for a consumed nonce.
#[must_use]
pub fn nonce_key(nonce: &str) -> String {
    format!("{NONCE_KEY_PREFIX}{nonce}")
}
