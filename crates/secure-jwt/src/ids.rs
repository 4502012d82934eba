//! Per-token identifiers.
//!
//! - [`Jti`]: the token id, a UUIDv7 so ids sort by issuance time. Revocation
//!   is keyed on it.
//! - [`Nonce`]: 128 random bits, hex encoded. Consumed once by the replay
//!   store. Independent of the token id.

use std::fmt;

use rand::RngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

/// Number of random bytes in a freshly generated nonce.
pub const NONCE_BYTES: usize = 16;

/// Unique token identifier (`jti` claim).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Jti(String);

impl Jti {
    /// Generates a new time-ordered token id.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::now_v7().to_string())
    }

    /// Wraps an existing token id, e.g. one read back from a decoded token.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Jti {
    fn default() -> Self {
        Self::generate()
    }
}

impl fmt::Display for Jti {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Single-use anti-replay value (`nonce` claim).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Nonce(String);

impl Nonce {
    /// Generates a new random nonce from the operating system RNG.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; NONCE_BYTES];
        OsRng.fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    /// Wraps an existing nonce, e.g. one read back from a decoded token.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the nonce as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Nonce {
    fn default() -> Self {
        Self::generate()
    }
}

impl fmt::Display for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_jti_is_uuid_v7() {
        let jti = Jti::generate();
        let parsed = uuid::Uuid::parse_str(jti.as_str()).unwrap();
        assert_eq!(parsed.get_version_num(), 7);
    }

    #[test]
    fn test_jti_generation_is_unique() {
        let ids: HashSet<_> = (0..1000).map(|_| Jti::generate()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_jti_preserves_explicit_value() {
        let jti = Jti::new("custom-id");
        assert_eq!(jti.as_str(), "custom-id");
        assert_eq!(jti.to_string(), "custom-id");
    }

    #[test]
    fn test_nonce_is_32_hex_chars() {
        let nonce = Nonce::generate();
        assert_eq!(nonce.as_str().len(), NONCE_BYTES * 2);
        assert!(nonce.as_str().chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(nonce.as_str(), nonce.as_str().to_lowercase());
    }

    #[test]
    fn test_nonce_generation_is_unique() {
        let nonces: HashSet<_> = (0..1000).map(|_| Nonce::generate()).collect();
        assert_eq!(nonces.len(), 1000);
    }

    #[test]
    fn test_nonce_preserves_explicit_value() {
        let nonce = Nonce::new("abc123");
        assert_eq!(nonce.as_str(), "abc123");
        assert_eq!(format!("{nonce}"), "abc123");
    }

    #[test]
    fn test_identifiers_serialize_as_plain_strings() {
        let json = serde_json::to_string(&Jti::new("id-1")).unwrap();
        assert_eq!(json, "\"id-1\"");

        let nonce: Nonce = serde_json::from_str("\"n-1\"").unwrap();
        assert_eq!(nonce, Nonce::new("n-1"));
    }
}
