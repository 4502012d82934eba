//! Caller-supplied claims.
//!
//! Custom claims are merged into the token payload next to the protocol
//! claims. Any key that collides with a protocol field is dropped on
//! construction, silently, so a caller can never override `iss`, `exp`,
//! `jti`, `nonce` and friends.

use serde_json::{Map, Value};

/// Claim and header names reserved by the protocol.
pub const RESERVED_CLAIMS: [&str; 9] = [
    "iss", "exp", "nbf", "iat", "jti", "nonce", "typ", "alg", "kid",
];

/// Returns `true` if `name` is a reserved protocol field.
#[must_use]
pub fn is_reserved(name: &str) -> bool {
    RESERVED_CLAIMS.contains(&name)
}

/// Sanitized custom claims.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomClaims {
    claims: Map<String, Value>,
}

impl CustomClaims {
    /// Builds a claim set, removing every reserved key.
    #[must_use]
    pub fn new(claims: Map<String, Value>) -> Self {
        let claims = claims
            .into_iter()
            .filter(|(name, _)| !is_reserved(name))
            .collect();
        Self { claims }
    }

    /// Returns the value of a claim, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.claims.get(name)
    }

    /// Returns the full sanitized claim map.
    #[must_use]
    pub fn claims(&self) -> &Map<String, Value> {
        &self.claims
    }

    /// Consumes the set, returning the sanitized claim map.
    #[must_use]
    pub fn into_claims(self) -> Map<String, Value> {
        self.claims
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.claims.len()
    }
}

impl From<Map<String, Value>> for CustomClaims {
    fn from(claims: Map<String, Value>) -> Self {
        Self::new(claims)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for CustomClaims {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
