//! Signing and verification key material.

use std::fmt;

/// A key id, its key material and the algorithm it is used with.
///
/// The same type serves both roles: for HMAC algorithms the material is the
/// shared secret, for asymmetric algorithms it is the PEM-encoded private key
/// when signing and the PEM-encoded public key when verifying. The algorithm
/// name is not checked here; the codec rejects names it does not support.
#[derive(Clone, PartialEq, Eq)]
pub struct JwtKey {
    id: String,
    key: Vec<u8>,
    algorithm: String,
}

impl JwtKey {
    /// Creates a new key.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        key: impl Into<Vec<u8>>,
        algorithm: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            key: key.into(),
            algorithm: algorithm.into(),
        }
    }

    /// Returns the key id (`kid`).
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the raw key material.
    #[must_use]
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    /// Returns the algorithm name (`alg`), e.g. `HS256`.
    #[must_use]
    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }
}

impl fmt::Debug for JwtKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtKey")
            .field("id", &self.id)
            .field("key", &"[REDACTED]")
            .field("algorithm", &self.algorithm)
            .finish()
    }
}
