//! Revoked token id storage trait.
//!
//! When a token is revoked its `jti` is stored for the configured
//! revocation retention. Verification consults the store after the
//! signature has been checked, so lookups sit on the hot path and should be
//! cheap.

use std::time::Duration;

use async_trait::async_trait;

use crate::JwtResult;

/// Storage trait for revoked token ids.
///
/// # Example Implementation
///
/// ```ignore
/// use secure_jwt::storage::BlacklistStorage;
/// use secure_jwt::JwtResult;
///
/// struct InMemoryBlacklist {
///     revoked: std::sync::RwLock<std::collections::HashSet<String>>,
/// }
///
/// #[async_trait::async_trait]
/// impl BlacklistStorage for InMemoryBlacklist {
///     async fn add(&self, jti: &str, _ttl: Duration) -> JwtResult<()> {
///         self.revoked.write().unwrap().insert(jti.to_string());
///         Ok(())
///     }
///     // ... other methods
/// }
/// ```
#[async_trait]
pub trait BlacklistStorage: Send + Sync {
    /// Marks a token id as revoked for at least `ttl`.
    ///
    /// # Idempotency
    ///
    /// Revoking an already revoked id succeeds and refreshes its ttl.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Storage` if the storage operation fails.
    async fn add(&self, jti: &str, ttl: Duration) -> JwtResult<()>;

    /// Checks whether a token id is currently revoked.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Storage` if the storage operation fails.
    async fn is_blacklisted(&self, jti: &str) -> JwtResult<bool>;

    /// Lifts a revocation. Removing an id that is not revoked succeeds.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Storage` if the storage operation fails.
    async fn remove(&self, jti: &str) -> JwtResult<()>;
}
