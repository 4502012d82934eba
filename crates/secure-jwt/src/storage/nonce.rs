//! Consumed nonce storage trait for replay prevention.
//!
//! # Implementation Notes
//!
//! The `claim` method must atomically check and mark a nonce as used. The
//! token service relies on it alone, so two concurrent verifications of the
//! same token can never both succeed.

use std::time::Duration;

use async_trait::async_trait;

use crate::JwtResult;

/// Storage trait for consumed nonces.
#[async_trait]
pub trait NonceStorage: Send + Sync {
    /// Records a nonce as used for at least `ttl`, unconditionally.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Storage` if the storage operation fails.
    async fn add(&self, nonce: &str, ttl: Duration) -> JwtResult<()>;

    /// Checks whether a nonce has been used.
    ///
    /// Note: prefer `claim`, which checks and marks in one step.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Storage` if the storage operation fails.
    async fn is_used(&self, nonce: &str) -> JwtResult<bool>;

    /// Atomically records a nonce as used if it is not already.
    ///
    /// Returns `true` if this call consumed the nonce, or `false` if it had
    /// already been used (replay detected).
    ///
    /// # Atomicity
    ///
    /// Implementations must make check and insert a single step, for example
    /// `SET key 1 NX EX ttl` on Redis or `INSERT ... ON CONFLICT DO NOTHING`
    /// on SQL.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Storage` if the storage operation fails.
    async fn claim(&self, nonce: &str, ttl: Duration) -> JwtResult<bool>;
}
