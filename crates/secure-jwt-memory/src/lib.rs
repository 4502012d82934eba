//! In-memory revocation and replay storage for secure-jwt.
//!
//! This crate provides [`InMemoryStore`], a key-presence-with-expiry map
//! implementing both [`BlacklistStorage`] and [`NonceStorage`]. Entries are
//! namespaced with the standard key layout, so a single instance can back
//! both roles.
//!
//! State lives in the process: use it for single-node deployments, tests and
//! tooling. Multi-node deployments need a shared store.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use secure_jwt_memory::InMemoryStore;
//!
//! let store = Arc::new(InMemoryStore::new());
//! let service = JwtService::new(config, validator, codec, store.clone(), store)?;
//! ```

pub mod store;

pub use secure_jwt::storage::{BlacklistStorage, NonceStorage};
pub use store::{DEFAULT_SWEEP_THRESHOLD, InMemoryStore};

/// Creates a new shareable in-memory store.
pub fn create_store() -> std::sync::Arc<InMemoryStore> {
    std::sync::Arc::new(InMemoryStore::new())
}
