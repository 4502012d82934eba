//! # secure-jwt
//!
//! Signed, short-lived tokens guarded against replay and revocation.
//!
//! This crate provides:
//! - A token entity whose structural invariants hold for every instance
//! - Custom claims that can never override protocol fields
//! - A pluggable wire codec, with a compact JWS codec over `jsonwebtoken`
//! - A temporal claim validator
//! - Storage contracts for revoked token ids and consumed nonces
//! - A token service sequencing the verification pipeline
//!
//! ## Overview
//!
//! Issuing builds a fresh [`SecureJwt`] (new `jti`, new `nonce`,
//! `iat = nbf = now`, `exp = now + ttl`) and encodes it. Verifying runs key
//! binding, signature, revocation, replay and temporal checks in that order
//! and stops at the first failure with a distinct [`JwtError`].
//!
//! ## Modules
//!
//! - [`config`] - Issuer and lifetime configuration
//! - [`error`] - Error taxonomy
//! - [`ids`] - Token id and nonce generation
//! - [`key`] - Signing and verification keys
//! - [`claims`] - Custom claim sanitization
//! - [`token`] - The token entity
//! - [`codec`] - Wire encoding and decoding
//! - [`validator`] - Temporal claim validation
//! - [`storage`] - Revocation and replay store contracts
//! - [`service`] - Issuance and verification

pub mod claims;
pub mod codec;
pub mod config;
pub mod error;
pub mod ids;
pub mod key;
pub mod service;
pub mod storage;
pub mod token;
pub mod validator;

pub use claims::{CustomClaims, RESERVED_CLAIMS};
pub use codec::{JsonWebTokenCodec, JwtCodec, UnverifiedToken, decode_unverified};
pub use config::{ConfigError, JwtConfig};
pub use error::{ErrorCategory, JwtError};
pub use ids::{Jti, Nonce};
pub use key::JwtKey;
pub use service::JwtService;
pub use storage::{BlacklistStorage, NonceStorage};
pub use token::{JwtHeader, SecureJwt, TOKEN_TYPE};
pub use validator::{
    ClaimStatus, ClaimValidator, Clock, FixedClock, SystemClock, TemporalClaimValidator,
};

/// Type alias for token operation results.
pub type JwtResult<T> = Result<T, JwtError>;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use secure_jwt::prelude::*;
/// ```
pub mod prelude {
    pub use crate::JwtResult;
    pub use crate::claims::CustomClaims;
    pub use crate::codec::{JsonWebTokenCodec, JwtCodec};
    pub use crate::config::{ConfigError, JwtConfig};
    pub use crate::error::{ErrorCategory, JwtError};
    pub use crate::key::JwtKey;
    pub use crate::service::JwtService;
    pub use crate::storage::{BlacklistStorage, NonceStorage};
    pub use crate::token::SecureJwt;
    pub use crate::validator::{ClaimValidator, TemporalClaimValidator};
}
