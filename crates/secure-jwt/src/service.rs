//! Token service: issuance and the verification pipeline.
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use secure_jwt::{JwtConfig, JwtKey, JwtService, JsonWebTokenCodec, TemporalClaimValidator};
//!
//! let service = JwtService::new(
//!     JwtConfig::new("https://auth.example.com"),
//!     Arc::new(TemporalClaimValidator::new()),
//!     Arc::new(JsonWebTokenCodec::new()),
//!     blacklist,
//!     nonces,
//! )?;
//!
//! let key = JwtKey::new("k1", "s3cr3t", "HS256");
//! let token = service.issue(claims, &key)?;
//! let jwt = service.verify(&token, &key).await?;
//! ```
//!
//! # Verification order
//!
//! 1. key binding: header `kid` must name the verification key
//! 2. signature and structure (codec decode)
//! 3. revocation lookup on `jti`
//! 4. atomic claim of the `nonce` in the replay store
//! 5. temporal validity (`exp`, `iat`, `nbf`)
//!
//! The order is fixed. Every later stage assumes the earlier ones already
//! rejected unauthenticated or malformed input. The nonce is consumed before
//! the temporal check, so an authentic but expired token still burns its
//! nonce.

use std::sync::Arc;

use crate::JwtResult;
use crate::claims::CustomClaims;
use crate::codec::JwtCodec;
use crate::config::{ConfigError, JwtConfig};
use crate::error::JwtError;
use crate::key::JwtKey;
use crate::storage::{BlacklistStorage, NonceStorage};
use crate::token::SecureJwt;
use crate::validator::ClaimValidator;

/// Issues and verifies tokens.
///
/// This service is thread-safe (`Send + Sync`) and can be shared across
/// async tasks. All collaborators are injected at construction.
pub struct JwtService {
    /// Service configuration.
    config: JwtConfig,

    /// Temporal claim validator.
    claim_validator: Arc<dyn ClaimValidator>,

    /// Wire codec.
    codec: Arc<dyn JwtCodec>,

    /// Revoked token id storage.
    blacklist: Arc<dyn BlacklistStorage>,

    /// Consumed nonce storage.
    nonces: Arc<dyn NonceStorage>,
}

impl JwtService {
    /// Creates a new token service.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` does not validate.
    pub fn new(
        config: JwtConfig,
        claim_validator: Arc<dyn ClaimValidator>,
        codec: Arc<dyn JwtCodec>,
        blacklist: Arc<dyn BlacklistStorage>,
        nonces: Arc<dyn NonceStorage>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            claim_validator,
            codec,
            blacklist,
            nonces,
        })
    }

    /// Returns the service configuration.
    #[must_use]
    pub fn config(&self) -> &JwtConfig {
        &self.config
    }

    /// Issues a new signed token carrying `custom_claims`.
    ///
    /// The token is stamped with the configured issuer and lifetime and the
    /// key id and algorithm of `signing_key`.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::EncodingFailed` if the codec cannot sign with the
    /// given key.
    pub fn issue(&self, custom_claims: CustomClaims, signing_key: &JwtKey) -> JwtResult<String> {
        let jwt = SecureJwt::create_new(
            self.config.issuer(),
            signing_key.id(),
            signing_key.algorithm(),
            custom_claims,
            self.config.ttl_seconds(),
        )?;

        let token = self.codec.encode(&jwt, signing_key)?;

        tracing::debug!(jti = %jwt.jti(), kid = %jwt.kid(), exp = jwt.exp(), "Token issued");
        Ok(token)
    }

    /// Verifies a wire token and returns the validated entity.
    ///
    /// # Errors
    ///
    /// Returns, from the first failing stage:
    /// - `InvalidKid` if the header names another key
    /// - `SignatureInvalid` or `MalformedToken` from the codec
    /// - `Blacklisted` if the token id is revoked
    /// - `NonceReused` if the nonce was already consumed
    /// - `Expired`, `IssuedInFuture` or `NotYetValid` from the validator
    /// - `Storage` if a store fails
    pub async fn verify(&self, token: &str, verification_key: &JwtKey) -> JwtResult<SecureJwt> {
        // 1. Key binding, before any signature work
        if !self.codec.is_valid_kid(token, verification_key) {
            tracing::warn!(kid = %verification_key.id(), "Token kid does not match verification key");
            return Err(JwtError::InvalidKid);
        }

        // 2. Signature and structure
        let jwt = self
            .codec
            .decode(token, verification_key)
            .inspect_err(|e| {
                if matches!(e, JwtError::SignatureInvalid) {
                    tracing::warn!(kid = %verification_key.id(), "Token signature rejected");
                } else {
                    tracing::debug!(error = %e, "Token could not be decoded");
                }
            })?;

        // 3. Revocation
        if self.blacklist.is_blacklisted(jwt.jti()).await? {
            tracing::debug!(jti = %jwt.jti(), "Token is blacklisted");
            return Err(JwtError::Blacklisted);
        }

        // 4. Replay: check and consume the nonce in one step
        if !self.nonces.claim(jwt.nonce(), self.config.nonce_ttl).await? {
            tracing::warn!(jti = %jwt.jti(), "Token nonce already used (possible replay attempt)");
            return Err(JwtError::NonceReused);
        }

        // 5. Temporal validity
        self.claim_validator.validate(&jwt).inspect_err(|e| {
            tracing::debug!(jti = %jwt.jti(), error = %e, "Token outside its validity window");
        })?;

        tracing::debug!(jti = %jwt.jti(), kid = %jwt.kid(), "Token verified");
        Ok(jwt)
    }

    /// Revokes a token id for the configured revocation retention.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Storage` if the store fails.
    pub async fn revoke(&self, jti: &str) -> JwtResult<()> {
        self.blacklist.add(jti, self.config.blacklist_ttl).await?;
        tracing::info!(jti = %jti, "Token revoked");
        Ok(())
    }

    /// Lifts the revocation of a token id.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Storage` if the store fails.
    pub async fn unrevoke(&self, jti: &str) -> JwtResult<()> {
        self.blacklist.remove(jti).await?;
        tracing::info!(jti = %jti, "Token revocation lifted");
        Ok(())
    }

    /// Returns `true` if the token id is currently revoked.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Storage` if the store fails.
    pub async fn is_revoked(&self, jti: &str) -> JwtResult<bool> {
        self.blacklist.is_blacklisted(jti).await
    }
}
