//! Token service configuration.
//!
//! [`JwtConfig`] is a plain value handed to [`JwtService`](crate::JwtService)
//! at construction. Durations are (de)serialized with `humantime`, so a TOML
//! file can say `ttl = "5m"` or `blacklist_ttl = "30d"`.
//!
//! # Example (TOML)
//!
//! ```toml
//! issuer = "https://auth.example.com"
//! ttl = "5m"
//! nonce_ttl = "24h"
//! blacklist_ttl = "30d"
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default token lifetime: 5 minutes.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 5);

/// Default retention of consumed nonces: 24 hours.
pub const DEFAULT_NONCE_TTL: Duration = Duration::from_secs(60 * 60 * 24);

/// Default retention of revoked token ids: 30 days.
pub const DEFAULT_BLACKLIST_TTL: Duration = Duration::from_secs(60 * 60 * 24 * 30);

/// Configuration for issuing and verifying tokens.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct JwtConfig {
    /// Issuer identity placed in the `iss` claim of every issued token.
    pub issuer: String,

    /// Lifetime of issued tokens (`exp - iat`).
    #[serde(with = "humantime_serde")]
    pub ttl: Duration,

    /// How long a consumed nonce is remembered by the replay store.
    #[serde(with = "humantime_serde")]
    pub nonce_ttl: Duration,

    /// How long a revoked token id is remembered by the revocation store.
    #[serde(with = "humantime_serde")]
    pub blacklist_ttl: Duration,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            issuer: "http://localhost".to_string(),
            ttl: DEFAULT_TTL,
            nonce_ttl: DEFAULT_NONCE_TTL,
            blacklist_ttl: DEFAULT_BLACKLIST_TTL,
        }
    }
}

impl JwtConfig {
    /// Creates a configuration for the given issuer with default lifetimes.
    #[must_use]
    pub fn new(issuer: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
            ..Self::default()
        }
    }

    /// Sets the token lifetime.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Sets the nonce retention.
    #[must_use]
    pub fn with_nonce_ttl(mut self, ttl: Duration) -> Self {
        self.nonce_ttl = ttl;
        self
    }

    /// Sets the revocation retention.
    #[must_use]
    pub fn with_blacklist_ttl(mut self, ttl: Duration) -> Self {
        self.blacklist_ttl = ttl;
        self
    }

    /// Returns the issuer identity.
    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Returns the token lifetime in whole seconds.
    #[must_use]
    pub fn ttl_seconds(&self) -> i64 {
        saturating_secs(self.ttl)
    }

    /// Returns the nonce retention in whole seconds.
    #[must_use]
    pub fn nonce_ttl_seconds(&self) -> i64 {
        saturating_secs(self.nonce_ttl)
    }

    /// Returns the revocation retention in whole seconds.
    #[must_use]
    pub fn blacklist_ttl_seconds(&self) -> i64 {
        saturating_secs(self.blacklist_ttl)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the issuer is empty, and
    /// `ConfigError::InvalidValue` if any lifetime is shorter than one second.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.issuer.trim().is_empty() {
            return Err(ConfigError::Missing("issuer".to_string()));
        }

        for (name, value) in [
            ("ttl", self.ttl),
            ("nonce_ttl", self.nonce_ttl),
            ("blacklist_ttl", self.blacklist_ttl),
        ] {
            if value.as_secs() == 0 {
                return Err(ConfigError::InvalidValue(format!(
                    "{name} must be at least 1 second"
                )));
            }
        }

        Ok(())
    }
}

fn saturating_secs(duration: Duration) -> i64 {
    i64::try_from(duration.as_secs()).unwrap_or(i64::MAX)
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An invalid configuration value was provided.
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    /// A required configuration value is missing.
    #[error("Missing required configuration: {0}")]
    Missing(String),
}
