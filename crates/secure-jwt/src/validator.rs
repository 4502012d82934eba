//! Temporal claim validation.
//!
//! The check is a small state machine evaluated in a fixed order against
//! the current time:
//!
//! 1. `now > exp` - [`ClaimStatus::Expired`]
//! 2. `iat > now` - [`ClaimStatus::IssuedInFuture`]
//! 3. `nbf > now` - [`ClaimStatus::NotYetValid`]
//! 4. otherwise  - [`ClaimStatus::Valid`]

use std::sync::Arc;

use time::OffsetDateTime;

use crate::JwtResult;
use crate::error::JwtError;
use crate::token::SecureJwt;

/// Source of the current time, in seconds since the Unix epoch.
pub trait Clock: Send + Sync {
    fn now(&self) -> i64;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        OffsetDateTime::now_utc().unix_timestamp()
    }
}

/// A clock frozen at a given instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now(&self) -> i64 {
        self.0
    }
}

/// Outcome of a temporal check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimStatus {
    Valid,
    Expired,
    IssuedInFuture,
    NotYetValid,
}

impl ClaimStatus {
    /// Evaluates the temporal claims of `token` at instant `now`.
    #[must_use]
    pub fn evaluate(token: &SecureJwt, now: i64) -> Self {
        if now > token.exp() {
            Self::Expired
        } else if token.iat() > now {
            Self::IssuedInFuture
        } else if token.nbf() > now {
            Self::NotYetValid
        } else {
            Self::Valid
        }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self == Self::Valid
    }

    /// Converts the outcome into a result.
    ///
    /// # Errors
    ///
    /// Returns the matching temporal `JwtError` for any non-valid outcome.
    pub fn into_result(self) -> JwtResult<()> {
        match self {
            Self::Valid => Ok(()),
            Self::Expired => Err(JwtError::Expired),
            Self::IssuedInFuture => Err(JwtError::IssuedInFuture),
            Self::NotYetValid => Err(JwtError::NotYetValid),
        }
    }
}

/// Validates the claims of a decoded token.
pub trait ClaimValidator: Send + Sync {
    /// Returns the outcome of the check without failing.
    fn check(&self, token: &SecureJwt) -> ClaimStatus;

    /// Validates the token.
    ///
    /// # Errors
    ///
    /// Returns `Expired`, `IssuedInFuture` or `NotYetValid`.
    fn validate(&self, token: &SecureJwt) -> JwtResult<()> {
        self.check(token).into_result()
    }

    /// Returns `true` only if the token is currently valid. Never fails.
    fn is_valid(&self, token: &SecureJwt) -> bool {
        self.check(token).is_valid()
    }
}

/// Validator for `exp`, `iat` and `nbf`.
#[derive(Clone)]
pub struct TemporalClaimValidator {
    clock: Arc<dyn Clock>,
}

impl TemporalClaimValidator {
    /// Creates a validator using the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates a validator using the given clock.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

impl Default for TemporalClaimValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TemporalClaimValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemporalClaimValidator")
            .finish_non_exhaustive()
    }
}

impl ClaimValidator for TemporalClaimValidator {
    fn check(&self, token: &SecureJwt) -> ClaimStatus {
        ClaimStatus::evaluate(token, self.clock.now())
    }
}
