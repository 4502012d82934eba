//! Token error types.
//!
//! Every failure on the issue and verify paths is a distinct variant so that
//! callers can tell a forged token from a replayed one, or an expired token
//! from a storage outage, without string matching.

use std::fmt;

/// Errors that can occur while issuing or verifying a token.
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// The token is structurally invalid (bad `typ`, broken timestamp
    /// ordering, unparsable segments or missing claims).
    #[error("Malformed token: {message}")]
    MalformedToken {
        /// Description of the structural problem.
        message: String,
    },

    /// The underlying signing primitive refused to produce a token.
    #[error("Failed to encode token: {message}")]
    EncodingFailed {
        /// Description of the encoding error.
        message: String,
    },

    /// The token header names a key other than the verification key.
    #[error("Token kid does not match the verification key")]
    InvalidKid,

    /// The token signature does not verify against the verification key.
    #[error("Invalid signature")]
    SignatureInvalid,

    /// The token id has been revoked.
    #[error("Token is blacklisted")]
    Blacklisted,

    /// The token nonce was already consumed by an earlier verification.
    #[error("Token nonce already used")]
    NonceReused,

    /// The current time is past the token's `exp`.
    #[error("Token expired")]
    Expired,

    /// The token's `iat` lies in the future.
    #[error("Token issued in the future")]
    IssuedInFuture,

    /// The token's `nbf` lies in the future.
    #[error("Token not yet valid")]
    NotYetValid,

    /// The revocation or replay store failed.
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the storage error.
        message: String,
    },
}

impl JwtError {
    /// Creates a new `MalformedToken` error.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedToken {
            message: message.into(),
        }
    }

    /// Creates a new `EncodingFailed` error.
    #[must_use]
    pub fn encoding_failed(message: impl Into<String>) -> Self {
        Self::EncodingFailed {
            message: message.into(),
        }
    }

    /// Creates a new `Storage` error.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Returns `true` for failures of the temporal validity window.
    #[must_use]
    pub fn is_temporal(&self) -> bool {
        matches!(
            self,
            Self::Expired | Self::IssuedInFuture | Self::NotYetValid
        )
    }

    /// Returns `true` for rejections a caller should audit as a possible
    /// attack: key confusion, forged signatures, revoked or replayed tokens.
    #[must_use]
    pub fn is_attack_signal(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Authentication | ErrorCategory::SecurityState
        )
    }

    /// Returns `true` if the same input may succeed on a later attempt.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::NotYetValid | Self::Storage { .. })
    }

    /// Returns the error category for logging/monitoring purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MalformedToken { .. } => ErrorCategory::Structural,
            Self::EncodingFailed { .. } => ErrorCategory::Structural,
            Self::InvalidKid => ErrorCategory::Authentication,
            Self::SignatureInvalid => ErrorCategory::Authentication,
            Self::Blacklisted => ErrorCategory::SecurityState,
            Self::NonceReused => ErrorCategory::SecurityState,
            Self::Expired => ErrorCategory::Temporal,
            Self::IssuedInFuture => ErrorCategory::Temporal,
            Self::NotYetValid => ErrorCategory::Temporal,
            Self::Storage { .. } => ErrorCategory::Infrastructure,
        }
    }

    /// Returns a stable machine-readable code for this error.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedToken { .. } => "malformed_token",
            Self::EncodingFailed { .. } => "encoding_failed",
            Self::InvalidKid => "invalid_kid",
            Self::SignatureInvalid => "signature_invalid",
            Self::Blacklisted => "blacklisted",
            Self::NonceReused => "nonce_reused",
            Self::Expired => "expired",
            Self::IssuedInFuture => "issued_in_future",
            Self::NotYetValid => "not_yet_valid",
            Self::Storage { .. } => "storage_error",
        }
    }
}

impl From<jsonwebtoken::errors::Error> for JwtError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            // A token signed under a different algorithm than the key allows
            // is never authenticated, so it is reported like a bad signature.
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => Self::SignatureInvalid,
            _ => Self::malformed(err.to_string()),
        }
    }
}

/// Categories of token errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The token (or the entity being encoded) violates its structure.
    Structural,
    /// Trust in the token could not be established.
    Authentication,
    /// The token is authentic but explicitly barred.
    SecurityState,
    /// The token is outside its validity window.
    Temporal,
    /// A backing store failed.
    Infrastructure,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structural => write!(f, "structural"),
            Self::Authentication => write!(f, "authentication"),
            Self::SecurityState => write!(f, "security-state"),
            Self::Temporal => write!(f, "temporal"),
            Self::Infrastructure => write!(f, "infrastructure"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = JwtError::malformed("typ must be JWT");
        assert_eq!(err.to_string(), "Malformed token: typ must be JWT");

        assert_eq!(JwtError::NonceReused.to_string(), "Token nonce already used");
        assert_eq!(JwtError::Expired.to_string(), "Token expired");

        let err = JwtError::storage("connection refused");
        assert_eq!(err.to_string(), "Storage error: connection refused");
    }

    #[test]
    fn test_error_category() {
        assert_eq!(
            JwtError::malformed("x").category(),
            ErrorCategory::Structural
        );
        assert_eq!(JwtError::InvalidKid.category(), ErrorCategory::Authentication);
        assert_eq!(
            JwtError::SignatureInvalid.category(),
            ErrorCategory::Authentication
        );
        assert_eq!(JwtError::Blacklisted.category(), ErrorCategory::SecurityState);
        assert_eq!(JwtError::NonceReused.category(), ErrorCategory::SecurityState);
        assert_eq!(JwtError::NotYetValid.category(), ErrorCategory::Temporal);
        assert_eq!(
            JwtError::storage("x").category(),
            ErrorCategory::Infrastructure
        );
    }

    #[test]
    fn test_error_predicates() {
        assert!(JwtError::Expired.is_temporal());
        assert!(JwtError::IssuedInFuture.is_temporal());
        assert!(!JwtError::Blacklisted.is_temporal());

        assert!(JwtError::InvalidKid.is_attack_signal());
        assert!(JwtError::NonceReused.is_attack_signal());
        assert!(!JwtError::Expired.is_attack_signal());
        assert!(!JwtError::storage("down").is_attack_signal());

        assert!(JwtError::NotYetValid.is_retryable());
        assert!(JwtError::storage("down").is_retryable());
        assert!(!JwtError::Expired.is_retryable());
        assert!(!JwtError::malformed("x").is_retryable());
    }

    #[test]
    fn test_error_codes_are_distinct() {
        let errors = [
            JwtError::malformed("x"),
            JwtError::encoding_failed("x"),
            JwtError::InvalidKid,
            JwtError::SignatureInvalid,
            JwtError::Blacklisted,
            JwtError::NonceReused,
            JwtError::Expired,
            JwtError::IssuedInFuture,
            JwtError::NotYetValid,
            JwtError::storage("x"),
        ];
        let codes: std::collections::HashSet<_> = errors.iter().map(JwtError::code).collect();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_error_category_display() {
        assert_eq!(ErrorCategory::Structural.to_string(), "structural");
        assert_eq!(ErrorCategory::SecurityState.to_string(), "security-state");
        assert_eq!(ErrorCategory::Infrastructure.to_string(), "infrastructure");
    }
}
