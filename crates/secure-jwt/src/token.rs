//! The token entity.
//!
//! A [`SecureJwt`] is the validated in-memory form of a token. Its
//! constructor is the only way to build one, both for fresh issuance and for
//! reconstruction after decoding, so the structural invariants hold for
//! every instance:
//!
//! - `typ` is `"JWT"`
//! - `iat <= nbf <= exp`

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::OffsetDateTime;

use crate::JwtResult;
use crate::claims::CustomClaims;
use crate::error::JwtError;
use crate::ids::{Jti, Nonce};

/// The only supported token type.
pub const TOKEN_TYPE: &str = "JWT";

/// Header projection of a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtHeader {
    /// Signing algorithm.
    pub alg: String,
    /// Key id.
    pub kid: String,
    /// Token type.
    pub typ: String,
}

/// A structurally valid token.
#[derive(Debug, Clone, PartialEq)]
pub struct SecureJwt {
    iss: String,
    custom_claims: CustomClaims,
    iat: i64,
    nbf: i64,
    exp: i64,
    jti: Jti,
    nonce: Nonce,
    alg: String,
    kid: String,
    typ: String,
}

impl SecureJwt {
    /// Builds a token from explicit fields.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::MalformedToken` if `typ` is not `"JWT"`, if
    /// `iat > nbf`, or if `nbf > exp`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        iss: impl Into<String>,
        custom_claims: CustomClaims,
        iat: i64,
        nbf: i64,
        exp: i64,
        jti: Jti,
        nonce: Nonce,
        alg: impl Into<String>,
        kid: impl Into<String>,
        typ: impl Into<String>,
    ) -> JwtResult<Self> {
        let typ = typ.into();
        if typ != TOKEN_TYPE {
            return Err(JwtError::malformed(format!(
                "invalid type (typ) '{typ}', only {TOKEN_TYPE} is supported"
            )));
        }

        if iat > nbf {
            return Err(JwtError::malformed(
                "issued at (iat) must be less than or equal to not before (nbf)",
            ));
        }

        if nbf > exp {
            return Err(JwtError::malformed(
                "not before (nbf) must be less than or equal to expiration (exp)",
            ));
        }

        Ok(Self {
            iss: iss.into(),
            custom_claims,
            iat,
            nbf,
            exp,
            jti,
            nonce,
            alg: alg.into(),
            kid: kid.into(),
            typ,
        })
    }

    /// Builds a fresh token valid from now for `ttl_seconds`, with a new
    /// token id and nonce.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::MalformedToken` if `ttl_seconds` is negative.
    pub fn create_new(
        iss: impl Into<String>,
        kid: impl Into<String>,
        alg: impl Into<String>,
        custom_claims: CustomClaims,
        ttl_seconds: i64,
    ) -> JwtResult<Self> {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        Self::new(
            iss,
            custom_claims,
            now,
            now,
            now.saturating_add(ttl_seconds),
            Jti::generate(),
            Nonce::generate(),
            alg,
            kid,
            TOKEN_TYPE,
        )
    }

    #[must_use]
    pub fn iss(&self) -> &str {
        &self.iss
    }

    #[must_use]
    pub fn iat(&self) -> i64 {
        self.iat
    }

    #[must_use]
    pub fn nbf(&self) -> i64 {
        self.nbf
    }

    #[must_use]
    pub fn exp(&self) -> i64 {
        self.exp
    }

    #[must_use]
    pub fn jti(&self) -> &str {
        self.jti.as_str()
    }

    #[must_use]
    pub fn nonce(&self) -> &str {
        self.nonce.as_str()
    }

    #[must_use]
    pub fn alg(&self) -> &str {
        &self.alg
    }

    #[must_use]
    pub fn kid(&self) -> &str {
        &self.kid
    }

    #[must_use]
    pub fn typ(&self) -> &str {
        &self.typ
    }

    /// Returns the sanitized custom claims.
    #[must_use]
    pub fn custom_claims(&self) -> &CustomClaims {
        &self.custom_claims
    }

    /// Returns the custom claim map.
    #[must_use]
    pub fn claims(&self) -> &Map<String, Value> {
        self.custom_claims.claims()
    }

    /// Returns a single custom claim.
    #[must_use]
    pub fn claim(&self, name: &str) -> Option<&Value> {
        self.custom_claims.get(name)
    }

    /// Returns the payload: protocol claims followed by the custom claims at
    /// the same level.
    #[must_use]
    pub fn payload(&self) -> Map<String, Value> {
        let mut payload = Map::new();
        payload.insert("iss".to_string(), Value::from(self.iss.as_str()));
        payload.insert("iat".to_string(), Value::from(self.iat));
        payload.insert("nbf".to_string(), Value::from(self.nbf));
        payload.insert("exp".to_string(), Value::from(self.exp));
        payload.insert("jti".to_string(), Value::from(self.jti()));
        payload.insert("nonce".to_string(), Value::from(self.nonce()));
        for (name, value) in self.custom_claims.claims() {
            payload
                .entry(name.clone())
                .or_insert_with(|| value.clone());
        }
        payload
    }

    /// Returns the header projection.
    #[must_use]
    pub fn header(&self) -> JwtHeader {
        JwtHeader {
            alg: self.alg.clone(),
            kid: self.kid.clone(),
            typ: self.typ.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn claims() -> CustomClaims {
        [("sub", json!("123")), ("name", json!("Test User"))]
            .into_iter()
            .collect()
    }

    fn build(iat: i64, nbf: i64, exp: i64, typ: &str) -> JwtResult<SecureJwt> {
        SecureJwt::new(
            "test-issuer",
            claims(),
            iat,
            nbf,
            exp,
            Jti::new("unique-id-123"),
            Nonce::new("test-nonce"),
            "HS256",
            "test-key",
            typ,
        )
    }

    #[test]
    fn test_new_with_valid_fields() {
        let jwt = build(100, 100, 400, "JWT").unwrap();

        assert_eq!(jwt.iss(), "test-issuer");
        assert_eq!(jwt.iat(), 100);
        assert_eq!(jwt.nbf(), 100);
        assert_eq!(jwt.exp(), 400);
        assert_eq!(jwt.jti(), "unique-id-123");
        assert_eq!(jwt.nonce(), "test-nonce");
        assert_eq!(jwt.alg(), "HS256");
        assert_eq!(jwt.kid(), "test-key");
        assert_eq!(jwt.typ(), "JWT");
        assert_eq!(jwt.claim("sub"), Some(&json!("123")));
    }

    #[test]
    fn test_invalid_typ_rejected() {
        let err = build(100, 100, 400, "JWE").unwrap_err();
        assert!(matches!(err, JwtError::MalformedToken { .. }));
        assert!(err.to_string().contains("typ"));
    }

    #[test]
    fn test_iat_after_nbf_rejected() {
        let err = build(100, 50, 400, "JWT").unwrap_err();
        assert!(matches!(err, JwtError::MalformedToken { .. }));
        assert!(err.to_string().contains("iat"));
    }

    #[test]
    fn test_nbf_after_exp_rejected() {
        let err = build(100, 500, 400, "JWT").unwrap_err();
        assert!(matches!(err, JwtError::MalformedToken { .. }));
        assert!(err.to_string().contains("nbf"));
    }

    #[test]
    fn test_iat_after_exp_rejected() {
        let err = build(500, 500, 400, "JWT").unwrap_err();
        assert!(matches!(err, JwtError::MalformedToken { .. }));
    }

    #[test]
    fn test_equal_timestamps_allowed() {
        assert!(build(100, 100, 100, "JWT").is_ok());
    }

    #[test]
    fn test_create_new_stamps_times_and_ids() {
        let before = OffsetDateTime::now_utc().unix_timestamp();
        let jwt = SecureJwt::create_new("issuer", "k1", "HS256", claims(), 300).unwrap();
        let after = OffsetDateTime::now_utc().unix_timestamp();

        assert!(jwt.iat() >= before && jwt.iat() <= after);
        assert_eq!(jwt.nbf(), jwt.iat());
        assert_eq!(jwt.exp(), jwt.iat() + 300);
        assert_eq!(jwt.kid(), "k1");
        assert_eq!(jwt.alg(), "HS256");
        assert_eq!(jwt.typ(), TOKEN_TYPE);
        assert!(!jwt.jti().is_empty());
        assert!(!jwt.nonce().is_empty());
        assert_ne!(jwt.jti(), jwt.nonce());
    }

    #[test]
    fn test_create_new_generates_distinct_identifiers() {
        let a = SecureJwt::create_new("issuer", "k1", "HS256", claims(), 300).unwrap();
        let b = SecureJwt::create_new("issuer", "k1", "HS256", claims(), 300).unwrap();
        assert_ne!(a.jti(), b.jti());
        assert_ne!(a.nonce(), b.nonce());
    }

    #[test]
    fn test_create_new_with_negative_ttl_fails() {
        let err = SecureJwt::create_new("issuer", "k1", "HS256", claims(), -1).unwrap_err();
        assert!(matches!(err, JwtError::MalformedToken { .. }));
    }

    #[test]
    fn test_payload_projection() {
        let jwt = build(100, 110, 400, "JWT").unwrap();
        let payload = jwt.payload();

        assert_eq!(
            Value::Object(payload),
            json!({
                "iss": "test-issuer",
                "iat": 100,
                "nbf": 110,
                "exp": 400,
                "jti": "unique-id-123",
                "nonce": "test-nonce",
                "sub": "123",
                "name": "Test User"
            })
        );
    }

    #[test]
    fn test_header_projection() {
        let jwt = build(100, 100, 400, "JWT").unwrap();
        assert_eq!(
            jwt.header(),
            JwtHeader {
                alg: "HS256".to_string(),
                kid: "test-key".to_string(),
                typ: "JWT".to_string(),
            }
        );
    }
}
