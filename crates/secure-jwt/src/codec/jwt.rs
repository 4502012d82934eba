//! Compact JWS codec backed by the `jsonwebtoken` crate.
//!
//! ## Supported Algorithms
//!
//! | Family | Names | Key material |
//! |---|---|---|
//! | HMAC | `HS256`, `HS384`, `HS512` | shared secret |
//! | RSA | `RS256`, `RS384`, `RS512`, `PS256`, `PS384`, `PS512` | PEM |
//! | ECDSA | `ES256`, `ES384` | PEM (PKCS#8) |
//! | EdDSA | `EdDSA` | PEM (PKCS#8) |
//!
//! Signing takes the private PEM, verification the public PEM.
//!
//! Decoding pins the accepted algorithm to the verification key and leaves
//! `exp`/`nbf` alone: temporal validity is the claim validator's job and
//! runs later in the verification pipeline.

use std::str::FromStr;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::Deserialize;
use serde_json::{Map, Value};

use super::JwtCodec;
use crate::JwtResult;
use crate::claims::CustomClaims;
use crate::error::JwtError;
use crate::ids::{Jti, Nonce};
use crate::key::JwtKey;
use crate::token::SecureJwt;

/// Payload as it appears on the wire.
#[derive(Debug, Deserialize)]
struct WireClaims {
    iss: String,
    iat: i64,
    nbf: i64,
    exp: i64,
    jti: String,
    nonce: String,
    #[serde(flatten)]
    custom: Map<String, Value>,
}

/// Codec producing compact `header.payload.signature` tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonWebTokenCodec;

impl JsonWebTokenCodec {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl JwtCodec for JsonWebTokenCodec {
    fn encode(&self, token: &SecureJwt, signing_key: &JwtKey) -> JwtResult<String> {
        if token.alg() != signing_key.algorithm() {
            return Err(JwtError::encoding_failed(format!(
                "token algorithm {} does not match signing key algorithm {}",
                token.alg(),
                signing_key.algorithm()
            )));
        }
        if token.kid() != signing_key.id() {
            return Err(JwtError::encoding_failed(format!(
                "token kid {} does not match signing key {}",
                token.kid(),
                signing_key.id()
            )));
        }

        let algorithm = parse_algorithm(signing_key.algorithm())
            .map_err(|e| JwtError::encoding_failed(e.to_string()))?;
        let encoding_key = encoding_key(signing_key, algorithm)
            .map_err(|e| JwtError::encoding_failed(e.to_string()))?;

        let mut header = Header::new(algorithm);
        header.kid = Some(token.kid().to_string());
        header.typ = Some(token.typ().to_string());

        jsonwebtoken::encode(&header, &token.payload(), &encoding_key)
            .map_err(|e| JwtError::encoding_failed(e.to_string()))
    }

    fn decode(&self, token: &str, verification_key: &JwtKey) -> JwtResult<SecureJwt> {
        let algorithm = parse_algorithm(verification_key.algorithm())?;
        let decoding_key = decoding_key(verification_key, algorithm)
            .map_err(|e| JwtError::malformed(format!("unusable verification key: {e}")))?;

        let mut validation = Validation::new(algorithm);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["iss", "exp", "nbf"]);

        let data = jsonwebtoken::decode::<WireClaims>(token, &decoding_key, &validation)
            .map_err(JwtError::from)?;

        let kid = data
            .header
            .kid
            .ok_or_else(|| JwtError::malformed("missing key id (kid) header"))?;
        let typ = data
            .header
            .typ
            .ok_or_else(|| JwtError::malformed("missing type (typ) header"))?;
        let claims = data.claims;

        SecureJwt::new(
            claims.iss,
            CustomClaims::new(claims.custom),
            claims.iat,
            claims.nbf,
            claims.exp,
            Jti::new(claims.jti),
            Nonce::new(claims.nonce),
            // The validation above only accepts this exact algorithm.
            verification_key.algorithm(),
            kid,
            typ,
        )
    }

    fn is_valid_kid(&self, token: &str, verification_key: &JwtKey) -> bool {
        // Only `kid` is read; an unknown `alg` is left for `decode` to reject.
        let header = token.split_once('.').map_or(token, |(header, _)| header);
        match decode_segment(header, "header") {
            Ok(header) => {
                header.get("kid").and_then(Value::as_str) == Some(verification_key.id())
            }
            Err(e) => {
                tracing::debug!(error = %e, "Unparsable token header");
                false
            }
        }
    }
}

/// Header and payload of a token, read without any signature check.
#[derive(Debug, Clone, PartialEq)]
pub struct UnverifiedToken {
    pub header: Map<String, Value>,
    pub payload: Map<String, Value>,
}

/// Decodes the header and payload segments of a wire token without
/// verifying it. Intended for diagnostics only; nothing in the result is
/// trustworthy.
///
/// # Errors
///
/// Returns `JwtError::MalformedToken` if the token does not have three
/// segments or a segment is not base64url-encoded JSON.
pub fn decode_unverified(token: &str) -> JwtResult<UnverifiedToken> {
    let mut segments = token.split('.');
    let (Some(header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(JwtError::malformed("expected three dot-separated segments"));
    };

    Ok(UnverifiedToken {
        header: decode_segment(header, "header")?,
        payload: decode_segment(payload, "payload")?,
    })
}

fn decode_segment(segment: &str, name: &str) -> JwtResult<Map<String, Value>> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| JwtError::malformed(format!("{name} is not base64url: {e}")))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| JwtError::malformed(format!("{name} is not a JSON object: {e}")))
}

fn parse_algorithm(name: &str) -> JwtResult<Algorithm> {
    Algorithm::from_str(name)
        .map_err(|_| JwtError::malformed(format!("unsupported algorithm: {name}")))
}

fn encoding_key(
    key: &JwtKey,
    algorithm: Algorithm,
) -> Result<EncodingKey, jsonwebtoken::errors::Error> {
    match algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => {
            Ok(EncodingKey::from_secret(key.key()))
        }
        Algorithm::RS256
        | Algorithm::RS384
        | Algorithm::RS512
        | Algorithm::PS256
        | Algorithm::PS384
        | Algorithm::PS512 => EncodingKey::from_rsa_pem(key.key()),
        Algorithm::ES256 | Algorithm::ES384 => EncodingKey::from_ec_pem(key.key()),
        Algorithm::EdDSA => EncodingKey::from_ed_pem(key.key()),
    }
}

fn decoding_key(
    key: &JwtKey,
    algorithm: Algorithm,
) -> Result<DecodingKey, jsonwebtoken::errors::Error> {
    match algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => {
            Ok(DecodingKey::from_secret(key.key()))
        }
        Algorithm::RS256
        | Algorithm::RS384
        | Algorithm::RS512
        | Algorithm::PS256
        | Algorithm::PS384
        | Algorithm::PS512 => DecodingKey::from_rsa_pem(key.key()),
        Algorithm::ES256 | Algorithm::ES384 => DecodingKey::from_ec_pem(key.key()),
        Algorithm::EdDSA => DecodingKey::from_ed_pem(key.key()),
    }
}
