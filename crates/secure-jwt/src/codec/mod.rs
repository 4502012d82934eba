//! Wire codecs.
//!
//! A codec turns a [`SecureJwt`] into its signed wire form and back. The
//! cryptography itself is delegated to an external library; a codec only
//! maps between the token entity and that library.
//!
//! - [`JwtCodec`] - the codec contract
//! - [`JsonWebTokenCodec`] - compact JWS over the `jsonwebtoken` crate

pub mod jwt;

pub use jwt::{JsonWebTokenCodec, UnverifiedToken, decode_unverified};

use crate::JwtResult;
use crate::key::JwtKey;
use crate::token::SecureJwt;

/// Converts tokens to and from their wire representation.
pub trait JwtCodec: Send + Sync {
    /// Serializes and signs a token.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::EncodingFailed` if the key cannot sign the token.
    fn encode(&self, token: &SecureJwt, signing_key: &JwtKey) -> JwtResult<String>;

    /// Verifies the signature of a wire token and rebuilds the entity.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::SignatureInvalid` if the signature does not verify
    /// and `JwtError::MalformedToken` if the token cannot be parsed or its
    /// fields violate the entity invariants.
    fn decode(&self, token: &str, verification_key: &JwtKey) -> JwtResult<SecureJwt>;

    /// Checks the unverified header `kid` against the verification key id.
    ///
    /// No signature work is done here. Unparsable tokens yield `false`.
    fn is_valid_kid(&self, token: &str, verification_key: &JwtKey) -> bool;
}
