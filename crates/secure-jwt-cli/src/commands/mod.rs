pub mod inspect;
pub mod issue;
pub mod verify;

use std::fs;
use std::sync::Arc;

use anyhow::{Context, Result};
use secure_jwt::{JsonWebTokenCodec, JwtConfig, JwtKey, JwtService, TemporalClaimValidator};
use secure_jwt_memory::InMemoryStore;

use crate::cli::KeyArgs;

/// Builds the key from `--secret` or the contents of `--key-file`.
pub fn load_key(args: &KeyArgs) -> Result<JwtKey> {
    let material = match (&args.secret, &args.key_file) {
        (Some(secret), _) => secret.clone().into_bytes(),
        (None, Some(path)) => {
            fs::read(path).with_context(|| format!("Failed to read key file: {path}"))?
        }
        (None, None) => anyhow::bail!("Either --secret or --key-file is required"),
    };
    Ok(JwtKey::new(&args.kid, material, &args.alg))
}

/// Builds a service backed by a fresh in-memory store for both revocation
/// and replay state.
pub fn build_service(config: &JwtConfig) -> Result<JwtService> {
    let store = Arc::new(InMemoryStore::new());
    JwtService::new(
        config.clone(),
        Arc::new(TemporalClaimValidator::new()),
        Arc::new(JsonWebTokenCodec::new()),
        store.clone(),
        store,
    )
    .context("Invalid token configuration")
}
