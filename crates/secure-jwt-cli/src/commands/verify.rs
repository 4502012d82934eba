use anyhow::Result;
use secure_jwt::{JwtConfig, JwtError, SecureJwt};
use serde_json::Value;

use super::{build_service, load_key};
use crate::cli::VerifyArgs;
use crate::output::{print_field, print_json, print_success};

pub async fn run(config: &JwtConfig, args: &VerifyArgs) -> Result<()> {
    match verify_token(config, args).await? {
        Ok(jwt) => {
            print_success(&format!("Token verified (jti {})", jwt.jti()));
            print_json(&Value::Object(jwt.payload()))
        }
        Err(e) => {
            print_field("Code", e.code());
            print_field("Category", &e.category().to_string());
            anyhow::bail!("Verification failed: {e}")
        }
    }
}

/// Runs the verification pipeline against fresh in-memory stores, with the
/// `--revoked` ids blacklisted first.
///
/// The outer error is a setup failure; the inner one is the verdict.
pub async fn verify_token(
    config: &JwtConfig,
    args: &VerifyArgs,
) -> Result<Result<SecureJwt, JwtError>> {
    let key = load_key(&args.key)?;
    let service = build_service(config)?;

    for jti in &args.revoked {
        service.revoke(jti).await?;
    }

    Ok(service.verify(&args.token, &key).await)
}
