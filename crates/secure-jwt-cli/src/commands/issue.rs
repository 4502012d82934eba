use anyhow::{Context, Result};
use secure_jwt::{CustomClaims, JwtConfig, RESERVED_CLAIMS, claims::is_reserved};
use serde_json::{Map, Value};

use super::{build_service, load_key};
use crate::cli::IssueArgs;

pub fn run(config: &JwtConfig, args: &IssueArgs) -> Result<()> {
    let token = issue_token(config, args)?;
    println!("{token}");
    Ok(())
}

pub fn issue_token(config: &JwtConfig, args: &IssueArgs) -> Result<String> {
    let claims = parse_claims(args.claims_json.as_deref(), &args.claims)?;
    let key = load_key(&args.key)?;
    let service = build_service(config)?;

    service
        .issue(claims, &key)
        .context("Failed to issue token")
}

/// Merges `--claims` JSON with `--claim key=value` pairs; pairs win.
fn parse_claims(json: Option<&str>, pairs: &[String]) -> Result<CustomClaims> {
    let mut claims = match json {
        Some(raw) => match serde_json::from_str::<Value>(raw).context("--claims is not valid JSON")? {
            Value::Object(map) => map,
            _ => anyhow::bail!("--claims must be a JSON object"),
        },
        None => Map::new(),
    };

    for pair in pairs {
        let (name, raw) = pair
            .split_once('=')
            .with_context(|| format!("Invalid claim \"{pair}\". Expected format: key=value"))?;
        if name.is_empty() {
            anyhow::bail!("Invalid claim \"{pair}\": empty name");
        }
        // Bare words are strings; anything that parses as JSON keeps its type.
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        claims.insert(name.to_string(), value);
    }

    let dropped: Vec<&str> = claims.keys().map(String::as_str).filter(|k| is_reserved(k)).collect();
    if !dropped.is_empty() {
        tracing::warn!(
            dropped = ?dropped,
            reserved = ?RESERVED_CLAIMS,
            "Reserved claims are ignored"
        );
    }

    Ok(CustomClaims::new(claims))
}
