use anyhow::{Context, Result};
use secure_jwt::decode_unverified;
use serde_json::{Map, Value, json};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::cli::InspectArgs;
use crate::output::{print_field, print_json};

/// Prints the header and payload without any signature or state check.
pub fn run(args: &InspectArgs) -> Result<()> {
    let parts = decode_unverified(&args.token).context("Failed to decode token")?;

    for (label, claim) in [("Issued at", "iat"), ("Not before", "nbf"), ("Expires", "exp")] {
        if let Some(formatted) = format_timestamp(&parts.payload, claim) {
            print_field(label, &formatted);
        }
    }

    print_json(&json!({
        "header": parts.header,
        "payload": parts.payload,
    }))
}

fn format_timestamp(payload: &Map<String, Value>, claim: &str) -> Option<String> {
    let ts = payload.get(claim)?.as_i64()?;
    let at = OffsetDateTime::from_unix_timestamp(ts).ok()?;
    at.format(&Rfc3339).ok()
}
