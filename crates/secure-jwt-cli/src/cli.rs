use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "securejwt")]
#[command(about = "SecureJWT CLI: issue, verify and inspect signed tokens")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the configuration file (defaults to securejwt.toml if present)
    #[arg(short, long, global = true, env = "SECUREJWT_CONFIG")]
    pub config: Option<String>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Issue a new signed token
    Issue(IssueArgs),
    /// Verify a token (signature, revocation, replay and validity window)
    Verify(VerifyArgs),
    /// Show the header and payload of a token without verifying it
    Inspect(InspectArgs),
}

/// Key selection shared by `issue` and `verify`.
#[derive(Args)]
pub struct KeyArgs {
    /// Key id, written to and checked against the `kid` header
    #[arg(long)]
    pub kid: String,
    /// Signing algorithm (HS256, HS384, HS512, RS256, PS256, ES256, EdDSA, ...)
    #[arg(long, default_value = "HS256")]
    pub alg: String,
    /// Shared secret for HMAC algorithms
    #[arg(long, env = "SECUREJWT_SECRET", conflicts_with = "key_file", required_unless_present = "key_file")]
    pub secret: Option<String>,
    /// PEM key file for RSA, ECDSA and EdDSA algorithms (private to issue, public to verify)
    #[arg(long)]
    pub key_file: Option<String>,
}

#[derive(Args)]
pub struct IssueArgs {
    #[command(flatten)]
    pub key: KeyArgs,
    /// Custom claim as key=value; the value is parsed as JSON when possible (repeatable)
    #[arg(long = "claim", value_name = "KEY=VALUE")]
    pub claims: Vec<String>,
    /// Custom claims as a JSON object
    #[arg(long = "claims", value_name = "JSON")]
    pub claims_json: Option<String>,
}

#[derive(Args)]
pub struct VerifyArgs {
    /// Wire token
    pub token: String,
    #[command(flatten)]
    pub key: KeyArgs,
    /// Token id to treat as revoked (repeatable)
    #[arg(long = "revoked", value_name = "JTI")]
    pub revoked: Vec<String>,
}

#[derive(Args)]
pub struct InspectArgs {
    /// Wire token
    pub token: String,
}
