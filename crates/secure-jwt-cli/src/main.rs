mod cli;
mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};
use output::print_error;

#[tokio::main]
async fn main() {
    // .env is optional
    if let Err(e) = dotenvy::dotenv() {
        if !matches!(e, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
        {
            print_error(&format!("Failed to load .env file: {e}"));
        }
    }

    if let Err(e) = run().await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(cli.config.as_deref())?;

    init_tracing(&cfg.logging.level, cli.verbose);
    tracing::debug!(issuer = %cfg.jwt.issuer(), ttl = cfg.jwt.ttl_seconds(), "Configuration loaded");

    match &cli.command {
        Commands::Issue(args) => commands::issue::run(&cfg.jwt, args)?,
        Commands::Verify(args) => commands::verify::run(&cfg.jwt, args).await?,
        Commands::Inspect(args) => commands::inspect::run(args)?,
    }

    Ok(())
}

/// Installs the stderr log subscriber. `--verbose` wins over `RUST_LOG`,
/// which wins over the configured level.
fn init_tracing(level: &str, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        std::env::var("RUST_LOG")
            .ok()
            .and_then(|_| EnvFilter::try_from_default_env().ok())
            .unwrap_or_else(|| EnvFilter::new(level))
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
