//! Layered CLI configuration: optional TOML file, then `SECUREJWT__*`
//! environment overrides (e.g. `SECUREJWT__JWT__ISSUER`,
//! `SECUREJWT__JWT__TTL=10m`, `SECUREJWT__LOGGING__LEVEL=info`).

use std::path::PathBuf;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use secure_jwt::JwtConfig;
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "securejwt.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub jwt: JwtConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Loads configuration from `path`, or from `securejwt.toml` if it exists.
///
/// An explicit path must exist; the default file is optional.
pub fn load_config(path: Option<&str>) -> Result<AppConfig> {
    let mut builder = Config::builder();
    match path {
        Some(p) => {
            builder = builder.add_source(File::from(PathBuf::from(p)).required(true));
        }
        None => {
            builder = builder.add_source(File::from(PathBuf::from(DEFAULT_CONFIG_FILE)).required(false));
        }
    }
    builder = builder.add_source(Environment::with_prefix("SECUREJWT").separator("__"));

    let cfg = builder.build().context("Failed to read configuration")?;
    let merged: AppConfig = cfg
        .try_deserialize()
        .context("Invalid configuration")?;
    merged
        .jwt
        .validate()
        .context("Invalid token configuration")?;
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_from_file() {
        let file = write_config(
            r#"
[jwt]
issuer = "https://auth.example.com"
ttl = "10m"
nonce_ttl = "1h"

[logging]
level = "info"
"#,
        );

        let cfg = load_config(file.path().to_str()).unwrap();
        assert_eq!(cfg.jwt.issuer(), "https://auth.example.com");
        assert_eq!(cfg.jwt.ttl, Duration::from_secs(600));
        assert_eq!(cfg.jwt.nonce_ttl, Duration::from_secs(3600));
        assert_eq!(cfg.jwt.blacklist_ttl_seconds(), 2_592_000);
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let file = write_config("");

        let cfg = load_config(file.path().to_str()).unwrap();
        assert_eq!(cfg.jwt.issuer(), "http://localhost");
        assert_eq!(cfg.jwt.ttl_seconds(), 300);
        assert_eq!(cfg.logging.level, "warn");
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        assert!(load_config(Some("/nonexistent/securejwt.toml")).is_err());
    }

    #[test]
    fn test_invalid_values_fail() {
        let file = write_config("[jwt]\nissuer = \"\"\n");
        let err = load_config(file.path().to_str()).unwrap_err();
        assert!(format!("{err:#}").contains("issuer"));

        let file = write_config("[jwt]\nttl = \"0s\"\n");
        assert!(load_config(file.path().to_str()).is_err());

        let file = write_config("[jwt]\nttl = \"soon\"\n");
        assert!(load_config(file.path().to_str()).is_err());
    }
}
