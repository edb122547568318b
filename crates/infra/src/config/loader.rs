//! Configuration loader
//!
//! Loads client settings from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `SAMPLIFY_CLIENT_ID`, `SAMPLIFY_USERNAME`, `SAMPLIFY_PASSWORD`: credentials (required)
//! - `SAMPLIFY_ENV`: `dev`, `uat` or `prod` (default `uat`)
//! - `SAMPLIFY_TIMEOUT_SECS`: request timeout in seconds
//! - `SAMPLIFY_API_BASE_URL`, `SAMPLIFY_AUTH_URL`, `SAMPLIFY_STATUS_URL`,
//!   `SAMPLIFY_GATEWAY_URL`: per-endpoint overrides of the environment preset
//!
//! ## File Locations
//! `./samplify.toml`, then `./samplify.json` in the current working directory.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use samplify_domain::{ClientOptions, Credentials, Environment, Result, SamplifyError};
use serde::Deserialize;

/// Everything needed to build a connected client.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub environment: Option<Environment>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub auth_url: Option<String>,
    #[serde(default)]
    pub status_url: Option<String>,
    #[serde(default)]
    pub gateway_url: Option<String>,
    pub client_id: String,
    pub username: String,
    pub password: String,
}

impl Settings {
    /// Credentials for the password grant.
    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.client_id, &self.username, &self.password)
    }

    /// Environment preset with any URL overrides and timeout applied.
    pub fn options(&self) -> ClientOptions {
        let preset = ClientOptions::for_environment(self.environment.unwrap_or(Environment::Uat));
        let pick = |custom: &Option<String>, fallback: &str| {
            custom.clone().unwrap_or_else(|| fallback.to_string())
        };

        let options = ClientOptions::new(
            pick(&self.api_base_url, &preset.api_base_url),
            pick(&self.auth_url, &preset.auth_url),
            pick(&self.status_url, &preset.status_url),
            pick(&self.gateway_url, &preset.gateway_url),
        );

        match self.timeout_secs {
            Some(secs) if secs > 0 => options.with_timeout(Duration::from_secs(secs)),
            _ => options,
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("environment", &self.environment)
            .field("timeout_secs", &self.timeout_secs)
            .field("api_base_url", &self.api_base_url)
            .field("auth_url", &self.auth_url)
            .field("status_url", &self.status_url)
            .field("gateway_url", &self.gateway_url)
            .field("client_id", &self.client_id)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Credential variables; setting any of them selects the environment source.
const CREDENTIAL_VARS: [&str; 3] = ["SAMPLIFY_CLIENT_ID", "SAMPLIFY_USERNAME", "SAMPLIFY_PASSWORD"];

/// Load settings from the environment, or from a file when no credential
/// variable is set.
///
/// # Errors
/// Returns `SamplifyError::Config` if the environment is only partly
/// configured, holds an unparsable value, or no config file is usable.
pub fn load() -> Result<Settings> {
    if CREDENTIAL_VARS.iter().all(|name| optional_env(name).is_none()) {
        tracing::debug!("No credentials in environment, trying config file");
        return load_from_file(None);
    }

    let settings = load_from_env()?;
    tracing::info!("Configuration loaded from environment variables");
    Ok(settings)
}

/// Load settings from `SAMPLIFY_*` environment variables
///
/// # Errors
/// Returns `SamplifyError::Config` if a credential is missing or a value
/// cannot be parsed.
pub fn load_from_env() -> Result<Settings> {
    let client_id = env_var("SAMPLIFY_CLIENT_ID")?;
    let username = env_var("SAMPLIFY_USERNAME")?;
    let password = env_var("SAMPLIFY_PASSWORD")?;

    let environment = optional_env("SAMPLIFY_ENV").map(|s| s.parse::<Environment>()).transpose()?;
    let timeout_secs = optional_env("SAMPLIFY_TIMEOUT_SECS")
        .map(|s| {
            s.trim()
                .parse::<u64>()
                .map_err(|e| SamplifyError::Config(format!("Invalid timeout: {}", e)))
        })
        .transpose()?;

    Ok(Settings {
        environment,
        timeout_secs,
        api_base_url: optional_env("SAMPLIFY_API_BASE_URL"),
        auth_url: optional_env("SAMPLIFY_AUTH_URL"),
        status_url: optional_env("SAMPLIFY_STATUS_URL"),
        gateway_url: optional_env("SAMPLIFY_GATEWAY_URL"),
        client_id,
        username,
        password,
    })
}

/// Load settings from a file
///
/// If `path` is `None`, searches the standard locations. Format is detected by
/// file extension.
///
/// # Errors
/// Returns `SamplifyError::Config` if the file is missing, unreadable or
/// malformed.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Settings> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(SamplifyError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => find_config_file().ok_or_else(|| {
            SamplifyError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| SamplifyError::Config(format!("Failed to read config file: {}", e)))?;

    parse_settings(&contents, &config_path)
}

fn parse_settings(contents: &str, path: &Path) -> Result<Settings> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| SamplifyError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| SamplifyError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(SamplifyError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// First existing config file among the standard locations.
pub fn find_config_file() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    [cwd.join("samplify.toml"), cwd.join("samplify.json")].into_iter().find(|path| path.exists())
}

fn env_var(key: &str) -> Result<String> {
    optional_env(key).ok_or_else(|| {
        SamplifyError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Unset and blank values both count as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}
