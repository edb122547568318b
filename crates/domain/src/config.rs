//! Client configuration
//!
//! Named environments map to immutable [`ClientOptions`] values. There is no
//! process-wide default: every client owns the options it was built with.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_TIMEOUT_SECS;
use crate::errors::{Result, SamplifyError};

/// One of the three deployments the API is published to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Dev,
    Uat,
    Prod,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dev => write!(f, "dev"),
            Self::Uat => write!(f, "uat"),
            Self::Prod => write!(f, "prod"),
        }
    }
}

impl FromStr for Environment {
    type Err = SamplifyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "dev" => Ok(Self::Dev),
            "uat" => Ok(Self::Uat),
            "prod" => Ok(Self::Prod),
            other => Err(SamplifyError::Config(format!(
                "unknown environment '{other}': one of dev/uat/prod only are allowed"
            ))),
        }
    }
}

/// Which configured base URL a request is sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Api,
    Auth,
    Status,
    Gateway,
}

/// Base URLs and timeout used by a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    pub api_base_url: String,
    pub auth_url: String,
    pub status_url: String,
    pub gateway_url: String,
    /// Allowed for each transport attempt.
    pub timeout: Duration,
}

impl ClientOptions {
    /// Build options from explicit URLs with the default timeout.
    ///
    /// URLs are trimmed of surrounding whitespace and trailing slashes.
    pub fn new(
        api_base_url: impl Into<String>,
        auth_url: impl Into<String>,
        status_url: impl Into<String>,
        gateway_url: impl Into<String>,
    ) -> Self {
        Self {
            api_base_url: normalize_url(api_base_url.into()),
            auth_url: normalize_url(auth_url.into()),
            status_url: normalize_url(status_url.into()),
            gateway_url: normalize_url(gateway_url.into()),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Development environment.
    pub fn dev() -> Self {
        Self::new(
            "https://api.dev.pe.dynata.com/sample/v1",
            "https://api.dev.pe.dynata.com/auth/v1",
            "https://api.dev.pe.dynata.com/status",
            "https://api.dev.pe.dynata.com/status/gateway",
        )
    }

    /// User acceptance environment, the default.
    pub fn uat() -> Self {
        Self::new(
            "https://api.uat.pe.dynata.com/sample/v1",
            "https://api.uat.pe.dynata.com/auth/v1",
            "https://api.uat.pe.dynata.com/status",
            "https://api.uat.pe.dynata.com/status/gateway",
        )
    }

    /// Production environment.
    pub fn prod() -> Self {
        Self::new(
            "https://api.researchnow.com/sample/v1",
            "https://api.researchnow.com/auth/v1",
            "https://api.researchnow.com/status",
            "https://api.researchnow.com/status/gateway",
        )
    }

    /// Preset for `environment`.
    pub fn for_environment(environment: Environment) -> Self {
        match environment {
            Environment::Dev => Self::dev(),
            Environment::Uat => Self::uat(),
            Environment::Prod => Self::prod(),
        }
    }

    /// Resolve a named environment; unknown names fail with a configuration
    /// error. A missing or zero timeout falls back to the default.
    ///
    /// # Errors
    ///
    /// [`SamplifyError::Config`] for names other than `dev`, `uat` or `prod`.
    pub fn from_environment_name(name: &str, timeout: Option<Duration>) -> Result<Self> {
        let environment: Environment = name.parse()?;
        let options = Self::for_environment(environment);
        Ok(match timeout {
            Some(timeout) if !timeout.is_zero() => options.with_timeout(timeout),
            _ => options,
        })
    }

    /// Replace the timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Base URL for `endpoint`.
    pub fn base_url(&self, endpoint: Endpoint) -> &str {
        match endpoint {
            Endpoint::Api => &self.api_base_url,
            Endpoint::Auth => &self.auth_url,
            Endpoint::Status => &self.status_url,
            Endpoint::Gateway => &self.gateway_url,
        }
    }
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self::uat()
    }
}

fn normalize_url(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}
