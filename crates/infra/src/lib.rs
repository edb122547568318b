//! # Samplify Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - The reqwest-backed [`HttpClient`] implementing `samplify_core::Transport`
//! - Configuration loading from environment variables and files
//! - Tracing subscriber setup
//!
//! ## Architecture
//! - Implements traits defined in `samplify-core`
//! - Contains all "impure" code (network I/O, filesystem, global subscriber)

pub mod config;
pub mod errors;
pub mod http;
pub mod observability;

use std::sync::Arc;
use std::time::Duration;

pub use config::Settings;
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use observability::{init_tracing, LogFormat};
use samplify_core::SamplifyClient;
use samplify_domain::{ClientOptions, Credentials, Result};

/// Client over the default HTTP transport, with the per-attempt timeout
/// taken from `options`.
///
/// # Errors
///
/// [`samplify_domain::SamplifyError::Transport`] when the HTTP client cannot
/// be built.
pub fn connect(credentials: Credentials, options: ClientOptions) -> Result<SamplifyClient> {
    let transport = HttpClient::builder().timeout(options.timeout).build()?;
    tracing::debug!(api = %options.api_base_url, "connecting Samplify client");
    Ok(SamplifyClient::new(credentials, options, Arc::new(transport)))
}

/// Client for a named environment (`dev`, `uat` or `prod`).
///
/// # Errors
///
/// [`samplify_domain::SamplifyError::Config`] for any other name, or the
/// errors of [`connect`].
pub fn connect_to_environment(
    credentials: Credentials,
    environment: &str,
    timeout: Option<Duration>,
) -> Result<SamplifyClient> {
    let options = ClientOptions::from_environment_name(environment, timeout)?;
    connect(credentials, options)
}

/// Client configured from loaded [`Settings`].
///
/// # Errors
///
/// As for [`connect`].
pub fn connect_with_settings(settings: &Settings) -> Result<SamplifyClient> {
    connect(settings.credentials(), settings.options())
}
