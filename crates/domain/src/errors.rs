//! Error types used throughout the client

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::types::{ApiResponse, ErrorResponse};

/// Main error type for the Samplify client
#[derive(Error, Debug)]
pub enum SamplifyError {
    /// Unknown environment name or unusable configuration value.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Caller-supplied arguments failed a precondition check.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The refresh token lapsed and the session could not be renewed.
    #[error("Session expired")]
    SessionExpired,

    /// Network or connection failure reported by the transport.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The operation was cancelled by the caller.
    #[error("Operation cancelled")]
    Cancelled,

    /// The server answered with a status code >= 400.
    #[error("{}", .0.error)]
    Api(Box<ApiFailure>),

    /// The request body could not be encoded as JSON.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A response body could not be decoded into the requested type.
    #[error("Decode error: {0}")]
    Decode(String),
}

/// An HTTP failure together with the raw exchange that produced it.
#[derive(Debug, Clone)]
pub struct ApiFailure {
    pub error: ErrorResponse,
    pub response: ApiResponse,
}

impl SamplifyError {
    /// Box an API failure.
    pub fn api(error: ErrorResponse, response: ApiResponse) -> Self {
        Self::Api(Box::new(ApiFailure { error, response }))
    }

    /// HTTP status code for API failures.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api(failure) => Some(failure.error.http_code),
            _ => None,
        }
    }

    /// `true` for an API failure with status 401.
    pub fn is_unauthorized(&self) -> bool {
        self.status_code() == Some(401)
    }

    /// Raw response of an API failure, if any.
    pub fn api_response(&self) -> Option<&ApiResponse> {
        match self {
            Self::Api(failure) => Some(&failure.response),
            _ => None,
        }
    }

    /// Best-effort decode of the error body into a caller-defined schema.
    ///
    /// Returns `None` when this is not an API failure or the body does not
    /// match `T`.
    pub fn decode_body<T: DeserializeOwned>(&self) -> Option<T> {
        self.api_response().and_then(|response| response.decode().ok())
    }

    /// Stable label suitable for structured log fields.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Validation(_) => "validation",
            Self::SessionExpired => "session_expired",
            Self::Transport(_) => "transport",
            Self::Cancelled => "cancelled",
            Self::Api(_) => "api",
            Self::Serialization(_) => "serialization",
            Self::Decode(_) => "decode",
        }
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, SamplifyError>;
