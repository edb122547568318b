//! Outcome of a single API exchange

use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, SamplifyError};

/// Raw body and correlation id of one exchange. Decoding is left to the
/// caller.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Vec<u8>,
    /// Value of the `x-request-id` response header.
    pub request_id: Option<String>,
}

impl ApiResponse {
    /// Decode the body as JSON into `T`.
    ///
    /// # Errors
    ///
    /// [`SamplifyError::Decode`] when the body does not match `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| SamplifyError::Decode(e.to_string()))
    }

    /// Body as UTF-8, with invalid sequences replaced.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// `true` for a zero-length body.
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// A single problem reported for an API failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub path: String,
    pub message: String,
}

/// Diagnostic record built for every response with status >= 400.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub timestamp: DateTime<Utc>,
    pub request_id: Option<String>,
    pub http_code: u16,
    /// Status line, e.g. `"404 Not Found"`.
    pub http_phrase: String,
    pub path: String,
    pub errors: Vec<ErrorDetail>,
}

impl ErrorResponse {
    /// Record with a single detail echoing the status line and path.
    pub fn from_status(
        timestamp: DateTime<Utc>,
        request_id: Option<String>,
        http_code: u16,
        http_phrase: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        let http_phrase = http_phrase.into();
        let path = path.into();
        Self {
            timestamp,
            request_id,
            http_code,
            errors: vec![ErrorDetail { path: path.clone(), message: http_phrase.clone() }],
            http_phrase,
            path,
        }
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "API error {} ({}) at {}", self.http_code, self.http_phrase, self.path)?;
        if let Some(request_id) = &self.request_id {
            write!(f, " [request id {request_id}]")?;
        }
        Ok(())
    }
}

impl std::error::Error for ErrorResponse {}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Project {
        #[serde(rename = "extProjectId")]
        ext_project_id: String,
    }

    #[test]
    fn decodes_json_body() {
        let response = ApiResponse {
            status: 200,
            body: br#"{"extProjectId":"p-1"}"#.to_vec(),
            request_id: None,
        };
        let project: Project = response.decode().unwrap();
        assert_eq!(project, Project { ext_project_id: "p-1".into() });
    }

    #[test]
    fn decode_failure_is_reported() {
        let response = ApiResponse { status: 200, body: b"not json".to_vec(), request_id: None };
        assert!(matches!(response.decode::<Project>(), Err(SamplifyError::Decode(_))));
    }

    #[test]
    fn error_response_carries_one_detail_per_failure() {
        let err = ErrorResponse::from_status(
            Utc::now(),
            Some("req-9".into()),
            404,
            "404 Not Found",
            "http://host/projects/x",
        );
        assert_eq!(err.errors.len(), 1);
        assert_eq!(err.errors[0].path, "http://host/projects/x");
        assert_eq!(err.errors[0].message, "404 Not Found");
        assert!(err.to_string().contains("req-9"));
    }
}
