//! HTTP exchanges described as plain data.
//!
//! The core builds [`HttpRequest`] values and classifies [`HttpResponse`]
//! values; a transport adapter performs the actual I/O in between. Owned
//! fields keep both sides free of lifetimes and easy to script in tests.

use std::fmt;

use serde::Serialize;

use crate::errors::{Result, SamplifyError};

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// Upper-case method name as sent on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file plus text fields submitted as `multipart/form-data`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartForm {
    pub file_field: String,
    pub file_name: String,
    pub file: Vec<u8>,
    pub fields: Vec<(String, String)>,
}

/// Request payload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    /// Pre-encoded JSON bytes.
    Json(Vec<u8>),
    Multipart(MultipartForm),
}

impl RequestBody {
    /// Encode an optional value as JSON. `None` yields an empty payload.
    ///
    /// # Errors
    ///
    /// [`SamplifyError::Serialization`] when the value cannot be encoded.
    pub fn json<B: Serialize + ?Sized>(body: Option<&B>) -> Result<Self> {
        match body {
            None => Ok(Self::Empty),
            Some(body) => serde_json::to_vec(body)
                .map(Self::Json)
                .map_err(|e| SamplifyError::Serialization(e.to_string())),
        }
    }

    /// `true` for `multipart/form-data` payloads.
    pub fn is_multipart(&self) -> bool {
        matches!(self, Self::Multipart(_))
    }
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl HttpRequest {
    /// First header value with the given name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// An HTTP response with its body fully read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    /// Canonical reason phrase, e.g. `"Unauthorized"`.
    pub reason: Option<String>,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// First header value with the given name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Status line in the `"401 Unauthorized"` form.
    pub fn status_line(&self) -> String {
        match self.reason.as_deref() {
            Some(reason) if !reason.is_empty() => format!("{} {}", self.status, reason),
            _ => self.status.to_string(),
        }
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers.iter().find(|(key, _)| key.eq_ignore_ascii_case(name)).map(|(_, value)| value.as_str())
}
