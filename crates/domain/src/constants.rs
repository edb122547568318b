//! Client constants
//!
//! Centralized location for protocol-level constants shared by every layer.

/// Request timeout applied when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

// Auth endpoints, relative to the auth base URL
/// Password grant.
pub const TOKEN_PASSWORD_PATH: &str = "/token/password";
/// Refresh grant.
pub const TOKEN_REFRESH_PATH: &str = "/token/refresh";
/// Session revocation.
pub const LOGOUT_PATH: &str = "/logout";

// Headers
/// Correlation id echoed by the server.
pub const REQUEST_ID_HEADER: &str = "x-request-id";
/// `Accept` header name.
pub const ACCEPT_HEADER: &str = "Accept";
/// `Content-Type` header name.
pub const CONTENT_TYPE_HEADER: &str = "Content-Type";
/// Carries `Bearer <access token>`.
pub const AUTHORIZATION_HEADER: &str = "Authorization";
/// Media type for every non-multipart request.
pub const JSON_CONTENT_TYPE: &str = "application/json";

// Multipart field names for file uploads
/// Form field holding the uploaded file.
pub const MULTIPART_FILE_FIELD: &str = "file";
/// Form field holding the free-text message.
pub const MULTIPART_MESSAGE_FIELD: &str = "message";
