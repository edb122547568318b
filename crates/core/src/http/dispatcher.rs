//! Request dispatcher
//!
//! Builds one request, hands it to the [`Transport`] and classifies the
//! outcome. Bodies are encoded by the caller into a [`RequestBody`] before
//! dispatch, so an unencodable body never reaches the transport.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use samplify_domain::constants::{
    ACCEPT_HEADER, AUTHORIZATION_HEADER, CONTENT_TYPE_HEADER, JSON_CONTENT_TYPE,
    REQUEST_ID_HEADER,
};
use samplify_domain::{
    ApiResponse, ErrorResponse, HttpMethod, HttpRequest, HttpResponse, RequestBody, Result,
    SamplifyError,
};
use tracing::{debug, warn};

use super::ports::Transport;

/// Sends single requests through a transport.
#[derive(Clone)]
pub struct Dispatcher {
    transport: Arc<dyn Transport>,
    timeout: Duration,
}

impl Dispatcher {
    /// Dispatcher allowing each transport attempt up to `timeout`.
    pub fn new(transport: Arc<dyn Transport>, timeout: Duration) -> Self {
        Self { transport, timeout }
    }

    /// Send `body` to `url` and classify the response.
    ///
    /// # Errors
    ///
    /// - [`SamplifyError::Api`] for status >= 400, carrying the raw body
    /// - [`SamplifyError::Transport`] when no response was obtained or the
    ///   transport's exchange budget for the configured timeout elapsed
    pub async fn dispatch(
        &self,
        method: HttpMethod,
        url: &str,
        body: &RequestBody,
        access_token: Option<&str>,
    ) -> Result<ApiResponse> {
        let request = build_request(method, url, body.clone(), access_token);
        let budget = self.transport.exchange_budget(self.timeout);

        let response = match tokio::time::timeout(budget, self.transport.send(request)).await {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => {
                warn!(%method, url, error = %err, "transport failure");
                return Err(err);
            }
            Err(_) => {
                warn!(%method, url, timeout_ms = budget.as_millis() as u64, "request timed out");
                return Err(SamplifyError::Transport(format!(
                    "request to {url} timed out after {budget:?}"
                )));
            }
        };

        debug!(
            %method,
            url,
            status = response.status,
            request_id = response.header(REQUEST_ID_HEADER).unwrap_or_default(),
            "HTTP exchange complete"
        );

        classify(response, url)
    }
}

/// Attach the standard headers to a request.
///
/// `Content-Type` is left to the transport for multipart bodies, since it
/// must carry the boundary.
pub fn build_request(
    method: HttpMethod,
    url: &str,
    body: RequestBody,
    access_token: Option<&str>,
) -> HttpRequest {
    let mut headers = vec![(ACCEPT_HEADER.to_string(), JSON_CONTENT_TYPE.to_string())];
    if !body.is_multipart() {
        headers.push((CONTENT_TYPE_HEADER.to_string(), JSON_CONTENT_TYPE.to_string()));
    }
    if let Some(token) = access_token.filter(|t| !t.is_empty()) {
        headers.push((AUTHORIZATION_HEADER.to_string(), format!("Bearer {token}")));
    }

    HttpRequest { method, url: url.to_string(), headers, body }
}

/// Turn a raw response into an [`ApiResponse`] or an API failure.
///
/// # Errors
///
/// [`SamplifyError::Api`] for status >= 400.
pub fn classify(response: HttpResponse, url: &str) -> Result<ApiResponse> {
    let request_id = response.header(REQUEST_ID_HEADER).map(str::to_string);
    let status_line = response.status_line();
    let api_response = ApiResponse { status: response.status, body: response.body, request_id };

    if api_response.status < 400 {
        return Ok(api_response);
    }

    let error = ErrorResponse::from_status(
        Utc::now(),
        api_response.request_id.clone(),
        api_response.status,
        status_line,
        url,
    );
    Err(SamplifyError::api(error, api_response))
}

/// Join a base URL and a path. An empty path targets the base itself.
pub fn join_url(base_url: &str, path: &str) -> String {
    format!("{base_url}{path}")
}
