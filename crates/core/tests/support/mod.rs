//! Shared test helpers for `samplify-core` integration tests.
//!
//! [`ScriptedTransport`] plays a small auth server (password and refresh
//! grants, logout) and hands every other request to a test-provided
//! handler. All requests are recorded so tests can assert which endpoints
//! were hit and with which bearer token.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use samplify_core::{SamplifyClient, Transport};
use samplify_domain::{
    ClientOptions, Credentials, HttpRequest, HttpResponse, RequestBody, Result as DomainResult,
};

pub const API_URL: &str = "http://samplify.test/sample/v1";
pub const AUTH_URL: &str = "http://samplify.test/auth/v1";
pub const STATUS_URL: &str = "http://samplify.test/status";
pub const GATEWAY_URL: &str = "http://samplify.test/status/gateway";

pub const PASSWORD_GRANT_URL: &str = "http://samplify.test/auth/v1/token/password";
pub const REFRESH_GRANT_URL: &str = "http://samplify.test/auth/v1/token/refresh";
pub const LOGOUT_URL: &str = "http://samplify.test/auth/v1/logout";

pub fn options() -> ClientOptions {
    ClientOptions::new(API_URL, AUTH_URL, STATUS_URL, GATEWAY_URL)
}

pub fn credentials() -> Credentials {
    Credentials::new("client-1", "alice", "s3cret")
}

pub fn client(transport: Arc<ScriptedTransport>) -> SamplifyClient {
    SamplifyClient::new(credentials(), options(), transport)
}

pub fn json(status: u16, body: &str) -> HttpResponse {
    HttpResponse {
        status,
        reason: Some(reason(status).to_string()),
        headers: vec![
            ("content-type".into(), "application/json".into()),
            ("x-request-id".into(), format!("req-{status}")),
        ],
        body: body.as_bytes().to_vec(),
    }
}

pub fn status(code: u16) -> HttpResponse {
    json(code, "")
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        204 => "No Content",
        400 => "Bad Request",
        401 => "Unauthorized",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "",
    }
}

type Handler = dyn Fn(&HttpRequest, usize) -> DomainResult<HttpResponse> + Send + Sync;

/// In-memory transport with a built-in auth server.
pub struct ScriptedTransport {
    handler: Box<Handler>,
    requests: Mutex<Vec<HttpRequest>>,
    api_calls: AtomicUsize,
    password_grants: AtomicUsize,
    refresh_grants: AtomicUsize,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
    password_status: u16,
    refresh_status: u16,
    delay: Option<Duration>,
}

impl ScriptedTransport {
    /// `handler` receives every non-auth request with its zero-based index.
    pub fn new(
        handler: impl Fn(&HttpRequest, usize) -> DomainResult<HttpResponse> + Send + Sync + 'static,
    ) -> Self {
        Self {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
            api_calls: AtomicUsize::new(0),
            password_grants: AtomicUsize::new(0),
            refresh_grants: AtomicUsize::new(0),
            access_ttl_secs: 3600,
            refresh_ttl_secs: 7200,
            password_status: 200,
            refresh_status: 200,
            delay: None,
        }
    }

    /// Transport whose API calls all answer `200 {}`.
    pub fn ok() -> Self {
        Self::new(|_, _| Ok(json(200, "{}")))
    }

    /// Lifetimes, in seconds, of the tokens handed out by both grants.
    pub fn with_token_ttls(mut self, access_secs: i64, refresh_secs: i64) -> Self {
        self.access_ttl_secs = access_secs;
        self.refresh_ttl_secs = refresh_secs;
        self
    }

    pub fn with_password_status(mut self, status: u16) -> Self {
        self.password_status = status;
        self
    }

    pub fn with_refresh_status(mut self, status: u16) -> Self {
        self.refresh_status = status;
        self
    }

    /// Sleep before answering every request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, url: &str) -> Vec<HttpRequest> {
        self.requests().into_iter().filter(|r| r.url == url).collect()
    }

    pub fn hits(&self, url: &str) -> usize {
        self.requests_to(url).len()
    }

    pub fn password_grants(&self) -> usize {
        self.password_grants.load(Ordering::SeqCst)
    }

    pub fn refresh_grants(&self) -> usize {
        self.refresh_grants.load(Ordering::SeqCst)
    }

    pub fn api_calls(&self) -> usize {
        self.api_calls.load(Ordering::SeqCst)
    }

    /// Bearer tokens sent to `url`, in order.
    pub fn bearer_tokens(&self, url: &str) -> Vec<Option<String>> {
        self.requests_to(url)
            .iter()
            .map(|r| r.header("authorization").map(|h| h.trim_start_matches("Bearer ").to_string()))
            .collect()
    }

    fn grant(&self, access: &str, refresh: &str) -> HttpResponse {
        json(
            200,
            &serde_json::json!({
                "accessToken": access,
                "expiresIn": self.access_ttl_secs,
                "refreshToken": refresh,
                "refreshTokenExpiresIn": self.refresh_ttl_secs,
            })
            .to_string(),
        )
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> DomainResult<HttpResponse> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match request.url.as_str() {
            PASSWORD_GRANT_URL => {
                let n = self.password_grants.fetch_add(1, Ordering::SeqCst) + 1;
                if self.password_status >= 400 {
                    return Ok(status(self.password_status));
                }
                Ok(self.grant(&format!("access-{n}"), &format!("refresh-{n}")))
            }
            REFRESH_GRANT_URL => {
                let n = self.refresh_grants.fetch_add(1, Ordering::SeqCst) + 1;
                if self.refresh_status >= 400 {
                    return Ok(status(self.refresh_status));
                }
                Ok(self.grant(&format!("refreshed-{n}"), &format!("refresh-r{n}")))
            }
            LOGOUT_URL => Ok(status(204)),
            _ => {
                let index = self.api_calls.fetch_add(1, Ordering::SeqCst);
                (self.handler)(&request, index)
            }
        }
    }
}

/// Decode a recorded JSON body.
pub fn body_json(request: &HttpRequest) -> serde_json::Value {
    match &request.body {
        RequestBody::Json(bytes) => serde_json::from_slice(bytes).unwrap(),
        other => panic!("expected JSON body, got {other:?}"),
    }
}
