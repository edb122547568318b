use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client as ReqwestClient, Method};
use samplify_core::Transport;
use samplify_domain::constants::DEFAULT_TIMEOUT_SECS;
use samplify_domain::{
    HttpMethod, HttpRequest, HttpResponse, RequestBody, Result, SamplifyError,
};
use tracing::debug;

use crate::errors::InfraError;

/// reqwest-backed [`Transport`] with connection-level retry.
///
/// Connection failures are retried for every method. Server errors and
/// timeouts are retried only for idempotent methods, since the server may
/// already have acted on the request.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    timeout: Duration,
    max_attempts: usize,
    base_backoff: Duration,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    ///
    /// # Errors
    ///
    /// As for [`HttpClientBuilder::build`].
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Longest time [`HttpClient::execute`] can take when every attempt
    /// runs into the timeout.
    pub fn worst_case_duration(&self) -> Duration {
        let attempts = self.max_attempts.max(1);
        let pauses: Duration = (1..attempts).map(|retry| self.backoff_delay(retry)).sum();
        self.timeout.saturating_mul(attempts as u32).saturating_add(pauses)
    }

    /// Execute the request with retry semantics and read the whole body.
    ///
    /// # Errors
    ///
    /// [`SamplifyError::Transport`] when no response was obtained after the
    /// last permitted attempt.
    pub async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let attempts = self.max_attempts.max(1);
        let idempotent = is_idempotent(request.method);

        for attempt in 0..attempts {
            let last_attempt = attempt + 1 >= attempts;
            let built = self.build_reqwest(request)?;
            debug!(attempt = attempt + 1, method = %request.method, url = %request.url, "sending HTTP request");

            match self.client.execute(built).await {
                Ok(response) => {
                    let status = response.status();
                    debug!(attempt = attempt + 1, url = %request.url, %status, "received HTTP response");

                    if status.is_server_error() && idempotent && !last_attempt {
                        self.sleep_with_backoff(attempt + 1).await;
                        continue;
                    }

                    return read_response(response).await;
                }
                Err(err) => {
                    debug!(attempt = attempt + 1, url = %request.url, error = %err, "HTTP request failed");

                    if !last_attempt && should_retry_error(&err, idempotent) {
                        self.sleep_with_backoff(attempt + 1).await;
                        continue;
                    }

                    return Err(InfraError::from(err).into());
                }
            }
        }

        Err(SamplifyError::Transport(
            "http client exhausted retries without producing a result".into(),
        ))
    }

    /// Rebuild the reqwest request from plain data. Multipart forms cannot be
    /// cloned, so every attempt gets a fresh one.
    fn build_reqwest(&self, request: &HttpRequest) -> Result<reqwest::Request> {
        let mut builder = self.client.request(to_method(request.method), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(bytes) => builder.body(bytes.clone()),
            RequestBody::Multipart(form) => {
                let file = Part::bytes(form.file.clone()).file_name(form.file_name.clone());
                let mut multipart = Form::new().part(form.file_field.clone(), file);
                for (name, value) in &form.fields {
                    multipart = multipart.text(name.clone(), value.clone());
                }
                builder.multipart(multipart)
            }
        };

        builder.build().map_err(|err| InfraError::from(err).into())
    }

    fn backoff_delay(&self, retry_number: usize) -> Duration {
        let shift = retry_number.saturating_sub(1).min(8) as u32;
        let multiplier = 1u32 << shift;
        self.base_backoff.saturating_mul(multiplier)
    }

    async fn sleep_with_backoff(&self, retry_number: usize) {
        let delay = self.backoff_delay(retry_number);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.execute(&request).await
    }

    fn exchange_budget(&self, per_attempt: Duration) -> Duration {
        let attempts = self.max_attempts.max(1) as u32;
        let slack = per_attempt.saturating_sub(self.timeout).saturating_mul(attempts);
        self.worst_case_duration().saturating_add(slack)
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    max_attempts: usize,
    base_backoff: Duration,
    user_agent: Option<String>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_attempts: 3,
            base_backoff: Duration::from_millis(200),
            user_agent: None,
        }
    }
}

impl HttpClientBuilder {
    /// Per-attempt timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Configure the total number of attempts (initial try + retries).
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Pause before the first retry; doubles for each further retry.
    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.base_backoff = backoff;
        self
    }

    /// Override the default `samplify-rs/<version>` user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// [`SamplifyError::Transport`] when reqwest cannot initialise its TLS
    /// backend.
    pub fn build(self) -> Result<HttpClient> {
        let agent = self
            .user_agent
            .unwrap_or_else(|| concat!("samplify-rs/", env!("CARGO_PKG_VERSION")).to_string());
        let client = ReqwestClient::builder()
            .timeout(self.timeout)
            .user_agent(agent)
            .build()
            .map_err(|err| SamplifyError::from(InfraError::from(err)))?;

        Ok(HttpClient {
            client,
            timeout: self.timeout,
            max_attempts: self.max_attempts.max(1),
            base_backoff: self.base_backoff,
        })
    }
}

async fn read_response(response: reqwest::Response) -> Result<HttpResponse> {
    let status = response.status();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value.to_str().ok().map(|value| (name.as_str().to_string(), value.to_string()))
        })
        .collect();
    let body = response.bytes().await.map_err(InfraError::from)?;

    Ok(HttpResponse {
        status: status.as_u16(),
        reason: status.canonical_reason().map(str::to_string),
        headers,
        body: body.to_vec(),
    })
}

fn to_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

fn is_idempotent(method: HttpMethod) -> bool {
    matches!(method, HttpMethod::Get | HttpMethod::Put | HttpMethod::Delete)
}

fn should_retry_error(err: &reqwest::Error, idempotent: bool) -> bool {
    if err.is_connect() {
        return true;
    }
    idempotent && err.is_timeout()
}
