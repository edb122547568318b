//! Samplify API client
//!
//! [`SamplifyClient`] owns the options, credentials and session of one API
//! user. Every call goes through the session guard; every call accepts an
//! optional [`CancellationToken`].

use std::sync::Arc;
use std::time::Duration;

use samplify_domain::{
    ApiResponse, ClientOptions, Credentials, Endpoint, HttpMethod, Operation, RequestBody, Result,
    SamplifyError, Session, SessionPhase, Target,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

use crate::cancel::with_cancellation;
use crate::http::{join_url, Dispatcher, Transport};
use crate::session::{SessionGuard, TokenService};

/// Authenticated client for the Samplify REST API.
pub struct SamplifyClient {
    options: ClientOptions,
    guard: SessionGuard,
}

impl SamplifyClient {
    /// Create a client. No network call is made until the first request.
    pub fn new(
        credentials: Credentials,
        options: ClientOptions,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let dispatcher = Dispatcher::new(transport, options.timeout);
        let tokens = TokenService::new(dispatcher.clone(), credentials, options.auth_url.clone());
        Self { guard: SessionGuard::new(tokens, dispatcher), options }
    }

    /// Create a builder for fluent configuration
    pub fn builder() -> SamplifyClientBuilder {
        SamplifyClientBuilder::default()
    }

    /// Create a client for a named environment (`dev`, `uat` or `prod`).
    ///
    /// # Errors
    ///
    /// [`SamplifyError::Config`] for any other name, before anything is sent.
    pub fn from_environment(
        credentials: Credentials,
        environment: &str,
        timeout: Option<Duration>,
        transport: Arc<dyn Transport>,
    ) -> Result<Self> {
        let options = ClientOptions::from_environment_name(environment, timeout)?;
        Ok(Self::new(credentials, options, transport))
    }

    /// Options the client was built with.
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Run one API operation and return the raw response.
    ///
    /// Argument validation happens before any token handling.
    ///
    /// # Errors
    ///
    /// [`SamplifyError::Validation`] for bad arguments, token acquisition
    /// errors, [`SamplifyError::Api`] for status >= 400,
    /// [`SamplifyError::Transport`] and [`SamplifyError::Cancelled`].
    #[instrument(skip_all, fields(operation = op.name()))]
    pub async fn execute(
        &self,
        op: Operation,
        cancel: Option<&CancellationToken>,
    ) -> Result<ApiResponse> {
        let spec = op.into_request()?;
        let url = match &spec.target {
            Target::Endpoint(endpoint) => join_url(self.options.base_url(*endpoint), &spec.path),
            Target::Absolute(url) => join_url(url, &spec.path),
        };
        with_cancellation(cancel, self.guard.send(spec.method, &url, &spec.body)).await
    }

    /// Run one API operation and decode the response body into `T`.
    ///
    /// # Errors
    ///
    /// Those of [`SamplifyClient::execute`], plus [`SamplifyError::Decode`]
    /// when the body does not match `T`.
    pub async fn execute_as<T: DeserializeOwned>(
        &self,
        op: Operation,
        cancel: Option<&CancellationToken>,
    ) -> Result<T> {
        self.execute(op, cancel).await?.decode()
    }

    /// Send an arbitrary authenticated request.
    ///
    /// `None` sends an empty body. An unencodable body fails with
    /// [`SamplifyError::Serialization`] before anything is sent.
    ///
    /// # Errors
    ///
    /// As for [`SamplifyClient::execute`].
    pub async fn request<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        base_url: &str,
        path: &str,
        body: Option<&B>,
        cancel: Option<&CancellationToken>,
    ) -> Result<ApiResponse> {
        let body = RequestBody::json(body)?;
        let url = join_url(base_url, path);
        with_cancellation(cancel, self.guard.send(method, &url, &body)).await
    }

    /// Send an arbitrary request to one of the configured endpoints.
    ///
    /// # Errors
    ///
    /// As for [`SamplifyClient::request`].
    pub async fn request_endpoint<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        endpoint: Endpoint,
        path: &str,
        body: Option<&B>,
        cancel: Option<&CancellationToken>,
    ) -> Result<ApiResponse> {
        let base_url = self.options.base_url(endpoint).to_string();
        self.request(method, &base_url, path, body, cancel).await
    }

    /// Exchange the credentials for a new session, whatever the current state.
    ///
    /// # Errors
    ///
    /// The password grant error or [`SamplifyError::Cancelled`]; the stored
    /// session is left unchanged.
    pub async fn authenticate(&self, cancel: Option<&CancellationToken>) -> Result<Session> {
        with_cancellation(cancel, self.guard.authenticate()).await
    }

    /// Renew the session with the refresh token.
    ///
    /// # Errors
    ///
    /// [`SamplifyError::SessionExpired`] when the refresh token has lapsed.
    pub async fn refresh_token(&self, cancel: Option<&CancellationToken>) -> Result<Session> {
        with_cancellation(cancel, self.guard.refresh()).await
    }

    /// Revoke the session. A no-op when the access token already expired.
    ///
    /// # Errors
    ///
    /// The logout endpoint error or [`SamplifyError::Cancelled`].
    pub async fn logout(&self, cancel: Option<&CancellationToken>) -> Result<()> {
        with_cancellation(cancel, self.guard.logout()).await
    }

    /// Copy of the current session.
    pub async fn session(&self) -> Session {
        self.guard.snapshot().await
    }

    /// Phase of the current session.
    pub async fn session_phase(&self) -> SessionPhase {
        self.guard.phase().await
    }

    /// Query the gateway health endpoint.
    ///
    /// # Errors
    ///
    /// As for [`SamplifyClient::execute`].
    pub async fn health_status(&self, cancel: Option<&CancellationToken>) -> Result<ApiResponse> {
        self.execute(Operation::HealthCheck, cancel).await
    }
}

/// Builder for [`SamplifyClient`]
#[derive(Default)]
pub struct SamplifyClientBuilder {
    credentials: Option<Credentials>,
    options: Option<ClientOptions>,
    timeout: Option<Duration>,
    transport: Option<Arc<dyn Transport>>,
}

impl SamplifyClientBuilder {
    /// Credentials for the password grant. Required.
    #[must_use]
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Use explicit options. Defaults to the UAT preset.
    #[must_use]
    pub fn options(mut self, options: ClientOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Override the request timeout. Zero keeps the configured value.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Transport carrying every exchange. Required.
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// [`SamplifyError::Config`] when credentials or transport are missing.
    pub fn build(self) -> Result<SamplifyClient> {
        let credentials = self
            .credentials
            .ok_or_else(|| SamplifyError::Config("credentials are required".to_string()))?;
        let transport = self
            .transport
            .ok_or_else(|| SamplifyError::Config("a transport is required".to_string()))?;

        let mut options = self.options.unwrap_or_default();
        if let Some(timeout) = self.timeout.filter(|t| !t.is_zero()) {
            options = options.with_timeout(timeout);
        }

        debug!(api = %options.api_base_url, timeout = ?options.timeout, "building Samplify client");
        Ok(SamplifyClient::new(credentials, options, transport))
    }
}
