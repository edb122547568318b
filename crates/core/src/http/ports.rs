//! Port interface for the HTTP transport

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use samplify_domain::{HttpRequest, HttpResponse, Result};

/// Performs one HTTP exchange.
///
/// Implementations may retry at the connection level, but must return the
/// final response for any status code. Only failures to obtain a response at
/// all are reported as errors (normally [`SamplifyError::Transport`]).
///
/// [`SamplifyError::Transport`]: samplify_domain::SamplifyError::Transport
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the request and read the full response body.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;

    /// Upper bound for one [`Transport::send`] call when each attempt may
    /// take up to `per_attempt`.
    ///
    /// Transports that retry internally must cover every attempt and the
    /// pauses between them, or the caller's deadline cuts the retries off.
    fn exchange_budget(&self, per_attempt: Duration) -> Duration {
        per_attempt
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        (**self).send(request).await
    }

    fn exchange_budget(&self, per_attempt: Duration) -> Duration {
        (**self).exchange_budget(per_attempt)
    }
}
