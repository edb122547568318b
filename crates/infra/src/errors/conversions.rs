//! Conversions from external infrastructure errors into domain errors.

use reqwest::Error as HttpError;
use samplify_domain::SamplifyError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub SamplifyError);

impl From<InfraError> for SamplifyError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<SamplifyError> for InfraError {
    fn from(value: SamplifyError) -> Self {
        InfraError(value)
    }
}

trait IntoSamplifyError {
    fn into_samplify(self) -> SamplifyError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → SamplifyError */
/* -------------------------------------------------------------------------- */

impl IntoSamplifyError for HttpError {
    fn into_samplify(self) -> SamplifyError {
        let target = self.url().map(|url| url.to_string()).unwrap_or_else(|| "<unknown>".into());

        if self.is_timeout() {
            return SamplifyError::Transport(format!("HTTP request to {target} timed out"));
        }

        if self.is_connect() {
            return SamplifyError::Transport(format!("HTTP connection failure to {target}: {self}"));
        }

        if self.is_builder() {
            return SamplifyError::Transport(format!("invalid HTTP request: {self}"));
        }

        if self.is_body() || self.is_decode() {
            return SamplifyError::Transport(format!("failed to read HTTP body from {target}: {self}"));
        }

        SamplifyError::Transport(format!("HTTP error: {self}"))
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_samplify())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_domain_errors() {
        let infra = InfraError::from(SamplifyError::Config("bad".into()));
        let domain: SamplifyError = infra.into();
        assert!(matches!(domain, SamplifyError::Config(ref msg) if msg == "bad"));
    }

    #[test]
    fn builder_errors_become_transport_errors() {
        let err = reqwest::Client::new().get("not a url").build().unwrap_err();
        let mapped: SamplifyError = InfraError::from(err).into();
        assert!(matches!(mapped, SamplifyError::Transport(ref msg) if msg.starts_with("invalid HTTP request")));
    }

    #[tokio::test]
    async fn connect_errors_name_the_connection() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = reqwest::get(format!("http://{addr}/")).await.unwrap_err();
        let mapped: SamplifyError = InfraError::from(err).into();

        match mapped {
            SamplifyError::Transport(msg) => assert!(msg.contains("connection failure")),
            other => panic!("unexpected mapping: {other:?}"),
        }
    }

    #[tokio::test]
    async fn timeouts_have_their_own_message() {
        use std::time::Duration;

        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(wiremock::matchers::any())
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let client = reqwest::Client::builder().timeout(Duration::from_millis(50)).build().unwrap();
        let err = client.get(server.uri()).send().await.unwrap_err();
        let mapped: SamplifyError = InfraError::from(err).into();

        assert!(matches!(mapped, SamplifyError::Transport(ref msg) if msg.contains("timed out")));
    }
}
