//! Session guard
//!
//! Makes sure a usable access token exists before every dispatch and
//! recovers from a single 401 by re-acquiring credentials.
//!
//! The session sits behind an async mutex that is held across refresh and
//! acquisition. Concurrent callers queue on the lock and find the fresh
//! token once the first attempt finishes, so at most one grant is in flight.

use samplify_domain::{ApiResponse, HttpMethod, RequestBody, Result, Session, SessionPhase};
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use super::token_service::TokenService;
use crate::http::Dispatcher;

/// Owns the session and attaches a valid bearer token to each dispatch.
pub struct SessionGuard {
    tokens: TokenService,
    dispatcher: Dispatcher,
    session: Mutex<Session>,
}

impl SessionGuard {
    /// Guard starting from an empty session.
    pub fn new(tokens: TokenService, dispatcher: Dispatcher) -> Self {
        Self { tokens, dispatcher, session: Mutex::new(Session::empty()) }
    }

    /// Copy of the current session.
    pub async fn snapshot(&self) -> Session {
        self.session.lock().await.clone()
    }

    /// Phase of the current session.
    pub async fn phase(&self) -> SessionPhase {
        self.session.lock().await.phase()
    }

    /// Return a valid access token, refreshing or acquiring as needed.
    ///
    /// # Errors
    ///
    /// The password grant error when acquisition fails. A failed refresh is
    /// only logged before falling back to the password grant.
    pub async fn access_token(&self) -> Result<String> {
        let mut session = self.session.lock().await;
        match session.phase() {
            SessionPhase::Authenticated => {}
            SessionPhase::AccessExpired => match self.tokens.refresh(&session).await {
                Ok(refreshed) => *session = refreshed,
                Err(err) => {
                    warn!(error = %err, "token refresh failed; falling back to credentials");
                    self.acquire_into(&mut session).await?;
                }
            },
            SessionPhase::Unauthenticated | SessionPhase::FullyExpired => {
                self.acquire_into(&mut session).await?;
            }
        }
        Ok(session.access_token.clone())
    }

    /// Replace a token the server rejected.
    ///
    /// If another caller already swapped in a different, unexpired token it
    /// is reused; otherwise credentials are exchanged again.
    ///
    /// # Errors
    ///
    /// The password grant error; the stored session is left unchanged.
    pub async fn reauthenticate(&self, rejected_token: &str) -> Result<String> {
        let mut session = self.session.lock().await;
        if session.access_token != rejected_token && !session.access_token_expired() {
            return Ok(session.access_token.clone());
        }
        self.acquire_into(&mut session).await?;
        Ok(session.access_token.clone())
    }

    /// Force a password grant and store the result.
    ///
    /// # Errors
    ///
    /// The password grant error; the stored session is left unchanged.
    pub async fn authenticate(&self) -> Result<Session> {
        let mut session = self.session.lock().await;
        self.acquire_into(&mut session).await?;
        Ok(session.clone())
    }

    /// Force a refresh grant and store the result.
    ///
    /// # Errors
    ///
    /// [`SamplifyError::SessionExpired`] when the refresh token has lapsed,
    /// otherwise the refresh grant error.
    ///
    /// [`SamplifyError::SessionExpired`]: samplify_domain::SamplifyError::SessionExpired
    pub async fn refresh(&self) -> Result<Session> {
        let mut session = self.session.lock().await;
        *session = self.tokens.refresh(&session).await?;
        Ok(session.clone())
    }

    /// Log out and clear the local session once the server accepted it.
    ///
    /// # Errors
    ///
    /// The logout endpoint error; the session is kept in that case.
    pub async fn logout(&self) -> Result<()> {
        let mut session = self.session.lock().await;
        if self.tokens.logout(&session).await? {
            *session = Session::empty();
        }
        Ok(())
    }

    /// Dispatch with a valid token, retrying once after a 401.
    ///
    /// A second 401 is returned to the caller as is.
    ///
    /// # Errors
    ///
    /// Token acquisition errors, or the dispatch error of the final attempt.
    #[instrument(skip(self, body))]
    pub async fn send(
        &self,
        method: HttpMethod,
        url: &str,
        body: &RequestBody,
    ) -> Result<ApiResponse> {
        let token = self.access_token().await?;
        match self.dispatcher.dispatch(method, url, body, Some(&token)).await {
            Err(err) if err.is_unauthorized() => {
                info!("request rejected with 401; re-authenticating once");
                let token = self.reauthenticate(&token).await?;
                let retried = self.dispatcher.dispatch(method, url, body, Some(&token)).await;
                if let Err(err) = &retried {
                    if err.is_unauthorized() {
                        warn!("request rejected again after re-authentication");
                    }
                }
                retried
            }
            other => other,
        }
    }

    async fn acquire_into(&self, session: &mut Session) -> Result<()> {
        *session = self.tokens.acquire().await?;
        Ok(())
    }
}
