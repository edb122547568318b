//! Token acquisition against the auth endpoint
//!
//! Both grants return a complete replacement [`Session`]; storing it is the
//! caller's job, so a failed grant can never leave a half-updated session.

use chrono::Utc;
use samplify_domain::constants::{LOGOUT_PATH, TOKEN_PASSWORD_PATH, TOKEN_REFRESH_PATH};
use samplify_domain::{
    Credentials, HttpMethod, LogoutRequest, RefreshRequest, RequestBody, Result, SamplifyError,
    Session, TokenGrant,
};
use tracing::{debug, info};

use crate::http::{join_url, Dispatcher};

/// Exchanges credentials or a refresh token for a new [`Session`].
#[derive(Clone)]
pub struct TokenService {
    dispatcher: Dispatcher,
    credentials: Credentials,
    auth_url: String,
}

impl TokenService {
    /// Token service posting grants under `auth_url`.
    pub fn new(dispatcher: Dispatcher, credentials: Credentials, auth_url: impl Into<String>) -> Self {
        Self { dispatcher, credentials, auth_url: auth_url.into() }
    }

    /// Password grant.
    ///
    /// # Errors
    ///
    /// Errors from the auth endpoint are returned unchanged.
    /// [`SamplifyError::Decode`] when the grant body is malformed or carries
    /// a lifetime outside the representable range.
    pub async fn acquire(&self) -> Result<Session> {
        let acquired_at = Utc::now();
        let body = RequestBody::json(Some(&self.credentials))?;
        let grant = self.grant(TOKEN_PASSWORD_PATH, &body).await?;
        let session = Session::from_grant(grant, acquired_at)?;

        info!(client_id = %self.credentials.client_id, "acquired access token");
        Ok(session)
    }

    /// Refresh grant.
    ///
    /// # Errors
    ///
    /// [`SamplifyError::SessionExpired`] without any network call when the
    /// refresh token has lapsed. Otherwise the same errors as
    /// [`TokenService::acquire`].
    pub async fn refresh(&self, session: &Session) -> Result<Session> {
        if session.refresh_token_expired() {
            debug!("refresh token expired; refresh grant skipped");
            return Err(SamplifyError::SessionExpired);
        }

        let acquired_at = Utc::now();
        let body = RequestBody::json(Some(&RefreshRequest {
            client_id: &self.credentials.client_id,
            refresh_token: &session.refresh_token,
        }))?;
        let grant = self.grant(TOKEN_REFRESH_PATH, &body).await?;
        let session = Session::from_grant(grant, acquired_at)?;

        info!(client_id = %self.credentials.client_id, "refreshed access token");
        Ok(session)
    }

    /// Revoke the session server-side. Does nothing when the access token has
    /// already expired.
    ///
    /// Returns `true` when the logout call was made and succeeded.
    ///
    /// # Errors
    ///
    /// Errors from the logout endpoint are returned unchanged.
    pub async fn logout(&self, session: &Session) -> Result<bool> {
        if session.access_token_expired() {
            debug!("access token already expired; logout skipped");
            return Ok(false);
        }

        let body = RequestBody::json(Some(&LogoutRequest {
            client_id: &self.credentials.client_id,
            refresh_token: &session.refresh_token,
            access_token: &session.access_token,
        }))?;
        let url = join_url(&self.auth_url, LOGOUT_PATH);
        self.dispatcher.dispatch(HttpMethod::Post, &url, &body, None).await?;

        info!(client_id = %self.credentials.client_id, "logged out");
        Ok(true)
    }

    async fn grant(&self, path: &str, body: &RequestBody) -> Result<TokenGrant> {
        let url = join_url(&self.auth_url, path);
        let response = self.dispatcher.dispatch(HttpMethod::Post, &url, body, None).await?;
        response.decode()
    }
}
