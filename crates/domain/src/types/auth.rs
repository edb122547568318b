//! Credentials, token grants and the session they produce
//!
//! A [`Session`] is always built whole from a [`TokenGrant`] and the instant
//! the grant was requested, so both tokens and `acquired_at` change together.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{Result, SamplifyError};

/// Password-grant credentials. Immutable for the lifetime of a client.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub client_id: String,
    pub username: String,
    /// Never printed; see the `Debug` impl.
    pub password: String,
}

impl Credentials {
    /// Bundle the three values sent with the password grant.
    pub fn new(
        client_id: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self { client_id: client_id.into(), username: username.into(), password: password.into() }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Token payload returned by the password and refresh grants.
///
/// Lifetimes are expressed in seconds relative to acquisition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenGrant {
    pub access_token: String,
    /// Access token lifetime in seconds.
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub refresh_token: String,
    /// Refresh token lifetime in seconds.
    #[serde(default)]
    pub refresh_token_expires_in: Option<i64>,
}

/// Body of the refresh grant.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest<'a> {
    pub client_id: &'a str,
    pub refresh_token: &'a str,
}

/// Body of the logout call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutRequest<'a> {
    pub client_id: &'a str,
    pub refresh_token: &'a str,
    pub access_token: &'a str,
}

/// Where a session stands relative to its two expiry instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No token has been acquired yet.
    Unauthenticated,
    /// The access token is still valid.
    Authenticated,
    /// The access token lapsed but the refresh token is still valid.
    AccessExpired,
    /// Both tokens lapsed.
    FullyExpired,
}

/// Current tokens and when they were acquired.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// Bearer token attached to API calls.
    pub access_token: String,
    pub refresh_token: String,
    pub access_token_ttl: Option<Duration>,
    pub refresh_token_ttl: Option<Duration>,
    /// When the grant backing this session was requested.
    pub acquired_at: Option<DateTime<Utc>>,
}

impl Session {
    /// A session with no tokens; reports both tokens as expired.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a complete session from a grant requested at `acquired_at`.
    ///
    /// # Errors
    ///
    /// [`SamplifyError::Decode`] when a lifetime puts the expiry instant
    /// outside the representable date range.
    pub fn from_grant(grant: TokenGrant, acquired_at: DateTime<Utc>) -> Result<Self> {
        Ok(Self {
            access_token_ttl: lifetime("expiresIn", grant.expires_in, acquired_at)?,
            refresh_token_ttl: lifetime(
                "refreshTokenExpiresIn",
                grant.refresh_token_expires_in,
                acquired_at,
            )?,
            access_token: grant.access_token,
            refresh_token: grant.refresh_token,
            acquired_at: Some(acquired_at),
        })
    }

    /// `true` until the first grant is stored.
    pub fn is_empty(&self) -> bool {
        self.acquired_at.is_none()
    }

    /// Instant at which the access token stops being valid.
    pub fn access_token_expires_at(&self) -> Option<DateTime<Utc>> {
        expiry(self.acquired_at, self.access_token_ttl)
    }

    /// Instant at which the refresh token stops being valid.
    pub fn refresh_token_expires_at(&self) -> Option<DateTime<Utc>> {
        expiry(self.acquired_at, self.refresh_token_ttl)
    }

    /// `true` once `now >= acquired_at + access_token_ttl`, or when either is
    /// unknown.
    pub fn access_token_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.access_token_expires_at().map_or(true, |expires_at| now >= expires_at)
    }

    /// Same rule as [`Session::access_token_expired_at`] for the refresh token.
    pub fn refresh_token_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.refresh_token_expires_at().map_or(true, |expires_at| now >= expires_at)
    }

    /// [`Session::access_token_expired_at`] against the current time.
    pub fn access_token_expired(&self) -> bool {
        self.access_token_expired_at(Utc::now())
    }

    /// [`Session::refresh_token_expired_at`] against the current time.
    pub fn refresh_token_expired(&self) -> bool {
        self.refresh_token_expired_at(Utc::now())
    }

    /// Classify the session at `now`.
    pub fn phase_at(&self, now: DateTime<Utc>) -> SessionPhase {
        if self.is_empty() {
            SessionPhase::Unauthenticated
        } else if !self.access_token_expired_at(now) {
            SessionPhase::Authenticated
        } else if !self.refresh_token_expired_at(now) {
            SessionPhase::AccessExpired
        } else {
            SessionPhase::FullyExpired
        }
    }

    /// Classify the session at the current time.
    pub fn phase(&self) -> SessionPhase {
        self.phase_at(Utc::now())
    }
}

/// Seconds from the wire as a duration whose expiry instant is representable.
fn lifetime(
    field: &str,
    seconds: Option<i64>,
    acquired_at: DateTime<Utc>,
) -> Result<Option<Duration>> {
    let Some(seconds) = seconds else {
        return Ok(None);
    };
    Duration::try_seconds(seconds)
        .filter(|ttl| acquired_at.checked_add_signed(*ttl).is_some())
        .map(Some)
        .ok_or_else(|| SamplifyError::Decode(format!("{field} out of range: {seconds}")))
}

fn expiry(acquired_at: Option<DateTime<Utc>>, ttl: Option<Duration>) -> Option<DateTime<Utc>> {
    match (acquired_at, ttl) {
        (Some(acquired_at), Some(ttl)) => acquired_at.checked_add_signed(ttl),
        _ => None,
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &redact(&self.access_token))
            .field("refresh_token", &redact(&self.refresh_token))
            .field("access_token_ttl", &self.access_token_ttl)
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .field("acquired_at", &self.acquired_at)
            .finish()
    }
}

fn redact(token: &str) -> &'static str {
    if token.is_empty() {
        "<none>"
    } else {
        "<redacted>"
    }
}
