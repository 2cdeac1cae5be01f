//! NextAuth session endpoints: status, refresh, sign-in URL and sign-out.
//!
//! Sign-in itself is an OAuth redirect handled by the provider in a browser;
//! the resulting session cookie is handed to the client through
//! [`DkimApiClient::set_session_cookie`].

use reqwest::Url;

use crate::client::DkimApiClient;
use crate::error::ApiError;
use crate::types::{CsrfResponse, SessionResponse, SessionUpdateRequest, SessionUser};

const SESSION_PATH: &str = "api/auth/session";
const CSRF_PATH: &str = "api/auth/csrf";
const SIGN_IN_PATH: &str = "api/auth/signin";
const SIGN_OUT_PATH: &str = "api/auth/signout";

/// A signed-in session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: SessionUser,
    pub expires: Option<String>,
}

impl Session {
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.user.email.as_deref()
    }
}

/// Session lifecycle as seen by a caller.
///
/// `Loading` is the state before the session endpoint has answered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionStatus {
    #[default]
    Loading,
    Unauthenticated,
    Authenticated(Session),
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionStatus::Loading => write!(f, "loading"),
            SessionStatus::Unauthenticated => write!(f, "unauthenticated"),
            SessionStatus::Authenticated(_) => write!(f, "authenticated"),
        }
    }
}

fn status_from(response: Option<SessionResponse>) -> SessionStatus {
    match response {
        Some(SessionResponse {
            user: Some(user),
            expires,
        }) => SessionStatus::Authenticated(Session { user, expires }),
        _ => SessionStatus::Unauthenticated,
    }
}

impl DkimApiClient {
    /// Reads the current session without modifying it.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Status`] / [`ApiError::Http`] if the endpoint is unreachable.
    /// - [`ApiError::Deserialize`] if the body is not a session object.
    pub async fn get_session(&self) -> Result<SessionStatus, ApiError> {
        let url = self.build_url(SESSION_PATH, &[])?;
        let response: Option<SessionResponse> =
            self.send_json(self.client.get(url), "session").await?;
        Ok(status_from(response))
    }

    /// Refreshes the session so its expiry is pushed forward, the equivalent
    /// of NextAuth's client-side `update()`.
    ///
    /// Fetches a CSRF token, then posts it to the session endpoint. A rotated
    /// session cookie in the response replaces the stored one.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Unauthenticated`] if the server no longer recognises the session.
    /// - [`ApiError::Status`] / [`ApiError::Http`] / [`ApiError::Deserialize`]
    ///   on transport failures.
    pub async fn refresh_session(&self) -> Result<Session, ApiError> {
        let csrf_token = self.csrf_token().await?;
        let url = self.build_url(SESSION_PATH, &[])?;
        let request = self.client.post(url).json(&SessionUpdateRequest {
            csrf_token: &csrf_token,
        });
        let response: Option<SessionResponse> = self.send_json(request, "session update").await?;

        match status_from(response) {
            SessionStatus::Authenticated(session) => {
                tracing::debug!(expires = ?session.expires, "session refreshed");
                Ok(session)
            }
            _ => Err(ApiError::Unauthenticated),
        }
    }

    /// Ends the session on the server.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Status`] / [`ApiError::Http`] if either the CSRF
    /// fetch or the sign-out request fails.
    pub async fn sign_out(&self) -> Result<(), ApiError> {
        let csrf_token = self.csrf_token().await?;
        let url = self.build_url(SIGN_OUT_PATH, &[])?;
        let request = self
            .client
            .post(url)
            .form(&[("csrfToken", csrf_token.as_str()), ("json", "true")]);
        let _: serde_json::Value = self.send_json(request, "sign out").await?;
        tracing::info!("signed out");
        Ok(())
    }

    /// URL of the provider sign-in page.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] if the path cannot be joined onto the
    /// base URL.
    pub fn sign_in_url(&self) -> Result<Url, ApiError> {
        self.endpoint_url(SIGN_IN_PATH)
    }

    async fn csrf_token(&self) -> Result<String, ApiError> {
        let url = self.build_url(CSRF_PATH, &[])?;
        let response: CsrfResponse = self.send_json(self.client.get(url), "csrf token").await?;
        Ok(response.csrf_token)
    }
}
