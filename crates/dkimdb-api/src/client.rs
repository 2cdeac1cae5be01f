//! HTTP client for the DKIM archive web application.
//!
//! Wraps `reqwest` with a cookie jar that carries the NextAuth session cookie,
//! resolves endpoint paths against a configurable base URL, and turns non-2xx
//! responses into [`ApiError::Status`] with the server's error body attached.

use std::sync::Arc;
use std::time::Duration;

use dkimdb_core::config::{
    DEFAULT_FILE_UPSERT_PATH, DEFAULT_GMAIL_API_PATH, DEFAULT_GMAIL_UPSERT_PATH,
    DEFAULT_USER_AGENT,
};
use dkimdb_core::{AppConfig, DomainSelectorPair, PageResult};
use reqwest::cookie::Jar;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::types::UpsertResponse;

/// Endpoint paths, relative to the client's base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Paged Gmail proxy (`GET ?pageToken=`).
    pub gmail: String,
    /// Upsert used by the Gmail upload path.
    pub gmail_upsert: String,
    /// Upsert used by the file upload path.
    pub file_upsert: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            gmail: DEFAULT_GMAIL_API_PATH.to_owned(),
            gmail_upsert: DEFAULT_GMAIL_UPSERT_PATH.to_owned(),
            file_upsert: DEFAULT_FILE_UPSERT_PATH.to_owned(),
        }
    }
}

impl Endpoints {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            gmail: config.gmail_api_path.clone(),
            gmail_upsert: config.gmail_upsert_path.clone(),
            file_upsert: config.file_upsert_path.clone(),
        }
    }
}

/// Client for the DKIM archive API.
///
/// Use [`DkimApiClient::new`] with the loaded [`AppConfig`], or
/// [`DkimApiClient::with_base_url`] to point at a mock server in tests.
pub struct DkimApiClient {
    pub(crate) client: Client,
    jar: Arc<Jar>,
    pub(crate) base_url: Url,
    endpoints: Endpoints,
}

impl DkimApiClient {
    /// Creates a client from application configuration, installing the
    /// session cookie when one is configured.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed, or [`ApiError::InvalidUrl`] if the base URL is invalid.
    pub fn new(config: &AppConfig) -> Result<Self, ApiError> {
        let client = Self::with_base_url(
            &config.base_url,
            config.request_timeout_secs,
            &config.user_agent,
        )?
        .with_endpoints(Endpoints::from_config(config));

        if let Some(token) = config.session_token.as_deref() {
            client.set_session_cookie(&config.session_cookie_name, token);
        }
        Ok(client)
    }

    /// Creates a client with default endpoint paths and no session cookie.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed, or [`ApiError::InvalidUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ApiError> {
        let jar = Arc::new(Jar::default());
        let user_agent = if user_agent.is_empty() {
            DEFAULT_USER_AGENT
        } else {
            user_agent
        };
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .cookie_provider(Arc::clone(&jar))
            .build()?;

        // Exactly one trailing slash, so `Url::join` appends relative paths
        // instead of replacing the last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ApiError::InvalidUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            jar,
            base_url,
            endpoints: Endpoints::default(),
        })
    }

    #[must_use]
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    #[must_use]
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Stores a session cookie for the base URL. Later `Set-Cookie` headers
    /// from the server replace it, so rotated session tokens are picked up.
    pub fn set_session_cookie(&self, cookie_name: &str, value: &str) {
        let cookie = format!("{cookie_name}={value}; Path=/");
        self.jar.add_cookie_str(&cookie, &self.base_url);
        tracing::debug!(cookie_name, base_url = %self.base_url, "session cookie installed");
    }

    /// Fetches one page of domain/selector pairs from the Gmail proxy.
    ///
    /// An empty `page_token` requests the first page.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Status`] on a non-2xx response (server payload attached).
    /// - [`ApiError::Http`] on network failure.
    /// - [`ApiError::Deserialize`] if the body is not a page.
    pub async fn fetch_gmail_page(&self, page_token: &str) -> Result<PageResult, ApiError> {
        let url = self.build_url(&self.endpoints.gmail, &[("pageToken", page_token)])?;
        let page: PageResult = self.send_json(self.client.get(url), "gmail page").await?;
        tracing::debug!(
            pairs = page.pairs.len(),
            last_page = page.is_last_page(),
            "fetched gmail page"
        );
        Ok(page)
    }

    /// Records a pair through the Gmail path's upsert endpoint (`api/add_dsp`).
    ///
    /// Any 2xx status is success; a body that is not `{ "message": .. }`
    /// leaves the message empty.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Status`] on a non-2xx response (server payload attached).
    /// - [`ApiError::Http`] on network failure.
    pub async fn add_domain_selector_pair(
        &self,
        pair: &DomainSelectorPair,
    ) -> Result<UpsertResponse, ApiError> {
        self.upsert(&self.endpoints.gmail_upsert, pair).await
    }

    /// Records a pair through the file path's upsert endpoint
    /// (`api/upsert_dkim_record`).
    ///
    /// # Errors
    ///
    /// Same as [`Self::add_domain_selector_pair`].
    pub async fn upsert_dkim_record(
        &self,
        pair: &DomainSelectorPair,
    ) -> Result<UpsertResponse, ApiError> {
        self.upsert(&self.endpoints.file_upsert, pair).await
    }

    /// Absolute URL of an endpoint path, for display in run logs.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] if `path` cannot be joined onto the
    /// base URL.
    pub fn endpoint_url(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidUrl {
                url: format!("{}{path}", self.base_url),
                reason: e.to_string(),
            })
    }

    async fn upsert(
        &self,
        path: &str,
        pair: &DomainSelectorPair,
    ) -> Result<UpsertResponse, ApiError> {
        let url = self.build_url(
            path,
            &[
                ("domain", pair.domain.as_str()),
                ("selector", pair.selector.as_str()),
            ],
        )?;
        let body = self.send_text(self.client.get(url)).await?;
        let response = parse_upsert_body(&body);
        tracing::debug!(
            domain = %pair.domain,
            selector = %pair.selector,
            message = %response.message,
            "upsert response"
        );
        Ok(response)
    }

    /// Builds an endpoint URL with percent-encoded query parameters.
    pub(crate) fn build_url(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, ApiError> {
        let mut url = self.endpoint_url(path)?;
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    /// Sends a request and parses a 2xx body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Status`] for a non-2xx status with the response
    /// body (if non-empty) attached, [`ApiError::Http`] on network failure,
    /// and [`ApiError::Deserialize`] if the body does not match `T`.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        context: &str,
    ) -> Result<T, ApiError> {
        let body = self.send_text(request).await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }

    /// Sends a request and returns the body of a 2xx response as text.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Status`] for a non-2xx status with the response
    /// body (if non-empty) attached, or [`ApiError::Http`] on network failure.
    pub(crate) async fn send_text(&self, request: RequestBuilder) -> Result<String, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let url = response.url().to_string();
        let body = response.text().await?;

        if !status.is_success() {
            let body = Some(body.trim().to_owned()).filter(|b| !b.is_empty());
            return Err(ApiError::Status {
                status: status.as_u16(),
                url,
                body,
            });
        }

        Ok(body)
    }
}

/// Upserts succeed on status alone. A 2xx body that is empty or not the
/// expected JSON yields an empty message.
fn parse_upsert_body(body: &str) -> UpsertResponse {
    if body.trim().is_empty() {
        return UpsertResponse::default();
    }
    serde_json::from_str(body).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "upsert reply is not JSON; treating as empty message");
        UpsertResponse::default()
    })
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
