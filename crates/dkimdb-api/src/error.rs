use thiserror::Error;

/// Errors returned by [`crate::DkimApiClient`].
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("request to {url} failed with status {status}")]
    Status {
        status: u16,
        url: String,
        body: Option<String>,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The session endpoint reported no signed-in user.
    #[error("not signed in")]
    Unauthenticated,
}

impl ApiError {
    /// Error payload sent by the server alongside a failing status, if any.
    #[must_use]
    pub fn payload(&self) -> Option<&str> {
        match self {
            ApiError::Status { body, .. } => body.as_deref(),
            _ => None,
        }
    }
}
