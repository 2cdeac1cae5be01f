use dkimdb_api::ApiError;
use thiserror::Error;

/// Why an upload run stopped.
///
/// Every variant renders as a bare message; the controller prefixes it with
/// `upload failed: ` in the run log.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Bad or missing input, detected before any network call.
    #[error("{0}")]
    Input(String),

    /// A source fetch, upsert or session refresh failed.
    #[error("{0}")]
    Transport(String),

    #[error("{0}")]
    Other(String),
}

impl From<ApiError> for UploadError {
    /// Appends the server's error payload, when there is one, to the error's
    /// own message.
    fn from(err: ApiError) -> Self {
        match err.payload() {
            Some(payload) => UploadError::Transport(format!("{err} - {payload}")),
            None => UploadError::Transport(err.to_string()),
        }
    }
}
