//! Response bodies returned by the DKIM archive endpoints.

use serde::{Deserialize, Serialize};

/// Body of both upsert endpoints. Older deployments of `api/add_dsp` answer
/// with an empty object, so the message defaults to an empty string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpsertResponse {
    #[serde(default)]
    pub message: String,
}

/// The `user` object of a NextAuth session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// `GET`/`POST api/auth/session`. A signed-out session is `{}` (or `null` on
/// newer NextAuth releases).
#[derive(Debug, Default, Deserialize)]
pub(crate) struct SessionResponse {
    #[serde(default)]
    pub user: Option<SessionUser>,
    #[serde(default)]
    pub expires: Option<String>,
}

/// `GET api/auth/csrf`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CsrfResponse {
    pub csrf_token: String,
}

/// JSON body of a session refresh request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SessionUpdateRequest<'a> {
    pub csrf_token: &'a str,
}
