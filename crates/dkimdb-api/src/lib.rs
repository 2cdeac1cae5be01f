//! HTTP client for the DKIM archive web application.
//!
//! Covers the Gmail proxy (`api/gmail`), both upsert endpoints, and the
//! NextAuth session endpoints used to check, refresh and end a sign-in.

pub mod client;
pub mod error;
pub mod session;
pub mod types;

pub use client::{DkimApiClient, Endpoints};
pub use error::ApiError;
pub use session::{Session, SessionStatus};
pub use types::{SessionUser, UpsertResponse};
