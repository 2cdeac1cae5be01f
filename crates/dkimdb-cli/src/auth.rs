//! Session command handlers.
//!
//! Sign-in is an OAuth flow that has to happen in a browser, so `sign-in`
//! only points the user at the provider page and explains where to put the
//! resulting cookie.

use std::process::ExitCode;

use clap::Subcommand;
use dkimdb_api::{DkimApiClient, SessionStatus};
use dkimdb_core::AppConfig;

use crate::output::Output;

/// Sub-commands available under `auth`.
#[derive(Debug, Subcommand)]
pub enum AuthCommands {
    /// Show who the configured session belongs to
    Status,
    /// Print the sign-in URL and how to store the session cookie
    SignIn,
    /// End the configured session on the server
    SignOut,
}

pub(crate) async fn run_auth(
    config: &AppConfig,
    command: AuthCommands,
    output: Output,
) -> anyhow::Result<ExitCode> {
    let client = DkimApiClient::new(config)?;
    match command {
        AuthCommands::Status => run_status(&client, output).await,
        AuthCommands::SignIn => {
            output.notice(&sign_in_hint(&client, config)?);
            Ok(ExitCode::SUCCESS)
        }
        AuthCommands::SignOut => run_sign_out(&client, config, output).await,
    }
}

async fn run_status(client: &DkimApiClient, output: Output) -> anyhow::Result<ExitCode> {
    match client.get_session().await? {
        SessionStatus::Authenticated(session) => {
            output.notice(&signed_in_as(&session));
            if let Some(expires) = &session.expires {
                output.notice(&format!("Session expires {expires}"));
            }
        }
        SessionStatus::Unauthenticated | SessionStatus::Loading => {
            output.notice("Not signed in.");
        }
    }
    Ok(ExitCode::SUCCESS)
}

async fn run_sign_out(
    client: &DkimApiClient,
    config: &AppConfig,
    output: Output,
) -> anyhow::Result<ExitCode> {
    if config.require_session_token().is_err() {
        output.notice("Not signed in.");
        return Ok(ExitCode::SUCCESS);
    }

    client.sign_out().await?;
    output.notice("Signed out. Remove DKIMDB_SESSION_TOKEN from your environment.");
    Ok(ExitCode::SUCCESS)
}

pub(crate) fn signed_in_as(session: &dkimdb_api::Session) -> String {
    format!("Signed in as {}", session.email().unwrap_or("unknown user"))
}

/// Instructions for obtaining a session cookie.
pub(crate) fn sign_in_hint(client: &DkimApiClient, config: &AppConfig) -> anyhow::Result<String> {
    let url = client.sign_in_url()?;
    Ok(format!(
        "Sign in at {url}, then set DKIMDB_SESSION_TOKEN to the value of the `{}` cookie.",
        config.session_cookie_name
    ))
}
