//! Upload command handlers.
//!
//! Both uploads are gated on a live session and run through a
//! [`RunController`] whose log is streamed to stdout as it grows.

use std::fmt::Debug;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Subcommand;
use dkimdb_api::{DkimApiClient, Session, SessionStatus};
use dkimdb_core::AppConfig;
use dkimdb_upload::{upload_file, upload_from_gmail, RunController, RunLog, RunOutcome};

use crate::auth::{sign_in_hint, signed_in_as};
use crate::output::Output;

/// Sub-commands available under `upload`.
#[derive(Debug, Subcommand)]
pub enum UploadCommands {
    /// Upload a tab-separated file of `domain<TAB>selector` rows
    File {
        /// Path to the TSV file
        path: Option<PathBuf>,
    },
    /// Page through the Gmail proxy and upload each new pair
    Gmail,
}

/// How an upload command ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UploadResult {
    /// No session; nothing was sent.
    SignedOut,
    Completed,
    Failed,
}

impl From<UploadResult> for ExitCode {
    fn from(result: UploadResult) -> Self {
        match result {
            UploadResult::Completed => ExitCode::SUCCESS,
            UploadResult::SignedOut | UploadResult::Failed => ExitCode::FAILURE,
        }
    }
}

pub(crate) async fn run_upload(
    config: &AppConfig,
    command: UploadCommands,
    output: Output,
) -> anyhow::Result<ExitCode> {
    execute_upload(config, command, output)
        .await
        .map(ExitCode::from)
}

pub(crate) async fn execute_upload(
    config: &AppConfig,
    command: UploadCommands,
    output: Output,
) -> anyhow::Result<UploadResult> {
    let client = DkimApiClient::new(config)?;
    let Some(session) = require_session(&client, config, output).await? else {
        return Ok(UploadResult::SignedOut);
    };
    output.notice(&signed_in_as(&session));

    let controller = RunController::new(RunLog::with_sink(move |record| output.record(record)));
    let client = &client;

    let result = match command {
        UploadCommands::File { path } => {
            let outcome = controller
                .start(|log| async move { upload_file(client, path.as_deref(), &log).await })
                .await;
            upload_result(&outcome)
        }
        UploadCommands::Gmail => {
            let outcome = controller
                .start(|log| async move { upload_from_gmail(client, &log).await })
                .await;
            upload_result(&outcome)
        }
    };
    Ok(result)
}

/// Checks the session before a run. Prints the sign-in hint and returns
/// `None` when nobody is signed in.
async fn require_session(
    client: &DkimApiClient,
    config: &AppConfig,
    output: Output,
) -> anyhow::Result<Option<Session>> {
    output.notice(&SessionStatus::Loading.to_string());

    match client.get_session().await? {
        SessionStatus::Authenticated(session) => Ok(Some(session)),
        SessionStatus::Unauthenticated | SessionStatus::Loading => {
            output.notice("You need to be signed in to use this command.");
            output.notice(&sign_in_hint(client, config)?);
            Ok(None)
        }
    }
}

fn upload_result<T: Debug>(outcome: &RunOutcome<T>) -> UploadResult {
    match outcome {
        RunOutcome::Completed(summary) => {
            tracing::info!(?summary, "upload finished");
            UploadResult::Completed
        }
        RunOutcome::Failed(_) | RunOutcome::Rejected => UploadResult::Failed,
    }
}

#[cfg(test)]
#[path = "upload_test.rs"]
mod tests;
