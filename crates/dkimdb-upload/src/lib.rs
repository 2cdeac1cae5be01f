//! Upload runs that feed DKIM domain/selector pairs into the archive.
//!
//! Two job types share one [`RunController`]: [`upload_from_gmail`] pages
//! through the Gmail proxy and submits each pair once per run, and
//! [`upload_file`] submits every row of a TSV file in order. Progress is
//! narrated through a [`RunLog`]; every failure aborts the run.

pub mod controller;
pub mod error;
pub mod file;
pub mod gmail;
pub mod log;

pub use controller::{RunController, RunOutcome, RunState};
pub use error::UploadError;
pub use file::{upload_file, FileUploadSummary};
pub use gmail::{upload_from_gmail, GmailUploadSummary};
pub use log::{LogRecord, RunLog};
