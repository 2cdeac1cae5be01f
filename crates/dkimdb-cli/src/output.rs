//! Terminal output for the CLI.
//!
//! Run log records go to stdout, either as `[HH:MM:SS] message` lines in the
//! local time zone or as JSON lines. Status notices ("Signed in as ...") share
//! stdout in text mode and move to stderr in JSON mode so stdout stays
//! machine-readable.

use chrono::Local;
use dkimdb_upload::LogRecord;

#[derive(Debug, Clone, Copy)]
pub(crate) struct Output {
    json: bool,
}

impl Output {
    pub(crate) fn new(json: bool) -> Self {
        Self { json }
    }

    pub(crate) fn notice(self, message: &str) {
        if self.json {
            eprintln!("{message}");
        } else {
            println!("{message}");
        }
    }

    pub(crate) fn record(self, record: &LogRecord) {
        if self.json {
            match serde_json::to_string(record) {
                Ok(line) => println!("{line}"),
                Err(e) => tracing::warn!(error = %e, "failed to encode run log record"),
            }
        } else {
            println!("{}", format_record(record));
        }
    }
}

pub(crate) fn format_record(record: &LogRecord) -> String {
    format!(
        "[{}] {}",
        record.timestamp.with_timezone(&Local).format("%H:%M:%S"),
        record.message
    )
}
