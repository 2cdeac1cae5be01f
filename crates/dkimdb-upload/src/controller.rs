//! Re-entrancy guard and terminal-outcome reporting for upload runs.
//!
//! A controller owns the run log and a running flag. Starting while a run is
//! in flight is a no-op; every exit path of a run, including a panic inside
//! the job, puts the controller back to [`RunState::Idle`].

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::Instrument;
use uuid::Uuid;

use crate::error::UploadError;
use crate::log::RunLog;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
}

/// Result of [`RunController::start`].
#[derive(Debug)]
pub enum RunOutcome<T> {
    Completed(T),
    Failed(UploadError),
    /// Another run was already in progress; nothing was done.
    Rejected,
}

impl<T> RunOutcome<T> {
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, RunOutcome::Completed(_))
    }
}

#[derive(Debug, Default)]
pub struct RunController {
    running: AtomicBool,
    log: RunLog,
}

/// Clears the running flag when dropped.
struct RunningGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl RunController {
    #[must_use]
    pub fn new(log: RunLog) -> Self {
        Self {
            running: AtomicBool::new(false),
            log,
        }
    }

    #[must_use]
    pub fn log(&self) -> &RunLog {
        &self.log
    }

    #[must_use]
    pub fn state(&self) -> RunState {
        if self.running.load(Ordering::Acquire) {
            RunState::Running
        } else {
            RunState::Idle
        }
    }

    /// Runs `job` unless a run is already active.
    ///
    /// The log is cleared before the job starts: the CLI has no separate
    /// clear command, so each run's log holds only that run's lines. On
    /// success `upload complete` is appended; on failure
    /// `upload failed: <error>`. A rejected start leaves the log untouched.
    pub async fn start<T, F, Fut>(&self, job: F) -> RunOutcome<T>
    where
        F: FnOnce(RunLog) -> Fut,
        Fut: Future<Output = Result<T, UploadError>>,
    {
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("upload already running; start ignored");
            return RunOutcome::Rejected;
        }
        let _guard = RunningGuard {
            flag: &self.running,
        };

        self.log.clear();
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("upload_run", %run_id);

        match job(self.log.clone()).instrument(span).await {
            Ok(value) => {
                self.log.append("upload complete");
                RunOutcome::Completed(value)
            }
            Err(err) => {
                tracing::warn!(%run_id, error = %err, "upload run failed");
                self.log.append(format!("upload failed: {err}"));
                RunOutcome::Failed(err)
            }
        }
    }
}
