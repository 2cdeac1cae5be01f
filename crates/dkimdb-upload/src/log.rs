//! Append-only, timestamped progress log for an upload run.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One line of the run log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRecord {
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

type Sink = Arc<dyn Fn(&LogRecord) + Send + Sync>;

/// Ordered log shared between the controller and the running job.
///
/// Cloning is cheap and every clone appends to the same records. An optional
/// sink sees each record as it is appended (the CLI prints it), and every
/// message is mirrored to `tracing`.
#[derive(Clone, Default)]
pub struct RunLog {
    records: Arc<Mutex<Vec<LogRecord>>>,
    sink: Option<Sink>,
}

impl std::fmt::Debug for RunLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunLog")
            .field("records", &self.len())
            .field("sink", &self.sink.is_some())
            .finish()
    }
}

impl RunLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_sink<F>(sink: F) -> Self
    where
        F: Fn(&LogRecord) + Send + Sync + 'static,
    {
        Self {
            records: Arc::default(),
            sink: Some(Arc::new(sink)),
        }
    }

    pub fn append(&self, message: impl Into<String>) {
        let record = LogRecord {
            message: message.into(),
            timestamp: Utc::now(),
        };
        tracing::info!(target: "dkimdb::run_log", "{}", record.message);
        if let Some(sink) = &self.sink {
            sink(&record);
        }
        self.lock().push(record);
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    #[must_use]
    pub fn records(&self) -> Vec<LogRecord> {
        self.lock().clone()
    }

    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.lock().iter().map(|r| r.message.clone()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<LogRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_in_order_with_timestamps() {
        let log = RunLog::new();
        log.append("first");
        log.append("second");

        let records = log.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].message, "first");
        assert_eq!(records[1].message, "second");
        assert!(records[0].timestamp <= records[1].timestamp);
    }

    #[test]
    fn clones_share_records() {
        let log = RunLog::new();
        let clone = log.clone();
        clone.append("from clone");
        assert_eq!(log.messages(), vec!["from clone".to_string()]);
    }

    #[test]
    fn clear_empties_the_log() {
        let log = RunLog::new();
        log.append("line");
        assert!(!log.is_empty());
        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn sink_sees_every_record() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let captured = Arc::clone(&seen);
        let log = RunLog::with_sink(move |record| {
            captured.lock().unwrap().push(record.message.clone());
        });

        log.append("a");
        log.append("b");

        assert_eq!(*seen.lock().unwrap(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn records_serialize_with_timestamp() {
        let log = RunLog::new();
        log.append("upload complete");
        let json = serde_json::to_value(&log.records()[0]).unwrap();
        assert_eq!(json["message"], "upload complete");
        assert!(json["timestamp"].is_string());
    }
}
