//! User notification and diagnostic log capability.
//!
//! Every operation takes a `&dyn Reporter` instead of writing to globals, so
//! the CLI can print to the terminal and tests can record what was reported.

use crate::error::ApiError;
use std::error::Error;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub trait Reporter: Send + Sync {
    /// Transient success notification.
    fn notify_success(&self, message: &str);
    /// Transient error notification.
    fn notify_error(&self, message: &str);
    /// Operator-visible diagnostic record for a caught error.
    fn log(&self, context: &str, error: &dyn Error);
}

/// Classifies `error`, logs it with `context`, pushes the presentable message
/// as an error notification and returns that message.
pub fn report_error(reporter: &dyn Reporter, context: &str, error: &ApiError) -> String {
    let message = error.presentable_message();
    reporter.log(context, error);
    reporter.notify_error(&message);
    message
}

/// Terminal reporter: notifications go to stderr (stdout stays free for
/// command output), logs go to `tracing`.
#[derive(Debug, Default)]
pub struct ConsoleReporter {
    errors: AtomicUsize,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of error notifications shown so far.
    pub fn errors_reported(&self) -> usize {
        self.errors.load(Ordering::Relaxed)
    }
}

impl Reporter for ConsoleReporter {
    fn notify_success(&self, message: &str) {
        eprintln!("✔ {message}");
    }

    fn notify_error(&self, message: &str) {
        self.errors.fetch_add(1, Ordering::Relaxed);
        eprintln!("✖ {message}");
    }

    fn log(&self, context: &str, error: &dyn Error) {
        tracing::error!(context, error = %error, detail = ?error, "API error");
    }
}

/// One call made against a [`RecordingReporter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportEvent {
    Success(String),
    Error(String),
    Log { context: String, error: String },
}

/// Reporter that records calls in order instead of rendering anything.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<ReportEvent>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ReportEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn successes(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ReportEvent::Success(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ReportEvent::Error(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    /// `(context, error text)` pairs passed to `log`.
    pub fn logs(&self) -> Vec<(String, String)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ReportEvent::Log { context, error } => Some((context, error)),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: ReportEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event);
    }
}

impl Reporter for RecordingReporter {
    fn notify_success(&self, message: &str) {
        self.push(ReportEvent::Success(message.to_string()));
    }

    fn notify_error(&self, message: &str) {
        self.push(ReportEvent::Error(message.to_string()));
    }

    fn log(&self, context: &str, error: &dyn Error) {
        self.push(ReportEvent::Log {
            context: context.to_string(),
            error: format!("{error:?}"),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_error_logs_then_notifies_and_returns_message() {
        let reporter = RecordingReporter::new();
        let msg = report_error(&reporter, "fetch countries", &ApiError::HttpStatus(502));
        assert_eq!(msg, "HTTP error! Status: 502");
        assert_eq!(
            reporter.events(),
            vec![
                ReportEvent::Log {
                    context: "fetch countries".into(),
                    error: "HttpStatus(502)".into(),
                },
                ReportEvent::Error("HTTP error! Status: 502".into()),
            ]
        );
        assert!(reporter.successes().is_empty());
    }

    #[test]
    fn console_reporter_counts_errors() {
        let reporter = ConsoleReporter::new();
        reporter.notify_success("ok");
        assert_eq!(reporter.errors_reported(), 0);
        report_error(&reporter, "test", &ApiError::Timeout);
        assert_eq!(reporter.errors_reported(), 1);
    }

    #[test]
    fn log_keeps_original_error_detail() {
        let reporter = RecordingReporter::new();
        report_error(
            &reporter,
            "generate config",
            &ApiError::Network("Failed to connect to 127.0.0.1 port 1".into()),
        );
        let logs = reporter.logs();
        assert_eq!(logs.len(), 1);
        assert!(logs[0].1.contains("Failed to connect"));
        assert_eq!(reporter.errors().len(), 1);
        assert!(reporter.errors()[0].starts_with("Network error:"));
    }
}
