//! Run outcome notification
//!
//! Composes a single report message per run and delivers it through an
//! operator channel. Missing credentials skip delivery; delivery failures
//! are reported to the caller, which logs and swallows them.

pub mod message;
#[cfg(feature = "wecom")]
pub mod wecom;

use crate::core::config_store::ConfigUpdateResult;
use crate::core::network::types::{DiagnosticSummary, EvaluationOutcome};

pub use message::{build_message, MessageContent};
#[cfg(feature = "wecom")]
pub use wecom::WeComNotifier;

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Failed to obtain access token: {0}")]
    TokenFailed(String),
    #[error("HTTP request failed: {0}")]
    Http(String),
    #[error("API error: {message} (code: {code})")]
    Api { code: i64, message: String },
}

/// Everything a notifier needs to describe a run
#[derive(Debug, Clone)]
pub struct NotificationContext<'a> {
    pub diagnostic: &'a DiagnosticSummary,
    pub outcomes: &'a [EvaluationOutcome],
    pub config_update: &'a ConfigUpdateResult,
    /// Address configured before this run
    pub current_proxy: &'a str,
    pub all_failed: bool,
    /// Local timestamp shown in the message
    pub checked_at: String,
}

/// Delivery result of a notification attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyOutcome {
    Sent,
    /// Delivery not attempted (credentials unset or notifications disabled)
    Skipped(String),
    /// Delivery attempted and failed; the run continues
    Failed(String),
}

/// Operator channel seam
pub trait Notifier: Send + Sync {
    fn notify(&self, context: &NotificationContext<'_>) -> Result<NotifyOutcome, NotifyError>;
}

/// Notifier used when delivery is disabled
pub struct NoopNotifier {
    reason: String,
}

impl NoopNotifier {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Notifier for NoopNotifier {
    fn notify(&self, _context: &NotificationContext<'_>) -> Result<NotifyOutcome, NotifyError> {
        Ok(NotifyOutcome::Skipped(self.reason.clone()))
    }
}
