//! Transient status notice.

use std::time::{Duration, Instant};

use serde::Serialize;

/// Severity of a status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// The action succeeded.
    Success,
    /// The action was rejected.
    Error,
}

/// Text shown in the notice area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusMessage {
    /// Message text.
    pub text: String,
    /// Severity tag.
    pub severity: Severity,
}

/// The single notice area.
///
/// Each new message restarts one hide deadline; earlier deadlines are
/// discarded, so a message is always visible for the full timeout.
#[derive(Debug, Clone)]
pub struct StatusNotice {
    message: Option<StatusMessage>,
    hide_at: Option<Instant>,
    timeout: Duration,
}

impl StatusNotice {
    /// Create an empty notice whose messages stay visible for `timeout`.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            message: None,
            hide_at: None,
            timeout,
        }
    }

    /// Show `text` and restart the hide deadline from `now`.
    pub fn show(&mut self, text: impl Into<String>, severity: Severity, now: Instant) {
        let message = StatusMessage {
            text: text.into(),
            severity,
        };
        tracing::debug!(text = %message.text, ?severity, "status shown");
        self.message = Some(message);
        self.hide_at = Some(now + self.timeout);
    }

    /// Hide the message if its deadline has passed. Returns whether it was hidden.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.hide_at {
            Some(deadline) if now >= deadline => {
                self.hide_at = None;
                true
            }
            _ => false,
        }
    }

    /// The message, while visible.
    #[must_use]
    pub fn visible(&self) -> Option<&StatusMessage> {
        self.hide_at.and(self.message.as_ref())
    }

    /// When the visible message will be hidden.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.hide_at
    }
}
