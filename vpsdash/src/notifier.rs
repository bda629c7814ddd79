//! Transient feedback line: at most one message, last writer wins.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub message: String,
    pub severity: Severity,
    pub expires_at: Instant,
}

#[derive(Debug)]
pub struct Notifier {
    current: Option<Toast>,
    ttl: Duration,
}

impl Notifier {
    pub fn new(ttl: Duration) -> Self {
        Self { current: None, ttl }
    }

    pub fn notify(&mut self, message: impl Into<String>, severity: Severity, now: Instant) {
        let message = message.into();
        tracing::debug!(?severity, %message, "notify");
        self.current = Some(Toast {
            message,
            severity,
            expires_at: now + self.ttl,
        });
    }

    pub fn info(&mut self, message: impl Into<String>, now: Instant) {
        self.notify(message, Severity::Info, now);
    }

    pub fn success(&mut self, message: impl Into<String>, now: Instant) {
        self.notify(message, Severity::Success, now);
    }

    pub fn error(&mut self, message: impl Into<String>, now: Instant) {
        self.notify(message, Severity::Error, now);
    }

    /// Drop the message once its time is up. Returns true if one was removed.
    pub fn expire(&mut self, now: Instant) -> bool {
        match &self.current {
            Some(t) if t.expires_at <= now => {
                self.current = None;
                true
            }
            _ => false,
        }
    }

    pub fn current(&self) -> Option<&Toast> {
        self.current.as_ref()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.current.as_ref().map(|t| t.expires_at)
    }
}
