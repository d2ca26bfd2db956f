//! Single-slot transient message with auto-dismiss

use std::time::{Duration, Instant};

use serde::{Serialize, Serializer};

use crate::model::Severity;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Toast {
    pub severity: Severity,
    pub message: String,
    pub icon: &'static str,
    #[serde(skip)]
    pub shown_at: Instant,
}

fn icon_for(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "fas fa-exclamation-triangle",
        Severity::Warning => "fas fa-exclamation-circle",
        Severity::Info | Severity::Unknown => "fas fa-info-circle",
    }
}

/// Holds at most one toast. Showing a new one replaces the current one.
#[derive(Debug, Clone)]
pub struct ToastSlot {
    current: Option<Toast>,
    duration: Duration,
}

impl ToastSlot {
    pub fn new(duration: Duration) -> Self {
        Self {
            current: None,
            duration,
        }
    }

    pub fn show(&mut self, severity: Severity, message: impl Into<String>, now: Instant) {
        let message = message.into();
        tracing::debug!("Toast [{}]: {}", severity, message);
        self.current = Some(Toast {
            severity,
            message,
            icon: icon_for(severity),
            shown_at: now,
        });
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }

    /// Drop the toast once it has been visible for the configured duration
    pub fn prune(&mut self, now: Instant) {
        if let Some(toast) = &self.current {
            if now.saturating_duration_since(toast.shown_at) >= self.duration {
                self.current = None;
            }
        }
    }

    /// The toast visible at `now`, if any
    pub fn visible(&self, now: Instant) -> Option<&Toast> {
        self.current
            .as_ref()
            .filter(|t| now.saturating_duration_since(t.shown_at) < self.duration)
    }
}

impl Serialize for ToastSlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.current.serialize(serializer)
    }
}
