//! User-facing status notifications.
//!
//! Every authoring step that succeeds, degrades or fails reports through a
//! [`StatusReporter`], keeping the editor logic decoupled from how the
//! message is shown.

use std::sync::RwLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Warning,
    Error,
}

pub trait StatusReporter: Send + Sync {
    fn show(&self, level: StatusLevel, message: &str);

    fn info(&self, message: &str) {
        self.show(StatusLevel::Info, message);
    }

    fn success(&self, message: &str) {
        self.show(StatusLevel::Success, message);
    }

    fn warn(&self, message: &str) {
        self.show(StatusLevel::Warning, message);
    }

    fn error(&self, message: &str) {
        self.show(StatusLevel::Error, message);
    }
}

/// A no-op reporter.
pub struct NullReporter;

impl StatusReporter for NullReporter {
    fn show(&self, _level: StatusLevel, _message: &str) {}
}

/// Prints to stderr.
pub struct SimpleReporter;

impl StatusReporter for SimpleReporter {
    fn show(&self, level: StatusLevel, message: &str) {
        let emoji = match level {
            StatusLevel::Info => "📋",
            StatusLevel::Success => "✅",
            StatusLevel::Warning => "⚠️ ",
            StatusLevel::Error => "❌",
        };
        eprintln!("{emoji} {message}");
    }
}

/// Keeps every message in order. Used by tests and by callers that render
/// the notifications themselves.
#[derive(Default)]
pub struct RecordingReporter {
    messages: RwLock<Vec<(StatusLevel, String)>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<(StatusLevel, String)> {
        self.messages
            .read()
            .map(|messages| messages.clone())
            .unwrap_or_default()
    }

    pub fn count(&self, level: StatusLevel) -> usize {
        self.messages()
            .iter()
            .filter(|(l, _)| *l == level)
            .count()
    }
}

impl StatusReporter for RecordingReporter {
    fn show(&self, level: StatusLevel, message: &str) {
        if let Ok(mut messages) = self.messages.write() {
            messages.push((level, message.to_owned()));
        }
    }
}
