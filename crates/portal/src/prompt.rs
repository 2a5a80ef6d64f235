//! User interaction seams: confirmation prompts and transient notifications.

use std::io::{self, BufRead, Write};
use std::sync::Mutex;

/// Asks the user a yes/no question before a destructive action.
pub trait Confirm: Send + Sync {
    fn confirm(&self, question: &str) -> bool;
}

/// Fixed answer; for non-interactive runs and tests.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AutoConfirm(pub bool);

impl Confirm for AutoConfirm {
    fn confirm(&self, _question: &str) -> bool {
        self.0
    }
}

/// Prompts on stderr and reads one line from stdin. Only `y`/`yes` confirm.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, question: &str) -> bool {
        let mut err = io::stderr().lock();
        let _ = write!(err, "{question} [y/N] ");
        let _ = err.flush();

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line).is_err() {
            return false;
        }
        matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
}

/// Short-lived user-facing message (a toast, a status line).
pub trait Notifier: Send + Sync {
    fn notify(&self, level: Level, message: &str);

    fn success(&self, message: &str) {
        self.notify(Level::Success, message)
    }

    fn error(&self, message: &str) {
        self.notify(Level::Error, message)
    }
}

/// Routes notifications into the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, level: Level, message: &str) {
        match level {
            Level::Success => tracing::info!(notice = message),
            Level::Error => tracing::error!(notice = message),
        }
    }
}

/// Keeps every notification in order.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<(Level, String)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seen(&self) -> Vec<(Level, String)> {
        self.seen.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.seen().into_iter().map(|(_, m)| m).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, level: Level, message: &str) {
        self.seen
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((level, message.to_string()));
    }
}

impl<T: Confirm + ?Sized> Confirm for &T {
    fn confirm(&self, question: &str) -> bool {
        (**self).confirm(question)
    }
}

impl<T: Notifier + ?Sized> Notifier for &T {
    fn notify(&self, level: Level, message: &str) {
        (**self).notify(level, message)
    }
}

impl<T: Notifier + ?Sized> Notifier for std::sync::Arc<T> {
    fn notify(&self, level: Level, message: &str) {
        (**self).notify(level, message)
    }
}
