/*!
 * User-visible notifications.
 *
 * The orchestrator reports progress through a `Notifier`. Notifications are
 * observable side effects only; a headless caller can drop them.
 */

use log::{error, info};
use parking_lot::Mutex;

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyLevel {
    Info,
    Error,
}

/// Sink for short user-visible messages
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, level: NotifyLevel);

    fn info(&self, message: &str) {
        self.notify(message, NotifyLevel::Info);
    }

    fn error(&self, message: &str) {
        self.notify(message, NotifyLevel::Error);
    }
}

/// Forwards notifications to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str, level: NotifyLevel) {
        match level {
            NotifyLevel::Info => info!("{}", message),
            NotifyLevel::Error => error!("{}", message),
        }
    }
}

/// Keeps every notification for later inspection
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<(NotifyLevel, String)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<(NotifyLevel, String)> {
        self.messages.lock().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.messages
            .lock()
            .iter()
            .filter(|(level, _)| *level == NotifyLevel::Error)
            .map(|(_, message)| message.clone())
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str, level: NotifyLevel) {
        self.messages.lock().push((level, message.to_string()));
    }
}
