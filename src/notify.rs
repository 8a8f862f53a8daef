use std::sync::Mutex;

use colored::Colorize;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Default,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: Variant,
}

impl Notification {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self { title: title.into(), description: description.into(), variant: Variant::Default }
    }

    pub fn failure(description: impl Into<String>) -> Self {
        Self { title: "Error".into(), description: description.into(), variant: Variant::Destructive }
    }
}

/// Where user-facing load notices go.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Writes notices to the tracing log only.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, n: Notification) {
        match n.variant {
            Variant::Default => info!(title = %n.title, "{}", n.description),
            Variant::Destructive => warn!(title = %n.title, "{}", n.description),
        }
    }
}

/// Prints notices to stderr so they stay out of piped card output.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, n: Notification) {
        let title = match n.variant {
            Variant::Default => n.title.green().bold(),
            Variant::Destructive => n.title.red().bold(),
        };
        eprintln!("{title}: {}", n.description);
    }
}

/// Collects notices in memory.
#[derive(Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn notifications(&self) -> Vec<Notification> {
        self.seen.lock().map(|seen| seen.clone()).unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(notification);
        }
    }
}
