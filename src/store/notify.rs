//! User-feedback seam for mutations.
//!
//! The stores emit exactly one notification per mutation outcome; query
//! failures emit none (background refetches would otherwise spam the user).

use parking_lot::Mutex;

/// Receives mutation feedback. The UI layer renders these as toasts; the
/// library default just logs.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Log-backed notifier.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn success(&self, message: &str) {
        log::info!("{}", message);
    }

    fn error(&self, message: &str) {
        log::warn!("{}", message);
    }
}

/// Buffering notifier for tests: records every notification in order.
#[derive(Default)]
pub struct BufferNotifier {
    events: Mutex<Vec<(bool, String)>>,
}

impl BufferNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn successes(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter(|(ok, _)| *ok)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter(|(ok, _)| !*ok)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn count(&self) -> usize {
        self.events.lock().len()
    }
}

impl Notifier for BufferNotifier {
    fn success(&self, message: &str) {
        self.events.lock().push((true, message.to_string()));
    }

    fn error(&self, message: &str) {
        self.events.lock().push((false, message.to_string()));
    }
}
