//! Notification timing
//!
//! A notification enters, stays visible for a fixed time, then runs an exit
//! transition and hides. A new notification replaces the current one
//! outright: the previous timer is aborted, nothing is queued.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

use super::Toast;

/// Lifecycle of a displayed notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastPhase {
    Entering,
    Visible,
    Exiting,
    Hidden,
}

/// Draws a notification in a given phase
pub trait ToastSink: Send + Sync + 'static {
    fn show(&self, toast: &Toast, phase: ToastPhase);
}

/// Drives notifications through their phases on a timer
pub struct Notifier {
    sink: Arc<dyn ToastSink>,
    visible: Duration,
    exit: Duration,
    current: Mutex<Option<JoinHandle<()>>>,
}

impl Notifier {
    pub fn new(sink: Arc<dyn ToastSink>, visible: Duration, exit: Duration) -> Self {
        Self {
            sink,
            visible,
            exit,
            current: Mutex::new(None),
        }
    }

    /// Shows `toast`, replacing whatever is on screen
    ///
    /// Must be called from within a tokio runtime.
    pub fn show(&self, toast: Toast) {
        let mut current = self.current.lock().unwrap();
        if let Some(previous) = current.take() {
            previous.abort();
        }

        self.sink.show(&toast, ToastPhase::Entering);

        let sink = Arc::clone(&self.sink);
        let (visible, exit) = (self.visible, self.exit);

        *current = Some(tokio::spawn(async move {
            sink.show(&toast, ToastPhase::Visible);
            tokio::time::sleep(visible).await;
            sink.show(&toast, ToastPhase::Exiting);
            tokio::time::sleep(exit).await;
            sink.show(&toast, ToastPhase::Hidden);
        }));
    }
}

impl Drop for Notifier {
    fn drop(&mut self) {
        if let Some(handle) = self.current.lock().unwrap().take() {
            handle.abort();
        }
    }
}
