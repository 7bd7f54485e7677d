//! The UI shell the panels are shown in

use crate::monitor::{DisplayChange, MonitorView};
use std::sync::Mutex;

/// Operations the hosting UI offers to the panels.
///
/// Implementations must be cheap and non-blocking; they are called from the
/// refresh task.
pub trait PanelHost: Send + Sync {
    /// Replace the content of the current tab
    fn render_panel(&self, html: &str);

    /// Apply monitor changes to the already rendered tab
    fn update_monitor(&self, view: &MonitorView, changes: &[DisplayChange]);

    /// Show or hide the busy indicator
    fn set_busy(&self, busy: bool);

    /// Show a notification
    fn show_message(&self, message: &str);
}

/// Something a [`RecordingHost`] was asked to do
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// `render_panel`
    Rendered(String),
    /// `update_monitor`
    Updated(Vec<DisplayChange>),
    /// `set_busy`
    Busy(bool),
    /// `show_message`
    Message(String),
}

/// Host that records every call, for headless use and tests
#[derive(Debug, Default)]
pub struct RecordingHost {
    events: Mutex<Vec<HostEvent>>,
}

impl RecordingHost {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far
    pub fn events(&self) -> Vec<HostEvent> {
        self.lock().clone()
    }

    /// The most recently rendered panel
    pub fn last_render(&self) -> Option<String> {
        self.lock().iter().rev().find_map(|e| match e {
            HostEvent::Rendered(html) => Some(html.clone()),
            _ => None,
        })
    }

    /// Number of `update_monitor` calls
    pub fn update_count(&self) -> usize {
        self.lock()
            .iter()
            .filter(|e| matches!(e, HostEvent::Updated(_)))
            .count()
    }

    /// Forget everything recorded
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<HostEvent>> {
        // A panicked recorder still holds valid events
        self.events.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn push(&self, event: HostEvent) {
        self.lock().push(event);
    }
}

impl PanelHost for RecordingHost {
    fn render_panel(&self, html: &str) {
        self.push(HostEvent::Rendered(html.to_string()));
    }

    fn update_monitor(&self, _view: &MonitorView, changes: &[DisplayChange]) {
        self.push(HostEvent::Updated(changes.to_vec()));
    }

    fn set_busy(&self, busy: bool) {
        self.push(HostEvent::Busy(busy));
    }

    fn show_message(&self, message: &str) {
        self.push(HostEvent::Message(message.to_string()));
    }
}
