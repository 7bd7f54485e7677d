//! Prints panel activity to the terminal

use chrono::Local;
use otgw_panel_core::host::PanelHost;
use otgw_panel_core::monitor::{DisplayChange, MonitorView};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Host that writes monitor changes as timestamped lines on stdout
#[derive(Debug, Default)]
pub struct TerminalHost {
    renders: AtomicUsize,
}

impl TerminalHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Print every row of `view` once, as a snapshot
    pub fn print_view(&self, view: &MonitorView) {
        for flag in &view.flags {
            println!("  [{}] {}", if flag.checked { 'x' } else { ' ' }, flag.label);
        }
        for row in &view.messages {
            println!("  {:<36} {} {}", row.text.label, row.value, row.text.unit);
        }
        for slot in &view.errors {
            println!("  {} {}", slot.label, slot.value);
        }
    }
}

fn timestamp() -> String {
    Local::now().format("%H:%M:%S").to_string()
}

impl PanelHost for TerminalHost {
    fn render_panel(&self, html: &str) {
        let n = self.renders.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::debug!(render = n, bytes = html.len(), "panel rendered");
    }

    fn update_monitor(&self, view: &MonitorView, changes: &[DisplayChange]) {
        let at = timestamp();
        for change in changes {
            match change {
                DisplayChange::ValueChanged { id, value } => {
                    let (label, unit) = view
                        .message(*id)
                        .map(|row| (row.text.label.as_str(), row.text.unit.as_str()))
                        .unwrap_or(("", ""));
                    println!("{at} {label:<36} {value} {unit}");
                }
                DisplayChange::ValueUnknown { id } => {
                    let label = view.message(*id).map_or("", |row| row.text.label.as_str());
                    println!("{at} {label:<36} ???");
                }
                DisplayChange::FlagChecked {
                    family,
                    mask,
                    checked,
                } => {
                    let label = view.flag(*family, *mask).map_or("", |f| f.label.as_str());
                    println!("{at} {label:<36} {}", if *checked { "on" } else { "off" });
                }
                DisplayChange::ErrorCount { slot, value } => {
                    let label = view.errors.get(*slot).map_or("", |s| s.label.as_str());
                    println!("{at} {label:<36} {value}");
                }
                other => tracing::trace!(element = %other.element_id(), "display change"),
            }
        }
    }

    fn set_busy(&self, busy: bool) {
        if busy {
            eprintln!("Waiting for the controller to reload...");
        }
    }

    fn show_message(&self, message: &str) {
        println!("{message}");
    }
}
