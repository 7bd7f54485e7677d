//! One refresh tick of the monitor
//!
//! A tick reads every variable the view shows and mutates only what
//! differs from what is already displayed.

use super::view::{BarState, DisplayChange, DisplayState, MessageRow, MonitorView, UNKNOWN_VALUE};
use crate::catalog::MessageCatalog;
use crate::controller::DeviceId;
use crate::gauge::{gradient_color, percentage, BarMode};
use crate::label::is_celsius;
use crate::layout::RangeMax;
use crate::variables::VariableAccessor;
use std::sync::Arc;

/// Variable holding the comma-separated error counters
pub const ERRORS_VARIABLE: &str = "Errors";

/// Reconciles a [`MonitorView`] with the controller
#[derive(Clone)]
pub struct RefreshEngine {
    vars: VariableAccessor,
    device: DeviceId,
    catalog: Arc<MessageCatalog>,
}

impl RefreshEngine {
    /// Engine reading `device` through `vars`; `catalog` resolves referenced ranges
    pub fn new(vars: VariableAccessor, device: DeviceId, catalog: Arc<MessageCatalog>) -> Self {
        Self {
            vars,
            device,
            catalog,
        }
    }

    /// Device being monitored
    pub fn device(&self) -> DeviceId {
        self.device
    }

    /// Run one tick and return what changed
    pub async fn tick(&self, view: &mut MonitorView) -> Vec<DisplayChange> {
        let mut changes = Vec::new();
        self.refresh_flags(view, &mut changes).await;
        self.refresh_messages(view, &mut changes).await;
        self.refresh_errors(view, &mut changes).await;
        tracing::debug!(device = %self.device, changes = changes.len(), "monitor tick");
        changes
    }

    async fn refresh_flags(&self, view: &mut MonitorView, changes: &mut Vec<DisplayChange>) {
        for cell in &mut view.flags {
            let checked = self.vars.get(self.device, &cell.variable).await == "1";
            if cell.checked != checked {
                cell.checked = checked;
                changes.push(DisplayChange::FlagChecked {
                    family: cell.family,
                    mask: cell.mask,
                    checked,
                });
            }
        }
    }

    async fn refresh_messages(&self, view: &mut MonitorView, changes: &mut Vec<DisplayChange>) {
        let bars = view.bars;
        for row in &mut view.messages {
            let value = self.vars.get(self.device, &row.variable).await;
            if value.is_empty() {
                mark_unknown(row, changes);
                continue;
            }

            if row.state == DisplayState::Unknown {
                changes.push(DisplayChange::ValueRestored { id: row.id });
            }
            row.state = DisplayState::Known;

            if value == row.value {
                if row.emphasized {
                    row.emphasized = false;
                    changes.push(DisplayChange::EmphasisCleared { id: row.id });
                }
                continue;
            }

            row.value = value;
            row.emphasized = true;
            changes.push(DisplayChange::ValueChanged {
                id: row.id,
                value: row.value.clone(),
            });

            if row.bar.is_some() {
                self.refresh_bar(row, bars, changes).await;
            }
        }
    }

    async fn refresh_bar(&self, row: &mut MessageRow, bars: BarMode, changes: &mut Vec<DisplayChange>) {
        let Some(range) = row.range else {
            return;
        };
        let Some(max) = self.resolve_max(range.max).await else {
            tracing::debug!(id = row.id, "bar maximum not available, keeping bar");
            return;
        };

        let width = percentage(parse_number(&row.value).unwrap_or(f64::NAN), range.min, max);
        let color = (bars == BarMode::TemperatureRelative && is_celsius(&row.text.unit))
            .then(|| gradient_color(width));

        let bar = row.bar.get_or_insert_with(BarState::default);
        if bar.width != width {
            bar.width = width;
            changes.push(DisplayChange::BarWidth { id: row.id, width });
        }
        if let Some(color) = color {
            if bar.color != Some(color) {
                bar.color = Some(color);
                changes.push(DisplayChange::BarColor { id: row.id, color });
            }
        }
    }

    async fn resolve_max(&self, max: RangeMax) -> Option<f64> {
        match max {
            RangeMax::Literal(max) => Some(max),
            RangeMax::ReferenceTo(id) => {
                let variable = self.catalog.get(id)?.variable_for(None)?;
                parse_number(&self.vars.get(self.device, variable).await)
            }
        }
    }

    async fn refresh_errors(&self, view: &mut MonitorView, changes: &mut Vec<DisplayChange>) {
        let value = self.vars.get(self.device, ERRORS_VARIABLE).await;
        for (slot, (item, error)) in value.split(',').zip(view.errors.iter_mut()).enumerate() {
            let item = item.trim();
            if error.value != item {
                error.value = item.to_string();
                changes.push(DisplayChange::ErrorCount {
                    slot,
                    value: error.value.clone(),
                });
            }
        }
    }
}

fn mark_unknown(row: &mut MessageRow, changes: &mut Vec<DisplayChange>) {
    if row.state == DisplayState::Unknown {
        return;
    }
    row.state = DisplayState::Unknown;
    row.value = UNKNOWN_VALUE.to_string();
    if let Some(bar) = row.bar.as_mut() {
        bar.width = 0;
    }
    changes.push(DisplayChange::ValueUnknown { id: row.id });
}

/// Leading decimal number of `text` (`"22.5"`, `" 63 %"`); `None` when there is none
pub(crate) fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    let end = text
        .char_indices()
        .take_while(|&(i, c)| c.is_ascii_digit() || c == '.' || (i == 0 && (c == '-' || c == '+')))
        .map(|(i, c)| i + c.len_utf8())
        .last()?;
    text[..end].parse().ok()
}
