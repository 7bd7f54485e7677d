//! Monitor view model
//!
//! The rendered state of the Monitor tab: one cell per flag, one row per
//! message and four error counters. The refresh engine mutates it in place
//! and reports every mutation as a [`DisplayChange`].

use crate::catalog::{ByteSelector, FlagFamily, MessageCatalog};
use crate::gauge::{BarMode, Rgb};
use crate::label::{resolve_label, ResolvedLabel};
use crate::layout::{DisplayLayout, DisplayRange};
use crate::render::html::build_id;

/// Text shown while a value is unknown
pub const UNKNOWN_VALUE: &str = "???";

/// Number of error counters the gateway keeps
pub const ERROR_SLOTS: usize = 4;

/// Whether a message row currently shows a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayState {
    /// Rendered but not reconciled with the controller yet
    #[default]
    Stale,
    /// The controller has no value; the row is dimmed
    Unknown,
    /// The row shows the controller's value
    Known,
}

/// Flag or fault checkbox
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagCell {
    /// Status word the bit belongs to
    pub family: FlagFamily,
    /// Bit mask
    pub mask: u16,
    /// Display text
    pub label: String,
    /// Variable holding the bit
    pub variable: String,
    /// Checkbox state
    pub checked: bool,
}

impl FlagCell {
    /// Element id of the checkbox
    pub fn check_id(&self) -> String {
        build_id(&[self.family.id_prefix(), "check", &self.mask.to_string()])
    }

    /// Element id of the label
    pub fn label_id(&self) -> String {
        build_id(&[self.family.id_prefix(), &self.mask.to_string()])
    }
}

/// Bar gauge of a message row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BarState {
    /// Width in percent
    pub width: u8,
    /// Fill colour, when temperature-relative colouring applies
    pub color: Option<Rgb>,
}

/// One message value row
#[derive(Debug, Clone, PartialEq)]
pub struct MessageRow {
    /// OpenTherm data id
    pub id: u8,
    /// Byte shown for two-byte messages
    pub selector: Option<ByteSelector>,
    /// Label and unit, resolved once when the view is built
    pub text: ResolvedLabel,
    /// Variable the value is read from
    pub variable: String,
    /// Bar range
    pub range: Option<DisplayRange>,
    /// Displayed value text
    pub value: String,
    /// Known/unknown tracking
    pub state: DisplayState,
    /// Shown bold because the value just changed
    pub emphasized: bool,
    /// Bar, when bars are enabled and the row has a range
    pub bar: Option<BarState>,
}

impl MessageRow {
    /// Element id of the label
    pub fn label_id(&self) -> String {
        build_id(&["msg", &self.id.to_string()])
    }

    /// Element id of the value
    pub fn value_id(&self) -> String {
        build_id(&["msgval", &self.id.to_string()])
    }

    /// Element id of the unit
    pub fn unit_id(&self) -> String {
        build_id(&["msgunit", &self.id.to_string()])
    }

    /// Element id of the bar
    pub fn bar_id(&self) -> String {
        build_id(&["msgbar", &self.id.to_string()])
    }

    /// Whether the row is dimmed
    pub fn is_dimmed(&self) -> bool {
        self.state == DisplayState::Unknown
    }
}

/// One error counter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorSlot {
    /// `Error 01:` .. `Error 04:`
    pub label: String,
    /// Counter text
    pub value: String,
}

/// A mutation of the monitor view
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayChange {
    /// Checkbox toggled
    FlagChecked {
        /// Status word
        family: FlagFamily,
        /// Bit mask
        mask: u16,
        /// New state
        checked: bool,
    },
    /// Row dimmed and showing the unknown placeholder
    ValueUnknown {
        /// Message id
        id: u8,
    },
    /// Dimming removed because a value came back
    ValueRestored {
        /// Message id
        id: u8,
    },
    /// New value text, shown emphasised
    ValueChanged {
        /// Message id
        id: u8,
        /// New text
        value: String,
    },
    /// Emphasis removed after a steady tick
    EmphasisCleared {
        /// Message id
        id: u8,
    },
    /// Bar width changed
    BarWidth {
        /// Message id
        id: u8,
        /// Width in percent
        width: u8,
    },
    /// Bar colour changed
    BarColor {
        /// Message id
        id: u8,
        /// New fill colour
        color: Rgb,
    },
    /// Error counter text changed
    ErrorCount {
        /// Slot index (0-based)
        slot: usize,
        /// New text
        value: String,
    },
}

impl DisplayChange {
    /// Id of the element this change touches
    pub fn element_id(&self) -> String {
        match self {
            DisplayChange::FlagChecked { family, mask, .. } => {
                build_id(&[family.id_prefix(), "check", &mask.to_string()])
            }
            DisplayChange::ValueUnknown { id }
            | DisplayChange::ValueRestored { id }
            | DisplayChange::ValueChanged { id, .. }
            | DisplayChange::EmphasisCleared { id } => build_id(&["msgval", &id.to_string()]),
            DisplayChange::BarWidth { id, .. } | DisplayChange::BarColor { id, .. } => {
                build_id(&["msgbar", &id.to_string()])
            }
            DisplayChange::ErrorCount { slot, .. } => build_id(&["errval", &slot.to_string()]),
        }
    }
}

/// Rendered state of the Monitor tab
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorView {
    /// Bar drawing mode read when the tab was opened
    pub bars: BarMode,
    /// Flag and fault checkboxes in layout order
    pub flags: Vec<FlagCell>,
    /// Message rows in layout order
    pub messages: Vec<MessageRow>,
    /// Error counters
    pub errors: Vec<ErrorSlot>,
}

impl MonitorView {
    /// Build the view for `layout`, labelling everything from `catalog`.
    ///
    /// Layout entries the catalog does not define are left out.
    pub fn build(layout: &DisplayLayout, catalog: &MessageCatalog, bars: BarMode) -> Self {
        let flags = layout
            .flags
            .iter()
            .filter_map(|entry| {
                let Some(def) = catalog.flag(entry.family, entry.mask) else {
                    tracing::debug!(family = ?entry.family, mask = entry.mask, "flag not in catalog, skipping");
                    return None;
                };
                Some(FlagCell {
                    family: entry.family,
                    mask: entry.mask,
                    label: def.text.clone(),
                    variable: def.variable.clone(),
                    checked: false,
                })
            })
            .collect();

        let messages = layout
            .messages
            .iter()
            .filter_map(|entry| {
                let def = catalog.get(entry.id)?;
                let Some(variable) = def.variable_for(entry.selector) else {
                    tracing::debug!(id = entry.id, "message has no variable, skipping");
                    return None;
                };
                let bar = (bars.enabled() && entry.range.is_some()).then(BarState::default);
                Some(MessageRow {
                    id: entry.id,
                    selector: entry.selector,
                    text: resolve_label(&def.text, entry.selector),
                    variable: variable.to_string(),
                    range: entry.range,
                    value: String::new(),
                    state: DisplayState::Stale,
                    emphasized: false,
                    bar,
                })
            })
            .collect();

        let errors = (1..=ERROR_SLOTS)
            .map(|n| ErrorSlot {
                label: format!("Error {n:02}:"),
                value: String::new(),
            })
            .collect();

        Self {
            bars,
            flags,
            messages,
            errors,
        }
    }

    /// Row of message `id`
    pub fn message(&self, id: u8) -> Option<&MessageRow> {
        self.messages.iter().find(|m| m.id == id)
    }

    /// Checkbox of `family`/`mask`
    pub fn flag(&self, family: FlagFamily, mask: u16) -> Option<&FlagCell> {
        self.flags
            .iter()
            .find(|f| f.family == family && f.mask == mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{MessageDefinition, MessageVariable};
    use std::collections::BTreeMap;

    fn message(id: u8, text: &str, var: &str) -> MessageDefinition {
        MessageDefinition {
            id,
            text: text.to_string(),
            variable: Some(MessageVariable::Single(var.to_string())),
            child: false,
            flags: BTreeMap::new(),
        }
    }

    #[test]
    fn test_missing_definitions_are_skipped() {
        let catalog = MessageCatalog::new([message(24, "Room temperature (°C)", "RoomTemperature")]);
        let view = MonitorView::build(&DisplayLayout::ui7(), &catalog, BarMode::SingleColor);

        assert!(view.flags.is_empty());
        assert_eq!(view.messages.len(), 1);
        let row = view.message(24).unwrap();
        assert_eq!(row.text.label, "Room temperature");
        assert_eq!(row.text.unit, "°C");
        assert_eq!(row.state, DisplayState::Stale);
        assert!(row.bar.is_some());
        assert_eq!(view.errors[3].label, "Error 04:");
    }

    #[test]
    fn test_no_bars_when_off() {
        let catalog = MessageCatalog::new([message(24, "Room temperature (°C)", "RoomTemperature")]);
        let view = MonitorView::build(&DisplayLayout::ui7(), &catalog, BarMode::Off);
        assert!(view.message(24).unwrap().bar.is_none());
    }

    #[test]
    fn test_element_ids() {
        let change = DisplayChange::BarWidth { id: 17, width: 50 };
        assert_eq!(change.element_id(), "otgJS_msgbar17");
        let change = DisplayChange::ErrorCount {
            slot: 2,
            value: "1".to_string(),
        };
        assert_eq!(change.element_id(), "otgJS_errval2");
    }
}
