//! Monitor layout tables
//!
//! Which flags and messages the monitor shows, where, and with what bar
//! range. Ranges are not defined by OpenTherm; they are display ranges that
//! make sense for a typical installation.

use crate::catalog::{ByteSelector, FlagFamily};
use crate::render::UiGeneration;

/// Where an element sits on the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Absolutely positioned (UI5): label at `label_left`, value at `value_left`
    Absolute {
        /// Pixels from the top of the panel
        top: u16,
        /// Pixels from the left for the label
        label_left: u16,
        /// Pixels from the left for the value
        value_left: u16,
    },
    /// Cell of a responsive grid (UI7)
    Grid {
        /// Grid row
        row: u8,
        /// Grid column
        column: u8,
    },
}

/// Upper end of a bar range
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RangeMax {
    /// Fixed value
    Literal(f64),
    /// Current value of another message
    ReferenceTo(u8),
}

/// Bar range of a numeric message
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayRange {
    /// Value shown as an empty bar
    pub min: f64,
    /// Value shown as a full bar
    pub max: RangeMax,
}

impl DisplayRange {
    /// Range with literal bounds
    pub const fn literal(min: f64, max: f64) -> Self {
        Self {
            min,
            max: RangeMax::Literal(max),
        }
    }

    /// Range whose maximum is another message's value
    pub const fn referencing(min: f64, message: u8) -> Self {
        Self {
            min,
            max: RangeMax::ReferenceTo(message),
        }
    }
}

/// A flag or fault checkbox
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlagLayoutEntry {
    /// Status word the bit belongs to
    pub family: FlagFamily,
    /// Bit mask
    pub mask: u16,
    /// Placement
    pub position: Position,
}

/// A message value row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MessageLayoutEntry {
    /// OpenTherm data id
    pub id: u8,
    /// Byte to show for two-byte messages
    pub selector: Option<ByteSelector>,
    /// Bar range, for numeric rows that get a bar
    pub range: Option<DisplayRange>,
    /// Placement
    pub position: Position,
}

/// Complete monitor layout of one UI generation
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayLayout {
    /// Flag and fault checkboxes
    pub flags: Vec<FlagLayoutEntry>,
    /// Message rows
    pub messages: Vec<MessageLayoutEntry>,
}

// (id, selector, range)
type MessageRow = (u8, Option<ByteSelector>, Option<DisplayRange>);

// Rows of the UI7 grid: status flag, second status flag, fault flag.
const UI7_FLAG_ROWS: [(u16, u16, u16); 6] = [
    (0x0100, 0x0002, 0x0100), // CH enable, CH mode, service request
    (0x0200, 0x0004, 0x0200), // DHW enable, DHW mode, lockout-reset
    (0x0400, 0x0010, 0x0400), // cooling enable, cooling status, low water pressure
    (0x0800, 0x0008, 0x0800), // OTC active, flame status, gas/flame fault
    (0x1000, 0x0020, 0x1000), // CH2 enable, CH2 mode, air pressure fault
    (0x0001, 0x0040, 0x2000), // fault indication, diagnostic indication, water over-temperature
];

const UI7_MESSAGES: [MessageRow; 16] = [
    (24, None, Some(DisplayRange::literal(10.0, 30.0))),  // room temperature
    (26, None, Some(DisplayRange::literal(30.0, 100.0))), // DHW temperature
    (16, None, Some(DisplayRange::literal(10.0, 30.0))),  // room setpoint
    (56, None, Some(DisplayRange::literal(0.0, 100.0))),  // DHW setpoint
    (9, None, Some(DisplayRange::literal(10.0, 30.0))),   // remote override room setpoint
    (25, None, Some(DisplayRange::literal(30.0, 100.0))), // boiler water temperature
    (27, None, None),                                     // outside temperature
    (28, None, Some(DisplayRange::literal(30.0, 100.0))), // return water temperature
    (1, None, Some(DisplayRange::literal(0.0, 100.0))),   // control setpoint
    (57, None, Some(DisplayRange::literal(0.0, 100.0))),  // max CH water setpoint
    (17, None, Some(DisplayRange::referencing(0.0, 14))), // relative modulation, max = msg 14
    (18, None, Some(DisplayRange::literal(0.0, 5.0))),    // CH water pressure
    (14, None, Some(DisplayRange::literal(0.0, 100.0))),  // max relative modulation
    (23, None, Some(DisplayRange::literal(0.0, 100.0))),  // room setpoint CH2
    (5, Some(ByteSelector::Low), None),                   // OEM fault code
    (8, None, Some(DisplayRange::literal(0.0, 100.0))),   // control setpoint CH2
];

// (mask, top, label_left, value_left)
const UI5_STATUS_FLAGS: [(u16, u16, u16, u16); 12] = [
    (0x0100, 15, 30, 190),
    (0x0200, 30, 30, 190),
    (0x0400, 45, 30, 190),
    (0x0800, 60, 30, 190),
    (0x1000, 75, 30, 190),
    (0x0001, 90, 30, 190),
    (0x0002, 15, 235, 390),
    (0x0004, 30, 235, 390),
    (0x0008, 60, 235, 390),
    (0x0010, 45, 235, 390),
    (0x0020, 75, 235, 390),
    (0x0040, 90, 235, 390),
];

const UI5_FAULT_FLAGS: [(u16, u16, u16, u16); 6] = [
    (0x0100, 15, 435, 580),
    (0x0200, 30, 435, 580),
    (0x0400, 45, 435, 580),
    (0x0800, 60, 435, 580),
    (0x1000, 75, 435, 580),
    (0x2000, 90, 435, 580),
];

// ((id, selector, range), (top, label_left, value_left))
const UI5_MESSAGES: [(MessageRow, (u16, u16, u16)); 16] = [
    ((1, None, Some(DisplayRange::literal(0.0, 100.0))), (210, 30, 210)),
    ((5, Some(ByteSelector::Low), None), (270, 30, 210)),
    ((8, None, Some(DisplayRange::literal(0.0, 100.0))), (270, 335, 525)),
    ((9, None, Some(DisplayRange::literal(10.0, 30.0))), (170, 30, 210)),
    ((14, None, Some(DisplayRange::literal(0.0, 100.0))), (250, 30, 210)),
    ((16, None, Some(DisplayRange::literal(10.0, 30.0))), (150, 30, 210)),
    ((17, None, Some(DisplayRange::referencing(0.0, 14))), (230, 30, 210)),
    ((18, None, Some(DisplayRange::literal(0.0, 5.0))), (230, 335, 525)),
    ((23, None, Some(DisplayRange::literal(0.0, 100.0))), (250, 335, 525)),
    ((24, None, Some(DisplayRange::literal(10.0, 30.0))), (130, 30, 210)),
    ((25, None, Some(DisplayRange::literal(30.0, 100.0))), (170, 335, 525)),
    ((26, None, Some(DisplayRange::literal(30.0, 100.0))), (130, 335, 525)),
    ((27, None, None), (190, 30, 210)),
    ((28, None, Some(DisplayRange::literal(30.0, 100.0))), (190, 335, 525)),
    ((56, None, Some(DisplayRange::literal(0.0, 100.0))), (150, 335, 525)),
    ((57, None, Some(DisplayRange::literal(0.0, 100.0))), (210, 335, 525)),
];

impl DisplayLayout {
    /// Layout for a UI generation
    pub fn for_generation(generation: UiGeneration) -> Self {
        match generation {
            UiGeneration::Ui5 => Self::ui5(),
            UiGeneration::Ui7 => Self::ui7(),
        }
    }

    /// Absolute-positioned UI5 layout
    pub fn ui5() -> Self {
        let absolute = |(top, label_left, value_left): (u16, u16, u16)| Position::Absolute {
            top,
            label_left,
            value_left,
        };

        let flags = UI5_STATUS_FLAGS
            .iter()
            .map(|&(mask, top, l, v)| (FlagFamily::Status, mask, (top, l, v)))
            .chain(
                UI5_FAULT_FLAGS
                    .iter()
                    .map(|&(mask, top, l, v)| (FlagFamily::Fault, mask, (top, l, v))),
            )
            .map(|(family, mask, pos)| FlagLayoutEntry {
                family,
                mask,
                position: absolute(pos),
            })
            .collect();

        let messages = UI5_MESSAGES
            .iter()
            .map(|&((id, selector, range), pos)| MessageLayoutEntry {
                id,
                selector,
                range,
                position: absolute(pos),
            })
            .collect();

        Self { flags, messages }
    }

    /// Grid-based UI7 layout: three flag columns, two message columns
    pub fn ui7() -> Self {
        let mut flags = Vec::with_capacity(UI7_FLAG_ROWS.len() * 3);
        for (row, &(first, second, fault)) in UI7_FLAG_ROWS.iter().enumerate() {
            let row = row as u8;
            let cells = [
                (FlagFamily::Status, first),
                (FlagFamily::Status, second),
                (FlagFamily::Fault, fault),
            ];
            for (column, (family, mask)) in cells.into_iter().enumerate() {
                flags.push(FlagLayoutEntry {
                    family,
                    mask,
                    position: Position::Grid {
                        row,
                        column: column as u8,
                    },
                });
            }
        }

        let messages = UI7_MESSAGES
            .iter()
            .enumerate()
            .map(|(i, &(id, selector, range))| MessageLayoutEntry {
                id,
                selector,
                range,
                position: Position::Grid {
                    row: (i / 2) as u8,
                    column: (i % 2) as u8,
                },
            })
            .collect();

        Self { flags, messages }
    }

    /// Flags of one family, in layout order
    pub fn flags_of(&self, family: FlagFamily) -> impl Iterator<Item = &FlagLayoutEntry> {
        self.flags.iter().filter(move |f| f.family == family)
    }

    /// Layout row of message `id`
    pub fn message(&self, id: u8) -> Option<&MessageLayoutEntry> {
        self.messages.iter().find(|m| m.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generations_show_the_same_data() {
        let ui5 = DisplayLayout::ui5();
        let ui7 = DisplayLayout::ui7();

        let ids = |l: &DisplayLayout| l.messages.iter().map(|m| m.id).collect::<HashSet<_>>();
        assert_eq!(ids(&ui5), ids(&ui7));

        let flags = |l: &DisplayLayout| {
            l.flags
                .iter()
                .map(|f| (f.family, f.mask))
                .collect::<HashSet<_>>()
        };
        assert_eq!(flags(&ui5), flags(&ui7));
        assert_eq!(ui7.flags_of(FlagFamily::Fault).count(), 6);
        assert_eq!(ui7.flags_of(FlagFamily::Status).count(), 12);
    }

    #[test]
    fn test_modulation_max_references_message_14() {
        let layout = DisplayLayout::ui7();
        let row = layout.message(17).unwrap();
        assert_eq!(row.range.unwrap().max, RangeMax::ReferenceTo(14));
        assert_eq!(layout.message(5).unwrap().selector, Some(ByteSelector::Low));
        assert!(layout.message(27).unwrap().range.is_none());
    }
}
