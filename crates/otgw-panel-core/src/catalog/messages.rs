//! Message and flag definitions (`GetMessages`)

use super::{keyed_entries, scalar_text, CatalogError};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Which half of a two-byte message a display row shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteSelector {
    /// High byte (`hb`)
    High,
    /// Low byte (`lb`)
    Low,
}

impl ByteSelector {
    /// Parse the `hb`/`lb` markers used by the plugin
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "hb" => Some(ByteSelector::High),
            "lb" => Some(ByteSelector::Low),
            _ => None,
        }
    }

    /// Marker as used in variable tables
    pub fn as_str(&self) -> &'static str {
        match self {
            ByteSelector::High => "hb",
            ByteSelector::Low => "lb",
        }
    }
}

impl fmt::Display for ByteSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State variable(s) a message is stored in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageVariable {
    /// One variable for the whole message
    Single(String),
    /// Separate variables for the high and low byte
    Split {
        /// High byte variable
        hb: String,
        /// Low byte variable
        lb: String,
    },
}

impl MessageVariable {
    /// Variable to read for a row showing `selector`.
    ///
    /// Split messages without a selector show the high byte.
    pub fn select(&self, selector: Option<ByteSelector>) -> &str {
        match (self, selector) {
            (MessageVariable::Single(name), _) => name,
            (MessageVariable::Split { lb, .. }, Some(ByteSelector::Low)) => lb,
            (MessageVariable::Split { hb, .. }, _) => hb,
        }
    }
}

/// Family of status bits shown on the monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FlagFamily {
    /// Master/slave status flags (message 0)
    Status,
    /// Application-specific fault flags (message 5)
    Fault,
}

impl FlagFamily {
    /// Message whose flag table defines this family
    pub fn source_message(&self) -> u8 {
        match self {
            FlagFamily::Status => 0,
            FlagFamily::Fault => 5,
        }
    }

    /// Prefix used in element ids
    pub fn id_prefix(&self) -> &'static str {
        match self {
            FlagFamily::Status => "flag",
            FlagFamily::Fault => "fault",
        }
    }
}

/// One bit of a status word
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagDefinition {
    /// Bit mask within the 16-bit status word
    pub mask: u16,
    /// Display text
    pub text: String,
    /// Variable holding `"1"` when the bit is set
    pub variable: String,
}

/// One OpenTherm data point tracked by the plugin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDefinition {
    /// OpenTherm data id
    pub id: u8,
    /// Display text, possibly with a unit in parentheses and an `&`-joined byte pair
    pub text: String,
    /// Backing variable(s)
    pub variable: Option<MessageVariable>,
    /// Whether the message can be exposed as a child device
    pub child: bool,
    /// Flag table, for status words
    pub flags: BTreeMap<u16, FlagDefinition>,
}

impl MessageDefinition {
    /// Variable to read for `selector`, if the message has one
    pub fn variable_for(&self, selector: Option<ByteSelector>) -> Option<&str> {
        self.variable.as_ref().map(|v| v.select(selector))
    }
}

/// All message definitions of one gateway
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageCatalog {
    messages: BTreeMap<u8, MessageDefinition>,
}

impl MessageCatalog {
    /// Highest message id offered as a child device
    pub const MAX_CHILD_MESSAGE: u8 = 128;

    /// Build a catalog from parsed definitions
    pub fn new(messages: impl IntoIterator<Item = MessageDefinition>) -> Self {
        Self {
            messages: messages.into_iter().map(|m| (m.id, m)).collect(),
        }
    }

    /// Parse the `GetMessages` response.
    ///
    /// Keys that are not message numbers are ignored.
    pub fn from_json(value: &Value) -> Result<Self, CatalogError> {
        let mut messages = BTreeMap::new();
        for (key, entry) in keyed_entries(value)? {
            let Ok(id) = key.trim().parse::<u32>() else {
                tracing::debug!("ignoring non-message key '{key}' in GetMessages");
                continue;
            };
            let id = u8::try_from(id).map_err(|_| CatalogError::InvalidMessageId(key.clone()))?;
            messages.insert(id, parse_message(id, entry)?);
        }
        Ok(Self { messages })
    }

    /// Definition of message `id`
    pub fn get(&self, id: u8) -> Option<&MessageDefinition> {
        self.messages.get(&id)
    }

    /// Flag `mask` of `family`
    pub fn flag(&self, family: FlagFamily, mask: u16) -> Option<&FlagDefinition> {
        self.get(family.source_message())?.flags.get(&mask)
    }

    /// All messages in id order
    pub fn iter(&self) -> impl Iterator<Item = &MessageDefinition> {
        self.messages.values()
    }

    /// Messages that can be exposed as child devices
    pub fn child_messages(&self) -> impl Iterator<Item = &MessageDefinition> {
        self.messages
            .range(..=Self::MAX_CHILD_MESSAGE)
            .map(|(_, m)| m)
            .filter(|m| m.child)
    }

    /// Number of messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

fn parse_message(id: u8, entry: &Value) -> Result<MessageDefinition, CatalogError> {
    let text = entry.get("txt").and_then(scalar_text).unwrap_or_default();
    let variable = entry.get("var").and_then(parse_variable);
    let child = entry.get("child").is_some_and(|c| !c.is_null());

    let mut flags = BTreeMap::new();
    if let Some(table) = entry.get("flags") {
        for (key, flag) in keyed_entries(table)? {
            let mask = parse_mask(&key).ok_or_else(|| CatalogError::InvalidFlagMask {
                message: id,
                mask: key.clone(),
            })?;
            let variable = flag
                .get("var")
                .and_then(scalar_text)
                .ok_or_else(|| CatalogError::MissingField {
                    context: format!("flag {key} of message {id}"),
                    field: "var".to_string(),
                })?;
            flags.insert(
                mask,
                FlagDefinition {
                    mask,
                    text: flag.get("txt").and_then(scalar_text).unwrap_or_default(),
                    variable,
                },
            );
        }
    }

    Ok(MessageDefinition {
        id,
        text,
        variable,
        child,
        flags,
    })
}

fn parse_variable(value: &Value) -> Option<MessageVariable> {
    match value {
        Value::Object(map) => {
            let hb = map.get("hb").and_then(scalar_text)?;
            let lb = map.get("lb").and_then(scalar_text)?;
            Some(MessageVariable::Split { hb, lb })
        }
        other => scalar_text(other)
            .filter(|s| !s.is_empty())
            .map(MessageVariable::Single),
    }
}

/// Flag masks come as decimal keys, or hex with a `0x` prefix
fn parse_mask(key: &str) -> Option<u16> {
    let key = key.trim();
    match key.strip_prefix("0x").or_else(|| key.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16).ok(),
        None => key.parse().ok(),
    }
}
