//! Gateway definitions fetched from the plugin
//!
//! The plugin publishes two JSON documents through its request handlers:
//! `GetMessages` (the OpenTherm messages it tracks, with the flag tables of
//! the status words) and `GetConfiguration` (the gateway's hardware option
//! tables). Both are parsed once per session into the catalogs below.

mod error;
mod hardware;
mod messages;

pub use error::CatalogError;
pub use hardware::{ConfigurationCategory, HardwareCatalog, HardwareOption, HARDWARE_CATEGORY_ORDER};
pub use messages::{
    ByteSelector, FlagDefinition, FlagFamily, MessageCatalog, MessageDefinition, MessageVariable,
};

use serde_json::Value;

/// Text of a JSON scalar, for fields the plugin sends as either number or string
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Entries of a JSON object or array as `(key, value)`, array entries keyed
/// by their index. Nulls are dropped.
pub(crate) fn keyed_entries(value: &Value) -> Result<Vec<(String, &Value)>, CatalogError> {
    match value {
        Value::Object(map) => Ok(map
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| (k.clone(), v))
            .collect()),
        Value::Array(items) => Ok(items
            .iter()
            .enumerate()
            .filter(|(_, v)| !v.is_null())
            .map(|(i, v)| (i.to_string(), v))
            .collect()),
        Value::String(s) => Err(CatalogError::UnexpectedShape(format!("string \"{s}\""))),
        other => Err(CatalogError::UnexpectedShape(json_kind(other).to_string())),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
