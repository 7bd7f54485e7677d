//! HTML building blocks shared by both render targets

use crate::monitor::{BarState, MessageRow};
use std::fmt::Write as _;

/// Prefix of every element id the panels create
pub const ID_PREFIX: &str = "otgJS_";

/// JavaScript object the panel callbacks live on
pub const SCRIPT_MODULE: &str = "OpenThermGateway";

/// Element id from its parts: `build_id(&["msgval", "24"])` is `otgJS_msgval24`
pub fn build_id(parts: &[&str]) -> String {
    parts.iter().fold(ID_PREFIX.to_string(), |mut id, part| {
        id.push_str(part);
        id
    })
}

/// One entry of a pulldown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    /// Submitted value
    pub value: String,
    /// Display text
    pub label: String,
}

impl SelectOption {
    /// Option with `value` shown as `label`
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Escape text for element content and attribute values.
///
/// `°` is written as `&deg;`; an `&deg;` already present is kept.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(c) = rest.chars().next() {
        if rest.starts_with("&deg;") {
            out.push_str("&deg;");
            rest = &rest[5..];
            continue;
        }
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '°' => out.push_str("&deg;"),
            c => out.push(c),
        }
        rest = &rest[c.len_utf8()..];
    }
    out
}

/// `<option>` elements, marking the ones in `selected`
pub fn options_html(options: &[SelectOption], selected: &[&str]) -> String {
    let mut html = String::new();
    for option in options {
        let mark = if selected.contains(&option.value.as_str()) {
            " selected"
        } else {
            ""
        };
        let _ = write!(
            html,
            r#"<option value="{}"{mark}>{}</option>"#,
            escape_html(&option.value),
            escape_html(&option.label)
        );
    }
    html
}

/// Colour of a dimmed (unknown) value
pub const DIMMED_COLOR: &str = "#DDDDDD";

/// Inline style of a message value reflecting its state
pub(crate) fn value_style(row: &MessageRow) -> String {
    let mut style = String::new();
    if row.is_dimmed() {
        let _ = write!(style, " color: {DIMMED_COLOR};");
    }
    if row.emphasized {
        style.push_str(" font-weight: bold;");
    }
    style
}

/// Inline style of a bar
pub(crate) fn bar_style(bar: &BarState) -> String {
    match bar.color {
        Some(color) => format!("width: {}%; background-color: {color};", bar.width),
        None => format!("width: {}%;", bar.width),
    }
}
