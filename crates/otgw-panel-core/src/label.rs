//! Display label and unit resolution
//!
//! Message texts carry their unit in a trailing parenthesis, and messages
//! that pack two values into one slot name both halves joined by `&`:
//!
//! ```text
//! Room temperature (°C)                  -> "Room temperature", "°C"
//! Control setpoint 2 & OEM fault code    -> "Control setpoint 2" (hb) / "OEM fault code" (lb)
//! ```

use crate::catalog::ByteSelector;
use regex::Regex;
use std::sync::OnceLock;

/// Label and unit of a displayed message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedLabel {
    /// Text shown in front of the value
    pub label: String,
    /// Unit shown after the value (may be empty)
    pub unit: String,
}

fn unit_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\(([^)]+)\)").expect("unit pattern is valid"))
}

/// Split a message text into label and unit, picking one half of an
/// `&`-joined pair. The low byte selects the right half, anything else the left.
pub fn resolve_label(text: &str, selector: Option<ByteSelector>) -> ResolvedLabel {
    let (label, unit) = match unit_pattern().captures(text) {
        Some(caps) => {
            let whole = caps.get(0).map(|m| m.start()).unwrap_or(text.len());
            let inner = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            (&text[..whole], normalize_degree(inner))
        }
        None => (text, String::new()),
    };

    let label = match label.split_once('&') {
        Some((_, low)) if selector == Some(ByteSelector::Low) => low,
        Some((high, _)) => high,
        None => label,
    };

    ResolvedLabel {
        label: label.trim().to_string(),
        unit,
    }
}

/// Label without its unit, as used for child device names
pub fn strip_unit(text: &str) -> String {
    match unit_pattern().find(text) {
        Some(m) => text[..m.start()].trim_end().to_string(),
        None => text.trim_end().to_string(),
    }
}

/// Controllers serving Latin-1 text as UTF-8 turn `°` into `Â°`
fn normalize_degree(unit: &str) -> String {
    unit.replace("Â°", "°").trim().to_string()
}

/// Whether `unit` is a Celsius temperature (`°C`, `&deg;C`, `ºC`)
pub fn is_celsius(unit: &str) -> bool {
    let rest = unit
        .strip_prefix('°')
        .or_else(|| unit.strip_prefix('º'))
        .or_else(|| unit.strip_prefix("&deg;"));
    rest.is_some_and(|r| r.starts_with('C'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mojibake_degree() {
        let resolved = resolve_label("DHW temperature (Â°C)", None);
        assert_eq!(resolved.unit, "°C");
    }

    #[test]
    fn test_no_unit() {
        let resolved = resolve_label("OEM diagnostic code", None);
        assert_eq!(resolved.label, "OEM diagnostic code");
        assert_eq!(resolved.unit, "");
    }

    #[test]
    fn test_strip_unit() {
        assert_eq!(strip_unit("Outside temperature (°C)"), "Outside temperature");
        assert_eq!(strip_unit("Relative modulation level"), "Relative modulation level");
    }

    #[test]
    fn test_is_celsius() {
        assert!(is_celsius("°C"));
        assert!(is_celsius("&deg;C"));
        assert!(!is_celsius("%"));
        assert!(!is_celsius("bar"));
        assert!(!is_celsius(""));
    }
}
