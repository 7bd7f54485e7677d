//! Hardware option tables (`GetConfiguration`)

use super::{keyed_entries, scalar_text, CatalogError};
use serde_json::Value;
use std::cmp::Ordering;

/// Categories shown on the Hardware tab, in display order
pub const HARDWARE_CATEGORY_ORDER: [&str; 6] = ["GW", "REF", "ITR", "ROF", "GPIO", "LED"];

/// One selectable value of a hardware function slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HardwareOption {
    /// Value stored in the variable
    pub value: String,
    /// Display text
    pub label: String,
}

/// A hardware function slot of the gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationCategory {
    /// Category key (`GW`, `GPIO`, ...)
    pub key: String,
    /// Display text
    pub text: String,
    /// Backing variable; multi-instance slots append the instance index
    pub variable: String,
    /// Valid options
    pub options: Vec<HardwareOption>,
    /// Number of instances for repeated slots (GPIO pins, LEDs)
    pub count: Option<u8>,
}

impl ConfigurationCategory {
    /// `(label, variable)` for every pulldown this category needs
    pub fn instances(&self) -> Vec<(String, String)> {
        match self.count {
            None => vec![(self.text.clone(), self.variable.clone())],
            Some(count) => (0..count)
                .map(|i| {
                    let letter = char::from(b'A' + i);
                    (
                        format!("{} {} function", self.key, letter),
                        format!("{}{}", self.variable, i),
                    )
                })
                .collect(),
        }
    }
}

/// Hardware configuration tables of one gateway
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HardwareCatalog {
    categories: Vec<ConfigurationCategory>,
}

impl HardwareCatalog {
    /// Parse the `GetConfiguration` response.
    ///
    /// Only the categories of [`HARDWARE_CATEGORY_ORDER`] are kept, in that order.
    pub fn from_json(value: &Value) -> Result<Self, CatalogError> {
        let entries = keyed_entries(value)?;
        let mut categories = Vec::new();

        for key in HARDWARE_CATEGORY_ORDER {
            let Some((_, entry)) = entries.iter().find(|(k, _)| k == key) else {
                continue;
            };
            categories.push(parse_category(key, entry)?);
        }

        Ok(Self { categories })
    }

    /// Categories in display order
    pub fn categories(&self) -> &[ConfigurationCategory] {
        &self.categories
    }

    /// Category by key
    pub fn get(&self, key: &str) -> Option<&ConfigurationCategory> {
        self.categories.iter().find(|c| c.key == key)
    }
}

fn parse_category(key: &str, entry: &Value) -> Result<ConfigurationCategory, CatalogError> {
    let variable = entry
        .get("var")
        .and_then(scalar_text)
        .ok_or_else(|| CatalogError::MissingField {
            context: format!("hardware category {key}"),
            field: "var".to_string(),
        })?;

    let count = match entry.get("cnt") {
        None | Some(Value::Null) => None,
        Some(cnt) => {
            let n = scalar_text(cnt)
                .and_then(|s| s.parse::<u8>().ok())
                .filter(|n| *n <= 26)
                .ok_or_else(|| CatalogError::InvalidCount(key.to_string()))?;
            Some(n)
        }
    };

    let mut options = Vec::new();
    if let Some(tab) = entry.get("tab") {
        let mut rows = keyed_entries(tab)?;
        rows.sort_by(|(a, _), (b, _)| option_key_order(a, b));
        for (value, row) in rows {
            let label = row
                .get("txt")
                .and_then(scalar_text)
                .unwrap_or_else(|| value.clone());
            options.push(HardwareOption { value, label });
        }
    }

    Ok(ConfigurationCategory {
        key: key.to_string(),
        text: entry
            .get("txt")
            .and_then(scalar_text)
            .unwrap_or_else(|| key.to_string()),
        variable,
        options,
        count,
    })
}

/// Numeric keys ascending first, then the rest alphabetically
fn option_key_order(a: &str, b: &str) -> Ordering {
    match (a.parse::<u32>(), b.parse::<u32>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_instances_for_repeated_slot() {
        let cat = ConfigurationCategory {
            key: "GPIO".to_string(),
            text: "GPIO".to_string(),
            variable: "GPIOFunction".to_string(),
            options: vec![],
            count: Some(2),
        };
        assert_eq!(
            cat.instances(),
            vec![
                ("GPIO A function".to_string(), "GPIOFunction0".to_string()),
                ("GPIO B function".to_string(), "GPIOFunction1".to_string()),
            ]
        );
    }

    #[test]
    fn test_option_order_is_numeric() {
        let catalog = HardwareCatalog::from_json(&json!({
            "REF": {"txt": "Reference voltage", "var": "ReferenceVoltage",
                    "tab": {"10": {"txt": "ten"}, "2": {"txt": "two"}, "0": {"txt": "zero"}}}
        }))
        .unwrap();
        let values: Vec<_> = catalog.get("REF").unwrap().options.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, vec!["0", "2", "10"]);
    }

    #[test]
    fn test_unknown_categories_are_dropped() {
        let catalog = HardwareCatalog::from_json(&json!({
            "XYZ": {"txt": "Unknown", "var": "Unknown"},
            "LED": {"txt": "LED", "var": "LEDFunction", "cnt": 6, "tab": {}}
        }))
        .unwrap();
        assert_eq!(catalog.categories().len(), 1);
        assert_eq!(catalog.get("LED").unwrap().count, Some(6));
    }
}
