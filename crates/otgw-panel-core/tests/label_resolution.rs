//! Tests for message label resolution against the plugin's definitions

#[cfg(test)]
mod tests {
    use otgw_panel_core::catalog::{ByteSelector, MessageCatalog};
    use otgw_panel_core::label::{resolve_label, ResolvedLabel};
    use pretty_assertions::assert_eq;

    fn catalog() -> MessageCatalog {
        let json = serde_json::from_str(include_str!("../data/get_messages.json")).unwrap();
        MessageCatalog::from_json(&json).unwrap()
    }

    #[test]
    fn test_packed_message_halves() {
        let catalog = catalog();
        let text = &catalog.get(5).unwrap().text;

        assert_eq!(
            resolve_label(text, Some(ByteSelector::High)),
            ResolvedLabel {
                label: "Application-specific flags".to_string(),
                unit: String::new(),
            }
        );
        assert_eq!(resolve_label(text, Some(ByteSelector::Low)).label, "OEM fault code");
        assert_eq!(resolve_label(text, None).label, "Application-specific flags");
    }

    #[test]
    fn test_units_from_definitions() {
        let catalog = catalog();
        let unit = |id: u8| resolve_label(&catalog.get(id).unwrap().text, None).unit;
        assert_eq!(unit(24), "°C");
        assert_eq!(unit(17), "%");
        assert_eq!(unit(18), "bar");
    }

    #[test]
    fn test_resolving_a_resolved_label_is_identity() {
        let packed = "Control setpoint 2 & OEM fault code";
        for selector in [Some(ByteSelector::High), Some(ByteSelector::Low), None] {
            let first = resolve_label(packed, selector);
            assert_eq!(resolve_label(&first.label, selector).label, first.label);
        }

        let first = resolve_label("Room setpoint 2 (°C)", None);
        assert_eq!(first.label, "Room setpoint 2");
        assert_eq!(resolve_label(&first.label, None).label, first.label);
    }

    #[test]
    fn test_packed_literal_halves() {
        let packed = "Control setpoint 2 & OEM fault code";
        assert_eq!(resolve_label(packed, Some(ByteSelector::Low)).label, "OEM fault code");
        assert_eq!(resolve_label(packed, Some(ByteSelector::High)).label, "Control setpoint 2");
        assert_eq!(resolve_label(packed, None).label, "Control setpoint 2");
    }
}
