//! Tests for parsing the plugin's GetMessages and GetConfiguration documents

#[cfg(test)]
mod tests {
    use otgw_panel_core::catalog::{
        ByteSelector, CatalogError, FlagFamily, HardwareCatalog, MessageCatalog, MessageVariable,
        HARDWARE_CATEGORY_ORDER,
    };
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    fn messages_json() -> Value {
        serde_json::from_str(include_str!("../data/get_messages.json")).unwrap()
    }

    fn configuration_json() -> Value {
        serde_json::from_str(include_str!("../data/get_configuration.json")).unwrap()
    }

    #[test]
    fn test_messages_document() {
        let catalog = MessageCatalog::from_json(&messages_json()).unwrap();

        // "GW" is not a message number
        assert_eq!(catalog.len(), 19);
        assert_eq!(
            catalog.get(24).unwrap().variable,
            Some(MessageVariable::Single("CurrentTemperature".to_string()))
        );
        assert_eq!(
            catalog.get(5).unwrap().variable_for(Some(ByteSelector::Low)),
            Some("OEMFaultCode")
        );
    }

    #[test]
    fn test_flag_families() {
        let catalog = MessageCatalog::from_json(&messages_json()).unwrap();

        let status = catalog.flag(FlagFamily::Status, 0x0008).unwrap();
        assert_eq!(status.text, "Flame status");
        assert_eq!(status.variable, "StatusFlame");

        let fault = catalog.flag(FlagFamily::Fault, 0x0400).unwrap();
        assert_eq!(fault.text, "Low water pressure");
        assert!(catalog.flag(FlagFamily::Fault, 0x0008).is_none());
    }

    #[test]
    fn test_child_messages() {
        let catalog = MessageCatalog::from_json(&messages_json()).unwrap();
        let ids: Vec<u8> = catalog.child_messages().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 16, 18, 24, 25, 26, 27, 28, 116, 120]);
    }

    #[test]
    fn test_bad_flag_mask() {
        let result = MessageCatalog::from_json(&json!({
            "0": {"txt": "Status", "var": "Status", "flags": {"CH": {"txt": "x", "var": "y"}}}
        }));
        assert!(matches!(
            result,
            Err(CatalogError::InvalidFlagMask { message: 0, .. })
        ));
    }

    #[test]
    fn test_flag_without_variable() {
        let result = MessageCatalog::from_json(&json!({
            "5": {"txt": "Faults", "flags": {"256": {"txt": "Service request"}}}
        }));
        assert!(matches!(result, Err(CatalogError::MissingField { .. })));
    }

    #[test]
    fn test_configuration_document() {
        let catalog = HardwareCatalog::from_json(&configuration_json()).unwrap();
        let keys: Vec<&str> = catalog.categories().iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, HARDWARE_CATEGORY_ORDER.to_vec());

        let gpio = catalog.get("GPIO").unwrap();
        assert_eq!(gpio.count, Some(2));
        assert_eq!(gpio.options.len(), 8);
        assert_eq!(gpio.options[0].label, "No function");

        // Count given as a string
        let led = catalog.get("LED").unwrap();
        assert_eq!(led.count, Some(4));
        assert_eq!(led.instances()[3].0, "LED D function");
        assert_eq!(led.instances()[3].1, "LEDFunction3");
        assert!(catalog.get("VER").is_none());
    }

    #[test]
    fn test_bad_count() {
        let result = HardwareCatalog::from_json(&json!({
            "GPIO": {"txt": "GPIO", "var": "GPIOFunction", "cnt": "many", "tab": {}}
        }));
        assert!(matches!(result, Err(CatalogError::InvalidCount(_))));
    }
}
