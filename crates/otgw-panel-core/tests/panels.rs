//! Tests for the panel builders and the settings writer

#[cfg(test)]
mod tests {
    use otgw_panel_core::catalog::{HardwareCatalog, MessageCatalog};
    use async_trait::async_trait;
    use otgw_panel_core::controller::{
        Controller, ControllerError, DeviceId, DeviceInfo, MemoryController, RequestKind,
    };
    use otgw_panel_core::host::{HostEvent, RecordingHost};
    use otgw_panel_core::panels::{
        build_eco, build_hardware, build_settings, ControlBinding, FormControl, FormSelections,
        Selection, SettingsWriter, RELOAD_BUSY_PERIOD, SETTINGS_SAVED_MESSAGE,
    };
    use otgw_panel_core::render::{Ui5Target, Ui7Target};
    use otgw_panel_core::variables::VariableAccessor;
    use otgw_panel_core::{GATEWAY_SID, HOME_AUTOMATION_SID};
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    const DEVICE: DeviceId = DeviceId(12);

    fn device(id: u32, name: &str, category: u32, subcategory: u32) -> DeviceInfo {
        DeviceInfo {
            id,
            name: name.to_string(),
            category,
            subcategory,
            ..DeviceInfo::default()
        }
    }

    fn devices() -> Vec<DeviceInfo> {
        vec![
            DeviceInfo {
                ip: Some("192.168.1.50".to_string()),
                ..device(12, "OpenTherm Gateway", 5, 0)
            },
            DeviceInfo {
                parent: 12,
                ..device(13, "OTG Outside", DeviceInfo::CATEGORY_TEMPERATURE, 0)
            },
            device(20, "Garden thermometer", DeviceInfo::CATEGORY_TEMPERATURE, 0),
            device(21, "Hall humidity", DeviceInfo::CATEGORY_HUMIDITY, 0),
            device(30, "Kitchen window", 4, 1),
            device(40, "House alarm", DeviceInfo::CATEGORY_ALARM_PARTITION, 0),
        ]
    }

    fn setup() -> (Arc<MemoryController>, VariableAccessor) {
        let ctl = Arc::new(MemoryController::new());
        let vars = VariableAccessor::for_gateway(ctl.clone());
        (ctl, vars)
    }

    /// Controller whose variable writes take a while, logging calls as they land
    #[derive(Default)]
    struct SlowWriteController {
        inner: MemoryController,
        log: Mutex<Vec<String>>,
    }

    impl SlowWriteController {
        fn log(&self) -> Vec<String> {
            self.log.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Controller for SlowWriteController {
        async fn fetch_variable(
            &self,
            device: DeviceId,
            service: &str,
            name: &str,
        ) -> Result<Option<String>, ControllerError> {
            self.inner.fetch_variable(device, service, name).await
        }

        async fn persist_variable(
            &self,
            device: DeviceId,
            service: &str,
            name: &str,
            value: &str,
        ) -> Result<(), ControllerError> {
            tokio::time::sleep(Duration::from_millis(30)).await;
            self.log.lock().unwrap().push(format!("set {name}"));
            self.inner.persist_variable(device, service, name, value).await
        }

        async fn fetch_json(
            &self,
            kind: RequestKind,
            device: DeviceId,
            service: &str,
        ) -> Result<serde_json::Value, ControllerError> {
            self.inner.fetch_json(kind, device, service).await
        }

        async fn invoke_action(
            &self,
            device: DeviceId,
            service: &str,
            action: &str,
            args: &[(String, String)],
        ) -> Result<(), ControllerError> {
            self.log.lock().unwrap().push(format!("action {action}"));
            self.inner.invoke_action(device, service, action, args).await
        }

        async fn list_devices(&self) -> Result<Vec<DeviceInfo>, ControllerError> {
            self.inner.list_devices().await
        }

        async fn set_device_attribute(
            &self,
            device: DeviceId,
            name: &str,
            value: &str,
        ) -> Result<(), ControllerError> {
            self.inner.set_device_attribute(device, name, value).await
        }
    }

    fn messages() -> MessageCatalog {
        let json = serde_json::from_str(include_str!("../data/get_messages.json")).unwrap();
        MessageCatalog::from_json(&json).unwrap()
    }

    fn fields(controls: &[FormControl]) -> Vec<&str> {
        controls.iter().map(|c| c.field.as_str()).collect()
    }

    #[tokio::test]
    async fn test_eco_with_door_sensors() {
        let (ctl, vars) = setup();
        ctl.set_variable(DEVICE, GATEWAY_SID, "PluginEcoTemp", "-2");
        ctl.set_variable(DEVICE, GATEWAY_SID, "PluginDoorWindowDevices", "30");
        ctl.set_variable(DEVICE, GATEWAY_SID, "OutsideTemperature", "7.5");

        let panel = build_eco(&Ui7Target, &vars, DEVICE, &devices()).await;

        assert_eq!(
            fields(&panel.controls),
            vec![
                "PluginEcoDHW",
                "PluginEcoTemp",
                "PluginPartitionDevice",
                "PluginArmedAwayDHW",
                "PluginArmedAwayTemp",
                "PluginDoorWindowDevices",
                "PluginDoorWindowTemp",
                "PluginDoorWindowMinutes",
                "PluginDoorWindowOutside",
            ]
        );
        assert!(panel.html.starts_with(r#"<div class="deviceCpanelSettingsPage">"#));
        assert!(panel.html.contains(r#"<option value="-2" selected>2 &deg;C lower</option>"#));
        assert!(panel.html.contains(r#"<option value="30" selected>Kitchen window</option>"#));
        assert!(panel.html.contains(r#"<select id="otgJS_PluginDoorWindowDevices12" multiple>"#));
        assert!(panel.controls[5].multiple);
        assert!(!panel.html.contains("No door sensor found."));
    }

    #[tokio::test]
    async fn test_eco_without_door_sensors() {
        let (_ctl, vars) = setup();
        let only_gateway = vec![device(12, "OpenTherm Gateway", 5, 0)];
        let panel = build_eco(&Ui7Target, &vars, DEVICE, &only_gateway).await;

        assert!(panel.html.contains("<i>No door sensor found.</i>"));
        assert_eq!(panel.controls.len(), 4);
    }

    #[tokio::test]
    async fn test_eco_hides_outside_option_without_outside_temperature() {
        let (_ctl, vars) = setup();
        let panel = build_eco(&Ui7Target, &vars, DEVICE, &devices()).await;
        assert!(!fields(&panel.controls).contains(&"PluginDoorWindowOutside"));
    }

    #[tokio::test]
    async fn test_hardware_instances() {
        let (ctl, vars) = setup();
        ctl.set_variable(DEVICE, GATEWAY_SID, "GPIOFunction1", "7");
        let json = serde_json::from_str(include_str!("../data/get_configuration.json")).unwrap();
        let catalog = HardwareCatalog::from_json(&json).unwrap();

        let panel = build_hardware(&Ui7Target, &vars, DEVICE, &catalog).await;

        let names = fields(&panel.controls);
        assert_eq!(names.len(), 4 + 2 + 4);
        assert_eq!(&names[..4], &["GatewayMode", "ReferenceVoltage", "IgnoreTransitions", "OverrideHighByte"]);
        assert!(names.contains(&"GPIOFunction0"));
        assert!(names.contains(&"LEDFunction3"));
        assert!(panel.html.contains("GPIO B function"));
        assert!(panel
            .html
            .contains(r#"<option value="7" selected>Temperature sensor</option>"#));
        assert!(panel.html.contains("Hardware_UpdateSettings"));
    }

    #[tokio::test]
    async fn test_settings_sensor_lists() {
        let (ctl, vars) = setup();
        ctl.set_variable(DEVICE, GATEWAY_SID, "PluginHaveChildren", "24,27");
        let devices = devices();

        let panel = build_settings(&Ui7Target, &vars, &devices[0], &devices, &messages()).await;

        assert!(panel.html.contains(r#"<option value="20">Garden thermometer</option>"#));
        // Our own child device is not offered as outside sensor
        assert!(!panel.html.contains("OTG Outside"));
        assert!(panel.html.contains(r#"<option value="21">Hall humidity</option>"#));
        assert!(panel.html.contains(r#"<option value="24" selected>Room temperature</option>"#));
        assert!(panel.html.contains(r#"<option value="27" selected>Outside temperature</option>"#));
        assert!(panel.html.contains(r#"value="192.168.1.50""#));
        assert_eq!(
            panel.controls[0],
            FormControl::attribute("IPAddress", "ip")
        );
        assert!(panel.html.contains("File &amp; debug statements"));
    }

    #[tokio::test]
    async fn test_settings_uart_note() {
        let (_ctl, vars) = setup();
        let gateway = DeviceInfo {
            comm_use: true,
            ..device(12, "OpenTherm Gateway", 5, 0)
        };
        let panel = build_settings(&Ui5Target, &vars, &gateway, &[gateway.clone()], &messages()).await;

        assert!(panel.html.contains("Communicate using UART"));
        assert!(panel.html.contains(r#"<table width="100%""#));
        assert!(!panel
            .controls
            .iter()
            .any(|c| matches!(c.binding, ControlBinding::Attribute(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_writer_persists_and_reloads() {
        let (ctl, vars) = setup();
        let host = Arc::new(RecordingHost::new());
        let writer = SettingsWriter::new(vars.clone(), DEVICE, host.clone());

        let controls = vec![
            FormControl::variable("PluginDebug"),
            FormControl::variable("PluginOutsideSensor"),
            FormControl::multi_variable("PluginHaveChildren"),
            FormControl::attribute("IPAddress", "ip"),
        ];
        let form = FormSelections::new()
            .with("PluginDebug", "3")
            .with("PluginOutsideSensor", Selection::NoSelection)
            .with(
                "PluginHaveChildren",
                Selection::Values(vec!["24".to_string(), "27".to_string()]),
            )
            .with("IPAddress", "192.168.1.51");

        let started = tokio::time::Instant::now();
        let written = writer.save(&controls, &form).await;
        assert!(started.elapsed() >= RELOAD_BUSY_PERIOD);
        vars.flush().await;

        assert_eq!(written, 3);
        let mut writes = ctl.writes();
        writes.sort();
        assert_eq!(
            writes,
            vec![
                (DEVICE, "PluginDebug".to_string(), "3".to_string()),
                (DEVICE, "PluginHaveChildren".to_string(), "24,27".to_string()),
            ]
        );
        assert_eq!(ctl.attribute(DEVICE, "ip").as_deref(), Some("192.168.1.51"));

        let actions = ctl.actions();
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].device, DeviceId(0));
        assert_eq!(actions[0].service, HOME_AUTOMATION_SID);
        assert_eq!(actions[0].action, "Reload");

        assert_eq!(
            host.events(),
            vec![
                HostEvent::Busy(true),
                HostEvent::Busy(false),
                HostEvent::Message(SETTINGS_SAVED_MESSAGE.to_string()),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_writer_skips_empty_ip() {
        let (ctl, vars) = setup();
        let writer = SettingsWriter::new(vars.clone(), DEVICE, Arc::new(RecordingHost::new()));
        let form = FormSelections::new().with("IPAddress", "");
        let written = writer
            .save(&[FormControl::attribute("IPAddress", "ip")], &form)
            .await;
        vars.flush().await;
        assert_eq!(written, 0);
        assert_eq!(ctl.attribute(DEVICE, "ip"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reload_follows_slow_writes() {
        let ctl = Arc::new(SlowWriteController::default());
        let vars = VariableAccessor::for_gateway(ctl.clone());
        let writer = SettingsWriter::new(vars.clone(), DEVICE, Arc::new(RecordingHost::new()));

        let controls = vec![
            FormControl::variable("PluginEcoDHW"),
            FormControl::variable("PluginEcoTemp"),
        ];
        let form = FormSelections::new()
            .with("PluginEcoDHW", "1")
            .with("PluginEcoTemp", "-2");
        writer.save(&controls, &form).await;
        vars.flush().await;

        let log = ctl.log();
        assert_eq!(log.len(), 3);
        assert_eq!(log.last().map(String::as_str), Some("action Reload"));
    }
}
