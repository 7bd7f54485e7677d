//! Tests for the control panel entry points

#[cfg(test)]
mod tests {
    use otgw_panel_core::controller::{DeviceId, DeviceInfo, MemoryController, RequestKind};
    use otgw_panel_core::cpanel::{ControlPanel, Tab, FETCH_FAILED_PLACEHOLDER};
    use otgw_panel_core::host::{HostEvent, RecordingHost};
    use otgw_panel_core::panels::{FormSelections, PanelError};
    use otgw_panel_core::render::UiGeneration;
    use otgw_panel_core::GATEWAY_SID;
    use std::sync::Arc;
    use std::time::Duration;

    const DEVICE: DeviceId = DeviceId(12);
    const INTERVAL: Duration = Duration::from_secs(2);

    fn controller() -> Arc<MemoryController> {
        let ctl = Arc::new(MemoryController::new());
        ctl.set_json(
            RequestKind::GetMessages,
            serde_json::from_str(include_str!("../data/get_messages.json")).unwrap(),
        );
        ctl.set_json(
            RequestKind::GetConfiguration,
            serde_json::from_str(include_str!("../data/get_configuration.json")).unwrap(),
        );
        ctl.set_devices(vec![DeviceInfo {
            id: DEVICE.0,
            name: "OpenTherm Gateway".to_string(),
            ip: Some("10.0.0.8".to_string()),
            ..DeviceInfo::default()
        }]);
        ctl.set_variable(DEVICE, GATEWAY_SID, "CurrentTemperature", "20.5");
        ctl.set_variable(DEVICE, GATEWAY_SID, "StatusFlame", "1");
        ctl.set_variable(DEVICE, GATEWAY_SID, "Errors", "0,2,0,0");
        ctl
    }

    fn panel(ctl: &Arc<MemoryController>, host: &Arc<RecordingHost>) -> ControlPanel {
        ControlPanel::new(ctl.clone(), DEVICE, UiGeneration::Ui7, host.clone())
    }

    #[tokio::test(start_paused = true)]
    async fn test_monitor_tab_refreshes_until_tab_switch() {
        let ctl = controller();
        let host = Arc::new(RecordingHost::new());
        let cpanel = panel(&ctl, &host);

        cpanel.open_monitor_tab().await.unwrap();
        let html = host.last_render().unwrap();
        assert!(html.contains("otgJS_"));
        assert!(cpanel.is_monitoring());

        tokio::time::sleep(INTERVAL * 2 + Duration::from_millis(100)).await;
        assert!(host.update_count() >= 1);

        cpanel.open_eco_tab().await.unwrap();
        assert!(!cpanel.is_monitoring());

        let updates = host.update_count();
        ctl.set_variable(DEVICE, GATEWAY_SID, "CurrentTemperature", "23.0");
        tokio::time::sleep(INTERVAL * 3).await;
        assert_eq!(host.update_count(), updates);
    }

    #[tokio::test(start_paused = true)]
    async fn test_panel_closed_stops_monitor() {
        let ctl = controller();
        let host = Arc::new(RecordingHost::new());
        let cpanel = panel(&ctl, &host);

        cpanel.open_monitor_tab().await.unwrap();
        cpanel.on_panel_closed().await;
        assert!(!cpanel.is_monitoring());
    }

    #[tokio::test]
    async fn test_definitions_are_fetched_once() {
        let ctl = controller();
        let host = Arc::new(RecordingHost::new());
        let cpanel = panel(&ctl, &host);

        cpanel.render_tab(Tab::Monitor).await.unwrap();
        cpanel.render_tab(Tab::Settings).await.unwrap();
        cpanel.render_tab(Tab::Monitor).await.unwrap();
        assert_eq!(ctl.json_requests(), 1);

        cpanel.render_tab(Tab::Hardware).await.unwrap();
        cpanel.render_tab(Tab::Hardware).await.unwrap();
        assert_eq!(ctl.json_requests(), 2);
        assert!(cpanel.session().messages().is_some());
        assert!(cpanel.session().hardware().is_some());
    }

    #[tokio::test]
    async fn test_unreachable_controller_shows_placeholder() {
        let ctl = controller();
        ctl.set_offline(true);
        let host = Arc::new(RecordingHost::new());
        let cpanel = panel(&ctl, &host);

        assert!(cpanel.open_hardware_tab().await.is_err());
        let html = host.last_render().unwrap();
        assert!(html.contains(FETCH_FAILED_PLACEHOLDER));
        assert!(cpanel.session().hardware().is_none());
    }

    #[tokio::test]
    async fn test_settings_without_gateway_entry() {
        let ctl = controller();
        ctl.set_devices(Vec::new());
        let host = Arc::new(RecordingHost::new());
        let cpanel = panel(&ctl, &host);

        let result = cpanel.open_settings_tab().await;
        assert!(matches!(result, Err(PanelError::DeviceNotFound(DeviceId(12)))));
    }

    #[tokio::test]
    async fn test_reset_error_counter_is_one_based() {
        let ctl = controller();
        let host = Arc::new(RecordingHost::new());
        let cpanel = panel(&ctl, &host);

        assert!(cpanel.reset_error_counter(1));
        assert!(!cpanel.reset_error_counter(4));
        cpanel.on_panel_closed().await;

        let actions = ctl.actions();
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].device, DEVICE);
        assert_eq!(actions[0].service, GATEWAY_SID);
        assert_eq!(actions[0].action, "ResetErrorCount");
        assert_eq!(actions[0].args, vec![("Index".to_string(), "2".to_string())]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_save_without_open_tab_rebuilds_controls() {
        let ctl = controller();
        let host = Arc::new(RecordingHost::new());
        let cpanel = panel(&ctl, &host);

        let form = FormSelections::new()
            .with("PluginDebug", "1")
            .with("IPAddress", "10.0.0.9");
        let written = cpanel.save_plugin_settings(&form).await.unwrap();
        cpanel.on_panel_closed().await;

        assert_eq!(written, 2);
        assert_eq!(
            ctl.variable(DEVICE, GATEWAY_SID, "PluginDebug").as_deref(),
            Some("1")
        );
        assert_eq!(ctl.attribute(DEVICE, "ip").as_deref(), Some("10.0.0.9"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_save_only_writes_controls_of_the_tab() {
        let ctl = controller();
        let host = Arc::new(RecordingHost::new());
        let cpanel = panel(&ctl, &host);

        cpanel.open_eco_tab().await.unwrap();
        let form = FormSelections::new()
            .with("PluginEcoDHW", "2")
            .with("PluginDebug", "7");
        let written = cpanel.save_eco_settings(&form).await.unwrap();
        cpanel.on_panel_closed().await;

        assert_eq!(written, 1);
        assert_eq!(
            ctl.writes(),
            vec![(DEVICE, "PluginEcoDHW".to_string(), "2".to_string())]
        );
    }

    #[tokio::test]
    async fn test_ui5_panel_uses_faster_refresh() {
        let ctl = controller();
        let host = Arc::new(RecordingHost::new());
        let cpanel = ControlPanel::new(ctl, DEVICE, UiGeneration::Ui5, host);
        assert_eq!(cpanel.generation(), UiGeneration::Ui5);
        assert_eq!(cpanel.generation().refresh_interval(), Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_closing_during_reload_hides_busy() {
        let ctl = controller();
        let host = Arc::new(RecordingHost::new());
        let cpanel = panel(&ctl, &host);

        let form = FormSelections::new().with("GatewayMode", "1");
        let save = cpanel.save_hardware_settings(&form);
        assert!(tokio::time::timeout(Duration::from_millis(500), save)
            .await
            .is_err());
        cpanel.on_panel_closed().await;

        let busy: Vec<HostEvent> = host
            .events()
            .into_iter()
            .filter(|e| matches!(e, HostEvent::Busy(_)))
            .collect();
        assert_eq!(busy, vec![HostEvent::Busy(true), HostEvent::Busy(false)]);
    }
}
