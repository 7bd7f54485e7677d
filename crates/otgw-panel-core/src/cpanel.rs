//! Control panel entry points
//!
//! [`ControlPanel`] is what the host UI calls when the user opens a tab,
//! presses a save button, clicks an error counter or closes the panel. Every
//! failure is logged here; the host only ever sees rendered markup and
//! notifications.

use crate::controller::{Controller, DeviceId, DeviceInfo};
use crate::host::PanelHost;
use crate::monitor::{RefreshEngine, RefreshTask, ERROR_SLOTS};
use crate::panels::{
    build_eco, build_hardware, build_monitor, build_settings, FormControl, FormSelections, Panel,
    PanelError, SettingsWriter,
};
use crate::render::{target_for, RenderTarget, UiGeneration};
use crate::session::Session;
use crate::variables::VariableAccessor;
use crate::GATEWAY_SID;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Shown in place of a panel whose data could not be fetched
pub const FETCH_FAILED_PLACEHOLDER: &str = "Failed to get data from OTG.";

/// Tabs of the gateway's control panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    /// Live status
    Monitor,
    /// Eco behaviour
    Eco,
    /// Gateway hardware functions
    Hardware,
    /// Plugin options
    Settings,
}

impl Tab {
    /// Every tab in display order
    pub const ALL: [Tab; 4] = [Tab::Monitor, Tab::Eco, Tab::Hardware, Tab::Settings];

    /// Lowercase tab name
    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::Monitor => "monitor",
            Tab::Eco => "eco",
            Tab::Hardware => "hardware",
            Tab::Settings => "settings",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tab::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown tab '{s}' (expected monitor, eco, hardware or settings)"))
    }
}

/// Control panel of one gateway device
pub struct ControlPanel {
    session: Session,
    target: Box<dyn RenderTarget>,
    host: Arc<dyn PanelHost>,
    refresh_interval: Duration,
    refresh: Mutex<Option<RefreshTask>>,
    forms: Mutex<HashMap<Tab, Vec<FormControl>>>,
}

impl ControlPanel {
    /// Panel for `device`, rendered for `generation` into `host`
    pub fn new(
        controller: Arc<dyn Controller>,
        device: DeviceId,
        generation: UiGeneration,
        host: Arc<dyn PanelHost>,
    ) -> Self {
        Self {
            session: Session::new(VariableAccessor::for_gateway(controller), device),
            target: target_for(generation),
            host,
            refresh_interval: generation.refresh_interval(),
            refresh: Mutex::new(None),
            forms: Mutex::new(HashMap::new()),
        }
    }

    /// Use `interval` between monitor ticks instead of the generation's default
    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    /// Session state (device, variables, cached definitions)
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Generation the panels are rendered for
    pub fn generation(&self) -> UiGeneration {
        self.target.generation()
    }

    /// Whether the monitor refresh loop is running
    pub fn is_monitoring(&self) -> bool {
        lock(&self.refresh)
            .as_ref()
            .is_some_and(|task| !task.is_cancelled() && !task.is_finished())
    }

    /// Open the Monitor tab and start refreshing it
    pub async fn open_monitor_tab(&self) -> Result<(), PanelError> {
        self.stop_monitor().await;
        let result = async {
            let catalog = self.session.load_messages().await?;
            let vars = self.session.variables();
            let panel = build_monitor(self.target.as_ref(), vars, self.device(), &catalog).await;
            self.host.render_panel(&panel.html);

            let engine = RefreshEngine::new(vars.clone(), self.device(), catalog);
            let task = RefreshTask::spawn(
                engine,
                panel.view,
                self.refresh_interval,
                Arc::clone(&self.host),
            );
            *lock(&self.refresh) = Some(task);
            Ok::<(), PanelError>(())
        }
        .await;
        self.report(Tab::Monitor, result)
    }

    /// Open the Eco tab
    pub async fn open_eco_tab(&self) -> Result<(), PanelError> {
        self.stop_monitor().await;
        let result = self.build_eco_panel().await.map(|panel| self.show(Tab::Eco, panel));
        self.report(Tab::Eco, result)
    }

    /// Open the Hardware tab
    pub async fn open_hardware_tab(&self) -> Result<(), PanelError> {
        self.stop_monitor().await;
        let result = self
            .build_hardware_panel()
            .await
            .map(|panel| self.show(Tab::Hardware, panel));
        self.report(Tab::Hardware, result)
    }

    /// Open the Settings tab
    pub async fn open_settings_tab(&self) -> Result<(), PanelError> {
        self.stop_monitor().await;
        let result = self
            .build_settings_panel()
            .await
            .map(|panel| self.show(Tab::Settings, panel));
        self.report(Tab::Settings, result)
    }

    /// Render `tab` without showing it or starting the monitor
    pub async fn render_tab(&self, tab: Tab) -> Result<String, PanelError> {
        match tab {
            Tab::Monitor => {
                let catalog = self.session.load_messages().await?;
                let panel = build_monitor(
                    self.target.as_ref(),
                    self.session.variables(),
                    self.device(),
                    &catalog,
                )
                .await;
                Ok(panel.html)
            }
            Tab::Eco => Ok(self.build_eco_panel().await?.html),
            Tab::Hardware => Ok(self.build_hardware_panel().await?.html),
            Tab::Settings => Ok(self.build_settings_panel().await?.html),
        }
    }

    /// Save the Eco tab and reload the controller
    pub async fn save_eco_settings(&self, form: &FormSelections) -> Result<usize, PanelError> {
        self.save(Tab::Eco, form).await
    }

    /// Save the Hardware tab and reload the controller
    pub async fn save_hardware_settings(&self, form: &FormSelections) -> Result<usize, PanelError> {
        self.save(Tab::Hardware, form).await
    }

    /// Save the Settings tab and reload the controller
    pub async fn save_plugin_settings(&self, form: &FormSelections) -> Result<usize, PanelError> {
        self.save(Tab::Settings, form).await
    }

    /// Reset error counter `index` (0-based); out-of-range indexes are ignored
    pub fn reset_error_counter(&self, index: usize) -> bool {
        if index >= ERROR_SLOTS {
            tracing::warn!(index, "no such error counter");
            return false;
        }
        tracing::info!(device = %self.device(), counter = index + 1, "resetting error counter");
        self.session.variables().invoke(
            self.device(),
            GATEWAY_SID,
            "ResetErrorCount",
            vec![("Index".to_string(), (index + 1).to_string())],
        );
        true
    }

    /// Stop refreshing, hide the busy indicator and wait for outstanding writes
    pub async fn on_panel_closed(&self) {
        self.stop_monitor().await;
        self.host.set_busy(false);
        self.session.variables().flush().await;
        tracing::debug!(device = %self.device(), "control panel closed");
    }

    fn device(&self) -> DeviceId {
        self.session.device()
    }

    async fn stop_monitor(&self) {
        let task = lock(&self.refresh).take();
        if let Some(task) = task {
            task.stop().await;
        }
    }

    async fn devices(&self) -> Result<Vec<DeviceInfo>, PanelError> {
        Ok(self.session.variables().controller().list_devices().await?)
    }

    async fn build_eco_panel(&self) -> Result<Panel, PanelError> {
        let devices = self.devices().await?;
        Ok(build_eco(
            self.target.as_ref(),
            self.session.variables(),
            self.device(),
            &devices,
        )
        .await)
    }

    async fn build_hardware_panel(&self) -> Result<Panel, PanelError> {
        let catalog = self.session.load_hardware().await?;
        Ok(build_hardware(
            self.target.as_ref(),
            self.session.variables(),
            self.device(),
            &catalog,
        )
        .await)
    }

    async fn build_settings_panel(&self) -> Result<Panel, PanelError> {
        let catalog = self.session.load_messages().await?;
        let devices = self.devices().await?;
        let gateway = devices
            .iter()
            .find(|d| d.id == self.device().0)
            .ok_or(PanelError::DeviceNotFound(self.device()))?;
        Ok(build_settings(
            self.target.as_ref(),
            self.session.variables(),
            gateway,
            &devices,
            &catalog,
        )
        .await)
    }

    fn show(&self, tab: Tab, panel: Panel) {
        self.host.render_panel(&panel.html);
        lock(&self.forms).insert(tab, panel.controls);
    }

    fn report(&self, tab: Tab, result: Result<(), PanelError>) -> Result<(), PanelError> {
        if let Err(e) = &result {
            tracing::error!(device = %self.device(), %tab, "failed to open tab: {e}");
            let placeholder = self.target.note(FETCH_FAILED_PLACEHOLDER);
            self.host.render_panel(&self.target.settings_page(&placeholder));
        }
        result
    }

    async fn save(&self, tab: Tab, form: &FormSelections) -> Result<usize, PanelError> {
        let cached = lock(&self.forms).get(&tab).cloned();
        let controls = match cached {
            Some(controls) => controls,
            None => {
                let panel = match tab {
                    Tab::Eco => self.build_eco_panel().await,
                    Tab::Hardware => self.build_hardware_panel().await,
                    Tab::Settings => self.build_settings_panel().await,
                    Tab::Monitor => Ok(Panel {
                        html: String::new(),
                        controls: Vec::new(),
                    }),
                };
                match panel {
                    Ok(panel) => panel.controls,
                    Err(e) => {
                        tracing::error!(device = %self.device(), %tab, "cannot save settings: {e}");
                        return Err(e);
                    }
                }
            }
        };

        let writer = SettingsWriter::new(
            self.session.variables().clone(),
            self.device(),
            Arc::clone(&self.host),
        );
        Ok(writer.save(&controls, form).await)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_names() {
        assert_eq!("Eco".parse::<Tab>(), Ok(Tab::Eco));
        assert_eq!(Tab::Hardware.to_string(), "hardware");
        assert!("stats".parse::<Tab>().is_err());
    }
}
