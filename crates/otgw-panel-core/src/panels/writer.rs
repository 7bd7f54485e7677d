//! Writing edited settings back to the controller

use super::form::{ControlBinding, FormControl, FormSelections};
use crate::controller::DeviceId;
use crate::host::PanelHost;
use crate::variables::VariableAccessor;
use crate::HOME_AUTOMATION_SID;
use std::sync::Arc;
use std::time::Duration;

/// Shown once the controller has been told to reload
pub const SETTINGS_SAVED_MESSAGE: &str = "Settings updated, Vera restarting.";

/// How long the busy indicator stays up after asking for a reload
pub const RELOAD_BUSY_PERIOD: Duration = Duration::from_secs(3);

/// Persists the controls of a panel and restarts the controller
pub struct SettingsWriter {
    vars: VariableAccessor,
    device: DeviceId,
    host: Arc<dyn PanelHost>,
    busy_period: Duration,
}

impl SettingsWriter {
    /// Writer for `device`'s settings
    pub fn new(vars: VariableAccessor, device: DeviceId, host: Arc<dyn PanelHost>) -> Self {
        Self {
            vars,
            device,
            host,
            busy_period: RELOAD_BUSY_PERIOD,
        }
    }

    /// Override how long the busy indicator is shown
    pub fn with_busy_period(mut self, period: Duration) -> Self {
        self.busy_period = period;
        self
    }

    /// Write every submitted control, then reload the controller.
    ///
    /// Returns the number of writes issued. The reload is sent only after
    /// every write has been answered; nothing waits for the reload itself.
    pub async fn save(&self, controls: &[FormControl], form: &FormSelections) -> usize {
        let mut written = 0;
        for control in controls {
            let selection = form.get(&control.field);
            match &control.binding {
                ControlBinding::Variable(name) => {
                    if self.vars.set(self.device, name, &selection) {
                        written += 1;
                    }
                }
                ControlBinding::Attribute(name) => {
                    if let Some(value) = selection.to_stored().filter(|v| !v.is_empty()) {
                        self.vars.set_attribute(self.device, name, &value);
                        written += 1;
                    }
                }
            }
        }
        tracing::info!(device = %self.device, written, "settings saved, reloading controller");

        self.host.set_busy(true);
        // The reload must not overtake the writes
        self.vars.flush().await;
        self.vars
            .invoke(DeviceId(0), HOME_AUTOMATION_SID, "Reload", Vec::new());
        tokio::time::sleep(self.busy_period).await;
        self.host.set_busy(false);
        self.host.show_message(SETTINGS_SAVED_MESSAGE);
        written
    }
}
