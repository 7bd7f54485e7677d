//! Device state variable access
//!
//! Reads never fail: anything the controller cannot answer reads as an empty
//! string, which the panels treat as "not known yet". Writes are
//! fire-and-forget; they are spawned and their failures only logged.

use crate::controller::{Controller, DeviceId};
use std::sync::Arc;
use tokio_util::task::TaskTracker;

/// The value submitted for one form control
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// The control was not on the form or could not be read; nothing is written
    NoSelection,
    /// A single value
    Value(String),
    /// Several values of a multi-select, written comma-joined
    Values(Vec<String>),
}

impl Selection {
    /// Value to persist, `None` for [`Selection::NoSelection`]
    pub fn to_stored(&self) -> Option<String> {
        match self {
            Selection::NoSelection => None,
            Selection::Value(v) => Some(v.clone()),
            Selection::Values(vs) => Some(vs.join(",")),
        }
    }

    /// Whether this selection carries a value
    pub fn is_selected(&self) -> bool {
        !matches!(self, Selection::NoSelection)
    }
}

impl From<&str> for Selection {
    fn from(value: &str) -> Self {
        Selection::Value(value.to_string())
    }
}

impl From<String> for Selection {
    fn from(value: String) -> Self {
        Selection::Value(value)
    }
}

/// Reads and writes a device's state variables under one service id
#[derive(Clone)]
pub struct VariableAccessor {
    controller: Arc<dyn Controller>,
    service: String,
    writes: TaskTracker,
}

impl VariableAccessor {
    /// Accessor for variables of `service`
    pub fn new(controller: Arc<dyn Controller>, service: impl Into<String>) -> Self {
        Self {
            controller,
            service: service.into(),
            writes: TaskTracker::new(),
        }
    }

    /// Accessor for the gateway plugin's own service
    pub fn for_gateway(controller: Arc<dyn Controller>) -> Self {
        Self::new(controller, crate::GATEWAY_SID)
    }

    /// The controller behind this accessor
    pub fn controller(&self) -> &Arc<dyn Controller> {
        &self.controller
    }

    /// Service id variables are scoped to
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Current value of `name`, or an empty string when unset or unreadable
    pub async fn get(&self, device: DeviceId, name: &str) -> String {
        match self.controller.fetch_variable(device, &self.service, name).await {
            Ok(Some(value)) if value != "null" => value,
            Ok(_) => String::new(),
            Err(e) => {
                tracing::debug!(%device, variable = name, "variable read failed: {e}");
                String::new()
            }
        }
    }

    /// Persist `selection` for `name` without waiting for the controller.
    ///
    /// Returns whether a write was issued.
    pub fn set(&self, device: DeviceId, name: &str, selection: &Selection) -> bool {
        let Some(value) = selection.to_stored() else {
            tracing::debug!(%device, variable = name, "no selection, skipping write");
            return false;
        };

        let controller = Arc::clone(&self.controller);
        let service = self.service.clone();
        let name = name.to_string();
        self.writes.spawn(async move {
            if let Err(e) = controller
                .persist_variable(device, &service, &name, &value)
                .await
            {
                tracing::warn!(%device, variable = %name, "variable write failed: {e}");
            }
        });
        true
    }

    /// Set a device attribute without waiting for the controller
    pub fn set_attribute(&self, device: DeviceId, name: &str, value: &str) {
        let controller = Arc::clone(&self.controller);
        let name = name.to_string();
        let value = value.to_string();
        self.writes.spawn(async move {
            if let Err(e) = controller.set_device_attribute(device, &name, &value).await {
                tracing::warn!(%device, attribute = %name, "attribute write failed: {e}");
            }
        });
    }

    /// Invoke `action` of `service` on `device` without waiting for the controller
    pub fn invoke(&self, device: DeviceId, service: &str, action: &str, args: Vec<(String, String)>) {
        let controller = Arc::clone(&self.controller);
        let service = service.to_string();
        let action = action.to_string();
        self.writes.spawn(async move {
            if let Err(e) = controller.invoke_action(device, &service, &action, &args).await {
                tracing::warn!(%device, action = %action, "action failed: {e}");
            }
        });
    }

    /// Wait until every write issued so far has finished
    pub async fn flush(&self) {
        self.writes.close();
        self.writes.wait().await;
        self.writes.reopen();
    }
}
