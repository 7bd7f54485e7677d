//! In-memory controller
//!
//! Keeps state variables in a map and records every write and action so
//! callers can inspect what would have been sent to a real controller.

use super::{Controller, ControllerError, DeviceId, DeviceInfo, RequestKind};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// An action invocation recorded by [`MemoryController`]
#[derive(Debug, Clone, PartialEq)]
pub struct ActionCall {
    /// Target device
    pub device: DeviceId,
    /// Service the action belongs to
    pub service: String,
    /// Action name
    pub action: String,
    /// Action arguments in call order
    pub args: Vec<(String, String)>,
}

#[derive(Default)]
struct MemoryState {
    variables: HashMap<(DeviceId, String, String), String>,
    attributes: HashMap<(DeviceId, String), String>,
    json: HashMap<RequestKind, serde_json::Value>,
    devices: Vec<DeviceInfo>,
    writes: Vec<(DeviceId, String, String)>,
    actions: Vec<ActionCall>,
    json_requests: usize,
    offline: bool,
}

/// Controller backed by in-process maps
#[derive(Default)]
pub struct MemoryController {
    state: RwLock<MemoryState>,
}

impl MemoryController {
    /// Create an empty controller
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable without recording it as a write
    pub fn set_variable(&self, device: DeviceId, service: &str, name: &str, value: impl Into<String>) {
        if let Ok(mut state) = self.state.write() {
            state
                .variables
                .insert((device, service.to_string(), name.to_string()), value.into());
        }
    }

    /// Remove a variable so it reads as undefined
    pub fn clear_variable(&self, device: DeviceId, service: &str, name: &str) {
        if let Ok(mut state) = self.state.write() {
            state
                .variables
                .remove(&(device, service.to_string(), name.to_string()));
        }
    }

    /// Current value of a variable
    pub fn variable(&self, device: DeviceId, service: &str, name: &str) -> Option<String> {
        self.state
            .read()
            .ok()?
            .variables
            .get(&(device, service.to_string(), name.to_string()))
            .cloned()
    }

    /// Current value of a device attribute
    pub fn attribute(&self, device: DeviceId, name: &str) -> Option<String> {
        self.state
            .read()
            .ok()?
            .attributes
            .get(&(device, name.to_string()))
            .cloned()
    }

    /// Serve `value` for a JSON request handler
    pub fn set_json(&self, kind: RequestKind, value: serde_json::Value) {
        if let Ok(mut state) = self.state.write() {
            state.json.insert(kind, value);
        }
    }

    /// Replace the device list
    pub fn set_devices(&self, devices: Vec<DeviceInfo>) {
        if let Ok(mut state) = self.state.write() {
            state.devices = devices;
        }
    }

    /// Make every call fail as if the controller were unreachable
    pub fn set_offline(&self, offline: bool) {
        if let Ok(mut state) = self.state.write() {
            state.offline = offline;
        }
    }

    /// Variable writes in the order they arrived: `(device, name, value)`
    pub fn writes(&self) -> Vec<(DeviceId, String, String)> {
        self.state.read().map(|s| s.writes.clone()).unwrap_or_default()
    }

    /// Actions in the order they were invoked
    pub fn actions(&self) -> Vec<ActionCall> {
        self.state.read().map(|s| s.actions.clone()).unwrap_or_default()
    }

    /// Number of JSON handler requests served (successful or not)
    pub fn json_requests(&self) -> usize {
        self.state.read().map(|s| s.json_requests).unwrap_or_default()
    }

    fn check_online(&self) -> Result<(), ControllerError> {
        match self.state.read() {
            Ok(state) if state.offline => {
                Err(ControllerError::HttpError("controller unreachable".to_string()))
            }
            Ok(_) => Ok(()),
            Err(_) => Err(ControllerError::HttpError("state lock poisoned".to_string())),
        }
    }
}

#[async_trait]
impl Controller for MemoryController {
    async fn fetch_variable(
        &self,
        device: DeviceId,
        service: &str,
        name: &str,
    ) -> Result<Option<String>, ControllerError> {
        self.check_online()?;
        Ok(self.variable(device, service, name))
    }

    async fn persist_variable(
        &self,
        device: DeviceId,
        service: &str,
        name: &str,
        value: &str,
    ) -> Result<(), ControllerError> {
        self.check_online()?;
        let mut state = self
            .state
            .write()
            .map_err(|_| ControllerError::HttpError("state lock poisoned".to_string()))?;
        state
            .variables
            .insert((device, service.to_string(), name.to_string()), value.to_string());
        state.writes.push((device, name.to_string(), value.to_string()));
        Ok(())
    }

    async fn fetch_json(
        &self,
        kind: RequestKind,
        device: DeviceId,
        _service: &str,
    ) -> Result<serde_json::Value, ControllerError> {
        if let Ok(mut state) = self.state.write() {
            state.json_requests += 1;
        }
        self.check_online()?;
        self.state
            .read()
            .ok()
            .and_then(|s| s.json.get(&kind).cloned())
            .ok_or_else(|| {
                ControllerError::InvalidResponse(format!(
                    "no handler {} registered",
                    kind.request_id(device)
                ))
            })
    }

    async fn invoke_action(
        &self,
        device: DeviceId,
        service: &str,
        action: &str,
        args: &[(String, String)],
    ) -> Result<(), ControllerError> {
        self.check_online()?;
        if let Ok(mut state) = self.state.write() {
            state.actions.push(ActionCall {
                device,
                service: service.to_string(),
                action: action.to_string(),
                args: args.to_vec(),
            });
        }
        Ok(())
    }

    async fn list_devices(&self) -> Result<Vec<DeviceInfo>, ControllerError> {
        self.check_online()?;
        Ok(self.state.read().map(|s| s.devices.clone()).unwrap_or_default())
    }

    async fn set_device_attribute(
        &self,
        device: DeviceId,
        name: &str,
        value: &str,
    ) -> Result<(), ControllerError> {
        self.check_online()?;
        if let Ok(mut state) = self.state.write() {
            state
                .attributes
                .insert((device, name.to_string()), value.to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_writes_are_recorded() {
        let ctl = MemoryController::new();
        ctl.persist_variable(DeviceId(4), "sid", "PluginDebug", "1")
            .await
            .unwrap();
        assert_eq!(ctl.variable(DeviceId(4), "sid", "PluginDebug").as_deref(), Some("1"));
        assert_eq!(
            ctl.writes(),
            vec![(DeviceId(4), "PluginDebug".to_string(), "1".to_string())]
        );
    }

    #[tokio::test]
    async fn test_offline_fails_every_call() {
        let ctl = MemoryController::new();
        ctl.set_offline(true);
        assert!(ctl.fetch_variable(DeviceId(1), "sid", "x").await.is_err());
        assert!(ctl.list_devices().await.is_err());
    }
}
