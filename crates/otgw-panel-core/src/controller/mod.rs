//! Home-automation controller access
//!
//! The gateway plugin runs on a Vera-style controller. Everything the panels
//! need from it goes through the [`Controller`] trait: reading and writing
//! state variables, fetching the plugin's JSON definitions, invoking actions
//! and listing the other devices on the controller.
//!
//! ## Implementations
//!
//! - [`HttpController`]: the controller's `data_request` HTTP API
//! - [`MemoryController`]: in-memory store that records writes and actions

mod error;
mod http;
mod memory;

pub use error::ControllerError;
pub use http::HttpController;
pub use memory::{ActionCall, MemoryController};

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Controller device number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(pub u32);

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Plugin request handlers served under `id=lr_<Kind><device>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    /// Message and flag definitions
    GetMessages,
    /// Hardware configuration options
    GetConfiguration,
}

impl RequestKind {
    /// Handler name as registered by the plugin
    pub fn handler_name(&self) -> &'static str {
        match self {
            RequestKind::GetMessages => "GetMessages",
            RequestKind::GetConfiguration => "GetConfiguration",
        }
    }

    /// Full `id` parameter for a device
    pub fn request_id(&self, device: DeviceId) -> String {
        format!("lr_{}{}", self.handler_name(), device)
    }
}

/// A device as listed by the controller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Device number
    #[serde(deserialize_with = "number_or_string")]
    pub id: u32,
    /// User-visible name
    #[serde(default)]
    pub name: String,
    /// Device category (17 = temperature sensor, 16 = humidity sensor, ...)
    #[serde(default, rename = "category_num", deserialize_with = "number_or_string")]
    pub category: u32,
    /// Device subcategory
    #[serde(default, rename = "subcategory_num", deserialize_with = "number_or_string")]
    pub subcategory: u32,
    /// Parent device number (0 for top-level devices)
    #[serde(default, rename = "id_parent", deserialize_with = "number_or_string")]
    pub parent: u32,
    /// Configured IP address, if the device talks over the network
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    /// Whether the device communicates through a controller UART
    #[serde(default, rename = "commUse", deserialize_with = "flag_or_string")]
    pub comm_use: bool,
}

impl DeviceInfo {
    /// Category number of door/window sensors
    pub const CATEGORY_SECURITY_SENSOR: u32 = 4;
    /// Subcategory number of door/window sensors within the security category
    pub const SUBCATEGORY_DOOR: u32 = 1;
    /// Category number of humidity sensors
    pub const CATEGORY_HUMIDITY: u32 = 16;
    /// Category number of temperature sensors
    pub const CATEGORY_TEMPERATURE: u32 = 17;
    /// Category number of alarm partitions
    pub const CATEGORY_ALARM_PARTITION: u32 = 23;

    /// Whether this device is a door or window sensor
    pub fn is_door_sensor(&self) -> bool {
        self.category == Self::CATEGORY_SECURITY_SENSOR && self.subcategory == Self::SUBCATEGORY_DOOR
    }

    /// IP address, with empty strings treated as absent
    pub fn ip_address(&self) -> Option<&str> {
        self.ip.as_deref().filter(|ip| !ip.is_empty())
    }
}

/// The controller sends numbers either as JSON numbers or as strings
fn number_or_string<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(u32),
        Str(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Num(n) => Ok(n),
        Raw::Str(s) if s.trim().is_empty() => Ok(0),
        Raw::Str(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

fn flag_or_string<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Bool(b) => b,
        serde_json::Value::Number(n) => n.as_i64().is_some_and(|n| n != 0),
        serde_json::Value::String(s) => !s.is_empty() && s != "0",
        _ => false,
    })
}

/// Access to the home-automation controller
#[async_trait]
pub trait Controller: Send + Sync {
    /// Read a state variable. `Ok(None)` when the variable is not defined.
    async fn fetch_variable(
        &self,
        device: DeviceId,
        service: &str,
        name: &str,
    ) -> Result<Option<String>, ControllerError>;

    /// Persist a state variable
    async fn persist_variable(
        &self,
        device: DeviceId,
        service: &str,
        name: &str,
        value: &str,
    ) -> Result<(), ControllerError>;

    /// Run one of the plugin's JSON request handlers
    async fn fetch_json(
        &self,
        kind: RequestKind,
        device: DeviceId,
        service: &str,
    ) -> Result<serde_json::Value, ControllerError>;

    /// Invoke a device action
    async fn invoke_action(
        &self,
        device: DeviceId,
        service: &str,
        action: &str,
        args: &[(String, String)],
    ) -> Result<(), ControllerError>;

    /// List every device known to the controller
    async fn list_devices(&self) -> Result<Vec<DeviceInfo>, ControllerError>;

    /// Set a device attribute (as opposed to a service state variable)
    async fn set_device_attribute(
        &self,
        device: DeviceId,
        name: &str,
        value: &str,
    ) -> Result<(), ControllerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id() {
        assert_eq!(RequestKind::GetMessages.request_id(DeviceId(12)), "lr_GetMessages12");
        assert_eq!(
            RequestKind::GetConfiguration.request_id(DeviceId(3)),
            "lr_GetConfiguration3"
        );
    }

    #[test]
    fn test_device_info_accepts_string_numbers() {
        let json = r#"{"id":"21","name":"Back door","category_num":"4","subcategory_num":1,"id_parent":"0"}"#;
        let dev: DeviceInfo = serde_json::from_str(json).unwrap();
        assert_eq!(dev.id, 21);
        assert!(dev.is_door_sensor());
        assert!(!dev.comm_use);
        assert_eq!(dev.ip_address(), None);
    }

    #[test]
    fn test_device_info_empty_ip_is_absent() {
        let json = r#"{"id":7,"ip":"","commUse":"1"}"#;
        let dev: DeviceInfo = serde_json::from_str(json).unwrap();
        assert_eq!(dev.ip_address(), None);
        assert!(dev.comm_use);
    }
}
