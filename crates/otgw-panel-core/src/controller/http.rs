//! Controller client for the `data_request` HTTP API
//!
//! Every call is a `GET <base>/data_request?id=...` with Vera's query
//! parameters. Plain variable reads come back as text, everything asked for
//! with `output_format=json` comes back as JSON.

use super::{Controller, ControllerError, DeviceId, DeviceInfo, RequestKind};
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use std::time::Duration;

/// `user_data` response; only the device list is of interest
#[derive(Debug, Deserialize)]
struct UserData {
    #[serde(default)]
    devices: Vec<DeviceInfo>,
}

/// Controller reached over HTTP
pub struct HttpController {
    /// HTTP client for API requests
    client: reqwest::Client,
    /// Full URL of the data_request endpoint
    endpoint: Url,
}

impl HttpController {
    /// Create a client for the controller at `base_url` (e.g. `http://192.168.1.10:3480`)
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ControllerError> {
        let mut base = Url::parse(base_url).map_err(|e| ControllerError::InvalidUrl(e.to_string()))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let endpoint = base
            .join("data_request")
            .map_err(|e| ControllerError::InvalidUrl(e.to_string()))?;

        let client = reqwest::Client::builder()
            .user_agent(concat!("otgw-panel/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Ok(HttpController { client, endpoint })
    }

    /// The data_request endpoint this client talks to
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn request(&self, params: &[(&str, String)]) -> Result<reqwest::Response, ControllerError> {
        tracing::trace!(endpoint = %self.endpoint, ?params, "data_request");
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ControllerError::BadStatus(response.status().as_u16()));
        }
        Ok(response)
    }
}

/// Cache-busting timestamp, as the browser UI sends it
fn timestamp_ms() -> String {
    chrono::Utc::now().timestamp_millis().to_string()
}

#[async_trait]
impl Controller for HttpController {
    async fn fetch_variable(
        &self,
        device: DeviceId,
        service: &str,
        name: &str,
    ) -> Result<Option<String>, ControllerError> {
        let body = self
            .request(&[
                ("id", "variableget".to_string()),
                ("DeviceNum", device.to_string()),
                ("serviceId", service.to_string()),
                ("Variable", name.to_string()),
            ])
            .await?
            .text()
            .await?;

        // Unknown variables are reported in-band
        if body.starts_with("ERROR") || body == "null" {
            return Ok(None);
        }
        Ok(Some(body))
    }

    async fn persist_variable(
        &self,
        device: DeviceId,
        service: &str,
        name: &str,
        value: &str,
    ) -> Result<(), ControllerError> {
        self.request(&[
            ("id", "variableset".to_string()),
            ("DeviceNum", device.to_string()),
            ("serviceId", service.to_string()),
            ("Variable", name.to_string()),
            ("Value", value.to_string()),
        ])
        .await?;
        Ok(())
    }

    async fn fetch_json(
        &self,
        kind: RequestKind,
        device: DeviceId,
        service: &str,
    ) -> Result<serde_json::Value, ControllerError> {
        let response = self
            .request(&[
                ("id", kind.request_id(device)),
                ("serviceId", service.to_string()),
                ("DeviceNum", device.to_string()),
                ("timestamp", timestamp_ms()),
                ("output_format", "json".to_string()),
            ])
            .await?;
        Ok(response.json().await?)
    }

    async fn invoke_action(
        &self,
        device: DeviceId,
        service: &str,
        action: &str,
        args: &[(String, String)],
    ) -> Result<(), ControllerError> {
        let mut params = vec![
            ("id", "action".to_string()),
            ("output_format", "json".to_string()),
            ("DeviceNum", device.to_string()),
            ("serviceId", service.to_string()),
            ("action", action.to_string()),
        ];
        params.extend(args.iter().map(|(k, v)| (k.as_str(), v.clone())));
        self.request(&params).await?;
        Ok(())
    }

    async fn list_devices(&self) -> Result<Vec<DeviceInfo>, ControllerError> {
        let data: UserData = self
            .request(&[
                ("id", "user_data".to_string()),
                ("output_format", "json".to_string()),
            ])
            .await?
            .json()
            .await?;
        Ok(data.devices)
    }

    async fn set_device_attribute(
        &self,
        device: DeviceId,
        name: &str,
        value: &str,
    ) -> Result<(), ControllerError> {
        // variableset without a serviceId targets the device attribute
        self.request(&[
            ("id", "variableset".to_string()),
            ("DeviceNum", device.to_string()),
            ("Variable", name.to_string()),
            ("Value", value.to_string()),
        ])
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_from_base_url() {
        let ctl = HttpController::new("http://192.168.1.10:3480", Duration::from_secs(5)).unwrap();
        assert_eq!(ctl.endpoint().as_str(), "http://192.168.1.10:3480/data_request");

        let ctl = HttpController::new("http://vera.local/port_3480", Duration::from_secs(5)).unwrap();
        assert_eq!(ctl.endpoint().as_str(), "http://vera.local/port_3480/data_request");
    }

    #[test]
    fn test_invalid_base_url() {
        let result = HttpController::new("not a url", Duration::from_secs(5));
        assert!(matches!(result, Err(ControllerError::InvalidUrl(_))));
    }
}
