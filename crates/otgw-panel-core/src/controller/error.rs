//! Controller errors

use thiserror::Error;

/// Errors that can occur while talking to the home-automation controller
#[derive(Error, Debug)]
pub enum ControllerError {
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Controller returned status {0}")]
    BadStatus(u16),

    #[error("Invalid response from controller: {0}")]
    InvalidResponse(String),

    #[error("Invalid controller URL: {0}")]
    InvalidUrl(String),

    #[error("Device {0} not found")]
    DeviceNotFound(u32),
}

impl From<reqwest::Error> for ControllerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ControllerError::Timeout
        } else if let Some(status) = err.status() {
            ControllerError::BadStatus(status.as_u16())
        } else if err.is_decode() {
            ControllerError::InvalidResponse(err.to_string())
        } else {
            ControllerError::HttpError(err.to_string())
        }
    }
}
