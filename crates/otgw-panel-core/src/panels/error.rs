//! Panel error types

use crate::catalog::CatalogError;
use crate::controller::{ControllerError, DeviceId};
use thiserror::Error;

/// Why a panel could not be built or an action not be issued
#[derive(Debug, Error)]
pub enum PanelError {
    /// The controller did not answer usefully
    #[error("controller request failed: {0}")]
    Controller(#[from] ControllerError),

    /// The plugin returned definitions that could not be parsed
    #[error("invalid gateway definitions: {0}")]
    Catalog(#[from] CatalogError),

    /// The gateway device is not in the controller's device list
    #[error("device {0} not found on the controller")]
    DeviceNotFound(DeviceId),
}
