//! # OTG Panel Core Library
//!
//! Core functionality for the OpenTherm Gateway control panels.

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//!
//! This library provides:
//! - Access to the gateway device's state variables on a Vera-style controller
//! - Message, flag and hardware definitions fetched from the gateway plugin
//! - Static monitor layouts for the UI5 and UI7 controller generations
//! - A refresh engine that keeps the live monitor view in sync
//! - Panel builders for the Monitor, Eco, Hardware and Settings tabs
//! - The settings writer that persists edited controls and reloads the controller
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use otgw_panel_core::controller::HttpController;
//! use otgw_panel_core::cpanel::ControlPanel;
//! use otgw_panel_core::render::UiGeneration;
//!
//! let controller = Arc::new(HttpController::new("http://192.168.1.10:3480", timeout)?);
//! let panel = ControlPanel::new(controller, DeviceId(12), UiGeneration::Ui7, host);
//! panel.open_monitor_tab().await;
//! ```

pub mod catalog;
pub mod config;
pub mod controller;
pub mod cpanel;
pub mod demo;
pub mod gauge;
pub mod host;
pub mod label;
pub mod layout;
pub mod monitor;
pub mod panels;
pub mod render;
pub mod session;
pub mod variables;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::catalog::{FlagDefinition, HardwareCatalog, MessageCatalog, MessageDefinition};
    pub use crate::config::PanelConfig;
    pub use crate::controller::{Controller, DeviceId, HttpController, MemoryController};
    pub use crate::cpanel::ControlPanel;
    pub use crate::host::PanelHost;
    pub use crate::monitor::{MonitorView, RefreshEngine, RefreshTask};
    pub use crate::panels::{FormSelections, Selection};
    pub use crate::render::UiGeneration;
    pub use crate::session::Session;
    pub use crate::variables::VariableAccessor;
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Service identifier every gateway state variable is scoped to.
pub const GATEWAY_SID: &str = "urn:otgw-tclcode-com:serviceId:OpenThermGateway1";

/// Service identifier of the controller itself (device 0).
pub const HOME_AUTOMATION_SID: &str = "urn:micasaverde-com:serviceId:HomeAutomationGateway1";
