//! Panel builders
//!
//! Each tab of the device's control panel is built from the current
//! variable values and rendered through the generation's
//! [`RenderTarget`](crate::render::RenderTarget). Settings-style tabs also
//! report the controls their save action reads back.

mod eco;
mod error;
mod form;
mod hardware;
mod monitor;
mod settings;
mod writer;

pub use crate::variables::Selection;
pub use eco::{
    build_eco, dhw_options, minute_options, optional_yes_options, temperature_options,
    OUTSIDE_TEMPERATURE_VARIABLE,
};
pub use error::PanelError;
pub use form::{ControlBinding, FormControl, FormSelections, Panel};
pub use hardware::build_hardware;
pub use monitor::{build_monitor, MonitorPanel, MONITOR_BARS_VARIABLE};
pub use settings::{
    bar_options, build_settings, clock_options, debug_options, IP_ADDRESS_FIELD, IP_ATTRIBUTE,
};
pub use writer::{SettingsWriter, RELOAD_BUSY_PERIOD, SETTINGS_SAVED_MESSAGE};
