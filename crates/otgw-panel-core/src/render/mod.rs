//! HTML generation for the two controller UI generations
//!
//! Panels are described once and rendered through a [`RenderTarget`]: UI5
//! lays everything out in tables and absolutely positioned elements, UI7 in
//! a responsive grid with its own settings-page styling.

pub mod html;
mod ui5;
mod ui7;

pub use html::{build_id, escape_html, SelectOption};
pub use ui5::Ui5Target;
pub use ui7::Ui7Target;

use crate::controller::DeviceId;
use crate::layout::DisplayLayout;
use crate::monitor::MonitorView;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Controller UI generation the panels are rendered for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UiGeneration {
    /// Vera UI5
    Ui5,
    /// Vera UI7
    #[default]
    Ui7,
}

impl UiGeneration {
    /// Delay between two monitor refresh ticks
    pub fn refresh_interval(&self) -> Duration {
        match self {
            UiGeneration::Ui5 => Duration::from_secs(1),
            UiGeneration::Ui7 => Duration::from_secs(2),
        }
    }

    /// Short name (`ui5`, `ui7`)
    pub fn as_str(&self) -> &'static str {
        match self {
            UiGeneration::Ui5 => "ui5",
            UiGeneration::Ui7 => "ui7",
        }
    }
}

impl fmt::Display for UiGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognised UI generation name
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown UI generation '{0}' (expected ui5 or ui7)")]
pub struct UnknownGeneration(pub String);

impl FromStr for UiGeneration {
    type Err = UnknownGeneration;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ui5" | "5" => Ok(UiGeneration::Ui5),
            "ui7" | "7" => Ok(UiGeneration::Ui7),
            _ => Err(UnknownGeneration(s.to_string())),
        }
    }
}

/// Generation-specific HTML for the panel building blocks.
///
/// Labels are plain text; implementations escape them.
pub trait RenderTarget: Send + Sync {
    /// Generation this target renders for
    fn generation(&self) -> UiGeneration;

    /// Complete Monitor tab for `view` placed according to `layout`
    fn monitor(&self, device: DeviceId, layout: &DisplayLayout, view: &MonitorView) -> String;

    /// Wrap the controls of a settings-style tab
    fn settings_page(&self, body: &str) -> String;

    /// Section heading
    fn heading(&self, text: &str) -> String;

    /// Informational line; `html` is inserted as is
    fn note(&self, html: &str) -> String;

    /// Labelled single-choice pulldown bound to `variable`
    fn pulldown(
        &self,
        device: DeviceId,
        label: &str,
        variable: &str,
        options: &[SelectOption],
        selected: &str,
    ) -> String;

    /// Labelled multi-choice list bound to `variable`
    fn multi_pulldown(
        &self,
        device: DeviceId,
        label: &str,
        variable: &str,
        options: &[SelectOption],
        selected: &[&str],
    ) -> String;

    /// Labelled text input bound to `variable`
    fn input(&self, device: DeviceId, label: &str, variable: &str, size: u8, value: &str) -> String;

    /// Button invoking the script callback `callback` for `device`
    fn save_button(&self, device: DeviceId, label: &str, callback: &str) -> String;
}

/// Render target for `generation`
pub fn target_for(generation: UiGeneration) -> Box<dyn RenderTarget> {
    match generation {
        UiGeneration::Ui5 => Box::new(Ui5Target),
        UiGeneration::Ui7 => Box::new(Ui7Target),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_parse() {
        assert_eq!("UI5".parse::<UiGeneration>(), Ok(UiGeneration::Ui5));
        assert_eq!("ui7".parse::<UiGeneration>(), Ok(UiGeneration::Ui7));
        assert!("ui6".parse::<UiGeneration>().is_err());
        assert_eq!(UiGeneration::Ui5.refresh_interval(), Duration::from_secs(1));
        assert_eq!(target_for(UiGeneration::Ui5).generation(), UiGeneration::Ui5);
    }
}
