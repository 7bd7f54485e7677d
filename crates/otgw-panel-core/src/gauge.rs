//! Bar gauge math
//!
//! Monitor rows with a display range get a bar whose width is the value
//! rescaled to 0–100 %. In temperature-relative mode Celsius rows are also
//! coloured along a cold-to-warm gradient.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How the monitor draws bars (`PluginMonitorBars`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum BarMode {
    /// No bars
    #[default]
    Off,
    /// Bars in the default colour
    SingleColor,
    /// Celsius bars coloured by their percentage
    TemperatureRelative,
}

impl BarMode {
    /// Interpret the stored variable value; anything unparseable means off
    pub fn from_variable(value: &str) -> Self {
        match value.trim().parse::<i32>() {
            Ok(n) if n >= 2 => BarMode::TemperatureRelative,
            Ok(1) => BarMode::SingleColor,
            _ => BarMode::Off,
        }
    }

    /// Whether bars are drawn at all
    pub fn enabled(&self) -> bool {
        *self != BarMode::Off
    }
}

/// An sRGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    /// Red channel
    pub red: u8,
    /// Green channel
    pub green: u8,
    /// Blue channel
    pub blue: u8,
}

impl Rgb {
    /// Create from channels
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Convert to CSS `rgb()` notation
    pub fn to_css(&self) -> String {
        format!("rgb({},{},{})", self.red, self.green, self.blue)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

/// Gradient colour at 0 %
pub const COLD: Rgb = Rgb::new(0x00, 0xCC, 0xFF);

/// Gradient colour at 100 %
pub const WARM: Rgb = Rgb::new(0xFF, 0x44, 0x00);

/// Rescale `value` from `[min, max]` to a whole percentage.
///
/// Values at or below `min` give 0, at or above `max` give 100. A collapsed
/// or inverted range has no interior, so the same two rules decide.
pub fn percentage(value: f64, min: f64, max: f64) -> u8 {
    if value.is_nan() || value <= min {
        return 0;
    }
    if value >= max {
        return 100;
    }
    let pct = ((value - min) / (max - min) * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}

/// Colour for a bar at `pct` percent: red rises, green and blue fall
pub fn gradient_color(pct: u8) -> Rgb {
    let p = f64::from(pct.min(100)) / 100.0;
    let mix = |cold: u8, warm: u8| -> u8 {
        (f64::from(cold) + (f64::from(warm) - f64::from(cold)) * p).round() as u8
    };
    Rgb::new(
        mix(COLD.red, WARM.red),
        mix(COLD.green, WARM.green),
        mix(COLD.blue, WARM.blue),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_bounds() {
        assert_eq!(percentage(5.0, 10.0, 30.0), 0);
        assert_eq!(percentage(10.0, 10.0, 30.0), 0);
        assert_eq!(percentage(30.0, 10.0, 30.0), 100);
        assert_eq!(percentage(45.0, 10.0, 30.0), 100);
        assert_eq!(percentage(20.0, 10.0, 30.0), 50);
    }

    #[test]
    fn test_percentage_degenerate_range() {
        assert_eq!(percentage(3.0, 5.0, 5.0), 0);
        assert_eq!(percentage(5.0, 5.0, 5.0), 0);
        assert_eq!(percentage(7.0, 5.0, 5.0), 100);
        assert_eq!(percentage(f64::NAN, 0.0, 100.0), 0);
    }

    #[test]
    fn test_gradient_endpoints() {
        assert_eq!(gradient_color(0), COLD);
        assert_eq!(gradient_color(100), WARM);
        assert_eq!(gradient_color(50).to_css(), "rgb(128,136,128)");
    }

    #[test]
    fn test_bar_mode() {
        assert_eq!(BarMode::from_variable("0"), BarMode::Off);
        assert_eq!(BarMode::from_variable("1"), BarMode::SingleColor);
        assert_eq!(BarMode::from_variable("2"), BarMode::TemperatureRelative);
        assert_eq!(BarMode::from_variable(""), BarMode::Off);
        assert!(!BarMode::Off.enabled());
    }
}
