//! Settings tab: plugin options

use super::form::{FormBuilder, Panel};
use crate::catalog::MessageCatalog;
use crate::controller::{DeviceId, DeviceInfo};
use crate::gauge::BarMode;
use crate::label::strip_unit;
use crate::render::{RenderTarget, SelectOption};
use crate::variables::VariableAccessor;

/// Form field of the IP address input
pub const IP_ADDRESS_FIELD: &str = "IPAddress";

/// Device attribute holding the gateway's IP address
pub const IP_ATTRIBUTE: &str = "ip";

/// Debug logging levels (bit sets)
pub fn debug_options() -> Vec<SelectOption> {
    vec![
        SelectOption::new("0", "Off"),
        SelectOption::new("1", "Message file"),
        SelectOption::new("3", "File & debug statements"),
        SelectOption::new("7", "File & debug & messages"),
        SelectOption::new("15", "File & debug & messages & flags"),
    ]
}

/// Monitor bar modes, see [`BarMode`]
pub fn bar_options() -> Vec<SelectOption> {
    [
        (BarMode::Off, "Off"),
        (BarMode::SingleColor, "Single color"),
        (BarMode::TemperatureRelative, "Temperature relative"),
    ]
    .into_iter()
    .map(|(mode, label)| SelectOption::new((mode as u8).to_string(), label))
    .collect()
}

/// Gateway clock update modes
pub fn clock_options() -> Vec<SelectOption> {
    vec![
        SelectOption::new("0", "No"),
        SelectOption::new("1", "Only time"),
        SelectOption::new("2", "Date and time"),
        SelectOption::new("3", "Date, time and year"),
    ]
}

fn yes_no_options() -> Vec<SelectOption> {
    vec![SelectOption::new("0", "No"), SelectOption::new("1", "Yes")]
}

/// Build the Settings tab.
///
/// `gateway` is the device entry of the gateway itself; `devices` is the full
/// device list the sensor pulldowns are drawn from.
pub async fn build_settings(
    target: &dyn RenderTarget,
    vars: &VariableAccessor,
    gateway: &DeviceInfo,
    devices: &[DeviceInfo],
    catalog: &MessageCatalog,
) -> Panel {
    let device = DeviceId(gateway.id);

    let mut temperature_sensors = vec![SelectOption::new("", "None")];
    let mut humidity_sensors = vec![SelectOption::new("", "None")];
    for d in devices {
        if d.category == DeviceInfo::CATEGORY_TEMPERATURE && d.parent != gateway.id {
            temperature_sensors.push(SelectOption::new(d.id.to_string(), d.name.clone()));
        } else if d.category == DeviceInfo::CATEGORY_HUMIDITY {
            humidity_sensors.push(SelectOption::new(d.id.to_string(), d.name.clone()));
        }
    }

    let children: Vec<SelectOption> = catalog
        .child_messages()
        .map(|m| SelectOption::new(m.id.to_string(), strip_unit(&m.text)))
        .collect();

    let mut form = FormBuilder::new(target, vars, device);
    form.heading("Plugin options");

    if gateway.comm_use {
        form.note("Communicate using UART");
    } else if let Some(ip) = gateway.ip_address() {
        form.attribute_input("Communicate using IP", IP_ADDRESS_FIELD, IP_ATTRIBUTE, 20, ip);
    }

    form.pulldown("Generate debug logging & files", "PluginDebug", &debug_options())
        .await;
    form.pulldown("Outside temperature sensor", "PluginOutsideSensor", &temperature_sensors)
        .await;
    form.pulldown("Room humidity sensor", "PluginHumiditySensor", &humidity_sensors)
        .await;
    form.multi_pulldown("Use child device for temperature", "PluginHaveChildren", &children)
        .await;
    form.pulldown("Create child devices embedded", "PluginEmbedChildren", &yes_no_options())
        .await;
    form.pulldown("Show monitor bar indicator", "PluginMonitorBars", &bar_options())
        .await;
    form.pulldown("Automatically update the gateway clock", "PluginUpdateClock", &clock_options())
        .await;

    form.finish("Settings_UpdateSettings")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_option_values() {
        let values: Vec<_> = bar_options().into_iter().map(|o| o.value).collect();
        assert_eq!(values, vec!["0", "1", "2"]);
    }
}
