//! Eco tab: what the gateway changes in eco, away and open-window situations

use super::form::{FormBuilder, Panel};
use crate::controller::{DeviceId, DeviceInfo};
use crate::render::{RenderTarget, SelectOption};
use crate::variables::VariableAccessor;

/// Variable the plugin publishes the outside temperature in
pub const OUTSIDE_TEMPERATURE_VARIABLE: &str = "OutsideTemperature";

/// Domestic hot water actions
pub fn dhw_options() -> Vec<SelectOption> {
    vec![
        SelectOption::new("0", "No"),
        SelectOption::new("1", "Disable"),
        SelectOption::new("2", "Set to Automatic"),
    ]
}

/// Room setpoint actions: relative decreases, then absolute setpoints
pub fn temperature_options() -> Vec<SelectOption> {
    let mut options = vec![SelectOption::new("0", "No")];
    options.extend((1..=5).map(|n| SelectOption::new(format!("-{n}"), format!("{n} °C lower"))));
    options.extend((15..=22).map(|n| SelectOption::new(n.to_string(), format!("Set to {n}°C"))));
    options
}

/// Minimum open time of a door or window
pub fn minute_options() -> Vec<SelectOption> {
    let mut options = vec![
        SelectOption::new("", "N/A"),
        SelectOption::new("1", "1 minute"),
    ];
    options.extend((2..=10).map(|n| SelectOption::new(n.to_string(), format!("{n} minutes"))));
    options
}

/// Optional yes
pub fn optional_yes_options() -> Vec<SelectOption> {
    vec![SelectOption::new("", "N/A"), SelectOption::new("1", "Yes")]
}

fn device_options<'a>(devices: impl Iterator<Item = &'a DeviceInfo>) -> Vec<SelectOption> {
    devices
        .map(|d| SelectOption::new(d.id.to_string(), d.name.clone()))
        .collect()
}

/// Build the Eco tab for `device`, offering sensors from `devices`
pub async fn build_eco(
    target: &dyn RenderTarget,
    vars: &VariableAccessor,
    device: DeviceId,
    devices: &[DeviceInfo],
) -> Panel {
    let doors = device_options(devices.iter().filter(|d| d.is_door_sensor()));
    let partitions = device_options(
        devices
            .iter()
            .filter(|d| d.category == DeviceInfo::CATEGORY_ALARM_PARTITION),
    );
    let dhw = dhw_options();
    let temperature = temperature_options();

    let mut form = FormBuilder::new(target, vars, device);

    form.heading("Default Eco mode options");
    form.pulldown("Change domestic hot water", "PluginEcoDHW", &dhw).await;
    form.pulldown("Change room setpoint", "PluginEcoTemp", &temperature).await;

    form.heading("Eco options when House Mode is Away");
    if !partitions.is_empty() {
        let mut options = vec![SelectOption::new("", "None")];
        options.extend(partitions);
        form.pulldown("Select alarm panel partition device", "PluginPartitionDevice", &options)
            .await;
    }
    form.pulldown("Change domestic hot water", "PluginArmedAwayDHW", &dhw).await;
    form.pulldown("Change room setpoint", "PluginArmedAwayTemp", &temperature).await;

    form.heading("Eco options when a door/window is open");
    if doors.is_empty() {
        form.note("<i>No door sensor found.</i><br>");
    } else {
        form.multi_pulldown("Select door/window devices", "PluginDoorWindowDevices", &doors)
            .await;
        form.pulldown("Change room setpoint", "PluginDoorWindowTemp", &temperature).await;
        form.pulldown(
            "Option: only when it is open for more than",
            "PluginDoorWindowMinutes",
            &minute_options(),
        )
        .await;
        if !vars.get(device, OUTSIDE_TEMPERATURE_VARIABLE).await.is_empty() {
            form.pulldown(
                "Option: only when it is colder outside than inside",
                "PluginDoorWindowOutside",
                &optional_yes_options(),
            )
            .await;
        }
    }

    form.finish("Eco_UpdateSettings")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temperature_options() {
        let options = temperature_options();
        assert_eq!(options.len(), 1 + 5 + 8);
        assert_eq!(options[1], SelectOption::new("-1", "1 °C lower"));
        assert_eq!(options[6], SelectOption::new("15", "Set to 15°C"));
        assert_eq!(options.last().unwrap().value, "22");
    }

    #[test]
    fn test_minute_options() {
        let options = minute_options();
        assert_eq!(options[0].value, "");
        assert_eq!(options[2], SelectOption::new("2", "2 minutes"));
        assert_eq!(options.len(), 11);
    }
}
