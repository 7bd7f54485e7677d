//! Demo Mode - Simulated gateway for running the panels without hardware
//!
//! Wraps a [`MemoryController`] seeded with the plugin's definitions, a small
//! device list and a boiler that slowly heats a room. Values drift each
//! time the simulation is stepped; reads step it at most once per second.

use crate::controller::{
    Controller, ControllerError, DeviceId, DeviceInfo, MemoryController, RequestKind,
};
use crate::GATEWAY_SID;
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;
use std::time::{Duration, Instant};

const DEMO_MESSAGES: &str = include_str!("../data/get_messages.json");
const DEMO_CONFIGURATION: &str = include_str!("../data/get_configuration.json");

/// Minimum time between two simulation steps triggered by reads
const STEP_PERIOD: Duration = Duration::from_secs(1);

struct BoilerSimulator {
    rng: StdRng,
    room: f64,
    setpoint: f64,
    outside: f64,
    boiler_water: f64,
    modulation: f64,
    pressure: f64,
    burner_on: bool,
    errors: [u32; 4],
    last_step: Option<Instant>,
}

impl BoilerSimulator {
    fn new(rng: StdRng) -> Self {
        Self {
            rng,
            room: 19.2,
            setpoint: 21.0,
            outside: 6.5,
            boiler_water: 38.0,
            modulation: 0.0,
            pressure: 1.6,
            burner_on: false,
            errors: [0; 4],
            last_step: None,
        }
    }

    fn step(&mut self) {
        // Hysteresis of half a degree around the setpoint
        if self.room < self.setpoint - 0.5 {
            self.burner_on = true;
        } else if self.room > self.setpoint + 0.2 {
            self.burner_on = false;
        }

        let target_modulation = if self.burner_on {
            ((self.setpoint - self.room) * 40.0).clamp(10.0, 100.0)
        } else {
            0.0
        };
        self.modulation += (target_modulation - self.modulation) * 0.3;

        let target_water = if self.burner_on {
            35.0 + self.modulation * 0.4
        } else {
            25.0
        };
        self.boiler_water += (target_water - self.boiler_water) * 0.1 + self.rng.gen_range(-0.2..0.2);

        let heat_in = (self.boiler_water - self.room) * 0.002;
        let heat_out = (self.room - self.outside) * 0.001;
        self.room += heat_in - heat_out + self.rng.gen_range(-0.02..0.02);
        self.outside += self.rng.gen_range(-0.05..0.05);
        self.pressure = (self.pressure + self.rng.gen_range(-0.01..0.01)).clamp(1.2, 2.0);

        // An occasional transmission error
        if self.rng.gen_bool(0.02) {
            let slot = self.rng.gen_range(0..self.errors.len());
            self.errors[slot] += 1;
        }
    }

    fn variables(&self) -> Vec<(&'static str, String)> {
        let flag = |on: bool| if on { "1" } else { "0" }.to_string();
        let control_setpoint = if self.burner_on {
            35.0 + self.modulation * 0.4
        } else {
            10.0
        };
        vec![
            ("CurrentTemperature", format!("{:.2}", self.room)),
            ("CurrentSetpoint", format!("{:.1}", self.setpoint)),
            ("OutsideTemperature", format!("{:.1}", self.outside)),
            ("BoilerWaterTemperature", format!("{:.1}", self.boiler_water)),
            ("ReturnWaterTemperature", format!("{:.1}", self.boiler_water - 8.0)),
            ("RelativeModulationLevel", format!("{:.0}", self.modulation)),
            ("CHWaterPressure", format!("{:.2}", self.pressure)),
            ("ControlSetpoint", format!("{control_setpoint:.1}")),
            ("StatusCHMode", flag(self.burner_on)),
            ("StatusFlame", flag(self.burner_on)),
            (
                "Errors",
                self.errors
                    .iter()
                    .map(u32::to_string)
                    .collect::<Vec<_>>()
                    .join(","),
            ),
        ]
    }
}

/// Controller simulating one gateway plugin device
pub struct DemoController {
    inner: MemoryController,
    sim: Mutex<BoilerSimulator>,
}

impl Default for DemoController {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoController {
    /// Device number of the simulated gateway
    pub const DEVICE: DeviceId = DeviceId(12);

    /// Create a demo controller with random drift
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Create a demo controller whose drift is reproducible
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        let inner = MemoryController::new();
        seed_definitions(&inner);
        let demo = Self {
            inner,
            sim: Mutex::new(BoilerSimulator::new(rng)),
        };
        demo.publish();
        demo
    }

    /// The underlying store, for inspecting writes and actions
    pub fn store(&self) -> &MemoryController {
        &self.inner
    }

    /// Advance the simulation one step and publish the new values
    pub fn step(&self) {
        if let Ok(mut sim) = self.sim.lock() {
            sim.step();
            sim.last_step = Some(Instant::now());
        }
        self.publish();
    }

    fn step_if_due(&self) {
        let due = self.sim.lock().is_ok_and(|sim| {
            sim.last_step
                .map_or(true, |at| at.elapsed() >= STEP_PERIOD)
        });
        if due {
            self.step();
        }
    }

    fn publish(&self) {
        let values = match self.sim.lock() {
            Ok(sim) => sim.variables(),
            Err(_) => return,
        };
        for (name, value) in values {
            self.inner.set_variable(Self::DEVICE, GATEWAY_SID, name, value);
        }
    }
}

fn seed_definitions(store: &MemoryController) {
    match serde_json::from_str(DEMO_MESSAGES) {
        Ok(json) => store.set_json(RequestKind::GetMessages, json),
        Err(e) => tracing::error!("demo message definitions are invalid: {e}"),
    }
    match serde_json::from_str(DEMO_CONFIGURATION) {
        Ok(json) => store.set_json(RequestKind::GetConfiguration, json),
        Err(e) => tracing::error!("demo configuration is invalid: {e}"),
    }

    let device = |id: u32, name: &str, category: u32, subcategory: u32| DeviceInfo {
        id,
        name: name.to_string(),
        category,
        subcategory,
        ..DeviceInfo::default()
    };
    store.set_devices(vec![
        DeviceInfo {
            ip: Some("192.168.1.50:6638".to_string()),
            ..device(DemoController::DEVICE.0, "OpenTherm Gateway", 5, 0)
        },
        DeviceInfo {
            parent: DemoController::DEVICE.0,
            ..device(13, "OTG Outside temperature", DeviceInfo::CATEGORY_TEMPERATURE, 0)
        },
        device(20, "Garden thermometer", DeviceInfo::CATEGORY_TEMPERATURE, 0),
        device(21, "Living room humidity", DeviceInfo::CATEGORY_HUMIDITY, 0),
        device(
            30,
            "Kitchen window",
            DeviceInfo::CATEGORY_SECURITY_SENSOR,
            DeviceInfo::SUBCATEGORY_DOOR,
        ),
        device(
            31,
            "Back door",
            DeviceInfo::CATEGORY_SECURITY_SENSOR,
            DeviceInfo::SUBCATEGORY_DOOR,
        ),
    ]);

    let settings = [
        ("PluginMonitorBars", "2"),
        ("PluginDebug", "0"),
        ("PluginEcoDHW", "1"),
        ("PluginEcoTemp", "-2"),
        ("PluginHaveChildren", "24,27"),
        ("PluginUpdateClock", "2"),
        ("MaxRelativeModulationLevel", "100"),
        ("DHWTemperature", "52.5"),
        ("DHWSetpoint", "55"),
        ("MaxCHWaterSetpoint", "75"),
        ("OEMFaultCode", "0"),
        ("StatusCHEnabled", "1"),
        ("StatusDHWEnabled", "1"),
        ("GatewayMode", "1"),
        ("ReferenceVoltage", "3"),
    ];
    for (name, value) in settings {
        store.set_variable(DemoController::DEVICE, GATEWAY_SID, name, value);
    }
    tracing::debug!(device = %DemoController::DEVICE, "demo gateway seeded");
}

#[async_trait]
impl Controller for DemoController {
    async fn fetch_variable(
        &self,
        device: DeviceId,
        service: &str,
        name: &str,
    ) -> Result<Option<String>, ControllerError> {
        self.step_if_due();
        self.inner.fetch_variable(device, service, name).await
    }

    async fn persist_variable(
        &self,
        device: DeviceId,
        service: &str,
        name: &str,
        value: &str,
    ) -> Result<(), ControllerError> {
        if device == Self::DEVICE && name == "CurrentSetpoint" {
            if let (Ok(mut sim), Ok(setpoint)) = (self.sim.lock(), value.parse::<f64>()) {
                sim.setpoint = setpoint;
            }
        }
        self.inner.persist_variable(device, service, name, value).await
    }

    async fn fetch_json(
        &self,
        kind: RequestKind,
        device: DeviceId,
        service: &str,
    ) -> Result<serde_json::Value, ControllerError> {
        if device != Self::DEVICE {
            return Err(ControllerError::DeviceNotFound(device.0));
        }
        self.inner.fetch_json(kind, device, service).await
    }

    async fn invoke_action(
        &self,
        device: DeviceId,
        service: &str,
        action: &str,
        args: &[(String, String)],
    ) -> Result<(), ControllerError> {
        if device == Self::DEVICE && action == "ResetErrorCount" {
            let index = args
                .iter()
                .find(|(k, _)| k == "Index")
                .and_then(|(_, v)| v.parse::<usize>().ok());
            if let (Some(index @ 1..=4), Ok(mut sim)) = (index, self.sim.lock()) {
                sim.errors[index - 1] = 0;
            }
            self.publish();
        }
        self.inner.invoke_action(device, service, action, args).await
    }

    async fn list_devices(&self) -> Result<Vec<DeviceInfo>, ControllerError> {
        self.inner.list_devices().await
    }

    async fn set_device_attribute(
        &self,
        device: DeviceId,
        name: &str,
        value: &str,
    ) -> Result<(), ControllerError> {
        self.inner.set_device_attribute(device, name, value).await
    }
}
