//! Common types and traits for addressing controllable devices.

use std::fmt;

use serde::Serialize;

/// Controllable device classes handled by the translators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    /// PV and battery inverters with reactive-power support.
    Der,
    AirConditioner,
    WaterHeater,
}

impl DeviceClass {
    /// Short label used in logs and reports.
    pub fn label(&self) -> &'static str {
        match self {
            DeviceClass::Der => "DER",
            DeviceClass::AirConditioner => "AC",
            DeviceClass::WaterHeater => "WH",
        }
    }
}

impl fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A scheduled write of one model parameter on one injector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterChange {
    /// Injector identifier as known to the simulation engine.
    pub device: String,
    /// Model parameter name.
    pub parameter: &'static str,
    pub value: f64,
    /// Simulated time at which the engine applies the change (s).
    pub effective_time: f64,
}

impl ParameterChange {
    pub fn new(device: &str, parameter: &'static str, value: f64, effective_time: f64) -> Self {
        Self {
            device: device.to_string(),
            parameter,
            value,
            effective_time,
        }
    }

    /// Engine command text for this change, without the time prefix.
    ///
    /// # Examples
    ///
    /// ```
    /// use ancillary_sim::devices::ParameterChange;
    ///
    /// let change = ParameterChange::new("WH_03", "D2a", 0.8, 3.01);
    /// assert_eq!(change.command(), "CHGPRM INJ WH_03 D2a 0.8 SETP 0.");
    /// ```
    pub fn command(&self) -> String {
        format!(
            "CHGPRM INJ {} {} {} SETP 0.",
            self.device, self.parameter, self.value
        )
    }
}

impl fmt::Display for ParameterChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3} {}", self.effective_time, self.command())
    }
}

/// Capability to schedule parameter changes inside the simulation engine.
///
/// Scheduling is fire-and-forget: no acknowledgement is returned and
/// success is assumed.
pub trait DeviceSink {
    fn schedule_change(&mut self, change: ParameterChange);

    /// Schedules the same settings on every device of a group.
    ///
    /// Changes are emitted device by device, each device receiving
    /// `settings` in order.
    fn broadcast(&mut self, devices: &[String], settings: &[(&'static str, f64)], time: f64) {
        for device in devices {
            for &(parameter, value) in settings {
                self.schedule_change(ParameterChange::new(device, parameter, value, time));
            }
        }
    }
}

/// Collects scheduled changes in memory.
impl DeviceSink for Vec<ParameterChange> {
    fn schedule_change(&mut self, change: ParameterChange) {
        self.push(change);
    }
}
