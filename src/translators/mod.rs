//! Device-class translators turning coordinator signals into parameter writes.
//!
//! Each translator is a pure function of its inputs and the state handed in
//! by the control loop; side effects go through a [`DeviceSink`].

pub mod air_conditioner;
/// Reactive-power support of PV and battery inverters.
pub mod derd;
pub mod water_heater;

pub use air_conditioner::{AcCommand, AirConditionerState, AirConditionerTranslator};
pub use derd::{DerdState, DerdTranslator};
pub use water_heater::{WaterHeaterState, WaterHeaterTranslator, WhCommand};

use crate::devices::{DeviceClass, DeviceSink};
use crate::sim::types::Signal;

/// Offset after the step time at which translated parameters take effect (s).
pub const APPLY_OFFSET_S: f64 = 0.01;

/// Offset of the air-conditioner reset phase, ahead of [`APPLY_OFFSET_S`] (s).
pub const RESET_OFFSET_S: f64 = 0.005;

/// Signal magnitudes up to this level request no ancillary service.
pub const DEAD_BAND: f64 = 1.0;

/// Contract shared by the three device-class translators.
pub trait Translator {
    /// Per-class state carried between steps by the control loop.
    type State: Copy + Default;

    fn class(&self) -> DeviceClass;

    /// Reacts to the transition `previous -> signal` at `time`.
    ///
    /// Schedules zero or more parameter changes on `devices` through `sink`
    /// and returns the updated state.
    fn translate(
        &self,
        time: f64,
        signal: Signal,
        previous: Signal,
        devices: &[String],
        state: Self::State,
        sink: &mut dyn DeviceSink,
    ) -> Self::State;

    /// Whether the class can take no further requests in the current direction.
    fn is_saturated(state: &Self::State) -> bool;
}

/// Returns `true` when `value` lies strictly within `tolerance` of `target`.
pub fn approx_eq(value: f64, target: f64, tolerance: f64) -> bool {
    target - tolerance < value && value < target + tolerance
}

/// Two-segment clamp-then-linear profile.
///
/// Returns `y0` at or below `x0`, `y1` at or above `x1`, and the straight line
/// between them in between.
pub fn interpolate(x: f64, x0: f64, x1: f64, y0: f64, y1: f64) -> f64 {
    if x <= x0 {
        y0
    } else if x >= x1 {
        y1
    } else {
        y0 + (y1 - y0) * (x - x0) / (x1 - x0)
    }
}
