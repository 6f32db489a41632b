//! Boundary with the time-domain simulation engine.

use thiserror::Error;

use crate::devices::DeviceSink;

use super::types::Measurement;

/// Component category holding controllable injectors.
pub const INJECTOR_CATEGORY: &str = "INJ";

/// Failures reported by the simulation engine while advancing time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("engine failed at t={time}: {message}")]
    Engine { time: f64, message: String },
    #[error("cannot advance to t={requested}, engine already at t={current}")]
    TimeReversal { requested: f64, current: f64 },
}

/// Operations the control loop needs from a simulation engine.
///
/// Parameter changes are scheduled through the [`DeviceSink`] supertrait.
pub trait SimulationDriver: DeviceSink {
    /// Integrates the simulated system up to `time`.
    ///
    /// # Errors
    ///
    /// Returns a `SimulationError` if the engine cannot reach `time`.
    fn advance_to(&mut self, time: f64) -> Result<(), SimulationError>;

    /// Names of all components in `category`, in inventory order.
    fn list_components(&self, category: &str) -> Vec<String>;

    /// Observation for the coordinator at the current time.
    fn measurement_snapshot(&self) -> Measurement;
}
