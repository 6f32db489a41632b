//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use ancillary_sim::config::ScenarioConfig;
use ancillary_sim::devices::{DeviceSink, ParameterChange};
use ancillary_sim::sim::driver::{INJECTOR_CATEGORY, SimulationDriver, SimulationError};
use ancillary_sim::sim::engine::{ControlLoop, RunOutcome};
use ancillary_sim::sim::recording::RecordingEngine;
use ancillary_sim::sim::types::Measurement;

/// Injector inventory with four DERs (one RL variant excluded), two ACs and two WHs.
pub fn default_inventory() -> Vec<String> {
    ScenarioConfig::baseline().inventory.components
}

/// Runs a preset against a fresh recording engine.
///
/// Returns `(outcome, engine)` so tests can inspect both the step records
/// and what the engine applied.
pub fn run_preset(name: &str) -> (RunOutcome, RecordingEngine) {
    let cfg = ScenarioConfig::from_preset(name).unwrap_or_else(|_| ScenarioConfig::baseline());
    let control = ControlLoop::from_config(&cfg);
    let mut engine = RecordingEngine::new(cfg.inventory.components.clone());
    let outcome = control.run(&mut engine);
    (outcome, engine)
}

/// Values of a trace, dropping the timestamps.
pub fn values(trace: &[(f64, f64)]) -> Vec<f64> {
    trace.iter().map(|&(_, v)| v).collect()
}

/// Driver that counts calls and forwards nothing.
#[derive(Debug, Default)]
pub struct CountingDriver {
    pub injectors: Vec<String>,
    pub advances: Vec<f64>,
    pub changes: Vec<ParameterChange>,
    pub snapshots: std::cell::Cell<usize>,
    pub fail_on_call: Option<usize>,
}

impl DeviceSink for CountingDriver {
    fn schedule_change(&mut self, change: ParameterChange) {
        self.changes.push(change);
    }
}

impl SimulationDriver for CountingDriver {
    fn advance_to(&mut self, time: f64) -> Result<(), SimulationError> {
        if self.fail_on_call == Some(self.advances.len()) {
            return Err(SimulationError::Engine {
                time,
                message: "solver stalled".to_string(),
            });
        }
        self.advances.push(time);
        Ok(())
    }

    fn list_components(&self, category: &str) -> Vec<String> {
        if category == INJECTOR_CATEGORY {
            self.injectors.clone()
        } else {
            Vec::new()
        }
    }

    fn measurement_snapshot(&self) -> Measurement {
        self.snapshots.set(self.snapshots.get() + 1);
        Measurement(0.0)
    }
}
