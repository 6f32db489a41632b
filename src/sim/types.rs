//! Core control-loop types: timing configuration, signals, and step records.

use std::fmt;

use serde::Serialize;

use crate::translators::{AirConditionerState, DerdState, WaterHeaterState};

/// Timing configuration for the control loop.
///
/// The loop samples at `0, sample_s, 2 * sample_s, ...` up to and including
/// `horizon_s`.
///
/// # Examples
///
/// ```
/// use ancillary_sim::sim::types::SimConfig;
///
/// let cfg = SimConfig::new(100.0, 1.0);
/// assert_eq!(cfg.total_steps(), 101);
/// assert_eq!(cfg.time_at(3), 3.0);
/// ```
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Final simulated time (s).
    pub horizon_s: f64,
    /// Distance between two control steps (s).
    pub sample_s: f64,
}

impl SimConfig {
    /// Creates a new timing configuration.
    ///
    /// # Panics
    ///
    /// Panics if `sample_s` is not strictly positive or `horizon_s` is negative.
    pub fn new(horizon_s: f64, sample_s: f64) -> Self {
        assert!(sample_s > 0.0, "sample_s must be > 0");
        assert!(horizon_s >= 0.0, "horizon_s must be >= 0");
        Self {
            horizon_s,
            sample_s,
        }
    }

    /// Number of control steps, both endpoints included.
    ///
    /// A horizon that is not a whole number of samples ends on the last
    /// instant before it.
    pub fn total_steps(&self) -> usize {
        (self.horizon_s / self.sample_s + 1e-9).floor() as usize + 1
    }

    /// Simulated time of step `k`.
    ///
    /// Computed by multiplication so that long runs do not accumulate drift.
    pub fn time_at(&self, step: usize) -> f64 {
        step as f64 * self.sample_s
    }
}

/// Two-axis ancillary-service signal produced by the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Signal {
    /// Active-power level.
    pub p: f64,
    /// Reactive-power level.
    pub q: f64,
}

impl Signal {
    pub fn new(p: f64, q: f64) -> Self {
        Self { p, q }
    }
}

impl Default for Signal {
    /// The "no ancillary service requested" level.
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.p, self.q)
    }
}

/// Observation handed to the coordinator.
///
/// The coordinator does not read it yet; the value is a placeholder for a
/// closed-loop variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Measurement(pub f64);

/// Mutable state owned by the control loop across steps.
#[derive(Debug, Clone, Copy, Default)]
pub struct ControlState {
    /// Signal computed at the previous step.
    pub signal: Signal,
    pub derd: DerdState,
    pub air_conditioner: AirConditionerState,
    pub water_heater: WaterHeaterState,
}

/// Record of one completed control step.
#[derive(Debug, Clone, Serialize)]
pub struct StepRecord {
    /// Step index.
    pub step: usize,
    /// Simulated time (s).
    pub time_s: f64,
    /// Signal computed at this step.
    pub signal: Signal,
    /// Whether the signal differs from the previous step.
    pub changed: bool,
    /// Commands scheduled for DERs during this step.
    pub der_commands: usize,
    pub ac_commands: usize,
    pub wh_commands: usize,
    pub derd_saturated: bool,
    pub ac_saturated: bool,
    pub wh_saturated: bool,
}

impl StepRecord {
    /// Commands scheduled during this step, all classes.
    pub fn commands(&self) -> usize {
        self.der_commands + self.ac_commands + self.wh_commands
    }
}

impl fmt::Display for StepRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "k={:>3} (t={:>7.2}s) | P={:.2} Q={:.2}{} | cmds={:>3} | sat(DER={}, AC={}, WH={})",
            self.step,
            self.time_s,
            self.signal.p,
            self.signal.q,
            if self.changed { " *" } else { "  " },
            self.commands(),
            self.derd_saturated,
            self.ac_saturated,
            self.wh_saturated,
        )
    }
}
