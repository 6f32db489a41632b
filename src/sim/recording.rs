//! In-process engine stand-in that records and replays parameter changes.

use std::collections::HashMap;

use tracing::trace;

use crate::devices::{DeviceSink, ParameterChange};

use super::driver::{INJECTOR_CATEGORY, SimulationDriver, SimulationError};
use super::types::Measurement;

/// Placeholder observation returned by every snapshot.
pub const PLACEHOLDER_MEASUREMENT: Measurement = Measurement(1.0);

/// Engine stand-in holding an injector inventory and a disturbance queue.
///
/// Scheduled changes are kept in arrival order. Advancing time applies every
/// queued change whose effective time has been reached, ordered by effective
/// time and then by arrival, and records the resulting parameter traces.
#[derive(Debug, Clone, Default)]
pub struct RecordingEngine {
    injectors: Vec<String>,
    current_time: f64,
    scheduled: Vec<ParameterChange>,
    /// Index into `scheduled` sorted by (effective time, arrival).
    pending: Vec<usize>,
    traces: HashMap<(String, String), Vec<(f64, f64)>>,
    fail_at: Option<f64>,
}

impl RecordingEngine {
    /// Creates an engine with the given injector inventory.
    pub fn new(injectors: Vec<String>) -> Self {
        Self {
            injectors,
            ..Self::default()
        }
    }

    /// Makes `advance_to` fail once the requested time reaches `time`.
    pub fn with_failure_at(mut self, time: f64) -> Self {
        self.fail_at = Some(time);
        self
    }

    /// Time reached by the last successful `advance_to`.
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Every change scheduled so far, in arrival order.
    pub fn scheduled(&self) -> &[ParameterChange] {
        &self.scheduled
    }

    /// Every change scheduled so far, ordered by effective time.
    ///
    /// Changes sharing an effective time keep their arrival order.
    pub fn disturbances(&self) -> Vec<ParameterChange> {
        let mut sorted = self.scheduled.clone();
        sorted.sort_by(|a, b| a.effective_time.total_cmp(&b.effective_time));
        sorted
    }

    /// Applied values of `parameter` on `device` as `(time, value)` pairs.
    pub fn trace(&self, device: &str, parameter: &str) -> Vec<(f64, f64)> {
        self.traces
            .get(&(device.to_string(), parameter.to_string()))
            .cloned()
            .unwrap_or_default()
    }

    /// Latest applied value of `parameter` on `device`.
    pub fn parameter(&self, device: &str, parameter: &str) -> Option<f64> {
        self.traces
            .get(&(device.to_string(), parameter.to_string()))
            .and_then(|trace| trace.last())
            .map(|&(_, value)| value)
    }

    fn apply_due(&mut self, time: f64) {
        let due = self
            .pending
            .iter()
            .take_while(|&&i| self.scheduled[i].effective_time <= time)
            .count();
        for i in self.pending.drain(..due) {
            let change = &self.scheduled[i];
            trace!(
                time = change.effective_time,
                device = %change.device,
                parameter = change.parameter,
                value = change.value,
                "applied parameter change"
            );
            self.traces
                .entry((change.device.clone(), change.parameter.to_string()))
                .or_default()
                .push((change.effective_time, change.value));
        }
    }
}

impl DeviceSink for RecordingEngine {
    fn schedule_change(&mut self, change: ParameterChange) {
        let index = self.scheduled.len();
        let at = self
            .pending
            .partition_point(|&i| self.scheduled[i].effective_time <= change.effective_time);
        self.scheduled.push(change);
        self.pending.insert(at, index);
    }
}

impl SimulationDriver for RecordingEngine {
    fn advance_to(&mut self, time: f64) -> Result<(), SimulationError> {
        if time < self.current_time {
            return Err(SimulationError::TimeReversal {
                requested: time,
                current: self.current_time,
            });
        }
        if self.fail_at.is_some_and(|fail_at| time >= fail_at) {
            return Err(SimulationError::Engine {
                time,
                message: "integration did not converge".to_string(),
            });
        }
        self.apply_due(time);
        self.current_time = time;
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
        PLACEHOLDER_MEASUREMENT
    }
}
