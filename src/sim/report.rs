//! Post-hoc summary of a control-loop run.

use std::fmt;

use serde::Serialize;

use super::engine::RunOutcome;

/// Aggregate figures derived from a complete or aborted run.
///
/// Computed from the step records so that the summary and the per-step
/// telemetry always agree.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Steps the horizon asked for.
    pub steps_planned: usize,
    /// Steps actually completed.
    pub steps_completed: usize,
    /// Simulated time of the last completed step (s).
    pub last_time_s: Option<f64>,
    /// Engine error that ended the run early.
    pub aborted: Option<String>,
    /// Steps where the coordinator signal changed.
    pub signal_changes: usize,
    pub der_devices: usize,
    pub ac_devices: usize,
    pub wh_devices: usize,
    pub der_commands: usize,
    pub ac_commands: usize,
    pub wh_commands: usize,
    /// Steps ending with each group saturated.
    pub der_saturated_steps: usize,
    pub ac_saturated_steps: usize,
    pub wh_saturated_steps: usize,
}

impl RunReport {
    /// Summarises `outcome` against the number of steps that were planned.
    pub fn from_outcome(outcome: &RunOutcome, steps_planned: usize) -> Self {
        let records = &outcome.records;
        Self {
            steps_planned,
            steps_completed: records.len(),
            last_time_s: records.last().map(|r| r.time_s),
            aborted: outcome.aborted.as_ref().map(ToString::to_string),
            signal_changes: records.iter().filter(|r| r.changed).count(),
            der_devices: outcome.groups.der.len(),
            ac_devices: outcome.groups.air_conditioner.len(),
            wh_devices: outcome.groups.water_heater.len(),
            der_commands: records.iter().map(|r| r.der_commands).sum(),
            ac_commands: records.iter().map(|r| r.ac_commands).sum(),
            wh_commands: records.iter().map(|r| r.wh_commands).sum(),
            der_saturated_steps: records.iter().filter(|r| r.derd_saturated).count(),
            ac_saturated_steps: records.iter().filter(|r| r.ac_saturated).count(),
            wh_saturated_steps: records.iter().filter(|r| r.wh_saturated).count(),
        }
    }

    /// Total commands scheduled across all classes.
    pub fn total_commands(&self) -> usize {
        self.der_commands + self.ac_commands + self.wh_commands
    }

    /// Whether every planned step was completed.
    pub fn is_complete(&self) -> bool {
        self.aborted.is_none() && self.steps_completed == self.steps_planned
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Run Report ===")?;
        writeln!(
            f,
            "Steps completed:       {:>6} / {}",
            self.steps_completed, self.steps_planned
        )?;
        match self.last_time_s {
            Some(t) => writeln!(f, "Last step time:        {t:>9.2} s")?,
            None => writeln!(f, "Last step time:              -")?,
        }
        writeln!(f, "Signal changes:        {:>6}", self.signal_changes)?;
        writeln!(
            f,
            "Devices (DER/AC/WH):   {} / {} / {}",
            self.der_devices, self.ac_devices, self.wh_devices
        )?;
        writeln!(
            f,
            "Commands (DER/AC/WH):  {} / {} / {} (total {})",
            self.der_commands,
            self.ac_commands,
            self.wh_commands,
            self.total_commands()
        )?;
        writeln!(
            f,
            "Saturated steps:       {} / {} / {}",
            self.der_saturated_steps, self.ac_saturated_steps, self.wh_saturated_steps
        )?;
        match &self.aborted {
            Some(reason) => write!(f, "Aborted:               {reason}"),
            None => write!(f, "Aborted:               no"),
        }
    }
}
