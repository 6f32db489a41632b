use serde::Deserialize;
use tracing::{debug, info, warn};

use super::{APPLY_OFFSET_S, RESET_OFFSET_S, Translator, approx_eq};
use crate::devices::{DeviceClass, DeviceSink};
use crate::sim::types::Signal;

/// Engine parameter selecting the air-conditioner control mode.
pub const PARAM_SIGNAL: &str = "signal";
/// Engine parameter holding the fraction of units forced off.
pub const PARAM_FRACTION: &str = "ffrac";

/// Control mode written to air conditioners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AcCommand {
    /// Thermostat control only.
    Normal,
    /// A fraction of the units is cycled off.
    Cycling { fraction: f64 },
    /// Every unit is curtailed.
    Full,
}

impl AcCommand {
    /// Value written to the `signal` parameter.
    pub fn value(&self) -> f64 {
        match self {
            AcCommand::Normal => 1.0,
            AcCommand::Cycling { .. } => 2.0,
            AcCommand::Full => 3.0,
        }
    }
}

/// State of the air-conditioner group carried between steps.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AirConditionerState {
    pub saturated: bool,
    /// Last resolved control mode.
    pub command: Option<AcCommand>,
}

/// Maps the P axis onto the air-conditioner mode.
///
/// Every accepted change first resets all units to normal mode, then
/// applies the new mode, so each unit passes through a known state.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AirConditionerTranslator {
    /// Cycled-off fractions for P levels 2, 3 and 4.
    pub cycling_fractions: [f64; 3],
    /// P level of full curtailment; the group saturates above it.
    pub level_saturation: f64,
    pub tolerance: f64,
}

impl Default for AirConditionerTranslator {
    fn default() -> Self {
        Self {
            cycling_fractions: [0.25, 0.50, 0.75],
            level_saturation: 5.0,
            tolerance: 1e-3,
        }
    }
}

impl AirConditionerTranslator {
    /// Control mode for a P level, `None` when P is not one of levels 1 to 5.
    pub fn command(&self, p: f64) -> Option<AcCommand> {
        let [low, mid, high] = self.cycling_fractions;
        let table = [
            (1.0, AcCommand::Normal),
            (2.0, AcCommand::Cycling { fraction: low }),
            (3.0, AcCommand::Cycling { fraction: mid }),
            (4.0, AcCommand::Cycling { fraction: high }),
            (5.0, AcCommand::Full),
        ];
        table
            .iter()
            .find(|(level, _)| approx_eq(p, *level, self.tolerance))
            .map(|(_, command)| *command)
    }
}

impl Translator for AirConditionerTranslator {
    type State = AirConditionerState;

    fn class(&self) -> DeviceClass {
        DeviceClass::AirConditioner
    }

    fn translate(
        &self,
        time: f64,
        signal: Signal,
        previous: Signal,
        devices: &[String],
        state: AirConditionerState,
        sink: &mut dyn DeviceSink,
    ) -> AirConditionerState {
        let p = signal.p;
        if p == previous.p {
            return state;
        }

        let mut next = state;
        match self.command(p) {
            Some(command) => next.command = Some(command),
            None => debug!(
                class = %self.class(),
                time,
                p,
                "level not in table, keeping mode"
            ),
        }

        if next.saturated && p.abs() < self.level_saturation {
            info!(class = %self.class(), time, p, "group released from saturation");
            next.saturated = false;
        }

        if !next.saturated {
            match next.command {
                None => warn!(
                    class = %self.class(),
                    time, p, "no control mode resolved yet, nothing scheduled"
                ),
                Some(command) => {
                    sink.broadcast(
                        devices,
                        &[(PARAM_SIGNAL, AcCommand::Normal.value())],
                        time + RESET_OFFSET_S,
                    );
                    let mut settings = vec![(PARAM_SIGNAL, command.value())];
                    if let AcCommand::Cycling { fraction } = command {
                        settings.push((PARAM_FRACTION, fraction));
                    }
                    sink.broadcast(devices, &settings, time + APPLY_OFFSET_S);
                    debug!(
                        class = %self.class(),
                        time,
                        p,
                        command = ?command,
                        devices = devices.len(),
                        "scheduled air-conditioner mode"
                    );
                }
            }
        }

        if !next.saturated && self.level_saturation < p {
            info!(class = %self.class(), time, p, "group saturated");
            next.saturated = true;
        }

        next
    }

    fn is_saturated(state: &AirConditionerState) -> bool {
        state.saturated
    }
}
