use serde::Deserialize;
use tracing::{debug, info, warn};

use super::{APPLY_OFFSET_S, DEAD_BAND, Translator, approx_eq};
use crate::devices::{DeviceClass, DeviceSink};
use crate::sim::types::Signal;

/// Engine parameter selecting the water-heater control mode.
pub const PARAM_SIGNAL: &str = "signal";
/// Engine parameter holding the duty cycle of the cycling mode.
pub const PARAM_DUTY_CYCLE: &str = "D2a";

/// Control mode written to water heaters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhCommand {
    /// Thermostat control only.
    Normal,
    /// Forced duty cycling at the configured `D2a`.
    DutyCycle,
    /// Maximum curtailment.
    Full,
}

impl WhCommand {
    /// Value written to the `signal` parameter.
    pub fn value(&self) -> f64 {
        match self {
            WhCommand::Normal => 1.0,
            WhCommand::DutyCycle => 2.0,
            WhCommand::Full => 5.0,
        }
    }
}

/// State of the water-heater group carried between steps.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WaterHeaterState {
    pub saturated: bool,
    /// Last resolved control mode.
    pub command: Option<WhCommand>,
    /// Last resolved duty cycle.
    pub duty_cycle: Option<f64>,
}

/// Maps the P axis onto the water-heater mode and duty cycle.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WaterHeaterTranslator {
    /// P level entering duty cycling, where `duty_max` applies.
    pub level_duty_max: f64,
    /// P level where `duty_min` applies.
    pub level_duty_min: f64,
    /// P level of full curtailment; the group saturates above it.
    pub level_saturation: f64,
    pub duty_max: f64,
    pub duty_min: f64,
    /// Half-width of the band used instead of exact comparisons.
    pub tolerance: f64,
}

impl Default for WaterHeaterTranslator {
    fn default() -> Self {
        Self {
            level_duty_max: 3.0,
            level_duty_min: 4.0,
            level_saturation: 5.0,
            duty_max: 0.8,
            duty_min: 0.6,
            tolerance: 1e-3,
        }
    }
}

impl WaterHeaterTranslator {
    /// Control mode for a P level, `None` exactly on a band edge.
    pub fn command(&self, p: f64) -> Option<WhCommand> {
        let low = self.level_duty_max - self.tolerance;
        let high = self.level_saturation - self.tolerance;
        if p < low {
            Some(WhCommand::Normal)
        } else if low < p && p < high {
            Some(WhCommand::DutyCycle)
        } else if high < p {
            Some(WhCommand::Full)
        } else {
            None
        }
    }

    /// Duty cycle for a P level, defined only on the two duty levels.
    pub fn duty_cycle(&self, p: f64) -> Option<f64> {
        if approx_eq(p, self.level_duty_max, self.tolerance) {
            Some(self.duty_max)
        } else if approx_eq(p, self.level_duty_min, self.tolerance) {
            Some(self.duty_min)
        } else {
            None
        }
    }
}

impl Translator for WaterHeaterTranslator {
    type State = WaterHeaterState;

    fn class(&self) -> DeviceClass {
        DeviceClass::WaterHeater
    }

    fn translate(
        &self,
        time: f64,
        signal: Signal,
        previous: Signal,
        devices: &[String],
        state: WaterHeaterState,
        sink: &mut dyn DeviceSink,
    ) -> WaterHeaterState {
        let p = signal.p;
        if p == previous.p || p.abs() <= DEAD_BAND {
            return state;
        }

        let mut next = state;
        if let Some(command) = self.command(p) {
            next.command = Some(command);
        }
        if let Some(duty) = self.duty_cycle(p) {
            next.duty_cycle = Some(duty);
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
                    let duty = match (command, next.duty_cycle) {
                        (WhCommand::DutyCycle, None) => {
                            warn!(
                                class = %self.class(),
                                time, p, "no duty cycle resolved yet, D2a not written"
                            );
                            None
                        }
                        (WhCommand::DutyCycle, duty) => duty,
                        _ => None,
                    };
                    let mut settings = vec![(PARAM_SIGNAL, command.value())];
                    if let Some(duty) = duty {
                        settings.push((PARAM_DUTY_CYCLE, duty));
                    }
                    sink.broadcast(devices, &settings, time + APPLY_OFFSET_S);
                    debug!(
                        class = %self.class(),
                        time,
                        p,
                        mode = command.value(),
                        duty = ?duty,
                        devices = devices.len(),
                        "scheduled water-heater mode"
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

    fn is_saturated(state: &WaterHeaterState) -> bool {
        state.saturated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::ParameterChange;

    fn devices() -> Vec<String> {
        vec!["WH_1".to_string(), "WH_2".to_string(), "WH_3".to_string()]
    }

    fn run(
        p: f64,
        p_prev: f64,
        state: WaterHeaterState,
    ) -> (WaterHeaterState, Vec<ParameterChange>) {
        let mut sink: Vec<ParameterChange> = Vec::new();
        let next = WaterHeaterTranslator::default().translate(
            10.0,
            Signal::new(p, 1.0),
            Signal::new(p_prev, 1.0),
            &devices(),
            state,
            &mut sink,
        );
        (next, sink)
    }

    #[test]
    fn command_bands() {
        let t = WaterHeaterTranslator::default();
        assert_eq!(t.command(2.0), Some(WhCommand::Normal));
        assert_eq!(t.command(3.0), Some(WhCommand::DutyCycle));
        assert_eq!(t.command(4.5), Some(WhCommand::DutyCycle));
        assert_eq!(t.command(5.0), Some(WhCommand::Full));
        assert_eq!(t.command(3.0 - 1e-3), None);
    }

    #[test]
    fn duty_cycle_only_on_duty_levels() {
        let t = WaterHeaterTranslator::default();
        assert_eq!(t.duty_cycle(3.0), Some(0.8));
        assert_eq!(t.duty_cycle(4.0), Some(0.6));
        assert_eq!(t.duty_cycle(3.5), None);
        assert_eq!(t.duty_cycle(5.0), None);
    }

    #[test]
    fn unchanged_or_dead_band_is_noop() {
        let (state, sink) = run(3.0, 3.0, WaterHeaterState::default());
        assert!(sink.is_empty());
        assert_eq!(state, WaterHeaterState::default());

        let (_, sink) = run(1.0, 3.0, WaterHeaterState::default());
        assert!(sink.is_empty());
    }

    #[test]
    fn level_two_writes_normal_mode_only() {
        let (state, sink) = run(2.0, 1.0, WaterHeaterState::default());
        assert_eq!(sink.len(), 3);
        assert!(
            sink.iter()
                .all(|c| c.parameter == PARAM_SIGNAL && c.value == 1.0)
        );
        assert_eq!(state.command, Some(WhCommand::Normal));
    }

    #[test]
    fn level_three_writes_mode_and_duty() {
        let (state, sink) = run(3.0, 2.0, WaterHeaterState::default());
        assert_eq!(sink.len(), 6);
        assert_eq!(sink[0].parameter, PARAM_SIGNAL);
        assert_eq!(sink[0].value, 2.0);
        assert_eq!(sink[1].parameter, PARAM_DUTY_CYCLE);
        assert_eq!(sink[1].value, 0.8);
        assert!(sink.iter().all(|c| (c.effective_time - 10.01).abs() < 1e-12));
        assert_eq!(state.duty_cycle, Some(0.8));
    }

    #[test]
    fn between_duty_levels_retains_previous_duty() {
        let prior = WaterHeaterState {
            saturated: false,
            command: Some(WhCommand::DutyCycle),
            duty_cycle: Some(0.6),
        };
        let (state, sink) = run(3.5, 4.0, prior);
        assert_eq!(state.duty_cycle, Some(0.6));
        let duties: Vec<f64> = sink
            .iter()
            .filter(|c| c.parameter == PARAM_DUTY_CYCLE)
            .map(|c| c.value)
            .collect();
        assert_eq!(duties, vec![0.6; 3]);
    }

    #[test]
    fn missing_duty_skips_only_duty_write() {
        let (state, sink) = run(3.5, 2.0, WaterHeaterState::default());
        assert_eq!(state.duty_cycle, None);
        assert_eq!(sink.len(), 3);
        assert!(sink.iter().all(|c| c.parameter == PARAM_SIGNAL));
    }

    #[test]
    fn level_five_writes_full_without_saturating() {
        let (state, sink) = run(5.0, 4.0, WaterHeaterState::default());
        assert!(sink.iter().all(|c| c.value == 5.0));
        assert!(!state.saturated);
    }

    #[test]
    fn above_five_saturates_after_emitting() {
        let (state, sink) = run(6.0, 5.0, WaterHeaterState::default());
        assert_eq!(sink.len(), 3);
        assert!(state.saturated);

        let (state, sink) = run(7.0, 6.0, state);
        assert!(sink.is_empty());
        assert!(state.saturated);

        let (state, sink) = run(4.0, 7.0, state);
        assert!(!state.saturated);
        assert_eq!(sink.len(), 6);
    }
}
