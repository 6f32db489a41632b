//! Control loop that steps the engine and dispatches the coordinator signal.

use tracing::{error, info};

use crate::config::ScenarioConfig;
use crate::devices::{DeviceGroups, DeviceSink, ParameterChange, PartitionRules};
use crate::translators::{
    AirConditionerTranslator, DerdTranslator, Translator, WaterHeaterTranslator,
};

use super::clock::Clock;
use super::coordinator::coordinate;
use super::driver::{INJECTOR_CATEGORY, SimulationDriver, SimulationError};
use super::types::{ControlState, SimConfig, StepRecord};

/// Sink wrapper counting the changes passed through it.
struct CountingSink<'a> {
    inner: &'a mut dyn DeviceSink,
    count: usize,
}

impl<'a> CountingSink<'a> {
    fn new(inner: &'a mut dyn DeviceSink) -> Self {
        Self { inner, count: 0 }
    }

    /// Returns the count since the previous call and resets it.
    fn take_count(&mut self) -> usize {
        std::mem::take(&mut self.count)
    }
}

impl DeviceSink for CountingSink<'_> {
    fn schedule_change(&mut self, change: ParameterChange) {
        self.count += 1;
        self.inner.schedule_change(change);
    }
}

/// Everything produced by one pass of the control loop.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Device groups resolved at start-up.
    pub groups: DeviceGroups,
    /// One record per completed step.
    pub records: Vec<StepRecord>,
    /// State after the last completed step.
    pub final_state: ControlState,
    /// Engine failure that ended the run early, if any.
    pub aborted: Option<SimulationError>,
}

/// Control loop owning the coordinator schedule and the three translators.
///
/// Translators run once per step, after the coordinator, in class order
/// DER, AC, WH.
#[derive(Debug, Clone)]
pub struct ControlLoop {
    config: SimConfig,
    rules: PartitionRules,
    derd: DerdTranslator,
    air_conditioner: AirConditionerTranslator,
    water_heater: WaterHeaterTranslator,
}

impl ControlLoop {
    /// Creates a loop with default translators and partition rules.
    pub fn new(config: SimConfig) -> Self {
        Self {
            config,
            rules: PartitionRules::default(),
            derd: DerdTranslator::default(),
            air_conditioner: AirConditionerTranslator::default(),
            water_heater: WaterHeaterTranslator::default(),
        }
    }

    /// Builds a loop from a validated scenario.
    pub fn from_config(cfg: &ScenarioConfig) -> Self {
        let s = &cfg.simulation;
        Self {
            config: SimConfig::new(s.horizon_s, s.sample_s),
            rules: cfg.inventory.rules(),
            derd: cfg.derd.clone(),
            air_conditioner: cfg.air_conditioner.clone(),
            water_heater: cfg.water_heater.clone(),
        }
    }

    /// Returns a reference to the timing configuration.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Runs one control step at `time`, after the engine has reached it.
    ///
    /// Returns the step record and the state for the next step.
    pub fn step<D: SimulationDriver>(
        &self,
        driver: &mut D,
        groups: &DeviceGroups,
        step: usize,
        time: f64,
        state: ControlState,
    ) -> (StepRecord, ControlState) {
        let previous = state.signal;
        let measurement = driver.measurement_snapshot();
        let signal = coordinate(time, measurement);

        let mut sink = CountingSink::new(driver);

        let derd = self.derd.translate(
            time,
            signal,
            previous,
            groups.of(self.derd.class()),
            state.derd,
            &mut sink,
        );
        let der_commands = sink.take_count();

        let air_conditioner = self.air_conditioner.translate(
            time,
            signal,
            previous,
            groups.of(self.air_conditioner.class()),
            state.air_conditioner,
            &mut sink,
        );
        let ac_commands = sink.take_count();

        let water_heater = self.water_heater.translate(
            time,
            signal,
            previous,
            groups.of(self.water_heater.class()),
            state.water_heater,
            &mut sink,
        );
        let wh_commands = sink.take_count();

        let next = ControlState {
            signal,
            derd,
            air_conditioner,
            water_heater,
        };

        let record = StepRecord {
            step,
            time_s: time,
            signal,
            changed: signal != previous,
            der_commands,
            ac_commands,
            wh_commands,
            derd_saturated: DerdTranslator::is_saturated(&derd),
            ac_saturated: AirConditionerTranslator::is_saturated(&air_conditioner),
            wh_saturated: WaterHeaterTranslator::is_saturated(&water_heater),
        };

        (record, next)
    }

    /// Executes every step up to the horizon, or until the engine fails.
    ///
    /// An engine failure is logged and recorded in the outcome; the steps
    /// completed before it are kept.
    pub fn run<D: SimulationDriver>(&self, driver: &mut D) -> RunOutcome {
        let inventory = driver.list_components(INJECTOR_CATEGORY);
        let groups = DeviceGroups::partition(&inventory, &self.rules);
        info!(
            injectors = inventory.len(),
            der = groups.der.len(),
            ac = groups.air_conditioner.len(),
            wh = groups.water_heater.len(),
            "resolved device groups"
        );

        let mut state = ControlState::default();
        let mut records = Vec::with_capacity(self.config.total_steps());
        let mut aborted = None;

        for (step, time) in Clock::new(&self.config) {
            if let Err(err) = driver.advance_to(time) {
                error!(step, time, error = %err, "simulation aborted");
                aborted = Some(err);
                break;
            }
            let (record, next) = self.step(driver, &groups, step, time, state);
            state = next;
            records.push(record);
        }

        info!(
            steps = records.len(),
            aborted = aborted.is_some(),
            "control loop finished"
        );

        RunOutcome {
            groups,
            records,
            final_state: state,
            aborted,
        }
    }
}
