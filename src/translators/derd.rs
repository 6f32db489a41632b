use serde::Deserialize;
use tracing::{debug, info};

use super::{APPLY_OFFSET_S, DEAD_BAND, Translator, interpolate};
use crate::devices::{DeviceClass, DeviceSink};
use crate::sim::types::Signal;

/// Engine parameter holding the control sampling time.
pub const PARAM_SAMPLING_TIME: &str = "tmuestreo";
/// Engine parameter holding the reactive-power gain.
pub const PARAM_RHO: &str = "p";
/// Engine parameter holding the direction of the requested change.
pub const PARAM_DIRECTION: &str = "Coor";

/// Saturation state of the DER group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DerdState {
    pub saturated: bool,
}

/// Maps the Q axis onto DER sampling time, gain and direction.
///
/// The sampling time falls linearly from `ts_max` to `ts_min` as |Q| goes
/// from `signal_ts_min` to `signal_ts_max`; the gain rises linearly from
/// `rho_min` to `rho_max` over `signal_rho_min..signal_rho_max`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DerdTranslator {
    /// Sampling time at full request (s).
    pub ts_min: f64,
    /// Sampling time at no request (s).
    pub ts_max: f64,
    pub signal_ts_min: f64,
    pub signal_ts_max: f64,
    pub rho_min: f64,
    pub rho_max: f64,
    pub signal_rho_min: f64,
    pub signal_rho_max: f64,
}

impl Default for DerdTranslator {
    fn default() -> Self {
        Self {
            ts_min: 5.0,
            ts_max: 25.0,
            signal_ts_min: 1.0,
            signal_ts_max: 2.0,
            rho_min: 0.0,
            rho_max: 0.2,
            signal_rho_min: 1.0,
            signal_rho_max: 3.0,
        }
    }
}

impl DerdTranslator {
    /// Sampling time for a Q magnitude.
    pub fn sampling_time(&self, level: f64) -> f64 {
        interpolate(
            level,
            self.signal_ts_min,
            self.signal_ts_max,
            self.ts_max,
            self.ts_min,
        )
    }

    /// Reactive-power gain for a Q magnitude.
    pub fn rho(&self, level: f64) -> f64 {
        interpolate(
            level,
            self.signal_rho_min,
            self.signal_rho_max,
            self.rho_min,
            self.rho_max,
        )
    }

    fn releases(&self, level: f64) -> bool {
        level < self.signal_ts_max || level < self.signal_rho_max
    }

    fn saturates(&self, level: f64) -> bool {
        self.signal_ts_max < level || self.signal_rho_max < level
    }
}

impl Translator for DerdTranslator {
    type State = DerdState;

    fn class(&self) -> DeviceClass {
        DeviceClass::Der
    }

    fn translate(
        &self,
        time: f64,
        signal: Signal,
        previous: Signal,
        devices: &[String],
        state: DerdState,
        sink: &mut dyn DeviceSink,
    ) -> DerdState {
        let q = signal.q;
        if q == previous.q || q.abs() <= DEAD_BAND {
            return state;
        }

        let level = q.abs();
        let ts = self.sampling_time(level);
        let rho = self.rho(level);
        let direction = q.signum();

        let mut saturated = state.saturated;
        if saturated && self.releases(level) {
            info!(class = %self.class(), time, q, "group released from saturation");
            saturated = false;
        }

        if !saturated {
            let at = time + APPLY_OFFSET_S;
            sink.broadcast(
                devices,
                &[
                    (PARAM_SAMPLING_TIME, ts),
                    (PARAM_RHO, rho),
                    (PARAM_DIRECTION, direction),
                ],
                at,
            );
            debug!(
                class = %self.class(),
                time,
                q,
                ts,
                rho,
                direction,
                devices = devices.len(),
                "scheduled reactive-power settings"
            );
        }

        if !saturated && self.saturates(level) {
            info!(class = %self.class(), time, q, "group saturated");
            saturated = true;
        }

        DerdState { saturated }
    }

    fn is_saturated(state: &DerdState) -> bool {
        state.saturated
    }
}
