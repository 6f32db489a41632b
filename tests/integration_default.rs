//! Integration tests for the control loop over the built-in scenarios.

mod common;

use ancillary_sim::sim::driver::SimulationError;
use ancillary_sim::sim::engine::ControlLoop;
use ancillary_sim::sim::recording::RecordingEngine;
use ancillary_sim::sim::report::RunReport;
use ancillary_sim::sim::types::{Signal, SimConfig};

#[test]
fn short_run_follows_breakpoint_cascade() {
    let (outcome, _) = common::run_preset("short");
    let levels: Vec<Signal> = outcome.records.iter().map(|r| r.signal).collect();

    let mut expected = Vec::new();
    for (level, count) in [(1.0, 2), (2.0, 5), (3.0, 5), (4.0, 5), (5.0, 4)] {
        expected.extend(std::iter::repeat_n(Signal::new(level, level), count));
    }
    assert_eq!(levels, expected);
}

#[test]
fn short_run_command_totals() {
    let (outcome, engine) = common::run_preset("short");
    let report = RunReport::from_outcome(&outcome, 21);

    assert!(report.is_complete());
    assert_eq!(report.signal_changes, 4);
    assert_eq!((report.der_devices, report.ac_devices, report.wh_devices), (4, 2, 2));
    // DER: two accepted steps before saturating, 3 settings x 4 devices each
    assert_eq!(report.der_commands, 24);
    // AC: reset + mode (+ fraction) on every change, 2 devices
    assert_eq!(report.ac_commands, 6 + 6 + 6 + 4);
    // WH: mode only at P=2 and P=5, mode + duty at P=3 and P=4
    assert_eq!(report.wh_commands, 2 + 4 + 4 + 2);
    assert_eq!(report.total_commands(), engine.scheduled().len());
}

#[test]
fn der_group_saturates_at_third_level_and_stays() {
    let (outcome, _) = common::run_preset("short");
    for r in &outcome.records {
        assert_eq!(
            r.derd_saturated,
            r.time_s > 6.0,
            "unexpected DER saturation at t={}",
            r.time_s
        );
        assert!(!r.ac_saturated);
        assert!(!r.wh_saturated);
    }
    let late: usize = outcome
        .records
        .iter()
        .filter(|r| r.time_s > 11.0)
        .map(|r| r.der_commands)
        .sum();
    assert_eq!(late, 0);
}

#[test]
fn engine_applies_translated_parameters() {
    let (_, engine) = common::run_preset("short");

    assert_eq!(
        common::values(&engine.trace("WH_LV1", "signal")),
        vec![1.0, 2.0, 2.0, 5.0]
    );
    assert_eq!(
        common::values(&engine.trace("WH_LV1", "D2a")),
        vec![0.8, 0.6]
    );
    assert_eq!(
        common::values(&engine.trace("AC2_LV2", "signal")),
        vec![1.0, 2.0, 1.0, 2.0, 1.0, 2.0, 1.0, 3.0]
    );
    assert_eq!(
        common::values(&engine.trace("AC2_LV2", "ffrac")),
        vec![0.25, 0.50, 0.75]
    );
    assert_eq!(engine.parameter("PV_LV1", "tmuestreo"), Some(5.0));
    assert_eq!(engine.parameter("BATC_LV2", "Coor"), Some(1.0));
    // rho follows the linear ramp: halfway (0.1) at |Q| = 2, capped at |Q| = 3
    let rho = common::values(&engine.trace("PV_LV2", "p"));
    assert_eq!(rho.len(), 2);
    assert!((rho[0] - 0.1).abs() < 1e-12, "rho at Q=2: {}", rho[0]);
    assert!((rho[1] - 0.2).abs() < 1e-12, "rho at Q=3: {}", rho[1]);
    assert!(engine.trace("PV_RL_LV3", "tmuestreo").is_empty());
    assert!(engine.trace("LOAD_LV1", "signal").is_empty());
}

#[test]
fn ac_reset_precedes_new_mode_in_engine_order() {
    let (_, engine) = common::run_preset("short");
    let trace = engine.trace("AC2_LV1", "signal");
    for pair in trace.chunks(2) {
        assert_eq!(pair[0].1, 1.0, "first write of each change is the reset");
        assert!(pair[0].0 < pair[1].0);
    }
}

#[test]
fn fine_sampling_moves_breakpoints_to_half_seconds() {
    let (outcome, _) = common::run_preset("fine_sampling");
    assert_eq!(outcome.records.len(), 61);
    let change_times: Vec<f64> = outcome
        .records
        .iter()
        .filter(|r| r.changed)
        .map(|r| r.time_s)
        .collect();
    assert_eq!(change_times, vec![1.5, 6.5, 11.5, 16.5]);
}

#[test]
fn baseline_run_is_quiet_after_last_breakpoint() {
    let (outcome, _) = common::run_preset("baseline");
    assert_eq!(outcome.records.len(), 101);
    assert!(outcome.records.iter().skip(18).all(|r| r.commands() == 0));
}

#[test]
fn determinism_two_identical_runs_schedule_identical_changes() {
    let (_, engine1) = common::run_preset("short");
    let (_, engine2) = common::run_preset("short");
    assert_eq!(engine1.scheduled(), engine2.scheduled());
}

#[test]
fn engine_failure_keeps_completed_steps() {
    let control = ControlLoop::new(SimConfig::new(20.0, 1.0));
    let mut engine = RecordingEngine::new(common::default_inventory()).with_failure_at(10.0);
    let outcome = control.run(&mut engine);
    let report = RunReport::from_outcome(&outcome, control.config().total_steps());

    assert_eq!(report.steps_completed, 10);
    assert_eq!(report.last_time_s, Some(9.0));
    assert!(!report.is_complete());
    assert!(matches!(
        outcome.aborted,
        Some(SimulationError::Engine { time, .. }) if time == 10.0
    ));
    assert_eq!(report.der_commands, 24);
    assert_eq!(report.ac_commands, 12);
    assert_eq!(report.wh_commands, 6);
    assert_eq!(engine.current_time(), 9.0);
}
