//! Entry point: CLI wiring and config-driven control-loop construction.

use std::process;

use tracing::{info, warn};

use ancillary_sim::cli::{self, Command};
use ancillary_sim::config::ScenarioConfig;
use ancillary_sim::io::export::{export_csv, export_disturbances, export_report_json};
use ancillary_sim::sim::engine::ControlLoop;
use ancillary_sim::sim::recording::RecordingEngine;
use ancillary_sim::sim::report::RunReport;
use ancillary_sim::telemetry;

fn load_scenario(opts: &cli::CliOptions) -> Result<ScenarioConfig, String> {
    let scenario = if let Some(ref path) = opts.scenario {
        ScenarioConfig::from_toml_file(path)
    } else if let Some(ref name) = opts.preset {
        ScenarioConfig::from_preset(name)
    } else {
        Ok(ScenarioConfig::baseline())
    };
    scenario.map_err(|e| e.to_string())
}

fn main() {
    let opts = match cli::parse_args() {
        Ok(Command::Run(opts)) => opts,
        Ok(Command::Help) => {
            cli::print_usage();
            return;
        }
        Err(e) => {
            eprintln!("error: {e}");
            cli::print_usage();
            process::exit(1);
        }
    };

    telemetry::init_tracing(opts.quiet);

    let scenario = match load_scenario(&opts) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let control = ControlLoop::from_config(&scenario);
    let mut engine = RecordingEngine::new(scenario.inventory.components.clone());
    info!(
        horizon_s = scenario.simulation.horizon_s,
        sample_s = scenario.simulation.sample_s,
        "starting control loop"
    );
    let outcome = control.run(&mut engine);
    let report = RunReport::from_outcome(&outcome, control.config().total_steps());

    for r in &outcome.records {
        println!("{r}");
    }
    println!("\n{report}");

    if !report.is_complete() {
        warn!(
            completed = report.steps_completed,
            planned = report.steps_planned,
            "run ended early"
        );
    }

    if let Some(ref path) = opts.telemetry_out {
        if let Err(e) = export_csv(&outcome.records, path) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        info!(path = %path.display(), "telemetry written");
    }

    if let Some(ref path) = opts.disturbances_out {
        if let Err(e) = export_disturbances(&engine.disturbances(), path) {
            eprintln!("error: failed to write disturbances: {e}");
            process::exit(1);
        }
        info!(
            path = %path.display(),
            commands = engine.scheduled().len(),
            "disturbance script written"
        );
    }

    if let Some(ref path) = opts.report_out {
        if let Err(e) = export_report_json(&report, path) {
            eprintln!("error: failed to write report: {e}");
            process::exit(1);
        }
        info!(path = %path.display(), "report written");
    }
}
