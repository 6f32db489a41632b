use std::path::PathBuf;
use std::process::Command;

use serde_json::Value;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("ancillary-sim-{}-{name}", std::process::id()))
}

/// Runs the binary with `args`, returning the parsed JSON report.
fn run_and_parse_report(args: &[&str], tag: &str) -> Value {
    let report_path = temp_path(&format!("{tag}-report.json"));
    let output = Command::new(env!("CARGO_BIN_EXE_ancillary-sim"))
        .args(args)
        .arg("--quiet")
        .arg("--report-out")
        .arg(&report_path)
        .output()
        .expect("ancillary-sim process should run");

    assert!(
        output.status.success(),
        "ancillary-sim failed for {args:?}: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );

    let raw = std::fs::read_to_string(&report_path).expect("report should be written");
    let _ = std::fs::remove_file(&report_path);
    serde_json::from_str(&raw).expect("report should be valid JSON")
}

#[test]
fn scenario_files_run_via_cli() {
    let baseline = run_and_parse_report(&["--scenario", "scenarios/baseline.toml"], "baseline");
    let short = run_and_parse_report(&["--scenario", "scenarios/short.toml"], "short");

    assert_eq!(baseline["steps_completed"], 101);
    assert_eq!(short["steps_completed"], 21);
    assert_eq!(baseline["aborted"], Value::Null);
    assert_eq!(
        baseline["der_commands"], short["der_commands"],
        "no signal changes happen after t=17"
    );
}

#[test]
fn custom_inventory_changes_command_counts() {
    let custom = run_and_parse_report(
        &["--scenario", "scenarios/aggressive_der.toml"],
        "aggressive",
    );
    assert_eq!(custom["der_devices"], 3);
    assert_eq!(custom["ac_devices"], 1);
    assert_eq!(custom["wh_devices"], 3);
    assert_eq!(custom["der_commands"], 2 * 3 * 3);
}

#[test]
fn preset_flag_and_disturbance_script() {
    let script = temp_path("short.dst");
    let report = run_and_parse_report(
        &[
            "--preset",
            "short",
            "--disturbances-out",
            script.to_str().expect("temp path should be UTF-8"),
        ],
        "preset",
    );

    let text = std::fs::read_to_string(&script).expect("script should be written");
    let _ = std::fs::remove_file(&script);
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(Some(lines.len() as u64), report["der_commands"].as_u64().map(|der| {
        der + report["ac_commands"].as_u64().unwrap_or(0)
            + report["wh_commands"].as_u64().unwrap_or(0)
    }));
    assert!(lines.iter().all(|l| l.contains(" CHGPRM INJ ") && l.ends_with(" SETP 0.")));
    assert!(lines[0].starts_with("2.005 "), "first line: {}", lines[0]);

    let times: Vec<f64> = lines
        .iter()
        .filter_map(|l| l.split_whitespace().next())
        .filter_map(|t| t.parse().ok())
        .collect();
    assert!(times.windows(2).all(|w| w[0] <= w[1]), "script must be time-sorted");
}

#[test]
fn unknown_preset_fails() {
    let output = Command::new(env!("CARGO_BIN_EXE_ancillary-sim"))
        .args(["--preset", "nope"])
        .output()
        .expect("ancillary-sim process should run");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown preset"));
}
