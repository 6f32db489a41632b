//! File export for step telemetry, disturbance scripts, and run reports.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::devices::ParameterChange;
use crate::sim::report::RunReport;
use crate::sim::types::StepRecord;

/// Column header for CSV step telemetry.
const HEADER: &str = "step,time_s,signal_p,signal_q,changed,der_commands,ac_commands,\
                      wh_commands,der_saturated,ac_saturated,wh_saturated";

/// Exports step records to a CSV file at the given path.
///
/// # Errors
///
/// Returns a `csv::Error` if file creation or writing fails.
pub fn export_csv(records: &[StepRecord], path: &Path) -> csv::Result<()> {
    let file = File::create(path)?;
    write_csv(records, BufWriter::new(file))
}

/// Writes step records as CSV to any writer.
///
/// One header row, then one row per step. Output is deterministic for
/// identical inputs.
///
/// # Errors
///
/// Returns a `csv::Error` if writing fails.
pub fn write_csv(records: &[StepRecord], writer: impl Write) -> csv::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for r in records {
        wtr.write_record(&[
            r.step.to_string(),
            format!("{:.3}", r.time_s),
            format!("{:.3}", r.signal.p),
            format!("{:.3}", r.signal.q),
            r.changed.to_string(),
            r.der_commands.to_string(),
            r.ac_commands.to_string(),
            r.wh_commands.to_string(),
            r.derd_saturated.to_string(),
            r.ac_saturated.to_string(),
            r.wh_saturated.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes scheduled changes as a disturbance script to a file.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_disturbances(changes: &[ParameterChange], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_disturbances(changes, &mut writer)?;
    writer.flush()
}

/// Writes one `<time> CHGPRM INJ <device> <parameter> <value> SETP 0.` line per change.
///
/// Changes are written in the order given; pass them sorted by effective
/// time for an engine-ready script.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_disturbances(changes: &[ParameterChange], mut writer: impl Write) -> io::Result<()> {
    for change in changes {
        writeln!(writer, "{change}")?;
    }
    Ok(())
}

/// Writes the run report as pretty-printed JSON to a file.
///
/// # Errors
///
/// Returns an `io::Error` if file creation, serialization, or writing fails.
pub fn export_report_json(report: &RunReport, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, report)?;
    writeln!(writer)?;
    writer.flush()
}
