//! CSV export of recorded trajectories and cost tables.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::economics::MicrogridCosts;
use crate::economics::costs::COST_COLUMNS;
use crate::sim::recorder::TrajectoryRecorder;

/// Exports recorded trajectories to a CSV file at the given path.
///
/// See [`write_trajectories`] for the layout.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_trajectories(
    recorder: &TrajectoryRecorder,
    timestep: f64,
    path: &Path,
) -> io::Result<()> {
    let file = File::create(path)?;
    write_trajectories(recorder, timestep, io::BufWriter::new(file))
}

/// Writes recorded trajectories as CSV to any writer.
///
/// One column per declared variable after `step,time_h`. Series shorter than
/// the longest one (the powers, next to the final stored energy) leave
/// their trailing cells empty. Output is deterministic for identical inputs.
///
/// # Arguments
///
/// * `recorder` - Recorder filled by a simulation
/// * `timestep` - Step duration (h), used for the `time_h` column
/// * `writer` - Destination implementing `Write`
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_trajectories(
    recorder: &TrajectoryRecorder,
    timestep: f64,
    writer: impl Write,
) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    let series: Vec<_> = recorder.iter().collect();
    let mut header = vec!["step".to_string(), "time_h".to_string()];
    header.extend(series.iter().map(|(var, _)| var.name().to_string()));
    wtr.write_record(&header)?;

    let rows = series.iter().map(|(_, s)| s.len()).max().unwrap_or(0);
    for k in 0..rows {
        let mut record = vec![k.to_string(), format!("{:.2}", k as f64 * timestep)];
        record.extend(
            series
                .iter()
                .map(|(_, s)| s.get(k).map_or_else(String::new, |v| format!("{v:.4}"))),
        );
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Exports the cost table to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_costs(costs: &MicrogridCosts, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_costs(costs, io::BufWriter::new(file))
}

/// Writes the cost table as CSV: one row per component, then the system total.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_costs(costs: &MicrogridCosts, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(std::iter::once("component").chain(COST_COLUMNS))?;
    let table = costs.costs_table();
    for (name, values) in table.rows.iter().zip(&table.values) {
        let mut record = vec![name.clone()];
        record.extend(values.iter().map(|v| format!("{v:.2}")));
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}
