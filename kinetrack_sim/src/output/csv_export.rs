// kinetrack_sim/src/output/csv_export.rs

use kinetrack_core::error::EstimationError;
use kinetrack_core::types::{position_of, Measurement, StateVector};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::error::SimResult;

pub const CSV_HEADER: [&str; 6] = [
    "dataX",
    "dataY",
    "measurementX",
    "measurementY",
    "predictionX",
    "predictionY",
];

/// Writes one row per time step with the positions of the ground truth, the
/// measurement and the estimate. Numbers use the shortest round-trip decimal
/// form.
pub fn write_csv<W: Write>(
    writer: W,
    true_states: &[StateVector],
    measurements: &[Measurement],
    estimates: &[StateVector],
) -> SimResult<()> {
    if true_states.len() != measurements.len() || true_states.len() != estimates.len() {
        return Err(EstimationError::configuration(format!(
            "cannot export sequences of different lengths ({}, {}, {})",
            true_states.len(),
            measurements.len(),
            estimates.len()
        ))
        .into());
    }

    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CSV_HEADER)?;

    for ((truth, z), est) in true_states.iter().zip(measurements).zip(estimates) {
        let (tx, ty) = position_of(truth);
        let (ex, ey) = position_of(est);
        wtr.write_record([tx, ty, z[0], z[1], ex, ey].iter().map(|v| v.to_string()))?;
    }

    wtr.flush()?;
    Ok(())
}

/// Creates (or truncates) `path` and writes the table into it.
pub fn export_csv(
    path: &Path,
    true_states: &[StateVector],
    measurements: &[Measurement],
    estimates: &[StateVector],
) -> SimResult<()> {
    let file = File::create(path)?;
    write_csv(file, true_states, measurements, estimates)?;
    info!("Wrote {} rows to {}", true_states.len(), path.display());
    Ok(())
}
