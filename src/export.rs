//! CSV export of results.
//!
//! The exported tables mirror what the assay tool offers for download: the
//! concentration/velocity table, the per-method parameter estimates and the
//! aggregated summary. All writers take any `io::Write` so the host decides
//! where the flat files go.

use std::io::Write;

use thiserror::Error;

use crate::aggregate::KineticsSummary;
use crate::fit::FitResult;
use crate::rate::ConcentrationVelocityPair;

/// Errors raised while writing flat files.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write CSV")]
    Csv(#[from] csv::Error),
    #[error("Failed to flush output")]
    Io(#[from] std::io::Error),
}

/// Writes the concentration/velocity table.
pub fn write_pairs_csv<W: Write>(
    writer: W,
    pairs: &[ConcentrationVelocityPair],
) -> Result<(), ExportError> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["substrate_concentration", "initial_velocity"])?;
    for pair in pairs {
        csv.write_record([pair.s.to_string(), pair.v.to_string()])?;
    }
    csv.flush()?;
    Ok(())
}

/// Writes one row of parameter estimates per successful method.
pub fn write_fit_results_csv<W: Write>(
    writer: W,
    results: &[&FitResult],
) -> Result<(), ExportError> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["method", "vmax", "km", "rss"])?;
    for result in results {
        csv.write_record([
            result.method.to_string(),
            result.vmax.to_string(),
            result.km.to_string(),
            result.diagnostics.rss.to_string(),
        ])?;
    }
    csv.flush()?;
    Ok(())
}

/// Writes the aggregated summary as a single-row table.
///
/// The derived columns are left empty when the enzyme concentration was
/// not supplied.
pub fn write_summary_csv<W: Write>(
    writer: W,
    summary: &KineticsSummary,
) -> Result<(), ExportError> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["vmax_mean", "km_mean", "kcat", "efficiency", "n_methods"])?;
    csv.write_record([
        summary.vmax_mean.to_string(),
        summary.km_mean.to_string(),
        summary.kcat.map(|v| v.to_string()).unwrap_or_default(),
        summary.efficiency.map(|v| v.to_string()).unwrap_or_default(),
        summary.n_methods.to_string(),
    ])?;
    csv.flush()?;
    Ok(())
}
