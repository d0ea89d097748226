//! CSV export of max-Q traces and comparison tables

use std::path::Path;

use serde::Serialize;

use crate::{Error, Result, pipeline::ComparisonRow};

/// A single row of a max-Q trace
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceRecord {
    pub step: usize,
    pub max_q: f64,
}

/// Write `values` as a `step,max_q` CSV file.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_max_q_trace(path: &Path, values: &[f64]) -> Result<()> {
    let mut writer = create_writer(path)?;
    for (step, &max_q) in values.iter().enumerate() {
        writer.serialize(TraceRecord { step, max_q })?;
    }
    writer.flush().map_err(|source| Error::Io {
        operation: format!("flush {}", path.display()),
        source,
    })
}

/// Write one line per compared algorithm.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_comparison_csv(path: &Path, rows: &[ComparisonRow]) -> Result<()> {
    let mut writer = create_writer(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush().map_err(|source| Error::Io {
        operation: format!("flush {}", path.display()),
        source,
    })
}

fn create_writer(path: &Path) -> Result<csv::Writer<std::fs::File>> {
    Ok(csv::Writer::from_path(path)?)
}
