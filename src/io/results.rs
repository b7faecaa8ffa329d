//! Run summaries (JSON) and sweep tables (CSV).

use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use super::ensure_parent;
use crate::error::{Error, Result};
use crate::solver::{SolveOutcome, SolveStatus};

/// Summary of one solve, written next to the experiment's outputs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    /// Formulation name.
    pub formulation: String,
    /// Termination state.
    pub status: SolveStatus,
    /// Fairness gap, if a solution was found.
    pub objective: Option<f64>,
    /// Solve time in seconds.
    pub runtime: f64,
    /// Model variables.
    pub num_vars: usize,
    /// Model constraints.
    pub num_constrs: usize,
    /// Relative gap at termination, if reported.
    pub mip_gap: Option<f64>,
}

impl RunSummary {
    /// Summarises a solve outcome.
    pub fn from_outcome(outcome: &SolveOutcome) -> Self {
        Self {
            formulation: outcome.formulation.to_string(),
            status: outcome.status,
            objective: outcome.objective,
            runtime: outcome.solve_time.as_secs_f64(),
            num_vars: outcome.stats.num_vars,
            num_constrs: outcome.stats.num_constrs,
            mip_gap: outcome.mip_gap,
        }
    }
}

/// Writes `value` as pretty-printed JSON, creating parent directories.
pub fn write_json<T: Serialize + ?Sized>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let path = path.as_ref();
    ensure_parent(path)?;
    let text = serde_json::to_string_pretty(value)?;
    fs::write(path, text).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "wrote summary");
    Ok(())
}

/// Writes records as CSV with a header row, creating parent directories.
///
/// `None` fields are written as empty cells.
pub fn write_records<T: Serialize>(path: impl AsRef<Path>, records: &[T]) -> Result<()> {
    let path = path.as_ref();
    ensure_parent(path)?;
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush().map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), rows = records.len(), "wrote table");
    Ok(())
}
