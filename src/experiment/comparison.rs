//! Base versus frequency-bounded formulation comparison.

use serde::Serialize;
use tracing::info;

use super::{run_formulation, FormulationRun, Scenario};
use crate::error::Result;
use crate::formulation::{BaseFormulation, FrequencyFormulation};
use crate::solver::{SolveStatus, SolverSession};

/// One row of the comparison table: a configuration size and a frequency
/// bound, with size, time and objective of both models.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRecord {
    /// Configurations offered to both models.
    pub config_size: usize,
    /// Frequency bound of the frequency-bounded model.
    pub freq_bound: u32,
    /// Base model variables.
    pub base_vars: usize,
    /// Frequency model variables.
    pub freq_vars: usize,
    /// Base model constraints.
    pub base_constrs: usize,
    /// Frequency model constraints.
    pub freq_constrs: usize,
    /// Base model solve time in seconds.
    pub base_time: f64,
    /// Frequency model solve time in seconds.
    pub freq_time: f64,
    /// Base model fairness gap; empty without a solution.
    pub base_obj: Option<f64>,
    /// Frequency model fairness gap; empty without a solution.
    pub freq_obj: Option<f64>,
    /// Base model termination state.
    pub base_status: SolveStatus,
    /// Frequency model termination state.
    pub freq_status: SolveStatus,
}

impl ComparisonRecord {
    fn new(
        config_size: usize,
        freq_bound: u32,
        base: &FormulationRun,
        freq: &FormulationRun,
    ) -> Self {
        Self {
            config_size,
            freq_bound,
            base_vars: base.outcome.stats.num_vars,
            freq_vars: freq.outcome.stats.num_vars,
            base_constrs: base.outcome.stats.num_constrs,
            freq_constrs: freq.outcome.stats.num_constrs,
            base_time: base.outcome.solve_time.as_secs_f64(),
            freq_time: freq.outcome.solve_time.as_secs_f64(),
            base_obj: base.outcome.objective,
            freq_obj: freq.outcome.objective,
            base_status: base.outcome.status,
            freq_status: freq.outcome.status,
        }
    }
}

/// For every configuration size, solves the base model once and the
/// frequency-bounded model once per bound.
pub fn compare_formulations(
    session: &mut SolverSession,
    scenario: &Scenario<'_>,
    sizes: &[usize],
    freq_bounds: &[u32],
) -> Result<Vec<ComparisonRecord>> {
    let mut records = Vec::with_capacity(sizes.len() * freq_bounds.len());
    for &size in sizes {
        let truncated = scenario.truncated(size);
        let config_size = truncated.configurations.len();
        let base = run_formulation(session, &truncated, &BaseFormulation::new())?;
        for &bound in freq_bounds {
            let freq = run_formulation(session, &truncated, &FrequencyFormulation::new(bound))?;
            info!(
                config_size,
                freq_bound = bound,
                base = ?base.outcome.objective,
                frequency = ?freq.outcome.objective,
                "compared formulations"
            );
            records.push(ComparisonRecord::new(config_size, bound, &base, &freq));
        }
    }
    Ok(records)
}
