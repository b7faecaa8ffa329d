//! Configuration-count scaling sweep of the base formulation.

use serde::Serialize;
use tracing::info;

use super::{run_formulation, Scenario};
use crate::error::{Error, Result};
use crate::formulation::{BaseFormulation, Formulation};
use crate::solver::{SolveStatus, SolverSession};

/// `steps` sizes spaced evenly on a log scale from `min` to `max`, truncated
/// to integers, deduplicated and sorted.
///
/// Values within a relative `1e-9` below an integer snap up to it, so both
/// endpoints are reproduced exactly.
///
/// # Errors
///
/// [`Error::InvalidInput`] if `min` is zero or exceeds `max`.
///
/// # Examples
///
/// ```
/// use u_deploy::experiment::log_spaced_sizes;
///
/// assert_eq!(log_spaced_sizes(100, 10_000, 3).unwrap(), vec![100, 1000, 10_000]);
/// assert_eq!(log_spaced_sizes(1, 3, 5).unwrap(), vec![1, 2, 3]);
/// ```
pub fn log_spaced_sizes(min: usize, max: usize, steps: usize) -> Result<Vec<usize>> {
    if min == 0 || min > max {
        return Err(Error::InvalidInput(format!(
            "size range must satisfy 1 <= min <= max, got {min}..={max}"
        )));
    }
    let (lo, hi) = ((min as f64).log10(), (max as f64).log10());
    let mut sizes: Vec<usize> = (0..steps)
        .map(|k| {
            let exponent = if steps == 1 {
                lo
            } else {
                lo + (hi - lo) * k as f64 / (steps - 1) as f64
            };
            (10f64.powf(exponent) * (1.0 + 1e-9)).floor() as usize
        })
        .collect();
    sizes.sort_unstable();
    sizes.dedup();
    Ok(sizes)
}

/// One row of the scaling table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScalingRecord {
    /// Configurations offered to the model.
    pub config_size: usize,
    /// Model assembly time in seconds.
    pub build_time: f64,
    /// Solve time in seconds.
    pub solve_time: f64,
    /// Build plus solve time in seconds.
    pub total_time: f64,
    /// Fairness gap; empty when no solution was found.
    pub fairness_gap: Option<f64>,
    /// Model variables.
    pub num_vars: usize,
    /// Model constraints.
    pub num_constrs: usize,
    /// Termination state.
    pub status: SolveStatus,
    /// Whether a feasible solution was found.
    pub solution_found: bool,
}

/// Solves the base formulation on the first `size` configurations of
/// `scenario`, for every size.
///
/// Sizes above the number of available configurations use all of them.
pub fn scaling_analysis(
    session: &mut SolverSession,
    scenario: &Scenario<'_>,
    sizes: &[usize],
) -> Result<Vec<ScalingRecord>> {
    let formulation = BaseFormulation::new();
    let mut records = Vec::with_capacity(sizes.len());
    for &size in sizes {
        let truncated = scenario.truncated(size);
        let run = run_formulation(session, &truncated, &formulation)?;
        let outcome = &run.outcome;
        info!(
            formulation = formulation.name(),
            config_size = truncated.configurations.len(),
            status = %outcome.status,
            fairness_gap = ?outcome.objective,
            "scaling step"
        );
        records.push(ScalingRecord {
            config_size: truncated.configurations.len(),
            build_time: run.build_time.as_secs_f64(),
            solve_time: outcome.solve_time.as_secs_f64(),
            total_time: run.total_time().as_secs_f64(),
            fairness_gap: outcome.objective,
            num_vars: outcome.stats.num_vars,
            num_constrs: outcome.stats.num_constrs,
            status: outcome.status,
            solution_found: outcome.status.has_solution(),
        });
    }
    Ok(records)
}
