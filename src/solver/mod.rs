//! MIP solving.
//!
//! - [`MipSolver`] — backend seam; [`MicroLpSolver`] is always available,
//!   `HighsSolver` behind the `highs` feature
//! - [`SolverSession`] — scoped solver resource shared by the runs of one experiment
//! - [`SolverParams`] — key=value parameter file seeding the session limits
//!
//! Infeasibility and time limits are reported through [`SolveStatus`],
//! never as errors.

mod backend;
mod params;
mod session;

use std::fmt;
use std::time::Duration;

use serde::Serialize;

pub use backend::{Backend, MicroLpSolver};
#[cfg(feature = "highs")]
pub use backend::HighsSolver;
pub use params::{ParamValue, SolverParams};
pub use session::SolverSession;

use crate::error::Result;
use crate::formulation::{DecisionModel, DeploymentPlan, ModelHandles, ModelStats, ModelVar};

/// Default wall-clock limit per solve.
pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(600);

/// Default relative MIP optimality gap.
pub const DEFAULT_MIP_GAP: f64 = 0.01;

/// Termination state of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveStatus {
    /// Proven optimal within the MIP gap.
    Optimal,
    /// Time limit reached with an incumbent; optimality not proven.
    TimeLimitFeasible,
    /// Time limit reached before any feasible solution was found.
    TimeLimitNoSolution,
    /// No assignment satisfies the constraints.
    Infeasible,
    /// The objective is unbounded below.
    Unbounded,
}

impl SolveStatus {
    /// Returns `true` if the outcome carries an assignment.
    pub fn has_solution(self) -> bool {
        matches!(self, Self::Optimal | Self::TimeLimitFeasible)
    }

    /// Snake-case label used in logs and result files.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Optimal => "optimal",
            Self::TimeLimitFeasible => "time_limit_feasible",
            Self::TimeLimitNoSolution => "time_limit_no_solution",
            Self::Infeasible => "infeasible",
            Self::Unbounded => "unbounded",
        }
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Limits applied to one solve.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_deploy::solver::SolveLimits;
///
/// let limits = SolveLimits::default().with_time_limit(Duration::from_secs(30));
/// assert_eq!(limits.time_limit(), Some(Duration::from_secs(30)));
/// assert_eq!(limits.mip_gap(), 0.01);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveLimits {
    time_limit: Option<Duration>,
    mip_gap: f64,
}

impl SolveLimits {
    /// Sets the wall-clock limit.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Removes the wall-clock limit.
    pub fn without_time_limit(mut self) -> Self {
        self.time_limit = None;
        self
    }

    /// Sets the relative MIP gap.
    pub fn with_mip_gap(mut self, gap: f64) -> Self {
        self.mip_gap = gap;
        self
    }

    /// Wall-clock limit, if any.
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    /// Relative MIP gap.
    pub fn mip_gap(&self) -> f64 {
        self.mip_gap
    }
}

impl Default for SolveLimits {
    fn default() -> Self {
        Self {
            time_limit: Some(DEFAULT_TIME_LIMIT),
            mip_gap: DEFAULT_MIP_GAP,
        }
    }
}

/// Variable values of a solved model, indexed by [`ModelVar::id`].
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    values: Vec<f64>,
}

impl Assignment {
    /// Wraps raw column values.
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Value of `var`.
    ///
    /// # Panics
    ///
    /// Panics if `var` belongs to a larger model.
    pub fn value(&self, var: ModelVar) -> f64 {
        self.values[var.id()]
    }

    /// Value of `var` rounded to the nearest non-negative integer.
    pub fn integer(&self, var: ModelVar) -> u32 {
        self.value(var).round().max(0.0) as u32
    }

    /// All column values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// Result of one solve.
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    /// Formulation the model came from.
    pub formulation: &'static str,
    /// Termination state.
    pub status: SolveStatus,
    /// Objective (fairness gap) when a solution exists.
    pub objective: Option<f64>,
    /// Relative gap at termination, when the backend reports one.
    pub mip_gap: Option<f64>,
    /// Column values when a solution exists.
    pub assignment: Option<Assignment>,
    /// Wall-clock solve time.
    pub solve_time: Duration,
    /// Model size.
    pub stats: ModelStats,
    /// Handles for reading the assignment.
    pub handles: ModelHandles,
}

impl SolveOutcome {
    /// An outcome without a solution.
    pub(crate) fn without_solution(
        model: DecisionModel,
        status: SolveStatus,
        solve_time: Duration,
    ) -> Self {
        Self {
            formulation: model.name,
            status,
            objective: None,
            mip_gap: None,
            assignment: None,
            solve_time,
            stats: model.stats,
            handles: model.handles,
        }
    }

    /// Reads the deployment plan, if a solution exists.
    pub fn plan(&self) -> Option<DeploymentPlan> {
        self.assignment
            .as_ref()
            .map(|a| DeploymentPlan::from_assignment(&self.handles, a))
    }
}

/// A MIP backend.
pub trait MipSolver {
    /// Backend name.
    fn name(&self) -> &'static str;

    /// Returns `true` if the backend honours [`SolveLimits`].
    fn enforces_limits(&self) -> bool;

    /// Solves `model`, consuming it.
    fn solve(&self, model: DecisionModel, limits: &SolveLimits) -> Result<SolveOutcome>;
}
