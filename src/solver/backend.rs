//! `good_lp` backends.

use std::str::FromStr;
use std::time::{Duration, Instant};

use good_lp::solvers::SolutionStatus;
use good_lp::variable::UnsolvedProblem;
use good_lp::{ResolutionError, Solution, SolverModel};
use tracing::debug;

use super::{Assignment, MipSolver, SolveLimits, SolveOutcome, SolveStatus};
use crate::error::{Error, Result};
use crate::formulation::DecisionModel;

/// Selectable MIP backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// Pure-Rust branch and bound, always compiled in.
    #[default]
    MicroLp,
    /// HiGHS, available with the `highs` feature.
    Highs,
}

impl Backend {
    /// Instantiates the backend.
    ///
    /// Fails with [`Error::Solver`] if the backend was not compiled in.
    pub fn solver(self) -> Result<Box<dyn MipSolver>> {
        match self {
            Self::MicroLp => Ok(Box::new(MicroLpSolver)),
            #[cfg(feature = "highs")]
            Self::Highs => Ok(Box::new(HighsSolver)),
            #[cfg(not(feature = "highs"))]
            Self::Highs => Err(Error::Solver(
                "the highs backend requires the `highs` feature".into(),
            )),
        }
    }
}

impl FromStr for Backend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "microlp" => Ok(Self::MicroLp),
            "highs" => Ok(Self::Highs),
            other => Err(Error::InvalidInput(format!("unknown solver backend '{other}'"))),
        }
    }
}

/// The bundled pure-Rust solver.
///
/// Solves to proven optimality; time limits and MIP gaps are not enforced.
#[derive(Debug, Clone, Copy, Default)]
pub struct MicroLpSolver;

impl MipSolver for MicroLpSolver {
    fn name(&self) -> &'static str {
        "microlp"
    }

    fn enforces_limits(&self) -> bool {
        false
    }

    fn solve(&self, model: DecisionModel, limits: &SolveLimits) -> Result<SolveOutcome> {
        run_model(model, limits, good_lp::solvers::microlp::microlp)
    }
}

/// HiGHS through `good_lp`, honouring the time limit and relative MIP gap.
#[cfg(feature = "highs")]
#[derive(Debug, Clone, Copy, Default)]
pub struct HighsSolver;

#[cfg(feature = "highs")]
impl MipSolver for HighsSolver {
    fn name(&self) -> &'static str {
        "highs"
    }

    fn enforces_limits(&self) -> bool {
        true
    }

    fn solve(&self, model: DecisionModel, limits: &SolveLimits) -> Result<SolveOutcome> {
        let time_limit = limits.time_limit();
        let mip_gap = limits.mip_gap();
        run_model(model, limits, move |problem: UnsolvedProblem| {
            let mut highs = good_lp::solvers::highs::highs(problem)
                .set_option("mip_rel_gap", mip_gap)
                .set_option("output_flag", false);
            if let Some(limit) = time_limit {
                highs = highs.set_option("time_limit", limit.as_secs_f64());
            }
            highs
        })
    }
}

/// Maps the termination reported by the backend onto a status and the
/// relative gap known at termination.
fn termination(status: SolutionStatus) -> (SolveStatus, Option<f64>) {
    match status {
        SolutionStatus::Optimal => (SolveStatus::Optimal, Some(0.0)),
        // stopped inside the requested gap; the exact gap is not reported
        SolutionStatus::GapLimit => (SolveStatus::Optimal, None),
        SolutionStatus::TimeLimit => (SolveStatus::TimeLimitFeasible, None),
    }
}

/// Hands `model` to the backend produced by `make` and maps the result
/// onto a [`SolveOutcome`].
fn run_model<M, F>(model: DecisionModel, limits: &SolveLimits, make: F) -> Result<SolveOutcome>
where
    M: SolverModel<Error = ResolutionError>,
    F: FnOnce(UnsolvedProblem) -> M,
{
    if let Some(reason) = model.known_infeasibility() {
        debug!(formulation = model.name(), reason, "skipping solve of infeasible model");
        return Ok(SolveOutcome::without_solution(
            model,
            SolveStatus::Infeasible,
            Duration::ZERO,
        ));
    }

    let DecisionModel {
        name,
        variables,
        columns,
        constraints,
        objective,
        handles,
        stats,
        infeasible: _,
    } = model;

    let mut problem = make(variables.minimise(objective.var()));
    for constraint in constraints {
        problem.add_constraint(constraint);
    }

    let start = Instant::now();
    let result = problem.solve();
    let solve_time = start.elapsed();
    let hit_limit = limits.time_limit().is_some_and(|limit| solve_time >= limit);

    let (status, mip_gap, assignment) = match result {
        Ok(solution) => {
            let values = columns.iter().map(|&v| solution.value(v)).collect();
            let (status, mip_gap) = termination(solution.status());
            (status, mip_gap, Some(Assignment::new(values)))
        }
        Err(ResolutionError::Infeasible) => (SolveStatus::Infeasible, None, None),
        Err(ResolutionError::Unbounded) => (SolveStatus::Unbounded, None, None),
        Err(other) => {
            let message = other.to_string();
            let lower = message.to_ascii_lowercase();
            if hit_limit || lower.contains("time limit") || lower.contains("nosolutionfound") {
                (SolveStatus::TimeLimitNoSolution, None, None)
            } else {
                return Err(Error::Solver(message));
            }
        }
    };

    let objective_value = assignment.as_ref().map(|a| a.value(objective));
    debug!(
        formulation = name,
        %status,
        objective = ?objective_value,
        seconds = solve_time.as_secs_f64(),
        "solve finished"
    );
    Ok(SolveOutcome {
        formulation: name,
        status,
        objective: objective_value,
        mip_gap,
        assignment,
        solve_time,
        stats,
        handles,
    })
}
