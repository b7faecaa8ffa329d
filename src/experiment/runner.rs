//! Build-and-solve of a single formulation.

use std::time::{Duration, Instant};

use tracing::warn;

use super::Scenario;
use crate::coverage::CoverageMatrix;
use crate::error::Result;
use crate::formulation::{DeploymentPlan, Formulation, FormulationInput, PlanViolation};
use crate::solver::{SolveOutcome, SolverSession};

/// Outcome of one formulation run plus its assembly time.
#[derive(Debug, Clone)]
pub struct FormulationRun {
    /// Solve result.
    pub outcome: SolveOutcome,
    /// Time spent assembling the model (coverage matrix excluded).
    pub build_time: Duration,
    /// Plan read from the solution, if any.
    pub plan: Option<DeploymentPlan>,
    /// Disagreements between the plan and the model; empty for a sound solve.
    pub violations: Vec<PlanViolation>,
}

impl FormulationRun {
    /// Build plus solve time.
    pub fn total_time(&self) -> Duration {
        self.build_time + self.outcome.solve_time
    }

    /// Fairness gap, when a solution exists.
    pub fn fairness_gap(&self) -> Option<f64> {
        self.outcome.objective
    }
}

/// Derives coverage for `scenario`, assembles `formulation` and solves it in
/// `session`. The resulting plan is checked against the model.
pub fn run_formulation(
    session: &mut SolverSession,
    scenario: &Scenario<'_>,
    formulation: &dyn Formulation,
) -> Result<FormulationRun> {
    let coverage =
        CoverageMatrix::build(scenario.graph, scenario.configurations, scenario.periods)?;
    let mut input = FormulationInput::new(
        scenario.graph,
        scenario.configurations,
        &coverage,
        scenario.num_vehicles,
    )?;
    if let Some(bases) = scenario.bases {
        input = input.with_bases(bases)?;
    }

    let start = Instant::now();
    let model = formulation.build(&input)?;
    let build_time = start.elapsed();

    let outcome = session.solve(model)?;
    let plan = outcome.plan();
    let violations = plan
        .as_ref()
        .map(|plan| plan.verify(&input))
        .unwrap_or_default();
    if !violations.is_empty() {
        warn!(
            formulation = formulation.name(),
            violations = violations.len(),
            first = ?violations[0],
            "solution disagrees with its model"
        );
    }
    Ok(FormulationRun {
        outcome,
        build_time,
        plan,
        violations,
    })
}
