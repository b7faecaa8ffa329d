//! Consistency model run and its coverage-over-time analysis.

use tracing::info;

use super::{run_formulation, FormulationRun, Scenario};
use crate::coverage::CoverageTimeline;
use crate::error::Result;
use crate::formulation::ConsistencyFormulation;
use crate::solver::SolverSession;

/// Result of a consistency run.
#[derive(Debug, Clone)]
pub struct ConsistencyReport {
    /// The underlying run.
    pub run: FormulationRun,
    /// Coverage over time derived from the solved occupancy, if solved.
    pub timeline: Option<CoverageTimeline>,
}

impl ConsistencyReport {
    /// Per zone: covered periods according to the occupancy grid.
    pub fn totals(&self) -> Option<Vec<u32>> {
        self.timeline.as_ref().map(CoverageTimeline::totals)
    }

    /// Spread of [`totals`](Self::totals).
    pub fn timeline_gap(&self) -> Option<u32> {
        self.timeline.as_ref().map(CoverageTimeline::fairness_gap)
    }
}

/// Solves the consistency model for `scenario` and derives coverage over
/// time from the occupancy of the solution.
pub fn consistency_analysis(
    session: &mut SolverSession,
    scenario: &Scenario<'_>,
    formulation: &ConsistencyFormulation,
) -> Result<ConsistencyReport> {
    let run = run_formulation(session, scenario, formulation)?;
    let timeline = match &run.plan {
        Some(plan) => Some(CoverageTimeline::from_occupancy(scenario.graph, plan.occupancy())?),
        None => None,
    };
    info!(
        status = %run.outcome.status,
        fairness_gap = ?run.outcome.objective,
        movements = run.plan.as_ref().map_or(0, |p| p.movements().len()),
        "consistency run finished"
    );
    Ok(ConsistencyReport { run, timeline })
}
