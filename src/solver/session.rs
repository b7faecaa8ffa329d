//! Scoped solver sessions.

use tracing::{debug, info, warn};

use super::{Backend, MipSolver, SolveLimits, SolveOutcome, SolverParams};
use crate::error::Result;
use crate::formulation::DecisionModel;

/// A solver backend acquired for the duration of one experiment.
///
/// The session is opened once from [`SolverParams`], shared by every solve
/// of the experiment, and released by [`close`](SolverSession::close) or on
/// drop, whichever comes first. Each solve consumes its model.
///
/// # Examples
///
/// ```
/// use u_deploy::solver::{SolverParams, SolverSession};
///
/// let session = SolverSession::open(SolverParams::parse("TimeLimit=5")).unwrap();
/// assert_eq!(session.backend_name(), "microlp");
/// assert_eq!(session.solves(), 0);
/// session.close();
/// ```
pub struct SolverSession {
    solver: Box<dyn MipSolver>,
    params: SolverParams,
    limits: SolveLimits,
    solves: usize,
    warned: bool,
    released: bool,
}

impl SolverSession {
    /// Opens a session on the default backend.
    pub fn open(params: SolverParams) -> Result<Self> {
        Self::with_backend(Backend::default(), params)
    }

    /// Opens a session on `backend`.
    pub fn with_backend(backend: Backend, params: SolverParams) -> Result<Self> {
        let solver = backend.solver()?;
        let limits = params.solve_limits();
        info!(
            backend = solver.name(),
            time_limit = ?limits.time_limit(),
            mip_gap = limits.mip_gap(),
            "acquired solver session"
        );
        for (key, value) in params.iter() {
            debug!(key, %value, "session attribute");
        }
        Ok(Self {
            solver,
            params,
            limits,
            solves: 0,
            warned: false,
            released: false,
        })
    }

    /// Overrides the session's default limits.
    pub fn with_limits(mut self, limits: SolveLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Name of the backend.
    pub fn backend_name(&self) -> &'static str {
        self.solver.name()
    }

    /// Default limits of the session.
    pub fn limits(&self) -> &SolveLimits {
        &self.limits
    }

    /// Parameters the session was opened with.
    pub fn params(&self) -> &SolverParams {
        &self.params
    }

    /// Number of solves run so far.
    pub fn solves(&self) -> usize {
        self.solves
    }

    /// Solves `model` under the session's default limits.
    pub fn solve(&mut self, model: DecisionModel) -> Result<SolveOutcome> {
        let limits = self.limits;
        self.solve_with(model, &limits)
    }

    /// Solves `model` under `limits`.
    pub fn solve_with(
        &mut self,
        model: DecisionModel,
        limits: &SolveLimits,
    ) -> Result<SolveOutcome> {
        if !self.warned && !self.solver.enforces_limits() && limits.time_limit().is_some() {
            warn!(
                backend = self.solver.name(),
                "backend does not enforce time limits or MIP gaps; solving to optimality"
            );
            self.warned = true;
        }
        self.solves += 1;
        let outcome = self.solver.solve(model, limits)?;
        info!(
            formulation = outcome.formulation,
            status = %outcome.status,
            variables = outcome.stats.num_vars,
            constraints = outcome.stats.num_constrs,
            seconds = outcome.solve_time.as_secs_f64(),
            "solve complete"
        );
        Ok(outcome)
    }

    /// Releases the session.
    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            info!(
                backend = self.solver.name(),
                solves = self.solves,
                "released solver session"
            );
        }
    }
}

impl Drop for SolverSession {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for SolverSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolverSession")
            .field("backend", &self.solver.name())
            .field("limits", &self.limits)
            .field("solves", &self.solves)
            .finish()
    }
}
