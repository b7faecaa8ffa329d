//! Mixed-integer formulations of the fair deployment problem.
//!
//! - [`BaseFormulation`] — binary selection of distinct configurations
//! - [`FrequencyFormulation`] — bounded reuse through a one-hot frequency encoding
//! - [`ConsistencyFormulation`] — frequency model plus occupancy and flow conservation
//!
//! All three minimise the fairness gap `max_i coverage[i] − min_i coverage[i]`
//! and share their building blocks through [`ModelBuilder`] and the `add_*`
//! helpers. A solved model is read back into a [`DeploymentPlan`].

mod base;
mod builder;
mod consistency;
mod frequency;
mod input;
mod plan;

pub use base::BaseFormulation;
pub use builder::{
    add_base_restriction, add_coverage, add_fairness, add_fleet_size, add_one_hot_frequencies,
    add_selection, DecisionModel, FairnessEncoding, FamilyCount, ModelBuilder, ModelHandles,
    ModelStats, ModelVar, MovementVar,
};
pub use consistency::{
    ConsistencyFormulation, DEFAULT_CONSISTENCY_MAX_FREQUENCY, DEFAULT_MAX_MOVEMENT,
};
pub use frequency::{FrequencyFormulation, DEFAULT_MAX_FREQUENCY};
pub use input::FormulationInput;
pub use plan::{DeploymentPlan, Movement, PlanViolation};

use crate::error::Result;

/// A way of turning a [`FormulationInput`] into a solvable model.
///
/// Formulations are stateless apart from their parameters; every call to
/// [`build`](Formulation::build) assembles a fresh [`DecisionModel`].
pub trait Formulation {
    /// Short identifier used in logs and result files.
    fn name(&self) -> &'static str;

    /// Assembles the model for one run.
    fn build(&self, input: &FormulationInput<'_>) -> Result<DecisionModel>;
}
