//! Frequency-bounded selection with a unary (one-hot) frequency encoding.

use super::builder::{
    add_base_restriction, add_coverage, add_fairness, add_fleet_size, add_one_hot_frequencies,
    DecisionModel, FairnessEncoding, ModelBuilder, ModelHandles,
};
use super::{Formulation, FormulationInput};
use crate::error::Result;

/// Default upper bound on how often one configuration may be used.
pub const DEFAULT_MAX_FREQUENCY: u32 = 5;

/// Lets each configuration be used between 0 and `max_frequency` times.
///
/// The frequency is expanded into one-hot indicators
/// `indicator[c,k]`, `k ∈ 0..=max_frequency`, and linked back through
/// `frequency[c] = Σ k·indicator[c,k]`. A bounded integer would be linear
/// too; the expansion exists to compare solver behaviour against
/// [`BaseFormulation`](super::BaseFormulation).
///
/// The model is infeasible when
/// `num_configs × max_frequency < num_vehicles`.
///
/// # Examples
///
/// ```
/// use u_deploy::models::{Configuration, ZoneGraph};
/// use u_deploy::coverage::CoverageMatrix;
/// use u_deploy::formulation::{Formulation, FormulationInput, FrequencyFormulation};
///
/// let graph = ZoneGraph::grid(2, 1);
/// let configs = vec![Configuration::new(vec![0]), Configuration::new(vec![1])];
/// let coverage = CoverageMatrix::build(&graph, &configs, 1).unwrap();
/// let input = FormulationInput::new(&graph, &configs, &coverage, 3).unwrap();
///
/// let model = FrequencyFormulation::new(2).build(&input).unwrap();
/// assert_eq!(model.handles().indicators[0].len(), 3);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FrequencyFormulation {
    max_frequency: u32,
    fairness: FairnessEncoding,
}

impl FrequencyFormulation {
    /// Creates the formulation with the given frequency bound.
    pub fn new(max_frequency: u32) -> Self {
        Self {
            max_frequency,
            fairness: FairnessEncoding::default(),
        }
    }

    /// Sets the fairness encoding.
    pub fn with_fairness(mut self, fairness: FairnessEncoding) -> Self {
        self.fairness = fairness;
        self
    }

    /// Frequency bound.
    pub fn max_frequency(&self) -> u32 {
        self.max_frequency
    }
}

impl Default for FrequencyFormulation {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FREQUENCY)
    }
}

impl Formulation for FrequencyFormulation {
    fn name(&self) -> &'static str {
        "frequency"
    }

    fn build(&self, input: &FormulationInput<'_>) -> Result<DecisionModel> {
        let configurations = input.configurations();
        let mut builder = ModelBuilder::new();

        let (indicators, frequency) =
            add_one_hot_frequencies(&mut builder, configurations.len(), self.max_frequency);
        if let Some(bases) = input.bases() {
            add_base_restriction(&mut builder, configurations, bases, &frequency);
        }
        add_fleet_size(&mut builder, &frequency, input.num_vehicles());
        let coverage = add_coverage(&mut builder, input.coverage(), &frequency);
        let fairness_gap = add_fairness(&mut builder, &coverage, self.fairness);

        let handles = ModelHandles {
            multiplicity: frequency,
            indicators,
            occupancy: Vec::new(),
            movements: Vec::new(),
            coverage,
            fairness_gap,
        };
        Ok(builder.finish(self.name(), handles))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coverage::CoverageMatrix;
    use crate::models::{Configuration, ZoneGraph};

    #[test]
    fn test_frequency_model_size() {
        let graph = ZoneGraph::grid(2, 1);
        let configs = vec![Configuration::new(vec![0, 0]), Configuration::new(vec![0, 1])];
        let coverage = CoverageMatrix::build(&graph, &configs, 2).expect("valid");
        let input = FormulationInput::new(&graph, &configs, &coverage, 2).expect("valid");

        let model = FrequencyFormulation::new(3).build(&input).expect("builds");
        let stats = model.stats();
        // 2 * 4 indicators, 2 frequencies, 2 coverages, gap
        assert_eq!(stats.num_vars, 8 + 2 + 2 + 1);
        // 2 one-hot, 2 link, fleet, 2 coverage, 2 fairness
        assert_eq!(stats.num_constrs, 2 + 2 + 1 + 2 + 2);
        assert_eq!(model.name(), "frequency");
    }

    #[test]
    fn test_frequency_default_bound() {
        assert_eq!(FrequencyFormulation::default().max_frequency(), DEFAULT_MAX_FREQUENCY);
    }
}
