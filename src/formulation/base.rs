//! Plain binary selection of configurations.

use super::builder::{
    add_base_restriction, add_coverage, add_fairness, add_fleet_size, add_selection,
    DecisionModel, FairnessEncoding, ModelBuilder, ModelHandles,
};
use super::{Formulation, FormulationInput};
use crate::error::Result;

/// Selects exactly `num_vehicles` distinct configurations, minimising the
/// spread of cumulative coverage across zones.
///
/// Variables: `selection[c] ∈ {0,1}`, `coverage[i] ∈ ℤ≥0`, `gap ∈ ℤ≥0`.
/// Constraints: optional base restriction, `Σ selection = num_vehicles`,
/// coverage definition, fairness.
///
/// # Examples
///
/// ```
/// use u_deploy::models::{Configuration, ZoneGraph};
/// use u_deploy::coverage::CoverageMatrix;
/// use u_deploy::formulation::{BaseFormulation, Formulation, FormulationInput};
///
/// let graph = ZoneGraph::grid(3, 1);
/// let configs = vec![Configuration::new(vec![0, 0]), Configuration::new(vec![0, 1])];
/// let coverage = CoverageMatrix::build(&graph, &configs, 2).unwrap();
/// let input = FormulationInput::new(&graph, &configs, &coverage, 1).unwrap();
///
/// let model = BaseFormulation::new().build(&input).unwrap();
/// // 2 selections + 3 coverages + gap
/// assert_eq!(model.stats().num_vars, 6);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseFormulation {
    fairness: FairnessEncoding,
}

impl BaseFormulation {
    /// Creates the formulation with pairwise fairness constraints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the fairness encoding.
    pub fn with_fairness(mut self, fairness: FairnessEncoding) -> Self {
        self.fairness = fairness;
        self
    }
}

impl Formulation for BaseFormulation {
    fn name(&self) -> &'static str {
        "base"
    }

    fn build(&self, input: &FormulationInput<'_>) -> Result<DecisionModel> {
        let configurations = input.configurations();
        let mut builder = ModelBuilder::new();

        let selection = add_selection(&mut builder, configurations.len());
        if let Some(bases) = input.bases() {
            add_base_restriction(&mut builder, configurations, bases, &selection);
        }
        add_fleet_size(&mut builder, &selection, input.num_vehicles());
        let coverage = add_coverage(&mut builder, input.coverage(), &selection);
        let fairness_gap = add_fairness(&mut builder, &coverage, self.fairness);

        let handles = ModelHandles {
            multiplicity: selection,
            indicators: Vec::new(),
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
    use crate::models::{BaseSet, Configuration, ZoneGraph};

    #[test]
    fn test_base_model_size() {
        let graph = ZoneGraph::grid(3, 1);
        let configs = vec![
            Configuration::new(vec![0, 0]),
            Configuration::new(vec![0, 1]),
            Configuration::new(vec![2, 2]),
        ];
        let coverage = CoverageMatrix::build(&graph, &configs, 2).expect("valid");
        let bases = BaseSet::from_indices(3, &[0]);
        let input = FormulationInput::new(&graph, &configs, &coverage, 2)
            .expect("valid")
            .with_bases(&bases)
            .expect("same graph");

        let model = BaseFormulation::new().build(&input).expect("builds");
        let stats = model.stats();
        assert_eq!(stats.num_vars, 3 + 3 + 1);
        // base restriction + fleet + 3 coverage + 6 fairness
        assert_eq!(stats.num_constrs, 1 + 1 + 3 + 6);
        assert_eq!(stats.family("base_restriction").expect("present").constraints, 1);
        assert_eq!(model.name(), "base");
    }

    #[test]
    fn test_base_model_bounds_encoding() {
        let graph = ZoneGraph::grid(3, 1);
        let configs = vec![Configuration::new(vec![0, 0])];
        let coverage = CoverageMatrix::build(&graph, &configs, 2).expect("valid");
        let input = FormulationInput::new(&graph, &configs, &coverage, 1).expect("valid");
        let model = BaseFormulation::new()
            .with_fairness(FairnessEncoding::Bounds)
            .build(&input)
            .expect("builds");
        assert_eq!(model.stats().family("fairness").expect("present").constraints, 7);
    }
}
