//! Validated inputs shared by the formulations.

use crate::coverage::CoverageMatrix;
use crate::error::{Error, Result};
use crate::models::{validate_configurations, BaseSet, Configuration, ZoneGraph};

/// Everything a formulation needs to assemble a model.
///
/// Construction checks that the configurations, the coverage matrix and the
/// graph describe the same instance, so formulations never see mismatched
/// shapes.
///
/// # Examples
///
/// ```
/// use u_deploy::models::{Configuration, ZoneGraph};
/// use u_deploy::coverage::CoverageMatrix;
/// use u_deploy::formulation::FormulationInput;
///
/// let graph = ZoneGraph::grid(2, 1);
/// let configs = vec![Configuration::new(vec![0, 1])];
/// let coverage = CoverageMatrix::build(&graph, &configs, 2).unwrap();
/// let input = FormulationInput::new(&graph, &configs, &coverage, 1).unwrap();
/// assert_eq!(input.horizon(), 2);
/// assert!(input.bases().is_none());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FormulationInput<'a> {
    graph: &'a ZoneGraph,
    configurations: &'a [Configuration],
    coverage: &'a CoverageMatrix,
    num_vehicles: u32,
    bases: Option<&'a BaseSet>,
}

impl<'a> FormulationInput<'a> {
    /// Bundles the inputs of one run.
    ///
    /// Fails with [`Error::InvalidInput`] if the coverage matrix was built
    /// for a different configuration list or graph, or if the horizon is zero.
    pub fn new(
        graph: &'a ZoneGraph,
        configurations: &'a [Configuration],
        coverage: &'a CoverageMatrix,
        num_vehicles: u32,
    ) -> Result<Self> {
        if coverage.horizon() == 0 {
            return Err(Error::InvalidInput("horizon must span at least one period".into()));
        }
        if coverage.num_configs() != configurations.len() {
            return Err(Error::InvalidInput(format!(
                "coverage matrix covers {} configurations, {} given",
                coverage.num_configs(),
                configurations.len()
            )));
        }
        if coverage.num_zones() != graph.num_zones() {
            return Err(Error::InvalidInput(format!(
                "coverage matrix covers {} zones, graph has {}",
                coverage.num_zones(),
                graph.num_zones()
            )));
        }
        validate_configurations(graph, configurations, coverage.horizon())?;
        Ok(Self {
            graph,
            configurations,
            coverage,
            num_vehicles,
            bases: None,
        })
    }

    /// Restricts deployments to configurations anchored at `bases`.
    ///
    /// Fails with [`Error::InvalidInput`] if the base set was resolved
    /// against a graph with a different number of zones.
    pub fn with_bases(mut self, bases: &'a BaseSet) -> Result<Self> {
        if bases.num_zones() != self.graph.num_zones() {
            return Err(Error::InvalidInput(format!(
                "base set covers {} zones, graph has {}",
                bases.num_zones(),
                self.graph.num_zones()
            )));
        }
        self.bases = Some(bases);
        Ok(self)
    }

    /// Zone graph.
    pub fn graph(&self) -> &'a ZoneGraph {
        self.graph
    }

    /// Candidate configurations.
    pub fn configurations(&self) -> &'a [Configuration] {
        self.configurations
    }

    /// Coverage matrix of the configurations.
    pub fn coverage(&self) -> &'a CoverageMatrix {
        self.coverage
    }

    /// Number of periods.
    pub fn horizon(&self) -> usize {
        self.coverage.horizon()
    }

    /// Fleet size.
    pub fn num_vehicles(&self) -> u32 {
        self.num_vehicles
    }

    /// Valid base anchors, if restricted.
    pub fn bases(&self) -> Option<&'a BaseSet> {
        self.bases
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_rejects_mismatched_coverage() {
        let graph = ZoneGraph::grid(2, 1);
        let configs = vec![Configuration::new(vec![0, 1])];
        let coverage = CoverageMatrix::build(&graph, &configs, 2).expect("valid");
        let fewer: Vec<Configuration> = Vec::new();
        assert!(matches!(
            FormulationInput::new(&graph, &fewer, &coverage, 1),
            Err(Error::InvalidInput(_))
        ));

        let other_graph = ZoneGraph::grid(3, 1);
        assert!(FormulationInput::new(&other_graph, &configs, &coverage, 1).is_err());
    }

    #[test]
    fn test_input_rejects_zero_horizon() {
        let graph = ZoneGraph::grid(2, 1);
        let coverage = CoverageMatrix::build(&graph, &[], 0).expect("valid");
        assert!(FormulationInput::new(&graph, &[], &coverage, 0).is_err());
    }

    #[test]
    fn test_input_with_bases() {
        let graph = ZoneGraph::grid(2, 1);
        let configs = vec![Configuration::new(vec![0])];
        let coverage = CoverageMatrix::build(&graph, &configs, 1).expect("valid");
        let bases = BaseSet::from_indices(2, &[0]);
        let input = FormulationInput::new(&graph, &configs, &coverage, 1)
            .expect("valid")
            .with_bases(&bases)
            .expect("same graph");
        assert_eq!(input.bases().map(BaseSet::len), Some(1));
        assert_eq!(input.num_vehicles(), 1);
    }

    #[test]
    fn test_input_rejects_bases_of_other_graph() {
        let graph = ZoneGraph::grid(2, 1);
        let configs = vec![Configuration::new(vec![0])];
        let coverage = CoverageMatrix::build(&graph, &configs, 1).expect("valid");
        let bases = BaseSet::from_indices(9, &[8]);
        let err = FormulationInput::new(&graph, &configs, &coverage, 1)
            .expect("valid")
            .with_bases(&bases)
            .expect_err("base set of a 9-zone graph");
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
