//! Vehicle configurations (multi-period trajectories).

use super::{BaseSet, ZoneGraph};
use crate::error::{Error, Result};

/// One vehicle's trajectory over the planning horizon: the zone index it
/// occupies in each period.
///
/// A configuration is an immutable input to every formulation. Position 0
/// is the base the vehicle starts from.
///
/// # Examples
///
/// ```
/// use u_deploy::models::Configuration;
///
/// let config = Configuration::new(vec![0, 0, 2]);
/// assert_eq!(config.horizon(), 3);
/// assert_eq!(config.origin(), 0);
/// assert_eq!(config.zone_at(2), 2);
/// assert!(!config.is_stationary());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Configuration {
    positions: Vec<usize>,
}

impl Configuration {
    /// Creates a configuration from per-period zone indices.
    pub fn new(positions: Vec<usize>) -> Self {
        Self { positions }
    }

    /// Number of periods covered.
    pub fn horizon(&self) -> usize {
        self.positions.len()
    }

    /// Zone index occupied at period `t`.
    ///
    /// # Panics
    ///
    /// Panics if `t >= horizon()`.
    pub fn zone_at(&self, t: usize) -> usize {
        self.positions[t]
    }

    /// Zone index at period 0.
    ///
    /// # Panics
    ///
    /// Panics on an empty configuration.
    pub fn origin(&self) -> usize {
        self.positions[0]
    }

    /// All positions in period order.
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    /// Returns `true` if the vehicle never leaves its origin.
    pub fn is_stationary(&self) -> bool {
        self.positions.windows(2).all(|w| w[0] == w[1])
    }

    /// Returns `true` if the configuration starts at one of the bases.
    pub fn starts_at_base(&self, bases: &BaseSet) -> bool {
        self.positions.first().is_some_and(|&z| bases.contains(z))
    }
}

/// Checks that every configuration has `horizon` periods and only refers to
/// zones of `graph`.
pub fn validate_configurations(
    graph: &ZoneGraph,
    configurations: &[Configuration],
    horizon: usize,
) -> Result<()> {
    for (c, config) in configurations.iter().enumerate() {
        if config.horizon() != horizon {
            return Err(Error::InvalidInput(format!(
                "configuration {c} spans {} periods, expected {horizon}",
                config.horizon()
            )));
        }
        if let Some(&z) = config.positions().iter().find(|&&z| z >= graph.num_zones()) {
            return Err(Error::InvalidInput(format!(
                "configuration {c} refers to zone index {z}, graph has {} zones",
                graph.num_zones()
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_accessors() {
        let c = Configuration::new(vec![4, 5, 5]);
        assert_eq!(c.horizon(), 3);
        assert_eq!(c.origin(), 4);
        assert_eq!(c.positions(), &[4, 5, 5]);
    }

    #[test]
    fn test_configuration_stationary() {
        assert!(Configuration::new(vec![1, 1, 1]).is_stationary());
        assert!(Configuration::new(vec![1]).is_stationary());
        assert!(!Configuration::new(vec![1, 2, 2]).is_stationary());
    }

    #[test]
    fn test_configuration_starts_at_base() {
        let bases = BaseSet::from_indices(4, &[2]);
        assert!(Configuration::new(vec![2, 3]).starts_at_base(&bases));
        assert!(!Configuration::new(vec![3, 2]).starts_at_base(&bases));
        assert!(!Configuration::new(vec![]).starts_at_base(&bases));
    }

    #[test]
    fn test_validate_configurations() {
        let graph = ZoneGraph::grid(2, 1);
        let ok = vec![Configuration::new(vec![0, 1])];
        assert!(validate_configurations(&graph, &ok, 2).is_ok());

        let wrong_horizon = vec![Configuration::new(vec![0, 1, 1])];
        assert!(matches!(
            validate_configurations(&graph, &wrong_horizon, 2),
            Err(Error::InvalidInput(_))
        ));

        let unknown_zone = vec![Configuration::new(vec![0, 7])];
        assert!(validate_configurations(&graph, &unknown_zone, 2).is_err());
    }
}
