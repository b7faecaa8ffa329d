//! Zone × period × configuration coverage relation.

use tracing::debug;

use crate::error::Result;
use crate::models::{validate_configurations, Configuration, ZoneGraph};

/// A covered `(zone, period, configuration)` triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CoverageEntry {
    /// Covered zone index.
    pub zone: usize,
    /// Period index.
    pub period: usize,
    /// Configuration index.
    pub config: usize,
}

/// Which zones each configuration covers in each period.
///
/// Entry `(zone, t, c)` is set iff configuration `c` stands on `zone` at
/// period `t` or on a direct neighbour of it. Absent entries are zero.
///
/// The matrix keeps the per-period positions plus each zone's sorted
/// footprint, so a lookup is a binary search, and a sparse per-zone column
/// of `(configuration, periods covered)` pairs for model assembly.
///
/// # Examples
///
/// ```
/// use u_deploy::models::{Configuration, ZoneGraph};
/// use u_deploy::coverage::CoverageMatrix;
///
/// // 0 - 1 - 2
/// let graph = ZoneGraph::grid(3, 1);
/// let configs = vec![Configuration::new(vec![0, 1])];
/// let matrix = CoverageMatrix::build(&graph, &configs, 2).unwrap();
///
/// assert!(matrix.is_covered(1, 0, 0));
/// assert!(!matrix.is_covered(2, 0, 0));
/// assert!(matrix.is_covered(2, 1, 0));
/// assert_eq!(matrix.periods_covered(1, 0), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageMatrix {
    num_zones: usize,
    horizon: usize,
    num_configs: usize,
    /// Position of configuration `c` at period `t`, at `c * horizon + t`.
    positions: Vec<usize>,
    /// Sorted footprint (zone plus neighbours) of each zone.
    footprints: Vec<Vec<usize>>,
    /// Per zone: `(configuration, number of periods covered)`, ascending by configuration.
    columns: Vec<Vec<(usize, u32)>>,
}

impl CoverageMatrix {
    /// Derives the coverage relation for `configurations` over `graph`.
    ///
    /// Fails with [`Error::InvalidInput`](crate::Error::InvalidInput) if a
    /// configuration does not span `horizon` periods or refers to a zone
    /// outside the graph.
    pub fn build(
        graph: &ZoneGraph,
        configurations: &[Configuration],
        horizon: usize,
    ) -> Result<Self> {
        validate_configurations(graph, configurations, horizon)?;

        let num_zones = graph.num_zones();
        let footprints: Vec<Vec<usize>> = (0..num_zones)
            .map(|z| {
                let mut fp: Vec<usize> = graph.footprint(z).collect();
                fp.sort_unstable();
                fp
            })
            .collect();

        let mut positions = Vec::with_capacity(configurations.len() * horizon);
        let mut columns: Vec<Vec<(usize, u32)>> = vec![Vec::new(); num_zones];
        let mut hits = vec![0u32; num_zones];
        let mut touched = Vec::new();

        for (c, config) in configurations.iter().enumerate() {
            for &zone in config.positions() {
                positions.push(zone);
                for &covered in &footprints[zone] {
                    if hits[covered] == 0 {
                        touched.push(covered);
                    }
                    hits[covered] += 1;
                }
            }
            for &zone in &touched {
                columns[zone].push((c, hits[zone]));
                hits[zone] = 0;
            }
            touched.clear();
        }

        let matrix = Self {
            num_zones,
            horizon,
            num_configs: configurations.len(),
            positions,
            footprints,
            columns,
        };
        debug!(
            zones = num_zones,
            horizon,
            configurations = matrix.num_configs,
            entries = matrix.num_entries(),
            "built coverage matrix"
        );
        Ok(matrix)
    }

    /// Number of zones.
    pub fn num_zones(&self) -> usize {
        self.num_zones
    }

    /// Number of periods.
    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// Number of configurations.
    pub fn num_configs(&self) -> usize {
        self.num_configs
    }

    /// Returns `true` if configuration `config` covers `zone` at `period`.
    ///
    /// # Panics
    ///
    /// Panics if any index is out of range.
    pub fn is_covered(&self, zone: usize, period: usize, config: usize) -> bool {
        let at = self.positions[config * self.horizon + period];
        self.footprints[at].binary_search(&zone).is_ok()
    }

    /// Number of periods in which `config` covers `zone`, i.e. the sum of the
    /// matrix over time. This is the coefficient of the configuration in the
    /// zone's cumulative coverage.
    pub fn periods_covered(&self, zone: usize, config: usize) -> u32 {
        let column = &self.columns[zone];
        column
            .binary_search_by_key(&config, |&(c, _)| c)
            .map(|i| column[i].1)
            .unwrap_or(0)
    }

    /// Sparse column of a zone: every configuration that covers it at least
    /// once, with the number of periods covered.
    pub fn column(&self, zone: usize) -> &[(usize, u32)] {
        &self.columns[zone]
    }

    /// Zones covered by `config` at `period`, in ascending order.
    pub fn covered_zones(&self, period: usize, config: usize) -> &[usize] {
        &self.footprints[self.positions[config * self.horizon + period]]
    }

    /// Iterates over all set entries, by configuration, then period, then zone.
    pub fn entries(&self) -> impl Iterator<Item = CoverageEntry> + '_ {
        (0..self.num_configs).flat_map(move |config| {
            (0..self.horizon).flat_map(move |period| {
                self.covered_zones(period, config)
                    .iter()
                    .map(move |&zone| CoverageEntry { zone, period, config })
            })
        })
    }

    /// Number of set entries.
    pub fn num_entries(&self) -> usize {
        self.positions.iter().map(|&z| self.footprints[z].len()).sum()
    }

    /// Cumulative coverage of every zone when configuration `c` is used
    /// `multiplicity[c]` times.
    ///
    /// # Panics
    ///
    /// Panics if `multiplicity` is shorter than the number of configurations.
    pub fn zone_coverage(&self, multiplicity: &[u32]) -> Vec<u32> {
        self.columns
            .iter()
            .map(|column| {
                column
                    .iter()
                    .map(|&(c, periods)| periods * multiplicity[c])
                    .sum()
            })
            .collect()
    }

    /// Spread between the best and worst covered zone for a multiplicity
    /// vector. Zero for a graph without zones.
    pub fn fairness_gap(&self, multiplicity: &[u32]) -> u32 {
        let coverage = self.zone_coverage(multiplicity);
        match (coverage.iter().max(), coverage.iter().min()) {
            (Some(max), Some(min)) => max - min,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn triangle_graph() -> ZoneGraph {
        let mut g = ZoneGraph::new();
        for x in 0..3 {
            g.add_zone(crate::models::Zone::new(x as f64, 0.0));
        }
        g.add_edge(0, 1);
        g.add_edge(0, 2);
        g.add_edge(1, 2);
        g
    }

    #[test]
    fn test_single_configuration_footprint() {
        let graph = ZoneGraph::grid(4, 1);
        // 0 - 1 - 2 - 3
        let configs = vec![Configuration::new(vec![1, 3])];
        let m = CoverageMatrix::build(&graph, &configs, 2).expect("valid");

        assert!(m.is_covered(0, 0, 0));
        assert!(m.is_covered(1, 0, 0));
        assert!(m.is_covered(2, 0, 0));
        assert!(!m.is_covered(3, 0, 0));

        assert!(!m.is_covered(1, 1, 0));
        assert!(m.is_covered(2, 1, 0));
        assert!(m.is_covered(3, 1, 0));
        assert_eq!(m.num_entries(), 5);
    }

    #[test]
    fn test_periods_covered_is_time_sum() {
        let graph = triangle_graph();
        let configs = vec![
            Configuration::new(vec![0, 0]),
            Configuration::new(vec![0, 1]),
        ];
        let m = CoverageMatrix::build(&graph, &configs, 2).expect("valid");
        for c in 0..2 {
            for zone in 0..3 {
                let expected = (0..2).filter(|&t| m.is_covered(zone, t, c)).count() as u32;
                assert_eq!(m.periods_covered(zone, c), expected);
            }
        }
        assert_eq!(m.column(2), &[(0, 2), (1, 2)]);
    }

    #[test]
    fn test_zone_coverage_and_gap() {
        // 0 - 1 - 2 - 3
        let graph = ZoneGraph::grid(4, 1);
        let configs = vec![
            Configuration::new(vec![0, 0]),
            Configuration::new(vec![3, 3]),
        ];
        let m = CoverageMatrix::build(&graph, &configs, 2).expect("valid");
        assert_eq!(m.zone_coverage(&[1, 0]), vec![2, 2, 0, 0]);
        assert_eq!(m.fairness_gap(&[1, 0]), 2);
        assert_eq!(m.zone_coverage(&[1, 1]), vec![2, 2, 2, 2]);
        assert_eq!(m.fairness_gap(&[1, 1]), 0);
        assert_eq!(m.fairness_gap(&[2, 1]), 2);
    }

    #[test]
    fn test_entries_order() {
        let graph = ZoneGraph::grid(2, 1);
        let configs = vec![Configuration::new(vec![0])];
        let m = CoverageMatrix::build(&graph, &configs, 1).expect("valid");
        let entries: Vec<_> = m.entries().collect();
        assert_eq!(
            entries,
            vec![
                CoverageEntry { zone: 0, period: 0, config: 0 },
                CoverageEntry { zone: 1, period: 0, config: 0 },
            ]
        );
    }

    #[test]
    fn test_rebuild_is_identical() {
        let graph = ZoneGraph::grid(3, 3);
        let configs = vec![
            Configuration::new(vec![4, 4, 1]),
            Configuration::new(vec![0, 3, 3]),
        ];
        let a = CoverageMatrix::build(&graph, &configs, 3).expect("valid");
        let b = CoverageMatrix::build(&graph, &configs, 3).expect("valid");
        assert_eq!(a, b);
    }

    #[test]
    fn test_build_rejects_mixed_horizons() {
        let graph = ZoneGraph::grid(2, 1);
        let configs = vec![Configuration::new(vec![0, 1]), Configuration::new(vec![0])];
        assert!(matches!(
            CoverageMatrix::build(&graph, &configs, 2),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_empty_configuration_list() {
        let graph = ZoneGraph::grid(2, 1);
        let m = CoverageMatrix::build(&graph, &[], 3).expect("valid");
        assert_eq!(m.num_configs(), 0);
        assert_eq!(m.num_entries(), 0);
        assert_eq!(m.zone_coverage(&[]), vec![0, 0]);
    }
}
