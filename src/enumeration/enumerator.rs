//! Depth-bounded configuration enumeration with an explicit stack.

use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{BaseSet, Configuration, ZoneGraph};

/// Which zones a vehicle may leave during the horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MobilityRule {
    /// A vehicle standing on a base may stay or move to an adjacent zone;
    /// once it stands on a non-base zone it stays there for the rest of the
    /// horizon.
    #[default]
    BaseAnchored,
    /// A vehicle may stay or move to an adjacent zone in every period.
    FreeRoaming,
}

/// Enumerates every feasible configuration of a given horizon.
///
/// Paths are expanded depth first: from the current zone the successors are
/// "stay" followed by each neighbour in adjacency order (only when the rule
/// allows moving from that zone). The output order is therefore fully
/// determined by the graph's insertion order.
///
/// The number of configurations grows exponentially with the horizon and
/// the degree of movable zones; use [`count`](Self::count) or
/// [`with_limit`](Self::with_limit) to guard before enumerating.
///
/// # Examples
///
/// ```
/// use u_deploy::models::{BaseSet, ZoneGraph};
/// use u_deploy::enumeration::ConfigurationEnumerator;
///
/// // 0 - 1 - 2 with a base at zone 1
/// let graph = ZoneGraph::grid(3, 1);
/// let bases = BaseSet::from_indices(3, &[1]);
/// let enumerator = ConfigurationEnumerator::new(&graph, &bases);
///
/// let configs = enumerator.enumerate(1, 2).unwrap();
/// let paths: Vec<_> = configs.iter().map(|c| c.positions().to_vec()).collect();
/// assert_eq!(paths, vec![vec![1, 1], vec![1, 0], vec![1, 2]]);
/// assert_eq!(enumerator.count(1, 2), 3);
/// ```
pub struct ConfigurationEnumerator<'a> {
    graph: &'a ZoneGraph,
    bases: &'a BaseSet,
    rule: MobilityRule,
    limit: Option<usize>,
}

impl<'a> ConfigurationEnumerator<'a> {
    /// Creates an enumerator with the base-anchored rule and no size cap.
    pub fn new(graph: &'a ZoneGraph, bases: &'a BaseSet) -> Self {
        Self {
            graph,
            bases,
            rule: MobilityRule::default(),
            limit: None,
        }
    }

    /// Sets the mobility rule.
    pub fn with_rule(mut self, rule: MobilityRule) -> Self {
        self.rule = rule;
        self
    }

    /// Rejects enumerations that would produce more than `limit`
    /// configurations per base.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// The mobility rule in use.
    pub fn rule(&self) -> MobilityRule {
        self.rule
    }

    fn can_move(&self, zone: usize) -> bool {
        match self.rule {
            MobilityRule::BaseAnchored => self.bases.contains(zone),
            MobilityRule::FreeRoaming => true,
        }
    }

    fn successors(&self, zone: usize) -> impl Iterator<Item = usize> + '_ {
        let moves: &[usize] = if self.can_move(zone) {
            self.graph.neighbors(zone)
        } else {
            &[]
        };
        std::iter::once(zone).chain(moves.iter().copied())
    }

    /// Exact number of configurations [`enumerate`](Self::enumerate) would
    /// return, computed without materialising paths. Saturates at `u128::MAX`.
    ///
    /// # Panics
    ///
    /// Panics if `base` is not a zone index of the graph.
    pub fn count(&self, base: usize, horizon: usize) -> u128 {
        if horizon == 0 {
            return 0;
        }
        // ways[z] = number of distinct completions of the remaining periods from z
        let mut ways = vec![1u128; self.graph.num_zones()];
        for _ in 1..horizon {
            ways = (0..self.graph.num_zones())
                .map(|z| {
                    self.successors(z)
                        .fold(0u128, |acc, next| acc.saturating_add(ways[next]))
                })
                .collect();
        }
        ways[base]
    }

    /// Enumerates all configurations of `horizon` periods rooted at the base
    /// with zone index `base`.
    ///
    /// A zero horizon yields no configurations.
    pub fn enumerate(&self, base: usize, horizon: usize) -> Result<Vec<Configuration>> {
        if base >= self.graph.num_zones() || !self.bases.contains(base) {
            return Err(Error::InvalidInput(format!(
                "zone index {base} is not a base station"
            )));
        }
        if horizon == 0 {
            return Ok(Vec::new());
        }

        let count = self.count(base, horizon);
        if let Some(limit) = self.limit {
            if count > limit as u128 {
                return Err(Error::EnumerationLimit {
                    base: self.graph.zone(base),
                    count,
                    limit,
                });
            }
        }

        let mut configs = Vec::with_capacity(count.min(1 << 16) as usize);
        let mut stack: Vec<Vec<usize>> = vec![vec![base]];
        let mut successors = Vec::new();

        while let Some(path) = stack.pop() {
            if path.len() == horizon {
                configs.push(Configuration::new(path));
                continue;
            }
            let current = path[path.len() - 1];
            successors.clear();
            successors.extend(self.successors(current));
            // reversed so the "stay" branch is popped first
            for &next in successors.iter().rev() {
                let mut extended = Vec::with_capacity(horizon);
                extended.extend_from_slice(&path);
                extended.push(next);
                stack.push(extended);
            }
        }

        debug!(
            base = %self.graph.zone(base),
            horizon,
            configurations = configs.len(),
            "enumerated configurations"
        );
        Ok(configs)
    }

    /// Enumerates configurations for every base in base order and pools them
    /// into one list.
    pub fn enumerate_pooled(&self, horizon: usize) -> Result<Vec<Configuration>> {
        let mut pooled = Vec::new();
        for &base in self.bases.indices() {
            pooled.extend(self.enumerate(base, horizon)?);
        }
        Ok(pooled)
    }
}
