//! Problem instances and run scenarios.

use tracing::info;

use crate::enumeration::{ConfigurationEnumerator, MobilityRule};
use crate::error::{Error, Result};
use crate::io::{read_bases, read_configurations, read_graph, ConfigurationSetKind, DataLayout};
use crate::models::{BaseSet, Configuration, Zone, ZoneGraph};

/// A named zone graph with its base stations.
#[derive(Debug, Clone)]
pub struct Instance {
    name: String,
    size: usize,
    graph: ZoneGraph,
    base_zones: Vec<Zone>,
    bases: BaseSet,
}

impl Instance {
    /// Assembles an instance from a graph and its base coordinates.
    ///
    /// Fails with [`Error::UnknownZone`] if a base is not a zone of `graph`.
    pub fn new(
        name: impl Into<String>,
        size: usize,
        graph: ZoneGraph,
        base_zones: Vec<Zone>,
    ) -> Result<Self> {
        let bases = BaseSet::new(&graph, &base_zones)?;
        Ok(Self {
            name: name.into(),
            size,
            graph,
            base_zones,
            bases,
        })
    }

    /// Loads `<instance>.json` and `<instance>.bases` from `layout`.
    pub fn load(layout: &DataLayout, name: &str, size: usize) -> Result<Self> {
        let graph = read_graph(layout.graph_path(name, size))?;
        let base_zones = read_bases(layout.bases_path(name, size))?;
        let instance = Self::new(name, size, graph, base_zones)?;
        info!(
            instance = name,
            size,
            zones = instance.graph.num_zones(),
            edges = instance.graph.num_edges(),
            bases = instance.bases.len(),
            "loaded instance"
        );
        Ok(instance)
    }

    /// Instance name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Nominal size (the data subdirectory).
    pub fn size(&self) -> usize {
        self.size
    }

    /// Zone graph.
    pub fn graph(&self) -> &ZoneGraph {
        &self.graph
    }

    /// Base coordinates in file order.
    pub fn base_zones(&self) -> &[Zone] {
        &self.base_zones
    }

    /// All bases.
    pub fn bases(&self) -> &BaseSet {
        &self.bases
    }

    /// The bases a configuration set is anchored at.
    ///
    /// Fails with [`Error::InvalidInput`] if base `k` does not exist.
    pub fn bases_for(&self, kind: ConfigurationSetKind) -> Result<BaseSet> {
        match kind {
            ConfigurationSetKind::AllBases => Ok(self.bases.clone()),
            ConfigurationSetKind::Base(k) => self.bases.single(k).ok_or_else(|| {
                Error::InvalidInput(format!(
                    "instance {} has {} bases, base {k} requested",
                    self.name,
                    self.bases.len()
                ))
            }),
        }
    }

    /// Enumerates the configurations of `kind` over `periods` periods.
    ///
    /// `kind` only selects the anchors: every base of the instance lets a
    /// vehicle move on, so the pooled set is the concatenation of the
    /// per-base sets in base order.
    pub fn generate_configurations(
        &self,
        kind: ConfigurationSetKind,
        periods: usize,
        rule: MobilityRule,
        limit: Option<usize>,
    ) -> Result<Vec<Configuration>> {
        let anchors = self.bases_for(kind)?;
        let mut enumerator = ConfigurationEnumerator::new(&self.graph, &self.bases).with_rule(rule);
        if let Some(limit) = limit {
            enumerator = enumerator.with_limit(limit);
        }
        let mut configurations = Vec::new();
        for &anchor in anchors.indices() {
            configurations.extend(enumerator.enumerate(anchor, periods)?);
        }
        info!(
            instance = %self.name,
            set = %kind,
            periods,
            configurations = configurations.len(),
            "generated configurations"
        );
        Ok(configurations)
    }

    /// Reads a stored configuration set, keeping at most `limit` rows.
    pub fn load_configurations(
        &self,
        layout: &DataLayout,
        kind: ConfigurationSetKind,
        periods: usize,
        limit: Option<usize>,
    ) -> Result<Vec<Configuration>> {
        let path = layout.configurations_path(&self.name, self.size, kind, periods);
        read_configurations(path, &self.graph, periods, limit)
    }
}

/// One experiment's fixed inputs: configurations over a graph, the fleet
/// size and the optional base restriction.
#[derive(Debug, Clone, Copy)]
pub struct Scenario<'a> {
    /// Zone graph.
    pub graph: &'a ZoneGraph,
    /// Candidate configurations.
    pub configurations: &'a [Configuration],
    /// Number of periods.
    pub periods: usize,
    /// Fleet size.
    pub num_vehicles: u32,
    /// Valid base anchors, if restricted.
    pub bases: Option<&'a BaseSet>,
}

impl<'a> Scenario<'a> {
    /// The same scenario restricted to the first `n` configurations.
    pub fn truncated(&self, n: usize) -> Self {
        Self {
            configurations: &self.configurations[..n.min(self.configurations.len())],
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{write_bases, write_graph};

    #[test]
    fn test_instance_load_and_generate() {
        let dir = tempfile::tempdir().expect("tempdir");
        let layout = DataLayout::default().with_data_dir(dir.path());
        let graph = ZoneGraph::grid(3, 1);
        write_graph(&graph, layout.graph_path("line", 3)).expect("writes graph");
        write_bases(
            &[Zone::new(0.0, 0.0), Zone::new(2.0, 0.0)],
            layout.bases_path("line", 3),
        )
        .expect("writes bases");

        let instance = Instance::load(&layout, "line", 3).expect("loads");
        assert_eq!(instance.bases().indices(), &[0, 2]);

        let generate = |kind| {
            instance
                .generate_configurations(kind, 2, MobilityRule::default(), None)
                .expect("enumerates")
        };
        assert_eq!(generate(ConfigurationSetKind::Base(0)).len(), 2);
        assert_eq!(generate(ConfigurationSetKind::AllBases).len(), 4);
        assert!(instance.bases_for(ConfigurationSetKind::Base(5)).is_err());
    }

    #[test]
    fn test_pooled_set_concatenates_single_base_sets() {
        // 0 - 1 - 2 with bases at 0 and 1
        let graph = ZoneGraph::grid(3, 1);
        let instance = Instance::new(
            "line",
            3,
            graph,
            vec![Zone::new(0.0, 0.0), Zone::new(1.0, 0.0)],
        )
        .expect("bases in graph");
        let generate = |kind| {
            instance
                .generate_configurations(kind, 3, MobilityRule::BaseAnchored, None)
                .expect("enumerates")
        };

        let first = generate(ConfigurationSetKind::Base(0));
        let paths: Vec<_> = first.iter().map(|c| c.positions().to_vec()).collect();
        assert_eq!(
            paths,
            vec![
                vec![0, 0, 0],
                vec![0, 0, 1],
                vec![0, 1, 1],
                vec![0, 1, 0],
                vec![0, 1, 2],
            ]
        );

        let mut concatenated = first;
        concatenated.extend(generate(ConfigurationSetKind::Base(1)));
        assert_eq!(generate(ConfigurationSetKind::AllBases), concatenated);
    }

    #[test]
    fn test_instance_unknown_base() {
        let graph = ZoneGraph::grid(2, 1);
        let err = Instance::new("x", 2, graph, vec![Zone::new(9.0, 9.0)]).expect_err("unknown");
        assert!(matches!(err, Error::UnknownZone(_)));
    }

    #[test]
    fn test_scenario_truncated() {
        let graph = ZoneGraph::grid(2, 1);
        let configs = vec![Configuration::new(vec![0]), Configuration::new(vec![1])];
        let scenario = Scenario {
            graph: &graph,
            configurations: &configs,
            periods: 1,
            num_vehicles: 1,
            bases: None,
        };
        assert_eq!(scenario.truncated(1).configurations.len(), 1);
        assert_eq!(scenario.truncated(10).configurations.len(), 2);
    }
}
