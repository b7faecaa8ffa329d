//! Undirected zone graph with integer-indexed adjacency.

use std::collections::HashMap;

use super::Zone;
use crate::error::{Error, Result};

/// An undirected graph over zones.
///
/// Zones are assigned dense indices in insertion order and adjacency lists
/// preserve edge insertion order, so every traversal over the graph is
/// deterministic. Adjacency is kept symmetric: adding the edge `a-b` makes
/// `b` a neighbour of `a` and `a` a neighbour of `b`. Self loops are
/// dropped because a zone always covers itself.
///
/// # Examples
///
/// ```
/// use u_deploy::models::{Zone, ZoneGraph};
///
/// let mut graph = ZoneGraph::new();
/// let a = graph.add_zone(Zone::new(0.0, 0.0));
/// let b = graph.add_zone(Zone::new(1.0, 0.0));
/// graph.add_edge(a, b);
///
/// assert!(graph.is_adjacent(a, b));
/// assert!(graph.is_adjacent(b, a));
/// assert_eq!(graph.footprint(a).collect::<Vec<_>>(), vec![a, b]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZoneGraph {
    zones: Vec<Zone>,
    index: HashMap<Zone, usize>,
    neighbors: Vec<Vec<usize>>,
}

impl ZoneGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from a zone list and an edge list of zone pairs.
    ///
    /// Zones referenced only by edges are added as well.
    pub fn from_edges(zones: &[Zone], edges: &[(Zone, Zone)]) -> Self {
        let mut graph = Self::new();
        for &zone in zones {
            graph.add_zone(zone);
        }
        for &(a, b) in edges {
            let a = graph.add_zone(a);
            let b = graph.add_zone(b);
            graph.add_edge(a, b);
        }
        graph
    }

    /// Builds a `width × height` grid with 4-neighbour adjacency.
    ///
    /// Zone `(x, y)` has index `y * width + x`.
    pub fn grid(width: usize, height: usize) -> Self {
        let mut graph = Self::new();
        for y in 0..height {
            for x in 0..width {
                graph.add_zone(Zone::new(x as f64, y as f64));
            }
        }
        for y in 0..height {
            for x in 0..width {
                let idx = y * width + x;
                if x + 1 < width {
                    graph.add_edge(idx, idx + 1);
                }
                if y + 1 < height {
                    graph.add_edge(idx, idx + width);
                }
            }
        }
        graph
    }

    /// Adds a zone and returns its index. Adding an existing zone returns
    /// the index it already has.
    pub fn add_zone(&mut self, zone: Zone) -> usize {
        if let Some(&idx) = self.index.get(&zone) {
            return idx;
        }
        let idx = self.zones.len();
        self.zones.push(zone);
        self.index.insert(zone, idx);
        self.neighbors.push(Vec::new());
        idx
    }

    /// Connects two zones by index. Duplicate edges and self loops are ignored.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn add_edge(&mut self, a: usize, b: usize) {
        if a == b || self.neighbors[a].contains(&b) {
            return;
        }
        self.neighbors[a].push(b);
        self.neighbors[b].push(a);
    }

    /// Number of zones.
    pub fn num_zones(&self) -> usize {
        self.zones.len()
    }

    /// Number of undirected edges.
    pub fn num_edges(&self) -> usize {
        self.neighbors.iter().map(Vec::len).sum::<usize>() / 2
    }

    /// Returns `true` if the graph has no zones.
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// All zones, in index order.
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    /// The zone with the given index.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of bounds.
    pub fn zone(&self, idx: usize) -> Zone {
        self.zones[idx]
    }

    /// Index of a zone, if it belongs to the graph.
    pub fn index_of(&self, zone: &Zone) -> Option<usize> {
        self.index.get(zone).copied()
    }

    /// Index of a zone, failing with [`Error::UnknownZone`] if absent.
    pub fn require_index(&self, zone: &Zone) -> Result<usize> {
        self.index_of(zone).ok_or(Error::UnknownZone(*zone))
    }

    /// Direct neighbours of a zone, in edge insertion order.
    pub fn neighbors(&self, idx: usize) -> &[usize] {
        &self.neighbors[idx]
    }

    /// Number of direct neighbours of a zone.
    pub fn degree(&self, idx: usize) -> usize {
        self.neighbors[idx].len()
    }

    /// Returns `true` if `a` and `b` share an edge.
    pub fn is_adjacent(&self, a: usize, b: usize) -> bool {
        self.neighbors[a].contains(&b)
    }

    /// Zones covered by a vehicle standing at `idx`: the zone itself
    /// followed by its direct neighbours. No transitive closure.
    pub fn footprint(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
        std::iter::once(idx).chain(self.neighbors[idx].iter().copied())
    }

    /// Undirected edge list with `a < b`, in index order.
    pub fn edges(&self) -> Vec<(usize, usize)> {
        let mut edges = Vec::with_capacity(self.num_edges());
        for (a, neighbors) in self.neighbors.iter().enumerate() {
            for &b in neighbors {
                if a < b {
                    edges.push((a, b));
                }
            }
        }
        edges
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> ZoneGraph {
        let a = Zone::new(0.0, 0.0);
        let b = Zone::new(1.0, 0.0);
        let c = Zone::new(0.0, 1.0);
        ZoneGraph::from_edges(&[a, b, c], &[(a, b), (b, c), (a, c)])
    }

    #[test]
    fn test_graph_symmetric_adjacency() {
        let g = triangle();
        for i in 0..g.num_zones() {
            for &j in g.neighbors(i) {
                assert!(g.is_adjacent(j, i));
            }
        }
        assert_eq!(g.num_edges(), 3);
    }

    #[test]
    fn test_graph_add_zone_idempotent() {
        let mut g = ZoneGraph::new();
        let a = g.add_zone(Zone::new(2.0, 3.0));
        let again = g.add_zone(Zone::new(2.000_000_1, 3.0));
        assert_eq!(a, again);
        assert_eq!(g.num_zones(), 1);
    }

    #[test]
    fn test_graph_ignores_self_loops_and_duplicates() {
        let mut g = ZoneGraph::new();
        let a = g.add_zone(Zone::new(0.0, 0.0));
        let b = g.add_zone(Zone::new(1.0, 0.0));
        g.add_edge(a, a);
        g.add_edge(a, b);
        g.add_edge(b, a);
        assert_eq!(g.neighbors(a), &[b]);
        assert_eq!(g.neighbors(b), &[a]);
        assert_eq!(g.num_edges(), 1);
    }

    #[test]
    fn test_graph_footprint_one_hop() {
        let g = ZoneGraph::grid(3, 1);
        // 0 - 1 - 2
        assert_eq!(g.footprint(0).collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(g.footprint(1).collect::<Vec<_>>(), vec![1, 0, 2]);
    }

    #[test]
    fn test_graph_grid_shape() {
        let g = ZoneGraph::grid(3, 2);
        assert_eq!(g.num_zones(), 6);
        // 2 horizontal edges per row, 3 vertical
        assert_eq!(g.num_edges(), 7);
        assert_eq!(g.degree(4), 3);
        assert_eq!(g.zone(4), Zone::new(1.0, 1.0));
    }

    #[test]
    fn test_graph_require_index() {
        let g = triangle();
        assert_eq!(g.require_index(&Zone::new(1.0, 0.0)).expect("known"), 1);
        assert!(matches!(
            g.require_index(&Zone::new(9.0, 9.0)),
            Err(Error::UnknownZone(_))
        ));
    }

    #[test]
    fn test_graph_edges_listing() {
        let g = triangle();
        assert_eq!(g.edges(), vec![(0, 1), (0, 2), (1, 2)]);
    }
}
