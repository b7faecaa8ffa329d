//! Base station sets.

use super::{Zone, ZoneGraph};
use crate::error::Result;

/// An ordered set of base stations, stored as zone indices of one graph.
///
/// The order is the order of the bases file and defines the base index.
/// Bases can be pooled (the whole set) or taken individually through
/// [`BaseSet::single`].
///
/// # Examples
///
/// ```
/// use u_deploy::models::{BaseSet, Zone, ZoneGraph};
///
/// let graph = ZoneGraph::grid(3, 3);
/// let bases = BaseSet::new(&graph, &[Zone::new(0.0, 0.0), Zone::new(2.0, 2.0)]).unwrap();
/// assert_eq!(bases.len(), 2);
/// assert!(bases.contains(8));
/// assert!(!bases.contains(4));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseSet {
    bases: Vec<usize>,
    member: Vec<bool>,
}

impl BaseSet {
    /// Resolves base zones against a graph.
    ///
    /// Fails with [`Error::UnknownZone`](crate::Error::UnknownZone) if a base
    /// is not a zone of the graph. Repeated bases keep their first position.
    pub fn new(graph: &ZoneGraph, zones: &[Zone]) -> Result<Self> {
        let indices = zones
            .iter()
            .map(|zone| graph.require_index(zone))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_indices(graph.num_zones(), &indices))
    }

    /// Builds a base set from zone indices of a graph with `num_zones` zones.
    ///
    /// # Panics
    ///
    /// Panics if an index is not below `num_zones`.
    pub fn from_indices(num_zones: usize, indices: &[usize]) -> Self {
        let mut member = vec![false; num_zones];
        let mut bases = Vec::with_capacity(indices.len());
        for &idx in indices {
            if !member[idx] {
                member[idx] = true;
                bases.push(idx);
            }
        }
        Self { bases, member }
    }

    /// Number of bases.
    pub fn len(&self) -> usize {
        self.bases.len()
    }

    /// Returns `true` if there are no bases.
    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    /// Returns `true` if the zone with this index is a base.
    pub fn contains(&self, zone: usize) -> bool {
        self.member.get(zone).copied().unwrap_or(false)
    }

    /// Number of zones of the graph the set was resolved against.
    pub fn num_zones(&self) -> usize {
        self.member.len()
    }

    /// Zone indices of the bases, in base order.
    pub fn indices(&self) -> &[usize] {
        &self.bases
    }

    /// Zone index of the `k`-th base.
    pub fn get(&self, k: usize) -> Option<usize> {
        self.bases.get(k).copied()
    }

    /// A set holding only the `k`-th base, for per-base runs.
    pub fn single(&self, k: usize) -> Option<Self> {
        let idx = self.get(k)?;
        Some(Self::from_indices(self.member.len(), &[idx]))
    }
}
