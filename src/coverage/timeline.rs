//! Coverage over time derived from an occupancy grid.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::models::ZoneGraph;

/// Per zone and period: whether at least one vehicle stands on the zone or
/// on a direct neighbour.
///
/// # Examples
///
/// ```
/// use u_deploy::models::ZoneGraph;
/// use u_deploy::coverage::CoverageTimeline;
///
/// // 0 - 1 - 2, one vehicle at 0 then at 1
/// let graph = ZoneGraph::grid(3, 1);
/// let occupancy = vec![vec![1, 0], vec![0, 1], vec![0, 0]];
/// let timeline = CoverageTimeline::from_occupancy(&graph, &occupancy).unwrap();
///
/// assert_eq!(timeline.totals(), vec![2, 2, 1]);
/// assert_eq!(timeline.fairness_gap(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverageTimeline {
    horizon: usize,
    /// `covered[zone][t]`.
    covered: Vec<Vec<bool>>,
}

/// One CSV row of a [`CoverageTimeline`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimelineRow {
    /// Zone x coordinate.
    pub x: f64,
    /// Zone y coordinate.
    pub y: f64,
    /// Period index.
    pub period: usize,
    /// 1 if covered, else 0.
    pub covered: u8,
}

impl CoverageTimeline {
    /// Derives the timeline from `occupancy[zone][t]`.
    ///
    /// Fails with [`Error::InvalidInput`] if the grid does not have one row
    /// per zone or its rows differ in length.
    pub fn from_occupancy(graph: &ZoneGraph, occupancy: &[Vec<u32>]) -> Result<Self> {
        if occupancy.len() != graph.num_zones() {
            return Err(Error::InvalidInput(format!(
                "occupancy has {} rows, graph has {} zones",
                occupancy.len(),
                graph.num_zones()
            )));
        }
        let horizon = occupancy.first().map_or(0, Vec::len);
        if occupancy.iter().any(|row| row.len() != horizon) {
            return Err(Error::InvalidInput("occupancy rows differ in length".into()));
        }

        let covered = (0..graph.num_zones())
            .map(|zone| {
                (0..horizon)
                    .map(|t| graph.footprint(zone).any(|z| occupancy[z][t] > 0))
                    .collect()
            })
            .collect();
        Ok(Self { horizon, covered })
    }

    /// Number of periods.
    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// Returns `true` if `zone` is covered at period `t`.
    pub fn is_covered(&self, zone: usize, t: usize) -> bool {
        self.covered[zone][t]
    }

    /// Per zone: number of covered periods.
    pub fn totals(&self) -> Vec<u32> {
        self.covered
            .iter()
            .map(|row| row.iter().filter(|&&c| c).count() as u32)
            .collect()
    }

    /// `max − min` of the per-zone totals; 0 for an empty graph.
    pub fn fairness_gap(&self) -> u32 {
        let totals = self.totals();
        match (totals.iter().max(), totals.iter().min()) {
            (Some(max), Some(min)) => max - min,
            _ => 0,
        }
    }

    /// Flattens the grid into rows keyed by zone coordinates, zone-major.
    pub fn rows(&self, graph: &ZoneGraph) -> Vec<TimelineRow> {
        self.covered
            .iter()
            .enumerate()
            .flat_map(|(zone, row)| {
                let z = graph.zone(zone);
                row.iter().enumerate().map(move |(period, &c)| TimelineRow {
                    x: z.x(),
                    y: z.y(),
                    period,
                    covered: u8::from(c),
                })
            })
            .collect()
    }
}
