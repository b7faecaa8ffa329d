//! Coverage derivation.
//!
//! A vehicle covers the zone it stands on and its direct neighbours.
//! [`CoverageMatrix`] records that relation for every configuration and
//! period, and is a pure function of the configurations and adjacency.
//! [`CoverageTimeline`] derives the same relation from a solved occupancy grid.

mod matrix;
mod timeline;

pub use matrix::{CoverageEntry, CoverageMatrix};
pub use timeline::{CoverageTimeline, TimelineRow};
