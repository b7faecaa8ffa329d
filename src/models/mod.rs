//! Domain model types for deployment planning.
//!
//! Provides the core data: zones identified by rounded coordinates, the
//! undirected zone graph that defines one-hop coverage, base station sets,
//! and configurations (per-vehicle trajectories over the horizon).

mod base;
mod configuration;
mod graph;
mod zone;

pub use base::BaseSet;
pub use configuration::{validate_configurations, Configuration};
pub use graph::ZoneGraph;
pub use zone::{Zone, ZONE_PRECISION};
