//! Experiment drivers.
//!
//! - [`Instance`] — a zone graph with its bases, loaded through a
//!   [`DataLayout`](crate::io::DataLayout)
//! - [`Scenario`] — configurations, periods, fleet size and base restriction of one run
//! - [`run_formulation`] — coverage, assembly, solve and plan check
//! - [`scaling_analysis`] — base model over log-spaced configuration counts
//! - [`compare_formulations`] — base against frequency-bounded models
//! - [`consistency_analysis`] — consistency model with coverage over time

mod comparison;
mod consistency;
mod instance;
mod runner;
mod scaling;

pub use comparison::{compare_formulations, ComparisonRecord};
pub use consistency::{consistency_analysis, ConsistencyReport};
pub use instance::{Instance, Scenario};
pub use runner::{run_formulation, FormulationRun};
pub use scaling::{log_spaced_sizes, scaling_analysis, ScalingRecord};
