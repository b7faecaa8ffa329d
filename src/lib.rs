//! # u-deploy
//!
//! Fair, time-varying emergency vehicle deployment over a zone graph:
//! configuration enumeration, coverage derivation, and mixed-integer
//! formulations that minimise the spread of cumulative zone coverage.
//!
//! ## Modules
//!
//! - [`models`] — Domain model types (Zone, ZoneGraph, BaseSet, Configuration)
//! - [`enumeration`] — Base-anchored configuration enumeration
//! - [`coverage`] — Zone × period × configuration coverage relation
//! - [`formulation`] — Base, frequency-bounded and consistency MIP models
//! - [`solver`] — MIP backends, solve limits and solver sessions
//! - [`io`] — Graph, bases, configuration and result file formats
//! - [`experiment`] — Scaling, comparison and consistency experiment drivers
//!
//! ## Pipeline
//!
//! ```
//! use u_deploy::coverage::CoverageMatrix;
//! use u_deploy::enumeration::ConfigurationEnumerator;
//! use u_deploy::formulation::{BaseFormulation, Formulation, FormulationInput};
//! use u_deploy::models::{BaseSet, ZoneGraph};
//! use u_deploy::solver::{MicroLpSolver, MipSolver, SolveLimits, SolveStatus};
//!
//! // 0 - 1 - 2, base at 0
//! let graph = ZoneGraph::grid(3, 1);
//! let bases = BaseSet::from_indices(3, &[0]);
//! let configs = ConfigurationEnumerator::new(&graph, &bases).enumerate(0, 2).unwrap();
//! let coverage = CoverageMatrix::build(&graph, &configs, 2).unwrap();
//! let input = FormulationInput::new(&graph, &configs, &coverage, 1)
//!     .unwrap()
//!     .with_bases(&bases)
//!     .unwrap();
//!
//! let model = BaseFormulation::new().build(&input).unwrap();
//! let outcome = MicroLpSolver.solve(model, &SolveLimits::default()).unwrap();
//! assert_eq!(outcome.status, SolveStatus::Optimal);
//! assert_eq!(outcome.objective.map(f64::round), Some(1.0));
//! ```

pub mod coverage;
pub mod enumeration;
pub mod error;
pub mod experiment;
pub mod formulation;
pub mod io;
pub mod models;
pub mod solver;

pub use error::{Error, Result};
