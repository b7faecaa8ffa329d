//! Configuration enumeration.
//!
//! - [`ConfigurationEnumerator`] — stack-driven depth-bounded expansion of
//!   every feasible trajectory rooted at a base
//! - [`MobilityRule`] — which zones a vehicle may leave

mod enumerator;

pub use enumerator::{ConfigurationEnumerator, MobilityRule};
