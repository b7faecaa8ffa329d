//! Zone identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of decimal places zone coordinates are rounded to on ingestion.
pub const ZONE_PRECISION: u32 = 6;

const SCALE: f64 = 1_000_000.0;

/// A discretized location in the service area, identified by its grid
/// coordinates.
///
/// Coordinates are rounded to [`ZONE_PRECISION`] decimals and stored as
/// fixed-point integers, so two zones compare equal exactly when their
/// rounded coordinates agree. This keeps zones usable as hash keys even
/// when the same node was written with slightly different float noise.
///
/// # Examples
///
/// ```
/// use u_deploy::models::Zone;
///
/// let a = Zone::new(1.0, 2.0);
/// let b = Zone::new(1.000_000_4, 1.999_999_7);
/// assert_eq!(a, b);
/// assert_eq!(a.x(), 1.0);
/// assert_eq!(a.to_string(), "(1, 2)");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct Zone {
    x: i64,
    y: i64,
}

impl Zone {
    /// Creates a zone from raw coordinates, rounding both to the zone precision.
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: (x * SCALE).round() as i64,
            y: (y * SCALE).round() as i64,
        }
    }

    /// Creates a zone, returning `None` if either coordinate is non-finite.
    pub fn try_new(x: f64, y: f64) -> Option<Self> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        Some(Self::new(x, y))
    }

    /// Rounded x-coordinate.
    pub fn x(&self) -> f64 {
        self.x as f64 / SCALE
    }

    /// Rounded y-coordinate.
    pub fn y(&self) -> f64 {
        self.y as f64 / SCALE
    }
}

impl From<(f64, f64)> for Zone {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<Zone> for (f64, f64) {
    fn from(zone: Zone) -> Self {
        (zone.x(), zone.y())
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x(), self.y())
    }
}
