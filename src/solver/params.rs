//! Solver parameter files.

use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

use tracing::debug;

use super::SolveLimits;
use crate::error::{Error, Result};

/// Key seeding [`SolveLimits::time_limit`], in seconds.
pub const TIME_LIMIT_KEY: &str = "TimeLimit";

/// Key seeding [`SolveLimits::mip_gap`].
pub const MIP_GAP_KEY: &str = "MIPGap";

/// A parameter value, coerced to the narrowest type that parses.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Integer literal.
    Int(i64),
    /// Floating-point literal.
    Float(f64),
    /// Anything else, with surrounding quotes removed.
    Text(String),
}

impl ParamValue {
    /// Numeric value, if the parameter is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            Self::Text(_) => None,
        }
    }
}

impl From<&str> for ParamValue {
    fn from(raw: &str) -> Self {
        let raw = raw.trim();
        if let Ok(v) = raw.parse::<i64>() {
            Self::Int(v)
        } else if let Ok(v) = raw.parse::<f64>() {
            Self::Float(v)
        } else {
            Self::Text(raw.trim_matches('"').to_string())
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
        }
    }
}

/// Ordered `key=value` solver parameters.
///
/// Lines without `=` and lines starting with `#` are ignored. Later
/// occurrences of a key replace earlier ones in place.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_deploy::solver::{ParamValue, SolverParams};
///
/// let params = SolverParams::parse("LICENSEID=12345\nTimeLimit=60\nMIPGap=0.05\n");
/// assert_eq!(params.get("LICENSEID"), Some(&ParamValue::Int(12345)));
///
/// let limits = params.solve_limits();
/// assert_eq!(limits.time_limit(), Some(Duration::from_secs(60)));
/// assert_eq!(limits.mip_gap(), 0.05);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolverParams {
    entries: Vec<(String, ParamValue)>,
}

impl SolverParams {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses parameter text.
    pub fn parse(text: &str) -> Self {
        let mut params = Self::new();
        for line in text.lines().map(str::trim) {
            if line.starts_with('#') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                if key.is_empty() {
                    continue;
                }
                params.set(key, ParamValue::from(value));
            }
        }
        params
    }

    /// Reads and parses a parameter file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| Error::from_io("solver parameter", path, e))?;
        let params = Self::parse(&text);
        debug!(path = %path.display(), entries = params.len(), "loaded solver parameters");
        Ok(params)
    }

    /// Value of `key`, if present.
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Sets `key`, keeping its position if already present.
    pub fn set(&mut self, key: impl Into<String>, value: ParamValue) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Entries in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no entries were read.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Default limits, overridden by the `TimeLimit` and `MIPGap` keys.
    pub fn solve_limits(&self) -> SolveLimits {
        let mut limits = SolveLimits::default();
        if let Some(seconds) = self.get(TIME_LIMIT_KEY).and_then(ParamValue::as_f64) {
            if seconds.is_finite() && seconds >= 0.0 {
                limits = limits.with_time_limit(Duration::from_secs_f64(seconds));
            }
        }
        if let Some(gap) = self.get(MIP_GAP_KEY).and_then(ParamValue::as_f64) {
            limits = limits.with_mip_gap(gap);
        }
        limits
    }
}
