//! Error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::Zone;

/// Result type for u-deploy operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading inputs or assembling models.
///
/// Infeasible and timed-out solves are not errors; they are reported
/// through [`SolveStatus`](crate::solver::SolveStatus).
#[derive(Error, Debug)]
pub enum Error {
    /// A required input file does not exist.
    #[error("missing {artifact} file '{}'", .path.display())]
    MissingArtifact {
        /// Kind of artifact (graph, bases, configurations, ...).
        artifact: &'static str,
        /// Path that was looked up.
        path: PathBuf,
    },

    /// Reading or writing a file failed.
    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A file exists but its contents cannot be parsed.
    #[error("malformed {artifact} file '{}': {message}", .path.display())]
    Malformed {
        /// Kind of artifact.
        artifact: &'static str,
        /// File involved.
        path: PathBuf,
        /// What went wrong.
        message: String,
    },

    /// The loaded object is not a valid undirected zone graph.
    #[error("invalid zone graph: {0}")]
    InvalidGraph(String),

    /// A configuration table lacks an expected period column.
    #[error("configuration table is missing column '{column}'")]
    MissingColumn {
        /// Name of the missing column.
        column: String,
    },

    /// A zone is not a node of the zone graph.
    #[error("zone {0} is not part of the zone graph")]
    UnknownZone(Zone),

    /// Enumeration would exceed the configured size cap.
    #[error("enumeration from base {base} yields {count} configurations, limit is {limit}")]
    EnumerationLimit {
        /// Base the enumeration starts from.
        base: Zone,
        /// Number of configurations the enumeration would produce.
        count: u128,
        /// Configured cap.
        limit: usize,
    },

    /// Inputs handed to the core have inconsistent shapes.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The solver backend failed for a reason other than infeasibility,
    /// unboundedness or the time limit.
    #[error("solver failure: {0}")]
    Solver(String),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV (de)serialization error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Wraps an I/O error, reporting a missing file as [`Error::MissingArtifact`].
    pub(crate) fn from_io(
        artifact: &'static str,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Error::MissingArtifact { artifact, path }
        } else {
            Error::Io { path, source }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_io_not_found() {
        let err = Error::from_io(
            "bases",
            "data/50/x.bases",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, Error::MissingArtifact { artifact: "bases", .. }));
        assert_eq!(err.to_string(), "missing bases file 'data/50/x.bases'");
    }

    #[test]
    fn test_from_io_other() {
        let err = Error::from_io(
            "graph",
            "g.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_display_unknown_zone() {
        let err = Error::UnknownZone(Zone::new(1.0, 2.5));
        assert_eq!(err.to_string(), "zone (1, 2.5) is not part of the zone graph");
    }
}
