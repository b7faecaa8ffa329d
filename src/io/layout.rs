//! Directory layout of inputs and results.

use std::fmt;
use std::path::{Path, PathBuf};

/// Default directory of raw instances (graphs and bases).
pub const DEFAULT_DATA_DIR: &str = "./data/raw";
/// Default directory of generated configuration sets.
pub const DEFAULT_CONFIG_DIR: &str = "./data/processed";
/// Default directory of experiment results.
pub const DEFAULT_RESULTS_DIR: &str = "./results";

/// Which configuration set of an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigurationSetKind {
    /// Configurations of the `k`-th base.
    Base(usize),
    /// Configurations of every base, pooled.
    AllBases,
}

impl fmt::Display for ConfigurationSetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base(k) => write!(f, "base{k}"),
            Self::AllBases => f.write_str("all_bases"),
        }
    }
}

/// Resolves artifact paths below the data, configuration and result roots.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use u_deploy::io::{ConfigurationSetKind, DataLayout};
///
/// let layout = DataLayout::default();
/// assert_eq!(
///     layout.graph_path("inst", 50),
///     Path::new("./data/raw/50/inst.json")
/// );
/// assert_eq!(
///     layout.configurations_path("inst", 50, ConfigurationSetKind::Base(0), 6),
///     Path::new("./data/processed/50/inst-base0_t0_5/configs.csv")
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLayout {
    data_dir: PathBuf,
    config_dir: PathBuf,
    results_dir: PathBuf,
}

impl DataLayout {
    /// Creates a layout with explicit roots.
    pub fn new(
        data_dir: impl Into<PathBuf>,
        config_dir: impl Into<PathBuf>,
        results_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            data_dir: data_dir.into(),
            config_dir: config_dir.into(),
            results_dir: results_dir.into(),
        }
    }

    /// Sets the raw data root.
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Sets the configuration root.
    pub fn with_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_dir = dir.into();
        self
    }

    /// Sets the results root.
    pub fn with_results_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.results_dir = dir.into();
        self
    }

    /// Raw data root.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Configuration root.
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Results root.
    pub fn results_dir(&self) -> &Path {
        &self.results_dir
    }

    /// `<data_dir>/<size>/<instance>.json`
    pub fn graph_path(&self, instance: &str, size: usize) -> PathBuf {
        self.data_dir.join(size.to_string()).join(format!("{instance}.json"))
    }

    /// `<data_dir>/<size>/<instance>.bases`
    pub fn bases_path(&self, instance: &str, size: usize) -> PathBuf {
        self.data_dir.join(size.to_string()).join(format!("{instance}.bases"))
    }

    /// Directory holding one configuration set:
    /// `<config_dir>/<size>/<instance>-<kind>_t0_<periods-1>`.
    pub fn configurations_dir(
        &self,
        instance: &str,
        size: usize,
        kind: ConfigurationSetKind,
        periods: usize,
    ) -> PathBuf {
        let last = periods.saturating_sub(1);
        self.config_dir
            .join(size.to_string())
            .join(format!("{instance}-{kind}_t0_{last}"))
    }

    /// `configs.csv` inside [`configurations_dir`](Self::configurations_dir).
    pub fn configurations_path(
        &self,
        instance: &str,
        size: usize,
        kind: ConfigurationSetKind,
        periods: usize,
    ) -> PathBuf {
        self.configurations_dir(instance, size, kind, periods)
            .join("configs.csv")
    }

    /// `<results_dir>/model_outputs/<experiment>`
    pub fn model_output_dir(&self, experiment: &str) -> PathBuf {
        self.results_dir.join("model_outputs").join(experiment)
    }

    /// `<results_dir>/tables/<experiment>`
    pub fn tables_dir(&self, experiment: &str) -> PathBuf {
        self.results_dir.join("tables").join(experiment)
    }
}

impl Default for DataLayout {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR, DEFAULT_CONFIG_DIR, DEFAULT_RESULTS_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_pooled_set() {
        let layout = DataLayout::default().with_config_dir("/tmp/cfg");
        assert_eq!(
            layout.configurations_path("a", 100, ConfigurationSetKind::AllBases, 4),
            Path::new("/tmp/cfg/100/a-all_bases_t0_3/configs.csv")
        );
    }

    #[test]
    fn test_layout_results() {
        let layout = DataLayout::default().with_results_dir("out");
        assert_eq!(
            layout.model_output_dir("scaling"),
            Path::new("out/model_outputs/scaling")
        );
        assert_eq!(layout.tables_dir("comparison"), Path::new("out/tables/comparison"));
        assert_eq!(layout.bases_path("i", 50), Path::new("./data/raw/50/i.bases"));
    }
}
