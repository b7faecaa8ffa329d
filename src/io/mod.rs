//! File formats and directory layout.
//!
//! - [`DataLayout`] — where graphs, bases, configuration sets and results live
//! - node-link JSON graphs ([`read_graph`], [`write_graph`])
//! - `.bases` files ([`read_bases`], [`write_bases`])
//! - configuration CSV tables ([`read_configurations`], [`write_configurations`])
//! - run summaries and sweep tables ([`write_json`], [`write_records`])

mod bases;
mod configs;
mod graph_file;
mod layout;
mod results;

use std::fs;
use std::path::Path;

pub use bases::{parse_bases, read_bases, write_bases};
pub use configs::{parse_configurations, read_configurations, write_configurations};
pub use graph_file::{parse_graph, read_graph, write_graph};
pub use layout::{
    ConfigurationSetKind, DataLayout, DEFAULT_CONFIG_DIR, DEFAULT_DATA_DIR, DEFAULT_RESULTS_DIR,
};
pub use results::{write_json, write_records, RunSummary};

use crate::error::{Error, Result};

pub(crate) fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|source| Error::Io {
                path: parent.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}
