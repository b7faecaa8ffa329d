//! Configuration tables (`id,t0_x,t0_y,...` CSV).

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use super::ensure_parent;
use crate::error::{Error, Result};
use crate::models::{Configuration, Zone, ZoneGraph};

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| Error::MissingColumn {
            column: name.to_string(),
        })
}

/// Reads configurations from CSV, resolving coordinates against `graph`.
///
/// Only columns `t0_x … t{periods-1}_y` are read; `id` and later periods
/// are ignored. At most `limit` rows are read when given.
///
/// # Errors
///
/// [`Error::MissingColumn`] if a period column is absent, [`Error::Malformed`]
/// for unparsable numbers, [`Error::UnknownZone`] for positions outside
/// the graph.
pub fn parse_configurations<R: Read>(
    reader: R,
    source: &Path,
    graph: &ZoneGraph,
    periods: usize,
    limit: Option<usize>,
) -> Result<Vec<Configuration>> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers = reader.headers()?.clone();
    let columns = (0..periods)
        .map(|t| {
            Ok((
                column_index(&headers, &format!("t{t}_x"))?,
                column_index(&headers, &format!("t{t}_y"))?,
            ))
        })
        .collect::<Result<Vec<_>>>()?;

    let malformed = |row: usize, message: String| Error::Malformed {
        artifact: "configurations",
        path: source.to_path_buf(),
        message: format!("row {row}: {message}"),
    };

    let mut configurations = Vec::new();
    for (row, record) in reader.records().enumerate() {
        if limit.is_some_and(|limit| configurations.len() >= limit) {
            break;
        }
        let record = record?;
        let mut positions = Vec::with_capacity(periods);
        for &(xi, yi) in &columns {
            let coordinate = |i: usize| -> Result<f64> {
                let raw = record.get(i).unwrap_or("").trim();
                raw.parse::<f64>()
                    .map_err(|_| malformed(row + 1, format!("'{raw}' is not a number")))
            };
            let (x, y) = (coordinate(xi)?, coordinate(yi)?);
            let zone = Zone::try_new(x, y)
                .ok_or_else(|| malformed(row + 1, format!("non-finite coordinate ({x}, {y})")))?;
            positions.push(graph.require_index(&zone)?);
        }
        configurations.push(Configuration::new(positions));
    }
    Ok(configurations)
}

/// Reads a configuration file.
pub fn read_configurations(
    path: impl AsRef<Path>,
    graph: &ZoneGraph,
    periods: usize,
    limit: Option<usize>,
) -> Result<Vec<Configuration>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::from_io("configurations", path, e))?;
    let configurations = parse_configurations(file, path, graph, periods, limit)?;
    debug!(
        path = %path.display(),
        configurations = configurations.len(),
        periods,
        "loaded configurations"
    );
    Ok(configurations)
}

/// Writes configurations of `periods` periods as `id,t0_x,t0_y,...`, ids
/// counting from 0. The period columns are written even for an empty set.
///
/// Fails with [`Error::InvalidInput`] if a configuration spans another
/// number of periods.
pub fn write_configurations(
    path: impl AsRef<Path>,
    graph: &ZoneGraph,
    periods: usize,
    configurations: &[Configuration],
) -> Result<()> {
    let path = path.as_ref();
    if let Some(config) = configurations.iter().find(|c| c.horizon() != periods) {
        return Err(Error::InvalidInput(format!(
            "configuration spans {} periods, table has {periods}",
            config.horizon()
        )));
    }
    ensure_parent(path)?;
    let mut writer = csv::Writer::from_path(path)?;

    let mut header = vec!["id".to_string()];
    for t in 0..periods {
        header.push(format!("t{t}_x"));
        header.push(format!("t{t}_y"));
    }
    writer.write_record(&header)?;

    for (id, config) in configurations.iter().enumerate() {
        let mut record = Vec::with_capacity(1 + 2 * periods);
        record.push(id.to_string());
        for &zone in config.positions() {
            let zone = graph.zone(zone);
            record.push(zone.x().to_string());
            record.push(zone.y().to_string());
        }
        writer.write_record(&record)?;
    }
    writer.flush().map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(
        path = %path.display(),
        configurations = configurations.len(),
        "wrote configurations"
    );
    Ok(())
}
