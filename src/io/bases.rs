//! Base station files: one `(x, y)` literal per line.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use tracing::debug;

use super::ensure_parent;
use crate::error::{Error, Result};
use crate::models::Zone;

fn parse_literal(line: &str) -> Option<Zone> {
    let inner = line
        .trim()
        .strip_prefix(&['(', '['][..])?
        .strip_suffix(&[')', ']'][..])?;
    let mut parts = inner.split(',').map(str::trim);
    let x = parts.next()?.parse::<f64>().ok()?;
    let y = parts.next()?.parse::<f64>().ok()?;
    if parts.next().is_some_and(|rest| !rest.is_empty()) {
        return None;
    }
    Zone::try_new(x, y)
}

/// Parses base coordinates, skipping blank lines.
///
/// `source` names the file in error messages.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use u_deploy::io::parse_bases;
/// use u_deploy::models::Zone;
///
/// let bases = parse_bases("(1.0, 2.0)\n\n(3, 4.5)\n", Path::new("x.bases")).unwrap();
/// assert_eq!(bases, vec![Zone::new(1.0, 2.0), Zone::new(3.0, 4.5)]);
/// ```
pub fn parse_bases(text: &str, source: &Path) -> Result<Vec<Zone>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(n, line)| {
            parse_literal(line).ok_or_else(|| Error::Malformed {
                artifact: "bases",
                path: source.to_path_buf(),
                message: format!("line {}: expected '(x, y)', found '{}'", n + 1, line.trim()),
            })
        })
        .collect()
}

/// Reads a bases file.
pub fn read_bases(path: impl AsRef<Path>) -> Result<Vec<Zone>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| Error::from_io("bases", path, e))?;
    let bases = parse_bases(&text, path)?;
    debug!(path = %path.display(), bases = bases.len(), "loaded bases");
    Ok(bases)
}

/// Writes base coordinates, one `(x, y)` literal per line.
pub fn write_bases(bases: &[Zone], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut text = String::new();
    for zone in bases {
        let _ = writeln!(text, "{zone}");
    }
    ensure_parent(path)?;
    fs::write(path, text).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}
