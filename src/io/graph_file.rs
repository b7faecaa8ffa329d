//! Node-link JSON zone graphs.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ensure_parent;
use crate::error::{Error, Result};
use crate::models::{Zone, ZoneGraph};

#[derive(Debug, Serialize, Deserialize)]
struct NodeLinkGraph {
    #[serde(default)]
    directed: bool,
    #[serde(default)]
    multigraph: bool,
    nodes: Vec<NodeLinkNode>,
    #[serde(default, alias = "edges")]
    links: Vec<NodeLinkEdge>,
}

#[derive(Debug, Serialize, Deserialize)]
struct NodeLinkNode {
    id: (f64, f64),
}

#[derive(Debug, Serialize, Deserialize)]
struct NodeLinkEdge {
    source: (f64, f64),
    target: (f64, f64),
}

fn coordinate(raw: (f64, f64)) -> Result<Zone> {
    Zone::try_new(raw.0, raw.1)
        .ok_or_else(|| Error::InvalidGraph(format!("non-finite node coordinate {raw:?}")))
}

/// Parses a node-link JSON document into a zone graph.
///
/// Node ids are `[x, y]` pairs rounded to the zone precision; `edges` is
/// accepted in place of `links`. Self loops are dropped.
///
/// # Errors
///
/// [`Error::Json`] on syntax errors, [`Error::InvalidGraph`] for directed
/// or multi graphs and links to undeclared nodes.
///
/// # Examples
///
/// ```
/// use u_deploy::io::parse_graph;
///
/// let graph = parse_graph(r#"{
///     "directed": false, "multigraph": false,
///     "nodes": [{"id": [0, 0]}, {"id": [1, 0]}],
///     "links": [{"source": [0, 0], "target": [1, 0]}]
/// }"#).unwrap();
/// assert_eq!(graph.num_zones(), 2);
/// assert_eq!(graph.num_edges(), 1);
/// ```
pub fn parse_graph(text: &str) -> Result<ZoneGraph> {
    let raw: NodeLinkGraph = serde_json::from_str(text)?;
    if raw.directed {
        return Err(Error::InvalidGraph("graph is directed".into()));
    }
    if raw.multigraph {
        return Err(Error::InvalidGraph("graph is a multigraph".into()));
    }

    let mut graph = ZoneGraph::new();
    for node in &raw.nodes {
        graph.add_zone(coordinate(node.id)?);
    }
    for link in &raw.links {
        let (source, target) = (coordinate(link.source)?, coordinate(link.target)?);
        let resolve = |zone: Zone| {
            graph
                .index_of(&zone)
                .ok_or_else(|| Error::InvalidGraph(format!("link refers to unknown node {zone}")))
        };
        let (a, b) = (resolve(source)?, resolve(target)?);
        graph.add_edge(a, b);
    }
    Ok(graph)
}

/// Reads a node-link JSON graph file.
///
/// A missing file is [`Error::MissingArtifact`]; unparsable JSON is
/// [`Error::Malformed`].
pub fn read_graph(path: impl AsRef<Path>) -> Result<ZoneGraph> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| Error::from_io("graph", path, e))?;
    let graph = parse_graph(&text).map_err(|e| match e {
        Error::Json(source) => Error::Malformed {
            artifact: "graph",
            path: path.to_path_buf(),
            message: source.to_string(),
        },
        other => other,
    })?;
    debug!(
        path = %path.display(),
        zones = graph.num_zones(),
        edges = graph.num_edges(),
        "loaded zone graph"
    );
    Ok(graph)
}

/// Writes `graph` as an undirected node-link JSON document.
pub fn write_graph(graph: &ZoneGraph, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let pair = |zone: Zone| (zone.x(), zone.y());
    let raw = NodeLinkGraph {
        directed: false,
        multigraph: false,
        nodes: graph
            .zones()
            .iter()
            .map(|&z| NodeLinkNode { id: pair(z) })
            .collect(),
        links: graph
            .edges()
            .into_iter()
            .map(|(a, b)| NodeLinkEdge {
                source: pair(graph.zone(a)),
                target: pair(graph.zone(b)),
            })
            .collect(),
    };
    ensure_parent(path)?;
    let text = serde_json::to_string_pretty(&raw)?;
    fs::write(path, text).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_graph_edges_alias_and_rounding() {
        let graph = parse_graph(
            r#"{"nodes": [{"id": [0.10000000001, 0]}, {"id": [1, 0]}, {"id": [2, 0]}],
                "edges": [{"source": [0.1, 0], "target": [1, 0]},
                          {"source": [1, 0], "target": [1, 0]}]}"#,
        )
        .expect("valid graph");
        assert_eq!(graph.num_zones(), 3);
        assert_eq!(graph.num_edges(), 1);
        assert_eq!(graph.index_of(&Zone::new(0.1, 0.0)), Some(0));
        assert_eq!(graph.degree(2), 0);
    }

    #[test]
    fn test_parse_graph_rejects_directed() {
        let err = parse_graph(r#"{"directed": true, "nodes": [], "links": []}"#)
            .expect_err("directed graph");
        assert!(matches!(err, Error::InvalidGraph(_)));
    }

    #[test]
    fn test_parse_graph_rejects_unknown_link() {
        let err = parse_graph(
            r#"{"nodes": [{"id": [0, 0]}], "links": [{"source": [0, 0], "target": [5, 5]}]}"#,
        )
        .expect_err("dangling link");
        assert!(matches!(err, Error::InvalidGraph(_)));
    }

    #[test]
    fn test_read_graph_errors() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("none.json");
        assert!(matches!(
            read_graph(&missing),
            Err(Error::MissingArtifact { artifact: "graph", .. })
        ));

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{ not json").expect("write");
        assert!(matches!(
            read_graph(&broken),
            Err(Error::Malformed { artifact: "graph", .. })
        ));
    }

    #[test]
    fn test_write_then_read_graph() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("50").join("grid.json");
        let graph = ZoneGraph::grid(3, 2);
        write_graph(&graph, &path).expect("writes");
        let loaded = read_graph(&path).expect("reads");
        assert_eq!(loaded.zones(), graph.zones());
        let mut expected = graph.edges();
        let mut actual = loaded.edges();
        expected.sort_unstable();
        actual.sort_unstable();
        assert_eq!(actual, expected);
    }
}
