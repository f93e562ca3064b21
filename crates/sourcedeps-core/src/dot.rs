//! Graphviz projection of a dependency graph

use crate::graph::DependencyGraph;
use anyhow::Context;
use petgraph::dot::{Config, Dot};
use std::path::{Path, PathBuf};

/// Render the graph in DOT syntax. Node labels are the keys, followed by the
/// fingerprint if any and a marker on non-provider nodes.
pub fn to_dot(graph: &DependencyGraph) -> String {
    format!("{}", Dot::with_config(graph.inner(), &[Config::EdgeNoLabel]))
}

/// Companion file name for a persisted graph.
pub fn dot_path(graph_path: &Path) -> PathBuf {
    let mut name = graph_path.as_os_str().to_owned();
    name.push(".dot");
    PathBuf::from(name)
}

/// Write the DOT rendering next to `graph_path`. Returns the written path.
pub fn emit_dot_file(graph: &DependencyGraph, graph_path: &Path) -> anyhow::Result<PathBuf> {
    let path = dot_path(graph_path);
    std::fs::write(&path, to_dot(graph)).with_context(|| format!("writing {}", path.display()))?;
    tracing::debug!("Dot file written: {}", path.display());
    Ok(path)
}
