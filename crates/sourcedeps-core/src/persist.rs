//! Persisted graph format: YAML, one entry per node in sequence order

use crate::error::{GraphError, Result};
use crate::graph::DependencyGraph;
use crate::model::{DepNode, DependencyKey, NodeId};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// First line of every persisted graph.
pub const FORMAT_PROLOG: &str = "# Fine-grained v0\n";

/// Second line, present when the unit failed to compile.
pub const COMPILATION_ERROR_PROLOG: &str =
    "# Dependencies are unknown because a compilation error occurred.\n";

/// Suffix appended to a previous output when it is moved aside.
pub const BACKUP_SUFFIX: &str = "~";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedGraph {
    pub nodes: Vec<PersistedNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedNode {
    pub sequence_number: usize,
    pub key: DependencyKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
    pub is_provides: bool,
    /// Sequence numbers of the nodes this one depends on; repeats are parallel arcs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub defs_i_depend_upon: Vec<usize>,
}

impl From<&DependencyGraph> for PersistedGraph {
    fn from(graph: &DependencyGraph) -> Self {
        let mut nodes: Vec<PersistedNode> = graph
            .all_nodes()
            .map(|(id, node)| PersistedNode {
                sequence_number: id.0,
                key: node.key.clone(),
                fingerprint: node.fingerprint.clone(),
                is_provides: node.is_provides,
                defs_i_depend_upon: Vec::new(),
            })
            .collect();
        for (def_node, use_node) in graph.arcs() {
            if let Some(user) = nodes.get_mut(use_node.0) {
                user.defs_i_depend_upon.push(def_node.0);
            }
        }
        PersistedGraph { nodes }
    }
}

impl TryFrom<PersistedGraph> for DependencyGraph {
    type Error = GraphError;

    fn try_from(persisted: PersistedGraph) -> Result<Self> {
        let mut nodes = Vec::with_capacity(persisted.nodes.len());
        let mut arcs = Vec::new();
        for (position, entry) in persisted.nodes.into_iter().enumerate() {
            if entry.sequence_number != position {
                return Err(GraphError::Malformed(format!(
                    "node at position {} has sequence number {}",
                    position, entry.sequence_number
                )));
            }
            arcs.extend(
                entry
                    .defs_i_depend_upon
                    .iter()
                    .map(|&def| (NodeId(def), NodeId(position))),
            );
            nodes.push(DepNode {
                key: entry.key,
                fingerprint: entry.fingerprint,
                is_provides: entry.is_provides,
            });
        }
        if let Some(&(def, _)) = arcs.iter().find(|(def, _)| def.0 >= nodes.len()) {
            return Err(GraphError::NodeNotFound(def.0));
        }
        DependencyGraph::from_parts(nodes, arcs)
    }
}

/// Render a graph as the persisted text.
pub fn to_yaml_string(graph: &DependencyGraph, had_compilation_error: bool) -> Result<String> {
    let mut out = String::from(FORMAT_PROLOG);
    if had_compilation_error {
        out.push_str(COMPILATION_ERROR_PROLOG);
    }
    out.push_str(&serde_yaml::to_string(&PersistedGraph::from(graph))?);
    Ok(out)
}

/// Parse the persisted text back into a verified graph.
pub fn from_yaml_str(text: &str) -> Result<DependencyGraph> {
    let persisted: PersistedGraph = serde_yaml::from_str(text)?;
    DependencyGraph::try_from(persisted)
}

/// Path a previous output is moved to before being overwritten.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

/// Move any existing file at `path` aside. Failure is ignored.
pub fn rename_aside(path: &Path) {
    if !path.exists() {
        return;
    }
    let backup = backup_path(path);
    if let Err(e) = std::fs::rename(path, &backup) {
        tracing::debug!("Could not move {} aside: {}", path.display(), e);
    }
}

/// Write a graph to `path`, creating parent directories as needed.
pub fn write_graph(
    graph: &DependencyGraph,
    path: &Path,
    had_compilation_error: bool,
) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let text = to_yaml_string(graph, had_compilation_error)?;
    std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;

    tracing::debug!("Dependency graph saved: {}", path.display());
    Ok(())
}

/// Read a graph previously written by [`write_graph`].
pub fn read_graph(path: &Path) -> anyhow::Result<DependencyGraph> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let graph = from_yaml_str(&text).with_context(|| format!("parsing {}", path.display()))?;

    tracing::debug!("Dependency graph loaded from: {}", path.display());
    Ok(graph)
}
