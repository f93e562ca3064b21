//! Sourcedeps Core: dependency key model, graph store, and persisted format

pub mod error;
pub mod model;
pub mod graph;
pub mod diff;
pub mod dot;
pub mod persist;


#[cfg(test)]
pub mod test_utils;

pub use error::GraphError;
pub use model::{NodeId, NodeKind, DeclAspect, DependencyKey, DepNode, NodePair, DependsOn};
pub use graph::DependencyGraph;
pub use diff::GraphDiff;
pub use dot::{to_dot, dot_path, emit_dot_file};
pub use persist::{PersistedGraph, PersistedNode, FORMAT_PROLOG, COMPILATION_ERROR_PROLOG, backup_path, rename_aside, to_yaml_string, from_yaml_str, write_graph, read_graph};
