//! Graph diff computation, keyed by node identity rather than sequence number

use crate::graph::DependencyGraph;
use crate::model::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Differences between two dependency graphs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphDiff {
    /// Keys only present in the new graph.
    pub added_nodes: Vec<DependencyKey>,
    /// Keys only present in the old graph.
    pub removed_nodes: Vec<DependencyKey>,
    /// Keys present in both whose fingerprint or provider flag changed.
    pub modified_nodes: Vec<DependencyKey>,
    /// Arcs (depended-upon, depending) the new graph has more of.
    pub added_arcs: Vec<(DependencyKey, DependencyKey)>,
    /// Arcs the old graph has more of.
    pub removed_arcs: Vec<(DependencyKey, DependencyKey)>,
}

impl GraphDiff {
    /// Compute what changed from `old_graph` to `new_graph`. Arcs are
    /// compared as multisets, so a missing parallel arc shows up.
    pub fn between(old_graph: &DependencyGraph, new_graph: &DependencyGraph) -> Self {
        let mut diff = GraphDiff::default();

        let old_nodes = nodes_by_key(old_graph);
        let new_nodes = nodes_by_key(new_graph);
        for (key, node) in &new_nodes {
            match old_nodes.get(key) {
                None => diff.added_nodes.push((*key).clone()),
                Some(old) if old.fingerprint != node.fingerprint || old.is_provides != node.is_provides => {
                    diff.modified_nodes.push((*key).clone())
                }
                Some(_) => {}
            }
        }
        diff.removed_nodes = old_nodes
            .keys()
            .filter(|key| !new_nodes.contains_key(*key))
            .map(|key| (*key).clone())
            .collect();

        let old_arcs = arc_counts(old_graph);
        let new_arcs = arc_counts(new_graph);
        for (arc, &count) in &new_arcs {
            let before = old_arcs.get(arc).copied().unwrap_or(0);
            diff.added_arcs
                .extend(std::iter::repeat_n(arc.clone(), count.saturating_sub(before)));
        }
        for (arc, &count) in &old_arcs {
            let after = new_arcs.get(arc).copied().unwrap_or(0);
            diff.removed_arcs
                .extend(std::iter::repeat_n(arc.clone(), count.saturating_sub(after)));
        }

        diff
    }

    /// Check if this diff is empty (no changes).
    pub fn is_empty(&self) -> bool {
        self.added_nodes.is_empty()
            && self.removed_nodes.is_empty()
            && self.modified_nodes.is_empty()
            && self.added_arcs.is_empty()
            && self.removed_arcs.is_empty()
    }
}

fn nodes_by_key(graph: &DependencyGraph) -> BTreeMap<&DependencyKey, &DepNode> {
    graph.all_nodes().map(|(_, node)| (&node.key, node)).collect()
}

fn arc_counts(graph: &DependencyGraph) -> BTreeMap<(DependencyKey, DependencyKey), usize> {
    let mut counts = BTreeMap::new();
    for arc in graph.arc_keys() {
        *counts.entry(arc).or_insert(0) += 1;
    }
    counts
}
