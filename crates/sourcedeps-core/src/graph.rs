//! Dependency graph store using petgraph::StableDiGraph keyed by DependencyKey

use crate::error::{GraphError, Result};
use crate::model::*;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences};
use std::collections::HashMap;

/// The per-unit dependency graph. Arcs run from the depended-upon node to the
/// depending node; parallel arcs are kept.
pub struct DependencyGraph {
    inner: StableDiGraph<DepNode, DependsOn>,
    keys: HashMap<DependencyKey, NodeId>,
}

impl std::fmt::Debug for DependencyGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DependencyGraph")
            .field("node_count", &self.inner.node_count())
            .field("arc_count", &self.inner.edge_count())
            .finish()
    }
}

/// Petgraph indices are `u32`; ids beyond that range name no node.
fn index(id: NodeId) -> Option<NodeIndex> {
    u32::try_from(id.0).ok().map(NodeIndex::from)
}

fn check_fingerprint(key: &DependencyKey, fingerprint: Option<&str>) -> Result<()> {
    match fingerprint {
        Some("") => Err(GraphError::EmptyFingerprint(key.clone())),
        _ => Ok(()),
    }
}

impl DependencyGraph {
    pub fn new() -> Self {
        DependencyGraph {
            inner: StableDiGraph::new(),
            keys: HashMap::new(),
        }
    }

    /// Return the provider pair for `interface_key`, creating both nodes, the
    /// fingerprint and the implementation -> interface arc the first time the
    /// key is provided.
    pub fn find_existing_node_pair_or_create_and_add_if_new(
        &mut self,
        interface_key: &DependencyKey,
        fingerprint: Option<&str>,
    ) -> Result<NodePair> {
        if !interface_key.is_interface() {
            return Err(GraphError::NotAnInterfaceKey(interface_key.clone()));
        }
        let was_provider = self
            .find_existing_node(interface_key)
            .and_then(|id| self.node(id))
            .is_some_and(|n| n.is_provides);

        let interface = self.find_existing_node_or_create_if_new(interface_key, fingerprint, true)?;
        let implementation =
            self.find_existing_node_or_create_if_new(&interface_key.correspondent(), None, true)?;

        if !was_provider {
            self.add_arc(implementation, interface)?;
        }
        Ok(NodePair {
            interface,
            implementation,
        })
    }

    /// Look up a node by key.
    pub fn find_existing_node(&self, key: &DependencyKey) -> Option<NodeId> {
        self.keys.get(key).copied()
    }

    /// Look up a node by key, creating a lone node if absent. An existing
    /// node is upgraded to a provider when `is_provides` is set.
    pub fn find_existing_node_or_create_if_new(
        &mut self,
        key: &DependencyKey,
        fingerprint: Option<&str>,
        is_provides: bool,
    ) -> Result<NodeId> {
        check_fingerprint(key, fingerprint)?;

        if let Some(id) = self.find_existing_node(key) {
            let idx = self.existing_index(id)?;
            let node = &mut self.inner[idx];
            node.is_provides |= is_provides;
            match (&node.fingerprint, fingerprint) {
                (Some(existing), Some(requested)) if existing != requested => {
                    return Err(GraphError::FingerprintConflict {
                        key: key.clone(),
                        existing: existing.clone(),
                        requested: requested.to_string(),
                    });
                }
                (None, Some(requested)) => node.fingerprint = Some(requested.to_string()),
                _ => {}
            }
            return Ok(id);
        }

        self.check_creation_order(key)?;
        let node = DepNode {
            key: key.clone(),
            fingerprint: fingerprint.map(str::to_string),
            is_provides,
        };
        Ok(self.insert(node))
    }

    /// The whole-unit nodes come first; everything else needs them in place.
    fn check_creation_order(&self, key: &DependencyKey) -> Result<()> {
        match key.kind {
            NodeKind::SourceFileProvide if self.inner.node_count() >= 2 => {
                Err(GraphError::SourceFileNodeNotFirst(key.clone()))
            }
            NodeKind::SourceFileProvide => Ok(()),
            _ if self.source_file_node_pair().is_none() => {
                Err(GraphError::SourceFileNodeMissing(key.clone()))
            }
            _ => Ok(()),
        }
    }

    fn insert(&mut self, node: DepNode) -> NodeId {
        let key = node.key.clone();
        let id = NodeId(self.inner.add_node(node).index());
        self.keys.insert(key, id);
        id
    }

    /// Record that `use_node` depends on `def_node`. The using end must be a
    /// provider of this unit.
    pub fn add_arc(&mut self, def_node: NodeId, use_node: NodeId) -> Result<()> {
        let def_idx = self.existing_index(def_node)?;
        let use_idx = self.existing_index(use_node)?;
        let user = &self.inner[use_idx];
        if !user.is_provides {
            return Err(GraphError::UseNotProvider(user.key.clone()));
        }
        self.inner.add_edge(def_idx, use_idx, DependsOn);
        Ok(())
    }

    fn existing_index(&self, id: NodeId) -> Result<NodeIndex> {
        index(id)
            .filter(|&idx| self.inner.contains_node(idx))
            .ok_or(GraphError::NodeNotFound(id.0))
    }

    /// The pair standing for the whole compilation unit.
    pub fn source_file_node_pair(&self) -> Option<NodePair> {
        let first = self.node(NodeId(0))?;
        if first.key.kind != NodeKind::SourceFileProvide || !first.key.is_interface() {
            return None;
        }
        let implementation = self.find_existing_node(&first.key.correspondent())?;
        Some(NodePair {
            interface: NodeId(0),
            implementation,
        })
    }

    /// Structural self-check. Any failure is a bug in whoever built the graph.
    pub fn verify(&self) -> Result<()> {
        if self.keys.len() != self.inner.node_count() {
            return Err(GraphError::Malformed(format!(
                "{} keys indexed for {} nodes",
                self.keys.len(),
                self.inner.node_count()
            )));
        }
        if self.inner.node_count() > 0 && self.source_file_node_pair().is_none() {
            return Err(GraphError::Malformed(
                "first node is not the whole-unit interface node".to_string(),
            ));
        }

        for (id, node) in self.all_nodes() {
            if self.find_existing_node(&node.key) != Some(id) {
                return Err(GraphError::DuplicateKey(node.key.clone()));
            }
            check_fingerprint(&node.key, node.fingerprint.as_deref())?;
            if node.is_provides {
                let paired = self
                    .find_existing_node(&node.key.correspondent())
                    .and_then(|other| self.node(other))
                    .is_some_and(|other| other.is_provides);
                if !paired {
                    return Err(GraphError::UnpairedProvider(node.key.clone()));
                }
            }
        }

        for (def_node, use_node) in self.arcs() {
            if self.node(def_node).is_none() {
                return Err(GraphError::NodeNotFound(def_node.0));
            }
            let user = self
                .node(use_node)
                .ok_or(GraphError::NodeNotFound(use_node.0))?;
            if !user.is_provides {
                return Err(GraphError::UseNotProvider(user.key.clone()));
            }
        }
        Ok(())
    }

    /// Rebuild a graph from nodes in sequence order and arcs between them.
    pub fn from_parts(nodes: Vec<DepNode>, arcs: Vec<(NodeId, NodeId)>) -> Result<Self> {
        let mut graph = DependencyGraph::new();
        for node in nodes {
            if graph.keys.contains_key(&node.key) {
                return Err(GraphError::DuplicateKey(node.key));
            }
            graph.insert(node);
        }
        for (def_node, use_node) in arcs {
            graph.add_arc(def_node, use_node)?;
        }
        graph.verify()?;
        Ok(graph)
    }

    pub fn node(&self, id: NodeId) -> Option<&DepNode> {
        index(id).and_then(|idx| self.inner.node_weight(idx))
    }

    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn arc_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Nodes in sequence order.
    pub fn all_nodes(&self) -> impl Iterator<Item = (NodeId, &DepNode)> {
        self.inner
            .node_indices()
            .filter_map(move |idx| self.inner.node_weight(idx).map(|n| (NodeId(idx.index()), n)))
    }

    /// Arcs as (depended-upon, depending) in insertion order.
    pub fn arcs(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.inner
            .edge_references()
            .map(|e| (NodeId(e.source().index()), NodeId(e.target().index())))
    }

    /// Arcs by key, sorted, for order-insensitive comparison.
    pub fn arc_keys(&self) -> Vec<(DependencyKey, DependencyKey)> {
        let mut keys: Vec<_> = self
            .arcs()
            .filter_map(|(def_node, use_node)| {
                Some((self.node(def_node)?.key.clone(), self.node(use_node)?.key.clone()))
            })
            .collect();
        keys.sort();
        keys
    }

    /// Nodes that `use_node` depends on, in arc insertion order.
    pub fn defs_depended_upon_by(&self, use_node: NodeId) -> Vec<NodeId> {
        self.arcs()
            .filter(|&(_, user)| user == use_node)
            .map(|(def_node, _)| def_node)
            .collect()
    }

    /// Does an arc `def_key -> use_key` exist?
    pub fn has_arc(&self, def_key: &DependencyKey, use_key: &DependencyKey) -> bool {
        let def_idx = self.find_existing_node(def_key).and_then(index);
        let use_idx = self.find_existing_node(use_key).and_then(index);
        match (def_idx, use_idx) {
            (Some(def_idx), Some(use_idx)) => self.inner.find_edge(def_idx, use_idx).is_some(),
            _ => false,
        }
    }

    /// Nodes of a specific kind.
    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = NodeId> + '_ {
        self.all_nodes()
            .filter(move |(_, n)| n.key.kind == kind)
            .map(|(id, _)| id)
    }

    pub(crate) fn inner(&self) -> &StableDiGraph<DepNode, DependsOn> {
        &self.inner
    }
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}
