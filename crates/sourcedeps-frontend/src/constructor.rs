//! Builds the dependency graph of one compilation unit

use sourcedeps_core::{DeclAspect, DependencyGraph, GraphError, NodePair};

use crate::classifier::EntityClassifier;
use crate::decl::CompilationUnit;
use crate::error::Result;
use crate::keys::whole_source_file_key;
use crate::namer::ContextNamer;
use crate::providers::ProviderEnumerator;
use crate::uses::{UseEnumerator, private_holder_contexts};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConstructorOptions {
    /// Keep declarations that cannot be seen from other files, and uses of
    /// members of such types.
    pub include_private_decls: bool,
    /// The unit failed to compile; only its whole-unit node is emitted.
    pub had_compilation_error: bool,
}

/// Entry point: whole-unit node, then providers, then uses, then verify.
pub struct GraphConstructor<'u, 'n, N: ?Sized> {
    unit: &'u CompilationUnit,
    namer: &'n N,
    options: ConstructorOptions,
}

impl<'u, 'n, N: ContextNamer + ?Sized> GraphConstructor<'u, 'n, N> {
    pub fn new(unit: &'u CompilationUnit, namer: &'n N, options: ConstructorOptions) -> Self {
        GraphConstructor {
            unit,
            namer,
            options,
        }
    }

    /// Options taken from the unit itself plus the privacy policy.
    pub fn for_unit(unit: &'u CompilationUnit, namer: &'n N, include_private_decls: bool) -> Self {
        Self::new(
            unit,
            namer,
            ConstructorOptions {
                include_private_decls,
                had_compilation_error: unit.had_compilation_error,
            },
        )
    }

    pub fn construct(&self) -> Result<DependencyGraph> {
        let mut graph = DependencyGraph::new();
        let source_file = self.add_source_file_nodes(&mut graph)?;

        if self.options.had_compilation_error {
            tracing::warn!(
                "{} had a compilation error; emitting its existence node only",
                self.unit.path
            );
        } else {
            self.add_all_defined_decls(&mut graph, source_file)?;
            self.add_all_used_decls(&mut graph)?;
        }

        graph.verify()?;
        tracing::debug!(
            "Built graph for {}: {} nodes, {} arcs",
            self.unit.path,
            graph.node_count(),
            graph.arc_count()
        );
        Ok(graph)
    }

    /// The whole-unit pair, fingerprinted with the unit's interface hash.
    fn add_source_file_nodes(&self, graph: &mut DependencyGraph) -> Result<NodePair> {
        let key = whole_source_file_key(DeclAspect::Interface, &self.unit.path)?;
        let fingerprint = Some(self.unit.interface_hash.as_str()).filter(|h| !h.is_empty());
        Ok(graph.find_existing_node_pair_or_create_and_add_if_new(&key, fingerprint)?)
    }

    fn add_all_defined_decls(&self, graph: &mut DependencyGraph, source_file: NodePair) -> Result<()> {
        let decls = EntityClassifier::classify(self.unit, self.options.include_private_decls);
        let count = ProviderEnumerator::new(graph, self.namer, source_file)
            .enumerate_defined_decls(&decls)?;
        tracing::debug!("{}: {} provided entities", self.unit.path, count);
        Ok(())
    }

    fn add_all_used_decls(&self, graph: &mut DependencyGraph) -> Result<()> {
        let private_holders = private_holder_contexts(self.unit, self.namer);
        let uses = UseEnumerator::new(self.unit, private_holders, self.options.include_private_decls)?;
        uses.enumerate_all_uses(|def_key, use_key| {
            let def_node = graph.find_existing_node_or_create_if_new(def_key, None, false)?;
            let use_node = graph
                .find_existing_node(use_key)
                .ok_or_else(|| GraphError::SourceFileNodeMissing(use_key.clone()))?;
            graph.add_arc(def_node, use_node)?;
            Ok(())
        })
    }
}
