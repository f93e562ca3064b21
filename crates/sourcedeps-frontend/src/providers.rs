//! Turns classified declarations into provider nodes

use sourcedeps_core::{DependencyGraph, DependencyKey, NodeKind, NodePair};

use crate::classifier::ClassifiedDecls;
use crate::error::Result;
use crate::keys::{DependencyKeyFactory, ProvidedEntity};
use crate::namer::ContextNamer;

pub struct ProviderEnumerator<'g, 'n, N: ?Sized> {
    graph: &'g mut DependencyGraph,
    keys: DependencyKeyFactory<'n, N>,
    source_file: NodePair,
}

/// Body fingerprint of containers. Pairs and other kinds carry none.
pub fn fingerprint_if_any<'a>(entity: ProvidedEntity<'a>) -> Option<&'a str> {
    match entity {
        ProvidedEntity::Decl(decl) if decl.is_iterable() => decl.body_fingerprint.as_deref(),
        _ => None,
    }
}

impl<'g, 'n, N: ContextNamer + ?Sized> ProviderEnumerator<'g, 'n, N> {
    pub fn new(graph: &'g mut DependencyGraph, namer: &'n N, source_file: NodePair) -> Self {
        ProviderEnumerator {
            graph,
            keys: DependencyKeyFactory::new(namer),
            source_file,
        }
    }

    /// Add a provider pair for every classified entity. Returns how many
    /// entities were enumerated.
    pub fn enumerate_defined_decls(&mut self, decls: &ClassifiedDecls<'_>) -> Result<usize> {
        let singles = [
            (NodeKind::TopLevel, &decls.precedence_groups),
            (NodeKind::TopLevel, &decls.member_operator_decls),
            (NodeKind::TopLevel, &decls.operators),
            (NodeKind::TopLevel, &decls.top_nominals),
            (NodeKind::TopLevel, &decls.top_values),
            (NodeKind::Nominal, &decls.all_nominals),
            (NodeKind::PotentialMember, &decls.potential_member_holders),
        ];
        let mut count = 0;
        for (kind, bucket) in singles {
            for &decl in bucket.iter() {
                self.enumerate_provider(kind, ProvidedEntity::Decl(decl))?;
                count += 1;
            }
        }
        for &(holder, member) in decls.values_in_extensions.iter() {
            self.enumerate_provider(NodeKind::Member, ProvidedEntity::HolderAndMember(holder, member))?;
            count += 1;
        }
        for &decl in decls.class_members.iter() {
            self.enumerate_provider(NodeKind::DynamicLookup, ProvidedEntity::Decl(decl))?;
            count += 1;
        }
        Ok(count)
    }

    fn enumerate_provider(&mut self, kind: NodeKind, entity: ProvidedEntity<'_>) -> Result<NodePair> {
        let key = self.keys.create_for_provided_entity_interface(kind, entity)?;
        self.add_defined_decl(&key, fingerprint_if_any(entity))
    }

    /// Register a provider and hang it off the unit's interface node, so a
    /// change of the interface hash reaches every provider.
    pub fn add_defined_decl(
        &mut self,
        interface_key: &DependencyKey,
        fingerprint: Option<&str>,
    ) -> Result<NodePair> {
        let pair = self
            .graph
            .find_existing_node_pair_or_create_and_add_if_new(interface_key, fingerprint)?;
        self.graph.add_arc(self.source_file.interface, pair.interface)?;
        Ok(pair)
    }
}
