//! Core data structures for the fine-grained dependency graph

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier for a node: its sequence number within one graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct NodeId(pub usize);

/// Discriminates what kind of entity a node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    /// The compilation unit as a whole.
    SourceFileProvide,
    /// A name visible at file scope (types, values, operators, precedence groups).
    TopLevel,
    /// A nominal type, identified by its context only.
    Nominal,
    /// "Some member" of a type, identified by its context only.
    PotentialMember,
    /// A named member of a type.
    Member,
    /// A member reachable through dynamic lookup.
    DynamicLookup,
    /// A dependency outside the module (another module, a header).
    ExternalDepend,
}

impl NodeKind {
    pub const ALL: [NodeKind; 7] = [
        NodeKind::SourceFileProvide,
        NodeKind::TopLevel,
        NodeKind::Nominal,
        NodeKind::PotentialMember,
        NodeKind::Member,
        NodeKind::DynamicLookup,
        NodeKind::ExternalDepend,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::SourceFileProvide => "sourceFileProvide",
            NodeKind::TopLevel => "topLevel",
            NodeKind::Nominal => "nominal",
            NodeKind::PotentialMember => "potentialMember",
            NodeKind::Member => "member",
            NodeKind::DynamicLookup => "dynamicLookup",
            NodeKind::ExternalDepend => "externalDepend",
        }
    }

    /// Kinds whose identity lives in the context field.
    pub fn uses_context(self) -> bool {
        matches!(
            self,
            NodeKind::Nominal | NodeKind::PotentialMember | NodeKind::Member
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which half of an entity a node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeclAspect {
    /// The externally visible signature.
    Interface,
    /// The body.
    Implementation,
}

impl DeclAspect {
    pub fn opposite(self) -> Self {
        match self {
            DeclAspect::Interface => DeclAspect::Implementation,
            DeclAspect::Implementation => DeclAspect::Interface,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DeclAspect::Interface => "interface",
            DeclAspect::Implementation => "implementation",
        }
    }
}

impl fmt::Display for DeclAspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical identity of a graph node. Two keys are the same node iff all
/// four fields match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DependencyKey {
    pub kind: NodeKind,
    pub aspect: DeclAspect,
    /// Owning type's context id for `nominal`, `potentialMember` and `member`; empty otherwise.
    #[serde(default)]
    pub context: String,
    /// User-facing base name; empty where the context alone identifies the entity.
    #[serde(default)]
    pub name: String,
}

impl DependencyKey {
    pub fn new(
        kind: NodeKind,
        aspect: DeclAspect,
        context: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        DependencyKey {
            kind,
            aspect,
            context: context.into(),
            name: name.into(),
        }
    }

    /// Key of the node standing for a whole compilation unit.
    pub fn for_whole_source_file(aspect: DeclAspect, unit_name: &str) -> Self {
        DependencyKey::new(NodeKind::SourceFileProvide, aspect, "", unit_name)
    }

    /// Key for a used member of a holder. An empty member name means "some
    /// member of this holder", which collapses to one `potentialMember` node
    /// per holder.
    pub fn depended_upon_member(mangled_holder: &str, member_base_name: &str) -> Self {
        if member_base_name.is_empty() {
            DependencyKey::new(NodeKind::PotentialMember, DeclAspect::Interface, mangled_holder, "")
        } else {
            DependencyKey::new(
                NodeKind::Member,
                DeclAspect::Interface,
                mangled_holder,
                member_base_name,
            )
        }
    }

    /// Key for a used entity named by a plain string (top-level names,
    /// dynamic lookup names, external dependencies, nominal contexts).
    pub fn depended_upon(kind: NodeKind, context: &str, name: &str) -> Self {
        DependencyKey::new(kind, DeclAspect::Interface, context, name)
    }

    /// Same entity, other aspect.
    pub fn correspondent(&self) -> Self {
        DependencyKey {
            aspect: self.aspect.opposite(),
            ..self.clone()
        }
    }

    pub fn with_aspect(&self, aspect: DeclAspect) -> Self {
        DependencyKey {
            aspect,
            ..self.clone()
        }
    }

    pub fn is_interface(&self) -> bool {
        self.aspect == DeclAspect::Interface
    }
}

impl fmt::Display for DependencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}:{}", self.kind, self.aspect, self.context, self.name)
    }
}

/// A single node in the dependency graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepNode {
    pub key: DependencyKey,
    /// Body fingerprint; never the empty string when present.
    pub fingerprint: Option<String>,
    /// True when the entity is defined in this unit rather than merely used.
    pub is_provides: bool,
}

impl fmt::Display for DepNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key)?;
        if let Some(fp) = &self.fingerprint {
            write!(f, " #{}", fp)?;
        }
        if !self.is_provides {
            f.write_str(" (use)")?;
        }
        Ok(())
    }
}

/// The interface and implementation nodes of one provided entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodePair {
    pub interface: NodeId,
    pub implementation: NodeId,
}

impl NodePair {
    pub fn get(&self, aspect: DeclAspect) -> NodeId {
        match aspect {
            DeclAspect::Interface => self.interface,
            DeclAspect::Implementation => self.implementation,
        }
    }
}

/// Edge weight: the target depends on the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DependsOn;

impl fmt::Display for DependsOn {
    fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Ok(())
    }
}
