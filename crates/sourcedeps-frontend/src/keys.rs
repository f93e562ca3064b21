//! Canonical keys for provided entities
//!
//! | kind              | context           | name                       |
//! |-------------------|-------------------|----------------------------|
//! | sourceFileProvide | ""                | unit path                  |
//! | topLevel          | ""                | base name                  |
//! | nominal           | context of type   | ""                         |
//! | potentialMember   | context of type   | ""                         |
//! | member            | context of holder | member base name           |
//! | dynamicLookup     | ""                | base name                  |
//! | externalDepend    | ""                | external identifier        |

use sourcedeps_core::{DeclAspect, DependencyKey, NodeKind};

use crate::decl::Declaration;
use crate::error::{BuildError, Result};
use crate::namer::ContextNamer;

/// What a provider key is made from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvidedEntity<'a> {
    Unit(&'a str),
    Decl(&'a Declaration),
    HolderAndMember(&'a Declaration, &'a Declaration),
    External(&'a str),
}

impl ProvidedEntity<'_> {
    fn describe(&self) -> &'static str {
        match self {
            ProvidedEntity::Unit(_) => "a compilation unit",
            ProvidedEntity::Decl(_) => "a declaration",
            ProvidedEntity::HolderAndMember(..) => "a holder and member pair",
            ProvidedEntity::External(_) => "an external dependency",
        }
    }
}

/// Key of the whole-unit node at `aspect`.
pub fn whole_source_file_key(aspect: DeclAspect, unit_name: &str) -> Result<DependencyKey> {
    if unit_name.is_empty() {
        return Err(BuildError::UnnamedUnit);
    }
    Ok(DependencyKey::for_whole_source_file(aspect, unit_name))
}

pub struct DependencyKeyFactory<'n, N: ?Sized> {
    namer: &'n N,
}

impl<'n, N: ContextNamer + ?Sized> DependencyKeyFactory<'n, N> {
    pub fn new(namer: &'n N) -> Self {
        DependencyKeyFactory { namer }
    }

    pub fn create_for_provided_entity_interface(
        &self,
        kind: NodeKind,
        entity: ProvidedEntity<'_>,
    ) -> Result<DependencyKey> {
        Ok(DependencyKey::new(
            kind,
            DeclAspect::Interface,
            self.compute_context(kind, entity)?,
            self.compute_name(kind, entity)?,
        ))
    }

    pub fn compute_context(&self, kind: NodeKind, entity: ProvidedEntity<'_>) -> Result<String> {
        match (kind, entity) {
            (NodeKind::Nominal | NodeKind::PotentialMember, ProvidedEntity::Decl(decl))
                if decl.is_type_declaration() =>
            {
                Ok(self.namer.mangle_type_as_context(decl))
            }
            (NodeKind::Member, ProvidedEntity::HolderAndMember(holder, _))
                if holder.is_type_declaration() =>
            {
                Ok(self.namer.mangle_type_as_context(holder))
            }
            (NodeKind::SourceFileProvide, ProvidedEntity::Unit(_))
            | (NodeKind::TopLevel | NodeKind::DynamicLookup, ProvidedEntity::Decl(_))
            | (NodeKind::ExternalDepend, ProvidedEntity::External(_)) => Ok(String::new()),
            _ => Err(unsupported(kind, entity)),
        }
    }

    pub fn compute_name(&self, kind: NodeKind, entity: ProvidedEntity<'_>) -> Result<String> {
        match (kind, entity) {
            (NodeKind::SourceFileProvide, ProvidedEntity::Unit(name)) => {
                if name.is_empty() {
                    Err(BuildError::UnnamedUnit)
                } else {
                    Ok(name.to_string())
                }
            }
            (NodeKind::TopLevel | NodeKind::DynamicLookup, ProvidedEntity::Decl(decl)) => {
                named(kind, &decl.name)
            }
            (NodeKind::Nominal | NodeKind::PotentialMember, ProvidedEntity::Decl(_)) => {
                Ok(String::new())
            }
            (NodeKind::Member, ProvidedEntity::HolderAndMember(_, member)) => {
                named(kind, &member.name)
            }
            (NodeKind::ExternalDepend, ProvidedEntity::External(name)) => named(kind, name),
            _ => Err(unsupported(kind, entity)),
        }
    }
}

fn named(kind: NodeKind, name: &str) -> Result<String> {
    if name.is_empty() {
        return Err(BuildError::UnnamedEntity { kind });
    }
    Ok(name.to_string())
}

fn unsupported(kind: NodeKind, entity: ProvidedEntity<'_>) -> BuildError {
    BuildError::UnsupportedEntity {
        kind,
        entity: entity.describe(),
    }
}
