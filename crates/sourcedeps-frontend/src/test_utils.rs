//! Test utilities for building declaration trees and units

use sourcedeps_core::{DeclAspect, DependencyGraph, DependencyKey, NodeKind};

use crate::decl::*;
use crate::namer::ModuleContextNamer;

pub fn namer() -> ModuleContextNamer {
    ModuleContextNamer::new("main")
}

pub fn type_decl(name: &str, access: AccessLevel, type_kind: TypeKind) -> Declaration {
    Declaration::new(name, access, DeclKind::TypeDeclaration { type_kind })
}

pub fn public_struct(name: &str) -> Declaration {
    type_decl(name, AccessLevel::Public, TypeKind::Struct)
}

pub fn func(name: &str, access: AccessLevel) -> Declaration {
    Declaration::new(
        name,
        access,
        DeclKind::ValueBinding {
            value_kind: ValueKind::Func,
        },
    )
}

pub fn public_func(name: &str) -> Declaration {
    func(name, AccessLevel::Public)
}

pub fn private_func(name: &str) -> Declaration {
    func(name, AccessLevel::Private)
}

pub fn extension_of(extended: &Declaration, inherited: Vec<InheritedType>) -> Declaration {
    Declaration::new(
        "",
        AccessLevel::Internal,
        DeclKind::Extension {
            extended: Some(Box::new(extended.clone())),
            inherited,
        },
    )
}

pub fn protocols(names: &[(&str, AccessLevel)]) -> InheritedType {
    InheritedType::Protocols {
        protocols: names
            .iter()
            .map(|&(name, access)| ProtocolRef {
                name: name.to_string(),
                access,
            })
            .collect(),
    }
}

pub fn member_use(holder: &str, member: Option<&str>, cascades: bool) -> MemberUse {
    MemberUse {
        holder: holder.to_string(),
        member: member.map(str::to_string),
        cascades,
    }
}

pub fn unit_key(aspect: DeclAspect, unit: &str) -> DependencyKey {
    DependencyKey::for_whole_source_file(aspect, unit)
}

pub fn provider_key(kind: NodeKind, context: &str, name: &str) -> DependencyKey {
    DependencyKey::new(kind, DeclAspect::Interface, context, name)
}

/// Sorted keys of provider interface nodes, whole-unit node excluded.
pub fn provided_keys(graph: &DependencyGraph) -> Vec<String> {
    let mut keys: Vec<String> = graph
        .all_nodes()
        .filter(|(_, node)| {
            node.is_provides
                && node.key.is_interface()
                && node.key.kind != NodeKind::SourceFileProvide
        })
        .map(|(_, node)| node.key.to_string())
        .collect();
    keys.sort();
    keys
}

/// `public struct Foo { public func bar() }` with a private extension adding
/// `helper`, referring to `bar` without cascading.
pub fn foo_unit() -> CompilationUnit {
    let foo = public_struct("Foo")
        .with_members(vec![public_func("bar")])
        .with_fingerprint("fpFoo");
    let extension = extension_of(&foo, Vec::new()).with_members(vec![private_func("helper")]);

    let mut unit = CompilationUnit::new("Foo.swift", "hashFoo");
    unit.declarations = vec![foo, extension];
    unit.references.top_level.insert("bar".to_string(), false);
    unit
}
