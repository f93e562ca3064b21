//! Context identifiers for type declarations

use crate::decl::{DeclKind, Declaration, TypeKind};

/// Derives the stable, module-unique context id of a type declaration.
pub trait ContextNamer {
    fn mangle_type_as_context(&self, decl: &Declaration) -> String;

    /// Context for an optional type; no type means no context.
    fn context_for(&self, decl: Option<&Declaration>) -> String {
        decl.map(|d| self.mangle_type_as_context(d)).unwrap_or_default()
    }
}

impl<F> ContextNamer for F
where
    F: Fn(&Declaration) -> String,
{
    fn mangle_type_as_context(&self, decl: &Declaration) -> String {
        self(decl)
    }
}

/// Length-prefixed mangling of module, enclosing types and name, prefixed by
/// a letter for the type kind: `class T` in module `mod` is `C3mod1T`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleContextNamer {
    module: String,
}

impl ModuleContextNamer {
    pub fn new(module: impl Into<String>) -> Self {
        ModuleContextNamer {
            module: module.into(),
        }
    }

    pub fn module(&self) -> &str {
        &self.module
    }
}

fn kind_letter(decl: &Declaration) -> Option<char> {
    match decl.kind {
        DeclKind::TypeDeclaration { type_kind } => Some(match type_kind {
            TypeKind::Class => 'C',
            TypeKind::Struct => 'V',
            TypeKind::Enum => 'O',
            TypeKind::Protocol => 'P',
        }),
        _ => None,
    }
}

impl ContextNamer for ModuleContextNamer {
    fn mangle_type_as_context(&self, decl: &Declaration) -> String {
        let Some(letter) = kind_letter(decl) else {
            return String::new();
        };
        let mut out = String::from(letter);
        for part in std::iter::once(self.module.as_str())
            .chain(decl.enclosing.iter().map(String::as_str))
            .chain(std::iter::once(decl.name.as_str()))
        {
            out.push_str(&part.len().to_string());
            out.push_str(part);
        }
        out
    }
}
