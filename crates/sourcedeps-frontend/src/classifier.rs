//! Sorts a unit's declarations into the buckets that become provider nodes
//!
//! Privacy elision happens here: unless private declarations are included,
//! anything that cannot be named from another file is left out, and so is
//! an extension that only adds private detail to its type.

use std::collections::HashSet;
use std::hash::Hash;
use std::ops::Deref;

use crate::decl::{CompilationUnit, DeclKind, Declaration};

/// Ordered, duplicate-free list.
#[derive(Debug, Clone)]
pub struct Bucket<T> {
    items: Vec<T>,
    seen: HashSet<T>,
}

impl<T: Copy + Eq + Hash> Bucket<T> {
    /// Append unless already present. Returns whether it was appended.
    pub fn push(&mut self, item: T) -> bool {
        if !self.seen.insert(item) {
            return false;
        }
        self.items.push(item);
        true
    }
}

impl<T> Default for Bucket<T> {
    fn default() -> Self {
        Bucket {
            items: Vec::new(),
            seen: HashSet::new(),
        }
    }
}

impl<T> Deref for Bucket<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.items
    }
}

pub type DeclBucket<'a> = Bucket<&'a Declaration>;

/// The classified declarations of one unit.
#[derive(Debug, Clone, Default)]
pub struct ClassifiedDecls<'a> {
    pub extensions: DeclBucket<'a>,
    pub operators: DeclBucket<'a>,
    pub precedence_groups: DeclBucket<'a>,
    pub top_nominals: DeclBucket<'a>,
    pub top_values: DeclBucket<'a>,
    /// Every nominal type reachable through extensions and containers.
    pub all_nominals: DeclBucket<'a>,
    /// Types that get a wildcard member node.
    pub potential_member_holders: DeclBucket<'a>,
    pub member_operator_decls: DeclBucket<'a>,
    /// (extended type, member) pairs contributed by extensions.
    pub values_in_extensions: Bucket<(&'a Declaration, &'a Declaration)>,
    /// Not filtered by access: dynamic lookup ignores it.
    pub class_members: DeclBucket<'a>,
}

impl ClassifiedDecls<'_> {
    pub fn total(&self) -> usize {
        self.extensions.len()
            + self.operators.len()
            + self.precedence_groups.len()
            + self.top_nominals.len()
            + self.top_values.len()
            + self.all_nominals.len()
            + self.potential_member_holders.len()
            + self.member_operator_decls.len()
            + self.values_in_extensions.len()
            + self.class_members.len()
    }
}

pub struct EntityClassifier<'a> {
    unit: &'a CompilationUnit,
    include_private_decls: bool,
    decls: ClassifiedDecls<'a>,
}

impl<'a> EntityClassifier<'a> {
    /// Classify every top-level declaration of `unit`. The passes run in a
    /// fixed order; later ones read buckets filled by earlier ones.
    pub fn classify(unit: &'a CompilationUnit, include_private_decls: bool) -> ClassifiedDecls<'a> {
        let mut classifier = EntityClassifier {
            unit,
            include_private_decls,
            decls: ClassifiedDecls::default(),
        };
        for decl in &unit.declarations {
            classifier.select(decl);
        }
        classifier.find_nominals_from_extensions();
        classifier.find_nominals_in_top_nominals();
        classifier.find_values_in_extensions();
        classifier.find_class_members();

        let decls = classifier.decls;
        tracing::debug!(
            "Classified {}: {} top nominals, {} nominals, {} member holders, {} extension members, {} class members",
            unit.path,
            decls.top_nominals.len(),
            decls.all_nominals.len(),
            decls.potential_member_holders.len(),
            decls.values_in_extensions.len(),
            decls.class_members.len()
        );
        decls
    }

    fn select(&mut self, decl: &'a Declaration) {
        match decl.kind {
            DeclKind::Extension { .. } => {
                self.decls.extensions.push(decl);
            }
            DeclKind::Operator { .. } => {
                self.decls.operators.push(decl);
            }
            DeclKind::PrecedenceGroup => {
                self.decls.precedence_groups.push(decl);
            }
            DeclKind::TypeDeclaration { .. } => {
                if !self.exclude_if_private(decl) {
                    self.decls.top_nominals.push(decl);
                }
            }
            DeclKind::ValueBinding { .. } => {
                if !self.exclude_if_private(decl) {
                    self.decls.top_values.push(decl);
                }
            }
            DeclKind::ClassMember | DeclKind::FileScoped { .. } => {}
        }
    }

    fn find_nominals_from_extensions(&mut self) {
        let extensions = self.decls.extensions.to_vec();
        for extension in extensions {
            if let Some(extended) = self.resolve_extended_type(extension) {
                self.find_nominals_and_operators_in(extended, Some(extension));
            }
        }
    }

    fn find_nominals_in_top_nominals(&mut self) {
        let top_nominals = self.decls.top_nominals.to_vec();
        for nominal in top_nominals {
            self.find_nominals_and_operators_in(nominal, None);
        }
    }

    /// Record `nominal` and search its members, or the members of
    /// `extension` when it is reached through one.
    fn find_nominals_and_operators_in(
        &mut self,
        nominal: &'a Declaration,
        extension: Option<&'a Declaration>,
    ) {
        if self.exclude_if_private(nominal) {
            return;
        }
        let exposed_protocol_is_extended =
            extension.is_some_and(|e| !e.all_inherited_protocols_are_private());
        if let Some(extension) = extension {
            if !self.include_private_decls
                && !exposed_protocol_is_extended
                && extension.all_members_are_private()
            {
                return;
            }
        }
        if self.include_private_decls || extension.is_none() || exposed_protocol_is_extended {
            self.decls.all_nominals.push(nominal);
        }
        self.decls.potential_member_holders.push(nominal);
        self.find_nominals_and_operators_in_members(&extension.unwrap_or(nominal).members);
    }

    fn find_nominals_and_operators_in_members(&mut self, members: &'a [Declaration]) {
        for member in members {
            if !member.is_value() || self.exclude_if_private(member) {
                continue;
            }
            if member.is_operator_function() {
                self.decls.member_operator_decls.push(member);
            } else if member.is_type_declaration() {
                self.find_nominals_and_operators_in(member, None);
            }
        }
    }

    fn find_values_in_extensions(&mut self) {
        let extensions = self.decls.extensions.to_vec();
        for extension in extensions {
            let Some(extended) = self.resolve_extended_type(extension) else {
                continue;
            };
            if self.exclude_if_private(extended) {
                continue;
            }
            if !self.include_private_decls
                && (!extension.all_inherited_protocols_are_private()
                    || extension.all_members_are_private())
            {
                continue;
            }
            for member in &extension.members {
                if member.is_value()
                    && !member.name.is_empty()
                    && (self.include_private_decls || !member.is_locally_invisible())
                {
                    self.decls.values_in_extensions.push((extended, member));
                }
            }
        }
    }

    fn find_class_members(&mut self) {
        for decl in self.unit.declarations.iter().flat_map(Declaration::walk) {
            if matches!(decl.kind, DeclKind::ClassMember) {
                self.decls.class_members.push(decl);
            }
        }
    }

    /// The unit's own declaration of the type `extension` extends, or the
    /// extension's copy when the type lives in another file.
    fn resolve_extended_type(&self, extension: &'a Declaration) -> Option<&'a Declaration> {
        let extended = extension.extended_type()?;
        let local = self
            .unit
            .declarations
            .iter()
            .flat_map(Declaration::walk)
            .find(|decl| decl.is_type_declaration() && decl.names_same_type(extended));
        Some(local.unwrap_or(extended))
    }

    fn exclude_if_private(&self, decl: &Declaration) -> bool {
        !self.include_private_decls && decl.is_locally_invisible()
    }
}
