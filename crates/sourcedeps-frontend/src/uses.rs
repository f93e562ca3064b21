//! Turns a unit's recorded references into (used, depending) key pairs

use std::collections::HashSet;

use sourcedeps_core::{DeclAspect, DependencyKey, NodeKind};

use crate::decl::{CompilationUnit, Declaration};
use crate::error::Result;
use crate::keys::whole_source_file_key;
use crate::namer::ContextNamer;

/// Context ids of the unit's own type declarations that cannot be named from
/// another file. Uses of their members stay out of the nominal pass.
pub fn private_holder_contexts<N: ContextNamer + ?Sized>(
    unit: &CompilationUnit,
    namer: &N,
) -> HashSet<String> {
    let mut holders = HashSet::new();
    for decl in unit.declarations.iter().flat_map(Declaration::walk) {
        let candidate = decl.extended_type().unwrap_or(decl);
        if candidate.is_type_declaration() && candidate.is_locally_invisible() {
            holders.insert(namer.mangle_type_as_context(candidate));
        }
    }
    holders
}

pub struct UseEnumerator<'u> {
    unit: &'u CompilationUnit,
    source_file_interface: DependencyKey,
    source_file_implementation: DependencyKey,
    private_holders: HashSet<String>,
    include_intrafile_deps: bool,
}

impl<'u> UseEnumerator<'u> {
    pub fn new(
        unit: &'u CompilationUnit,
        private_holders: HashSet<String>,
        include_intrafile_deps: bool,
    ) -> Result<Self> {
        Ok(UseEnumerator {
            unit,
            source_file_interface: whole_source_file_key(DeclAspect::Interface, &unit.path)?,
            source_file_implementation: whole_source_file_key(
                DeclAspect::Implementation,
                &unit.path,
            )?,
            private_holders,
            include_intrafile_deps,
        })
    }

    /// Feed every (used, depending) pair to `create_use_def`, pass by pass.
    pub fn enumerate_all_uses<F>(&self, mut create_use_def: F) -> Result<()>
    where
        F: FnMut(&DependencyKey, &DependencyKey) -> Result<()>,
    {
        let names = &self.unit.references;
        for (name, &cascades) in &names.top_level {
            let used = DependencyKey::depended_upon(NodeKind::TopLevel, "", name);
            self.enumerate_use(&mut create_use_def, &used, cascades)?;
        }
        for (name, &cascades) in &names.dynamic_lookup {
            let used = DependencyKey::depended_upon(NodeKind::DynamicLookup, "", name);
            self.enumerate_use(&mut create_use_def, &used, cascades)?;
        }
        self.enumerate_external_uses(&mut create_use_def)?;
        self.enumerate_nominal_uses(&mut create_use_def)?;
        self.enumerate_member_uses(&mut create_use_def)
    }

    /// The used entity is assumed to be depended upon at its interface; the
    /// depending side is the unit's interface if the use cascades, else its
    /// implementation.
    fn enumerate_use<F>(
        &self,
        create_use_def: &mut F,
        used: &DependencyKey,
        cascades: bool,
    ) -> Result<()>
    where
        F: FnMut(&DependencyKey, &DependencyKey) -> Result<()>,
    {
        let depending = if cascades {
            &self.source_file_interface
        } else {
            &self.source_file_implementation
        };
        create_use_def(used, depending)
    }

    fn enumerate_external_uses<F>(&self, create_use_def: &mut F) -> Result<()>
    where
        F: FnMut(&DependencyKey, &DependencyKey) -> Result<()>,
    {
        // External dependencies always cascade
        for external in &self.unit.external_dependencies {
            let used = DependencyKey::depended_upon(NodeKind::ExternalDepend, "", external);
            self.enumerate_use(create_use_def, &used, true)?;
        }
        Ok(())
    }

    fn is_excluded_holder(&self, holder: &str) -> bool {
        !self.include_intrafile_deps && self.private_holders.contains(holder)
    }

    /// Holders with at least one cascading member use.
    pub fn holders_of_cascading_members(&self) -> HashSet<&'u str> {
        self.unit
            .references
            .members
            .iter()
            .filter(|m| m.cascades && !self.is_excluded_holder(&m.holder))
            .map(|m| m.holder.as_str())
            .collect()
    }

    /// A nominal use cascades when any member use of the same holder does;
    /// its own flag is not consulted.
    fn enumerate_nominal_uses<F>(&self, create_use_def: &mut F) -> Result<()>
    where
        F: FnMut(&DependencyKey, &DependencyKey) -> Result<()>,
    {
        let cascading_holders = self.holders_of_cascading_members();
        for member_use in &self.unit.references.members {
            if self.is_excluded_holder(&member_use.holder) {
                continue;
            }
            let cascades = cascading_holders.contains(member_use.holder.as_str());
            let used = DependencyKey::depended_upon(NodeKind::Nominal, &member_use.holder, "");
            self.enumerate_use(create_use_def, &used, cascades)?;
        }
        Ok(())
    }

    fn enumerate_member_uses<F>(&self, create_use_def: &mut F) -> Result<()>
    where
        F: FnMut(&DependencyKey, &DependencyKey) -> Result<()>,
    {
        for member_use in &self.unit.references.members {
            let member = member_use.member.as_deref().unwrap_or_default();
            let used = DependencyKey::depended_upon_member(&member_use.holder, member);
            self.enumerate_use(create_use_def, &used, member_use.cascades)?;
        }
        Ok(())
    }
}
