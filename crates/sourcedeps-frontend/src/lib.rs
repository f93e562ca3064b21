//! Builds fine-grained dependency graphs from type-checked compilation units

pub mod decl;
pub mod namer;
pub mod error;
pub mod classifier;
pub mod keys;
pub mod providers;
pub mod uses;
pub mod constructor;
pub mod config;
pub mod emit;


#[cfg(test)]
pub mod test_utils;

pub use decl::{AccessLevel, CompilationUnit, DeclKind, Declaration, FileScopedKind, InheritedType, MemberUse, OperatorFixity, ProtocolRef, ReferencedNames, TypeKind, ValueKind};
pub use namer::{ContextNamer, ModuleContextNamer};
pub use error::BuildError;
pub use classifier::{ClassifiedDecls, EntityClassifier};
pub use keys::{DependencyKeyFactory, ProvidedEntity, whole_source_file_key};
pub use providers::ProviderEnumerator;
pub use uses::{UseEnumerator, private_holder_contexts};
pub use constructor::{ConstructorOptions, GraphConstructor};
pub use config::{CONFIG_FILE, DepGraphConfig};
pub use emit::{EmitOutcome, STDOUT_PATH, emit_reference_dependencies, verify_reads_what_is_written};
