//! Declaration tree and compilation unit handed over by the compiler frontend

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Declared access level, ordered from most to least restrictive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    Private,
    FilePrivate,
    #[default]
    Internal,
    Public,
}

impl AccessLevel {
    /// Cannot be named from another file.
    pub fn is_file_scoped(self) -> bool {
        self <= AccessLevel::FilePrivate
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Struct,
    Enum,
    Class,
    Protocol,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Func,
    Var,
    TypeAlias,
    Accessor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatorFixity {
    Infix,
    Prefix,
    Postfix,
}

/// Declarations that can never be seen outside their file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileScopedKind {
    Import,
    PatternBinding,
    EnumCase,
    TopLevelCode,
    IfConfig,
    PoundDiagnostic,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProtocolRef {
    pub name: String,
    #[serde(default)]
    pub access: AccessLevel,
}

/// An entry of an extension's inheritance clause.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InheritedType {
    /// The type could not be resolved.
    Unresolved,
    /// A protocol or protocol composition.
    Protocols { protocols: Vec<ProtocolRef> },
    /// Anything else.
    Concrete { name: String },
}

impl InheritedType {
    /// True if this inheritance cannot affect other files. Non-protocol
    /// types are treated as visible.
    pub fn is_private(&self) -> bool {
        match self {
            InheritedType::Unresolved => true,
            InheritedType::Protocols { protocols } => {
                protocols.iter().all(|p| p.access.is_file_scoped())
            }
            InheritedType::Concrete { .. } => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeclKind {
    TypeDeclaration {
        type_kind: TypeKind,
    },
    Extension {
        /// The extended type, if it resolved.
        #[serde(default)]
        extended: Option<Box<Declaration>>,
        #[serde(default)]
        inherited: Vec<InheritedType>,
    },
    Operator {
        fixity: OperatorFixity,
    },
    PrecedenceGroup,
    ValueBinding {
        value_kind: ValueKind,
    },
    /// A class member reachable through dynamic lookup.
    ClassMember,
    FileScoped {
        scope_kind: FileScopedKind,
    },
}

/// One declaration and the declarations it owns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Declaration {
    /// User-facing base name; empty for extensions and file-scoped kinds.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub access: AccessLevel,
    #[serde(flatten)]
    pub kind: DeclKind,
    #[serde(default)]
    pub members: Vec<Declaration>,
    /// Hash of the body tokens, for type declarations and extensions.
    #[serde(default)]
    pub body_fingerprint: Option<String>,
    /// Names of the enclosing type declarations, outermost first.
    #[serde(default)]
    pub enclosing: Vec<String>,
}

impl Declaration {
    pub fn new(name: impl Into<String>, access: AccessLevel, kind: DeclKind) -> Self {
        Declaration {
            name: name.into(),
            access,
            kind,
            members: Vec::new(),
            body_fingerprint: None,
            enclosing: Vec::new(),
        }
    }

    pub fn with_members(mut self, members: Vec<Declaration>) -> Self {
        self.members = members;
        self
    }

    pub fn with_fingerprint(mut self, fingerprint: impl Into<String>) -> Self {
        self.body_fingerprint = Some(fingerprint.into());
        self
    }

    pub fn with_enclosing(mut self, enclosing: Vec<String>) -> Self {
        self.enclosing = enclosing;
        self
    }

    /// Cannot affect other files: at or below file-private, or a kind that is
    /// file-scoped by nature. Extensions and operators never are.
    pub fn is_locally_invisible(&self) -> bool {
        match &self.kind {
            DeclKind::Extension { .. } | DeclKind::Operator { .. } => false,
            DeclKind::FileScoped { .. } => true,
            DeclKind::TypeDeclaration { .. }
            | DeclKind::PrecedenceGroup
            | DeclKind::ValueBinding { .. }
            | DeclKind::ClassMember => self.access.is_file_scoped(),
        }
    }

    pub fn is_type_declaration(&self) -> bool {
        matches!(self.kind, DeclKind::TypeDeclaration { .. })
    }

    pub fn is_extension(&self) -> bool {
        matches!(self.kind, DeclKind::Extension { .. })
    }

    /// Declarations that carry a name and can be referred to as values.
    pub fn is_value(&self) -> bool {
        matches!(
            self.kind,
            DeclKind::TypeDeclaration { .. } | DeclKind::ValueBinding { .. } | DeclKind::ClassMember
        )
    }

    /// Can own a body fingerprint.
    pub fn is_iterable(&self) -> bool {
        matches!(
            self.kind,
            DeclKind::TypeDeclaration { .. } | DeclKind::Extension { .. }
        )
    }

    /// A function named by an operator, such as `static func ==`.
    pub fn is_operator_function(&self) -> bool {
        matches!(
            self.kind,
            DeclKind::ValueBinding { value_kind: ValueKind::Func } | DeclKind::ClassMember
        ) && is_operator_name(&self.name)
    }

    /// Same type identity: kind, enclosing types and name. Members and
    /// fingerprints are not compared.
    pub fn names_same_type(&self, other: &Declaration) -> bool {
        self.kind == other.kind && self.name == other.name && self.enclosing == other.enclosing
    }

    /// The extended type as recorded on the extension. It may be a copy of
    /// a declaration in the same unit; see `EntityClassifier`.
    pub fn extended_type(&self) -> Option<&Declaration> {
        match &self.kind {
            DeclKind::Extension { extended, .. } => extended.as_deref(),
            _ => None,
        }
    }

    /// Every inherited type of this extension is private. Vacuously true for
    /// other kinds.
    pub fn all_inherited_protocols_are_private(&self) -> bool {
        match &self.kind {
            DeclKind::Extension { inherited, .. } => inherited.iter().all(InheritedType::is_private),
            _ => true,
        }
    }

    pub fn all_members_are_private(&self) -> bool {
        self.members.iter().all(Declaration::is_locally_invisible)
    }

    /// This declaration and everything it owns, depth first. The extended
    /// type of an extension is a reference, not an owned child.
    pub fn walk(&self) -> Vec<&Declaration> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(decl) = stack.pop() {
            out.push(decl);
            stack.extend(decl.members.iter().rev());
        }
        out
    }
}

/// Operator identifiers start with an operator character.
pub fn is_operator_name(name: &str) -> bool {
    name.chars()
        .next()
        .is_some_and(|c| "/=-+!*%<>&|^~?.".contains(c))
}

/// A recorded use of a member of some type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberUse {
    /// Context id of the holder type.
    pub holder: String,
    /// Member base name; absent means "some member of this type".
    #[serde(default)]
    pub member: Option<String>,
    pub cascades: bool,
}

/// Names the unit refers to, each with its cascading flag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferencedNames {
    #[serde(default)]
    pub top_level: BTreeMap<String, bool>,
    #[serde(default)]
    pub dynamic_lookup: BTreeMap<String, bool>,
    #[serde(default)]
    pub members: Vec<MemberUse>,
}

/// One compilation unit as seen after type checking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilationUnit {
    /// Identifies the unit; names its whole-unit node.
    pub path: String,
    /// Fingerprint over the unit's whole token stream.
    #[serde(default)]
    pub interface_hash: String,
    #[serde(default)]
    pub declarations: Vec<Declaration>,
    #[serde(default)]
    pub references: ReferencedNames,
    /// External dependencies; every one cascades.
    #[serde(default)]
    pub external_dependencies: Vec<String>,
    #[serde(default)]
    pub had_compilation_error: bool,
}

impl CompilationUnit {
    pub fn new(path: impl Into<String>, interface_hash: impl Into<String>) -> Self {
        CompilationUnit {
            path: path.into(),
            interface_hash: interface_hash.into(),
            declarations: Vec::new(),
            references: ReferencedNames::default(),
            external_dependencies: Vec::new(),
            had_compilation_error: false,
        }
    }

    /// Parse a unit handed over as JSON.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}
