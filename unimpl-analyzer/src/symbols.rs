//! Symbol model consumed by the coverage engine
//!
//! The engine never looks at syntax. Hosts hand it named-type handles that
//! already know their category, their declaration sites and the transitive set
//! of interfaces they implement.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use unimpl_parser::Span;

/// Category of a named type as reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Interface,
    Class,
    Struct,
    Record,
    Enum,
    Delegate,
}

impl TypeKind {
    pub fn is_interface(self) -> bool {
        matches!(self, TypeKind::Interface)
    }
}

impl From<unimpl_parser::DeclKind> for TypeKind {
    fn from(kind: unimpl_parser::DeclKind) -> Self {
        use unimpl_parser::DeclKind;
        match kind {
            DeclKind::Interface => TypeKind::Interface,
            DeclKind::Class => TypeKind::Class,
            DeclKind::Struct | DeclKind::RecordStruct => TypeKind::Struct,
            DeclKind::Record => TypeKind::Record,
            DeclKind::Enum => TypeKind::Enum,
            DeclKind::Delegate => TypeKind::Delegate,
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeKind::Interface => "interface",
            TypeKind::Class => "class",
            TypeKind::Struct => "struct",
            TypeKind::Record => "record",
            TypeKind::Enum => "enum",
            TypeKind::Delegate => "delegate",
        };
        write!(f, "{name}")
    }
}

/// Where one declaration of a type lives
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    /// Name of the source the declaration was read from
    pub source: Arc<str>,
    /// Span of the declared identifier
    pub span: Span,
}

impl Location {
    pub fn new(source: impl Into<Arc<str>>, span: Span) -> Self {
        Self {
            source: source.into(),
            span,
        }
    }

    /// 1-based line and column, when the host recorded them
    pub fn line_col(&self) -> Option<(usize, usize)> {
        self.span.start_line_col
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line_col() {
            Some((line, column)) => write!(f, "{}:{}:{}", self.source, line, column),
            None => write!(f, "{}@{}", self.source, self.span.start),
        }
    }
}

/// A named type as seen by the coverage engine
///
/// Implementors are cheap handles: equality and hashing must identify the
/// declared type itself, independent of which declaration site or which
/// spelling of a reference produced the handle. Handles are shared across
/// visitation threads, hence `Send + Sync`.
pub trait NamedType: Clone + Eq + Hash + Send + Sync {
    /// Simple name, without namespace or generic arity
    fn name(&self) -> &str;

    fn kind(&self) -> TypeKind;

    /// Enclosing namespace names, outermost first; empty for the global namespace
    fn containing_scope(&self) -> &[String];

    /// Declaration locations in the order the host discovered them
    fn locations(&self) -> &[Location];

    /// Every interface this type implements or inherits, transitively
    ///
    /// `None` when the host's model exposes no interface closure for this
    /// category of type (enums, delegates).
    fn all_interfaces(&self) -> Option<Vec<Self>>;
}
