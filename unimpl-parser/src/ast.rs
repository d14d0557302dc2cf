// Declaration AST
// Only the parts of a source file that matter for type identity and
// inheritance are kept: namespaces, using directives and type declarations.

use std::fmt;

/// Source location with byte offsets and optional 1-based line/column pairs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub start_line_col: Option<(usize, usize)>,
    pub end_line_col: Option<(usize, usize)>,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            start_line_col: None,
            end_line_col: None,
        }
    }

    pub fn with_line_col(
        start: usize,
        end: usize,
        start_line_col: (usize, usize),
        end_line_col: (usize, usize),
    ) -> Self {
        Self {
            start,
            end,
            start_line_col: Some(start_line_col),
            end_line_col: Some(end_line_col),
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A parsed source file
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    /// Name the file was loaded under, used for diagnostics
    pub name: String,
    /// Using directives at the top of the file
    pub usings: Vec<UsingDirective>,
    /// Top-level namespaces and types
    pub members: Vec<NamespaceMember>,
    pub span: Span,
}

impl SourceFile {
    /// Iterate over every type declaration in the file, depth first
    pub fn type_declarations(&self) -> Vec<&TypeDecl> {
        let mut found = Vec::new();
        collect_types(&self.members, &mut found);
        found
    }
}

fn collect_types<'a>(members: &'a [NamespaceMember], found: &mut Vec<&'a TypeDecl>) {
    for member in members {
        match member {
            NamespaceMember::Namespace(namespace) => collect_types(&namespace.members, found),
            NamespaceMember::Type(decl) => collect_nested(decl, found),
        }
    }
}

fn collect_nested<'a>(decl: &'a TypeDecl, found: &mut Vec<&'a TypeDecl>) {
    found.push(decl);
    for nested in &decl.nested {
        collect_nested(nested, found);
    }
}

/// A member of a namespace body (or of the file itself)
#[derive(Debug, Clone, PartialEq)]
pub enum NamespaceMember {
    Namespace(NamespaceDecl),
    Type(TypeDecl),
}

/// `namespace A.B { ... }` or the file-scoped `namespace A.B;`
#[derive(Debug, Clone, PartialEq)]
pub struct NamespaceDecl {
    pub name: QualifiedName,
    pub usings: Vec<UsingDirective>,
    pub members: Vec<NamespaceMember>,
    pub file_scoped: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UsingDirective {
    pub kind: UsingKind,
    /// `global using ...`
    pub is_global: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UsingKind {
    /// `using A.B;`
    Namespace(QualifiedName),
    /// `using static A.B.C;`
    Static(TypeRef),
    /// `using X = A.B.C;`
    Alias { alias: Identifier, target: TypeRef },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    pub name: String,
    pub span: Span,
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Dotted name without generic arguments, as written after `namespace` or `using`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    /// Written with a `global::` prefix
    pub is_global: bool,
    pub segments: Vec<Identifier>,
    pub span: Span,
}

impl QualifiedName {
    pub fn segment_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(|segment| segment.name.as_str())
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_global {
            write!(f, "global::")?;
        }
        let names: Vec<&str> = self.segment_names().collect();
        write!(f, "{}", names.join("."))
    }
}

/// A reference to a type, e.g. in a base list
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    pub is_global: bool,
    pub segments: Vec<TypeRefSegment>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRefSegment {
    pub name: Identifier,
    /// Number of generic arguments written on this segment
    pub arity: usize,
}

impl fmt::Display for TypeRefSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if self.arity > 0 {
            write!(f, "<{}>", ",".repeat(self.arity - 1))?;
        }
        Ok(())
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_global {
            write!(f, "global::")?;
        }
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

/// Category of a declared type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclKind {
    Interface,
    Class,
    Struct,
    Record,
    RecordStruct,
    Enum,
    Delegate,
}

impl fmt::Display for DeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = match self {
            DeclKind::Interface => "interface",
            DeclKind::Class => "class",
            DeclKind::Struct => "struct",
            DeclKind::Record => "record",
            DeclKind::RecordStruct => "record struct",
            DeclKind::Enum => "enum",
            DeclKind::Delegate => "delegate",
        };
        write!(f, "{keyword}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Public,
    Internal,
    Private,
    Protected,
    Static,
    Abstract,
    Sealed,
    Partial,
    Readonly,
    Unsafe,
    New,
    Ref,
    File,
}

impl Modifier {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let modifier = match keyword {
            "public" => Modifier::Public,
            "internal" => Modifier::Internal,
            "private" => Modifier::Private,
            "protected" => Modifier::Protected,
            "static" => Modifier::Static,
            "abstract" => Modifier::Abstract,
            "sealed" => Modifier::Sealed,
            "partial" => Modifier::Partial,
            "readonly" => Modifier::Readonly,
            "unsafe" => Modifier::Unsafe,
            "new" => Modifier::New,
            "ref" => Modifier::Ref,
            "file" => Modifier::File,
            _ => return None,
        };
        Some(modifier)
    }
}

/// A type declaration: interface, class, struct, record, enum or delegate
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDecl {
    pub kind: DeclKind,
    pub name: Identifier,
    pub modifiers: Vec<Modifier>,
    pub type_parameters: Vec<Identifier>,
    /// Base class and implemented/extended interfaces, in written order
    pub bases: Vec<TypeRef>,
    /// Types declared inside this one
    pub nested: Vec<TypeDecl>,
    pub span: Span,
}

impl TypeDecl {
    pub fn is_partial(&self) -> bool {
        self.modifiers.contains(&Modifier::Partial)
    }

    pub fn arity(&self) -> usize {
        self.type_parameters.len()
    }
}
