//! Host symbol model
//!
//! Builds named-type symbols from source text: parse every file, merge
//! declarations into a [`SymbolTable`], resolve base lists and precompute the
//! interface closure of every type.

pub mod closure;
pub mod host;
pub mod resolve;
pub mod table;

pub use closure::InheritanceGraph;
pub use host::{CancellationToken, ProgramHost, Scheduling};
pub use resolve::{Entity, Resolver, Segment};
pub use table::{NamespaceId, Parent, SymbolTable, TypeData, TypeIndex};

use crate::diagnostic::SourceLookup;
use crate::error::ProgramError;
use crate::symbols::{Location, NamedType, TypeKind};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tracing::{debug, debug_span};
use unimpl_parser::{parse_source, SourceFile};

/// Source text together with the name it is reported under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedSource {
    pub name: Arc<str>,
    pub text: String,
}

impl LoadedSource {
    pub fn new(name: impl Into<Arc<str>>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// A set of sources analysed together
#[derive(Debug)]
pub struct Program {
    sources: Vec<LoadedSource>,
    table: SymbolTable,
    /// Interface closure per type; `None` for enums and delegates
    closures: Vec<Option<Vec<TypeIndex>>>,
}

impl Program {
    /// Parse and resolve `sources`, given as `(name, text)` pairs
    ///
    /// All parse errors are collected before giving up, and likewise all
    /// declaration conflicts.
    pub fn from_sources<I, N, T>(sources: I) -> Result<Self, ProgramError>
    where
        I: IntoIterator<Item = (N, T)>,
        N: Into<Arc<str>>,
        T: Into<String>,
    {
        let sources: Vec<LoadedSource> = sources
            .into_iter()
            .map(|(name, text)| LoadedSource::new(name, text))
            .collect();
        Self::from_loaded(sources)
    }

    pub fn from_loaded(sources: Vec<LoadedSource>) -> Result<Self, ProgramError> {
        let _span = debug_span!("load_program", sources = sources.len()).entered();

        let mut files = Vec::with_capacity(sources.len());
        let mut parse_errors = Vec::new();
        for source in &sources {
            match parse_source(&source.name, &source.text) {
                Ok(file) => files.push(file),
                Err(error) => parse_errors.push(error),
            }
        }
        if !parse_errors.is_empty() {
            return Err(ProgramError::parse(parse_errors));
        }

        let units: Vec<(&LoadedSource, &SourceFile)> = sources.iter().zip(&files).collect();
        let (table, resolve_errors) = SymbolTable::build(&units);
        if !resolve_errors.is_empty() {
            return Err(ProgramError::resolve(resolve_errors));
        }

        let graph = InheritanceGraph::build(&table, &Resolver::new(&table));
        let closures = table
            .indices()
            .map(|index| match table.get(index).kind {
                TypeKind::Enum | TypeKind::Delegate => None,
                _ => Some(graph.interface_closure(&table, index)),
            })
            .collect();

        debug!(
            types = table.len(),
            edges = graph.edge_count(),
            "program loaded"
        );

        Ok(Self {
            sources,
            table,
            closures,
        })
    }

    pub fn sources(&self) -> &[LoadedSource] {
        &self.sources
    }

    pub fn table(&self) -> &SymbolTable {
        &self.table
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Every declared type, in declaration order
    pub fn symbols(&self) -> Vec<Symbol<'_>> {
        self.table.indices().map(|index| self.symbol(index)).collect()
    }

    pub fn symbol(&self, index: TypeIndex) -> Symbol<'_> {
        Symbol {
            program: self,
            index,
        }
    }

    /// Look a type up by its full dotted path
    ///
    /// Generic types carry their arity after a backtick, e.g. `N.Box`1`;
    /// nested types continue the path after their container.
    pub fn lookup(&self, path: &str) -> Option<Symbol<'_>> {
        let segments: Vec<Segment<'_>> = path
            .split('.')
            .map(|part| match part.split_once('`') {
                Some((name, arity)) => arity.parse().ok().map(|arity| Segment::new(name, arity)),
                None => Some(Segment::new(part, 0)),
            })
            .collect::<Option<_>>()?;

        Resolver::new(&self.table)
            .lookup_path(&segments)
            .map(|index| self.symbol(index))
    }
}

impl SourceLookup for Program {
    fn source_text(&self, name: &str) -> Option<&str> {
        self.sources
            .iter()
            .find(|source| &*source.name == name)
            .map(|source| source.text.as_str())
    }
}

/// Handle to one declared type of a [`Program`]
///
/// Two handles are equal when they name the same declaration in the same
/// program, however the type was reached.
#[derive(Clone, Copy)]
pub struct Symbol<'p> {
    program: &'p Program,
    index: TypeIndex,
}

impl<'p> Symbol<'p> {
    pub fn index(&self) -> TypeIndex {
        self.index
    }

    pub fn data(&self) -> &'p TypeData {
        self.program.table.get(self.index)
    }

    pub fn arity(&self) -> usize {
        self.data().arity
    }

    pub fn display_name(&self) -> String {
        self.program.table.display_name(self.index)
    }
}

impl fmt::Debug for Symbol<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Symbol")
            .field("index", &self.index)
            .field("name", &self.display_name())
            .field("kind", &self.data().kind)
            .finish()
    }
}

impl fmt::Display for Symbol<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.data().kind, self.display_name())
    }
}

impl PartialEq for Symbol<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && std::ptr::eq(self.program, other.program)
    }
}

impl Eq for Symbol<'_> {}

impl Hash for Symbol<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl NamedType for Symbol<'_> {
    fn name(&self) -> &str {
        &self.data().name
    }

    fn kind(&self) -> TypeKind {
        self.data().kind
    }

    fn containing_scope(&self) -> &[String] {
        self.program.table.namespace_path(self.data().namespace)
    }

    fn locations(&self) -> &[Location] {
        &self.data().locations
    }

    fn all_interfaces(&self) -> Option<Vec<Self>> {
        self.program.closures[self.index.index()].as_ref().map(|closure| {
            closure
                .iter()
                .map(|&index| self.program.symbol(index))
                .collect()
        })
    }
}
