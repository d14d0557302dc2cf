//! Symbol table
//!
//! Every declared type gets one dense [`TypeIndex`]. Partial declarations with
//! the same container, name and arity share that index, and keep one location
//! and one [`Fragment`] per declaration site in file-then-source order.

use super::LoadedSource;
use crate::error::ResolveError;
use crate::qualified_name::display_name;
use crate::symbols::{Location, TypeKind};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;
use unimpl_parser::{NamespaceMember, SourceFile, TypeDecl, TypeRef, UsingDirective};

/// Dense identifier of a declared type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeIndex(pub(crate) usize);

impl TypeIndex {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for TypeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Interned namespace path; the root is the global namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NamespaceId(usize);

impl NamespaceId {
    pub const ROOT: NamespaceId = NamespaceId(0);
}

/// What directly contains a type declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parent {
    Namespace(NamespaceId),
    Type(TypeIndex),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(usize);

/// One namespace body enclosing a declaration
#[derive(Debug, Clone)]
pub struct ContextLevel {
    pub namespace: NamespaceId,
    /// Using directives written directly in this body
    pub usings: Vec<UsingDirective>,
}

/// Namespace bodies around a declaration, innermost first
///
/// The last level is always the global namespace, carrying the file's own
/// usings plus every `global using` in the program.
#[derive(Debug, Clone)]
pub struct LexicalContext {
    pub levels: Vec<ContextLevel>,
}

/// One declaration site of a type
#[derive(Debug, Clone)]
pub struct Fragment {
    pub location: Location,
    pub context: ContextId,
    /// Type parameters in scope: the containing types' and this declaration's
    pub type_parameters: Vec<String>,
    pub bases: Vec<TypeRef>,
}

#[derive(Debug, Clone)]
pub struct TypeData {
    pub name: String,
    pub arity: usize,
    pub kind: TypeKind,
    pub parent: Parent,
    /// Innermost enclosing namespace, also for nested types
    pub namespace: NamespaceId,
    pub locations: Vec<Location>,
    pub fragments: Vec<Fragment>,
    partial: bool,
}

#[derive(Debug, Clone)]
struct NamespaceData {
    path: Vec<String>,
    children: HashMap<String, NamespaceId>,
}

#[derive(Debug)]
pub struct SymbolTable {
    types: Vec<TypeData>,
    members: HashMap<(Parent, usize), HashMap<String, TypeIndex>>,
    namespaces: Vec<NamespaceData>,
    contexts: Vec<LexicalContext>,
}

impl SymbolTable {
    /// Collect the declarations of every parsed unit
    ///
    /// Conflicting declarations are reported and left out; the rest of the
    /// table is still built.
    pub fn build(units: &[(&LoadedSource, &SourceFile)]) -> (Self, Vec<ResolveError>) {
        let mut builder = TableBuilder {
            table: SymbolTable {
                types: Vec::new(),
                members: HashMap::new(),
                namespaces: vec![NamespaceData {
                    path: Vec::new(),
                    children: HashMap::new(),
                }],
                contexts: Vec::new(),
            },
            errors: Vec::new(),
        };

        let global_usings: Vec<UsingDirective> = units
            .iter()
            .flat_map(|(_, file)| file.usings.iter().filter(|using| using.is_global))
            .cloned()
            .collect();

        for (source, file) in units {
            let usings = file
                .usings
                .iter()
                .filter(|using| !using.is_global)
                .chain(global_usings.iter())
                .cloned()
                .collect();
            let root = ContextLevel {
                namespace: NamespaceId::ROOT,
                usings,
            };
            builder.collect_members(source, &file.members, vec![root]);
        }

        (builder.table, builder.errors)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn indices(&self) -> impl Iterator<Item = TypeIndex> + '_ {
        (0..self.types.len()).map(TypeIndex)
    }

    pub fn get(&self, index: TypeIndex) -> &TypeData {
        &self.types[index.0]
    }

    /// Type named `name` with `arity` type parameters directly inside `parent`
    pub fn member(&self, parent: Parent, name: &str, arity: usize) -> Option<TypeIndex> {
        self.members
            .get(&(parent, arity))
            .and_then(|members| members.get(name))
            .copied()
    }

    pub fn child_namespace(&self, namespace: NamespaceId, name: &str) -> Option<NamespaceId> {
        self.namespaces[namespace.0].children.get(name).copied()
    }

    pub fn namespace_path(&self, namespace: NamespaceId) -> &[String] {
        &self.namespaces[namespace.0].path
    }

    pub fn context(&self, context: ContextId) -> &LexicalContext {
        &self.contexts[context.0]
    }

    /// Namespace-qualified display name of a type
    pub fn display_name(&self, index: TypeIndex) -> String {
        let data = self.get(index);
        display_name(self.namespace_path(data.namespace), &data.name)
    }
}

struct TableBuilder {
    table: SymbolTable,
    errors: Vec<ResolveError>,
}

impl TableBuilder {
    /// `levels` is outermost first while building
    fn collect_members(
        &mut self,
        source: &LoadedSource,
        members: &[NamespaceMember],
        levels: Vec<ContextLevel>,
    ) {
        let mut context = None;

        for member in members {
            match member {
                NamespaceMember::Namespace(namespace) => {
                    let mut inner = levels.clone();
                    let mut current = levels
                        .last()
                        .map(|level| level.namespace)
                        .unwrap_or(NamespaceId::ROOT);
                    for segment in namespace.name.segment_names() {
                        current = self.namespace_child(current, segment);
                        inner.push(ContextLevel {
                            namespace: current,
                            usings: Vec::new(),
                        });
                    }
                    if let Some(innermost) = inner.last_mut() {
                        innermost.usings = namespace.usings.clone();
                    }
                    self.collect_members(source, &namespace.members, inner);
                }
                NamespaceMember::Type(decl) => {
                    let context = *context.get_or_insert_with(|| self.intern_context(&levels));
                    let namespace = levels
                        .last()
                        .map(|level| level.namespace)
                        .unwrap_or(NamespaceId::ROOT);
                    self.declare(source, decl, Parent::Namespace(namespace), namespace, context, &[]);
                }
            }
        }
    }

    fn intern_context(&mut self, levels: &[ContextLevel]) -> ContextId {
        let id = ContextId(self.table.contexts.len());
        self.table.contexts.push(LexicalContext {
            levels: levels.iter().rev().cloned().collect(),
        });
        id
    }

    fn namespace_child(&mut self, parent: NamespaceId, name: &str) -> NamespaceId {
        if let Some(existing) = self.table.child_namespace(parent, name) {
            return existing;
        }

        let id = NamespaceId(self.table.namespaces.len());
        let mut path = self.table.namespaces[parent.0].path.clone();
        path.push(name.to_string());
        self.table.namespaces.push(NamespaceData {
            path,
            children: HashMap::new(),
        });
        self.table.namespaces[parent.0]
            .children
            .insert(name.to_string(), id);
        id
    }

    fn declare(
        &mut self,
        source: &LoadedSource,
        decl: &TypeDecl,
        parent: Parent,
        namespace: NamespaceId,
        context: ContextId,
        outer_parameters: &[String],
    ) {
        let kind = TypeKind::from(decl.kind);
        let location = Location::new(source.name.clone(), decl.name.span);
        let type_parameters: Vec<String> = outer_parameters
            .iter()
            .cloned()
            .chain(decl.type_parameters.iter().map(|parameter| parameter.name.clone()))
            .collect();
        let fragment = Fragment {
            location: location.clone(),
            context,
            type_parameters: type_parameters.clone(),
            bases: decl.bases.clone(),
        };

        let existing = self.table.member(parent, &decl.name.name, decl.arity());
        let index = match existing {
            Some(index) => {
                let data = &mut self.table.types[index.0];
                let name = display_name(&self.table.namespaces[namespace.0].path, &data.name);
                let previous = &data.locations[0];

                if !(data.partial && decl.is_partial()) {
                    self.errors.push(ResolveError::duplicate_declaration(
                        name,
                        &source.text,
                        &location,
                        previous,
                    ));
                    return;
                }
                if data.kind != kind {
                    self.errors.push(ResolveError::conflicting_partial_kinds(
                        name,
                        data.kind,
                        kind,
                        &source.text,
                        &location,
                        previous,
                    ));
                    return;
                }

                debug!(%name, at = %location, "merged partial declaration");
                data.locations.push(location);
                data.fragments.push(fragment);
                index
            }
            None => {
                let index = TypeIndex(self.table.types.len());
                self.table.types.push(TypeData {
                    name: decl.name.name.clone(),
                    arity: decl.arity(),
                    kind,
                    parent,
                    namespace,
                    locations: vec![location],
                    fragments: vec![fragment],
                    partial: decl.is_partial(),
                });
                self.table
                    .members
                    .entry((parent, decl.arity()))
                    .or_default()
                    .insert(decl.name.name.clone(), index);
                index
            }
        };

        for nested in &decl.nested {
            self.declare(
                source,
                nested,
                Parent::Type(index),
                namespace,
                context,
                &type_parameters,
            );
        }
    }
}
