//! Name resolution for base-list references
//!
//! Lookup for a simple name walks outward: containing types first, then each
//! enclosing namespace body. Within one body the namespace's own members win
//! over aliases, and aliases win over types imported by `using` directives.
//! The first segment of a dotted name is found that way and the rest is looked
//! up member by member.

use super::table::{Fragment, LexicalContext, NamespaceId, Parent, SymbolTable, TypeIndex};
use tracing::debug;
use unimpl_parser::{QualifiedName, TypeRef, UsingKind};

/// One segment of a written name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub name: &'a str,
    pub arity: usize,
}

impl<'a> Segment<'a> {
    pub fn new(name: &'a str, arity: usize) -> Self {
        Self { name, arity }
    }

    fn of_type_ref(reference: &'a TypeRef) -> Vec<Self> {
        reference
            .segments
            .iter()
            .map(|segment| Segment::new(&segment.name.name, segment.arity))
            .collect()
    }

    fn of_qualified_name(name: &'a QualifiedName) -> Vec<Self> {
        name.segment_names().map(|name| Segment::new(name, 0)).collect()
    }
}

/// What a (partial) name refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Namespace(NamespaceId),
    Type(TypeIndex),
}

#[derive(Debug, Clone, Copy)]
pub struct Resolver<'t> {
    table: &'t SymbolTable,
}

impl<'t> Resolver<'t> {
    pub fn new(table: &'t SymbolTable) -> Self {
        Self { table }
    }

    /// Every base type of `index` that resolves to a declared type
    ///
    /// References from all partial fragments are included, in fragment order
    /// and without duplicates.
    pub fn direct_bases(&self, index: TypeIndex) -> Vec<TypeIndex> {
        let data = self.table.get(index);
        let mut bases = Vec::new();

        for fragment in &data.fragments {
            for reference in &fragment.bases {
                match self.resolve_reference(index, fragment, reference) {
                    Some(base) if !bases.contains(&base) => bases.push(base),
                    Some(_) => {}
                    None => debug!(
                        reference = %reference,
                        at = %fragment.location,
                        "base type does not resolve to a declared type"
                    ),
                }
            }
        }

        bases
    }

    /// Resolve one reference written in `fragment`, a declaration of `declaring`
    pub fn resolve_reference(
        &self,
        declaring: TypeIndex,
        fragment: &Fragment,
        reference: &TypeRef,
    ) -> Option<TypeIndex> {
        let segments = Segment::of_type_ref(reference);
        let (first, rest) = segments.split_first()?;

        let start = if reference.is_global {
            self.in_namespace(NamespaceId::ROOT, *first)?
        } else {
            if first.arity == 0 && fragment.type_parameters.iter().any(|p| p == first.name) {
                return None;
            }
            self.lookup_simple_name(declaring, fragment, *first)?
        };

        match self.descend_all(start, rest)? {
            Entity::Type(index) => Some(index),
            Entity::Namespace(_) => None,
        }
    }

    /// Find a type by its full path from the global namespace
    pub fn lookup_path(&self, segments: &[Segment<'_>]) -> Option<TypeIndex> {
        match self.descend_all(Entity::Namespace(NamespaceId::ROOT), segments)? {
            Entity::Type(index) => Some(index),
            Entity::Namespace(_) => None,
        }
    }

    fn lookup_simple_name(
        &self,
        declaring: TypeIndex,
        fragment: &Fragment,
        segment: Segment<'_>,
    ) -> Option<Entity> {
        let mut parent = self.table.get(declaring).parent;
        while let Parent::Type(container) = parent {
            if let Some(found) = self.table.member(parent, segment.name, segment.arity) {
                return Some(Entity::Type(found));
            }
            parent = self.table.get(container).parent;
        }

        let context = self.table.context(fragment.context);
        (0..context.levels.len()).find_map(|level| {
            self.in_namespace(context.levels[level].namespace, segment)
                .or_else(|| self.through_usings(context, level, segment))
        })
    }

    /// Member type or child namespace of `namespace`
    fn in_namespace(&self, namespace: NamespaceId, segment: Segment<'_>) -> Option<Entity> {
        if let Some(found) = self.table.member(Parent::Namespace(namespace), segment.name, segment.arity) {
            return Some(Entity::Type(found));
        }
        if segment.arity > 0 {
            return None;
        }
        self.table
            .child_namespace(namespace, segment.name)
            .map(Entity::Namespace)
    }

    fn descend(&self, entity: Entity, segment: Segment<'_>) -> Option<Entity> {
        match entity {
            Entity::Namespace(namespace) => self.in_namespace(namespace, segment),
            Entity::Type(index) => self
                .table
                .member(Parent::Type(index), segment.name, segment.arity)
                .map(Entity::Type),
        }
    }

    fn descend_all(&self, start: Entity, segments: &[Segment<'_>]) -> Option<Entity> {
        segments
            .iter()
            .try_fold(start, |entity, segment| self.descend(entity, *segment))
    }

    /// Names brought in by the using directives of one namespace body
    fn through_usings(
        &self,
        context: &LexicalContext,
        level: usize,
        segment: Segment<'_>,
    ) -> Option<Entity> {
        let usings = &context.levels[level].usings;

        if segment.arity == 0 {
            let alias = usings.iter().find_map(|using| match &using.kind {
                UsingKind::Alias { alias, target } if alias.name == segment.name => Some(target),
                _ => None,
            });
            if let Some(target) = alias {
                return self.resolve_directive_target(
                    context,
                    level,
                    target.is_global,
                    &Segment::of_type_ref(target),
                );
            }
        }

        let mut imported: Vec<TypeIndex> = Vec::new();
        for using in usings {
            let container = match &using.kind {
                UsingKind::Namespace(name) => self.resolve_directive_target(
                    context,
                    level,
                    name.is_global,
                    &Segment::of_qualified_name(name),
                ),
                UsingKind::Static(target) => match self.resolve_directive_target(
                    context,
                    level,
                    target.is_global,
                    &Segment::of_type_ref(target),
                ) {
                    Some(Entity::Type(index)) => Some(Entity::Type(index)),
                    _ => None,
                },
                UsingKind::Alias { .. } => None,
            };

            let found = match container {
                Some(Entity::Namespace(namespace)) => self
                    .table
                    .member(Parent::Namespace(namespace), segment.name, segment.arity),
                Some(Entity::Type(index)) => {
                    self.table.member(Parent::Type(index), segment.name, segment.arity)
                }
                None => None,
            };
            if let Some(found) = found {
                if !imported.contains(&found) {
                    imported.push(found);
                }
            }
        }

        match imported.as_slice() {
            [] => None,
            [single] => Some(Entity::Type(*single)),
            candidates => {
                debug!(
                    name = segment.name,
                    candidates = candidates.len(),
                    "ambiguous name imported by several using directives"
                );
                None
            }
        }
    }

    /// Targets of using directives are resolved from their own body outward,
    /// without consulting any using directive
    fn resolve_directive_target(
        &self,
        context: &LexicalContext,
        level: usize,
        is_global: bool,
        segments: &[Segment<'_>],
    ) -> Option<Entity> {
        let (first, rest) = segments.split_first()?;
        let start = if is_global {
            self.in_namespace(NamespaceId::ROOT, *first)?
        } else {
            context.levels[level..]
                .iter()
                .find_map(|outer| self.in_namespace(outer.namespace, *first))?
        };
        self.descend_all(start, rest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::Program;
    use pretty_assertions::assert_eq;

    fn bases_of(program: &Program, path: &str) -> Vec<String> {
        let symbol = program.lookup(path).unwrap();
        let resolver = Resolver::new(program.table());
        resolver
            .direct_bases(symbol.index())
            .into_iter()
            .map(|base| program.table().display_name(base))
            .collect()
    }

    #[test]
    fn test_same_namespace_reference() {
        let program = Program::from_sources([(
            "Test0.cs",
            "namespace N { interface I {} class C : I {} }",
        )])
        .unwrap();

        assert_eq!(bases_of(&program, "N.C"), vec!["N.I"]);
    }

    #[test]
    fn test_inner_namespace_shadows_outer() {
        let program = Program::from_sources([(
            "Test0.cs",
            "namespace N { interface I {} namespace Abstractions { interface I {} class C : I {} } }",
        )])
        .unwrap();

        let symbol = program.lookup("N.Abstractions.C").unwrap();
        let expected = program.lookup("N.Abstractions.I").unwrap();
        assert_eq!(
            Resolver::new(program.table()).direct_bases(symbol.index()),
            vec![expected.index()]
        );
    }

    #[test]
    fn test_relative_using_inside_namespace() {
        let program = Program::from_sources([(
            "Test0.cs",
            "namespace N { namespace Abstractions { interface I {} } namespace Foo { using Abstractions; class C : I {} } }",
        )])
        .unwrap();

        assert_eq!(bases_of(&program, "N.Foo.C"), vec!["N.Abstractions.I"]);
    }

    #[test]
    fn test_alias_to_type_and_namespace() {
        let program = Program::from_sources([(
            "Test0.cs",
            "using Shape = Geometry.IShape; using Geo = Geometry;
             namespace Geometry { interface IShape {} interface IArea {} }
             class Square : Shape, Geo.IArea {}",
        )])
        .unwrap();

        assert_eq!(
            bases_of(&program, "Square"),
            vec!["Geometry.IShape", "Geometry.IArea"]
        );
    }

    #[test]
    fn test_using_static_imports_nested_types() {
        let program = Program::from_sources([(
            "Test0.cs",
            "using static Outer; class Outer { public interface INested {} } class C : INested {}",
        )])
        .unwrap();

        assert_eq!(bases_of(&program, "C"), vec!["INested"]);
    }

    #[test]
    fn test_global_using_applies_to_other_files() {
        let program = Program::from_sources([
            ("Test0.cs", "global using Contracts; namespace Contracts { interface IService {} }"),
            ("Test1.cs", "namespace App { class Service : IService {} }"),
        ])
        .unwrap();

        assert_eq!(bases_of(&program, "App.Service"), vec!["Contracts.IService"]);
    }

    #[test]
    fn test_global_prefix_skips_shadowing_member() {
        let program = Program::from_sources([(
            "Test0.cs",
            "interface IMarker {} namespace N { interface IMarker {} class C : global::IMarker {} }",
        )])
        .unwrap();

        let symbol = program.lookup("N.C").unwrap();
        let expected = program.lookup("IMarker").unwrap();
        assert_eq!(
            Resolver::new(program.table()).direct_bases(symbol.index()),
            vec![expected.index()]
        );
    }

    #[test]
    fn test_containing_type_members_are_in_scope() {
        let program = Program::from_sources([(
            "Test0.cs",
            "namespace N { class Outer { interface IInner {} class Inner : IInner {} } }",
        )])
        .unwrap();

        assert_eq!(bases_of(&program, "N.Outer.Inner"), vec!["N.IInner"]);
    }

    #[test]
    fn test_generic_arity_selects_declaration() {
        let program = Program::from_sources([(
            "Test0.cs",
            "interface IBox {} interface IBox<T> {} class Box<T> : IBox<T> {}",
        )])
        .unwrap();

        let symbol = program.lookup("Box`1").unwrap();
        let expected = program.lookup("IBox`1").unwrap();
        assert_eq!(
            Resolver::new(program.table()).direct_bases(symbol.index()),
            vec![expected.index()]
        );
    }

    #[test]
    fn test_type_parameters_and_external_types_do_not_resolve() {
        let program = Program::from_sources([(
            "Test0.cs",
            "interface T {} class C<T> : T, System.IDisposable {}",
        )])
        .unwrap();

        assert!(bases_of(&program, "C`1").is_empty());
    }

    #[test]
    fn test_ambiguous_import_does_not_resolve() {
        let program = Program::from_sources([(
            "Test0.cs",
            "using A; using B; namespace A { interface I {} } namespace B { interface I {} } class C : I {}",
        )])
        .unwrap();

        assert!(bases_of(&program, "C").is_empty());
    }
}
