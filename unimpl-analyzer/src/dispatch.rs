//! Symbol dispatcher
//!
//! Classifies each visited named type and forwards it to the coverage
//! registry. Safe to call from many visitation threads at once.

use crate::registry::CoverageRegistry;
use crate::symbols::{NamedType, TypeKind};
use tracing::trace;

/// How the dispatcher treats a category of type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolClass {
    /// Declares an interface that needs an implementor
    InterfaceLike,
    /// Can implement interfaces (classes, structs, records)
    ClassLike,
    /// Anything else; handled like a class only if the host exposes a closure
    Other,
}

impl SymbolClass {
    pub fn of(kind: TypeKind) -> Self {
        match kind {
            TypeKind::Interface => SymbolClass::InterfaceLike,
            TypeKind::Class | TypeKind::Struct | TypeKind::Record => SymbolClass::ClassLike,
            TypeKind::Enum | TypeKind::Delegate => SymbolClass::Other,
        }
    }
}

/// What a single visit did to the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// An interface declaration was recorded (or was already known)
    Registered,
    /// This many interfaces were marked as implemented
    Marked(usize),
    /// The symbol exposes an empty interface closure
    NoInterfaces,
    /// The symbol has no interface closure at all
    Ignored,
}

/// Routes visited symbols into a [`CoverageRegistry`]
#[derive(Debug)]
pub struct SymbolDispatcher<'r, S: NamedType> {
    registry: &'r CoverageRegistry<S>,
}

impl<'r, S: NamedType> SymbolDispatcher<'r, S> {
    pub fn new(registry: &'r CoverageRegistry<S>) -> Self {
        Self { registry }
    }

    /// Visit one named type
    ///
    /// Interfaces are registered; every other type marks each interface in its
    /// transitive closure as implemented. Repeated visits are harmless.
    pub fn visit(&self, symbol: &S) -> Dispatch {
        if SymbolClass::of(symbol.kind()) == SymbolClass::InterfaceLike {
            self.registry.register_if_absent(symbol.clone());
            trace!(interface = symbol.name(), "registered interface declaration");
            return Dispatch::Registered;
        }

        match symbol.all_interfaces() {
            None => Dispatch::Ignored,
            Some(interfaces) if interfaces.is_empty() => Dispatch::NoInterfaces,
            Some(interfaces) => {
                let count = interfaces.len();
                for interface in interfaces {
                    self.registry.mark_implemented(interface);
                }
                trace!(
                    implementor = symbol.name(),
                    kind = %symbol.kind(),
                    interfaces = count,
                    "marked implemented interfaces"
                );
                Dispatch::Marked(count)
            }
        }
    }
}
