//! Inheritance graph and interface closures using petgraph
//!
//! Each declared type is a node; an edge points from a type to each base it
//! names that resolves to a declared type. The interfaces reachable from a
//! node are everything it implements, directly or through base classes and
//! interface inheritance.

use super::resolve::Resolver;
use super::table::{SymbolTable, TypeIndex};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use tracing::trace;

#[derive(Debug, Clone)]
pub struct InheritanceGraph {
    /// Node `i` is the type with index `i`
    graph: DiGraph<TypeIndex, ()>,
}

impl InheritanceGraph {
    pub fn build(table: &SymbolTable, resolver: &Resolver<'_>) -> Self {
        let mut graph = DiGraph::with_capacity(table.len(), table.len());
        for index in table.indices() {
            graph.add_node(index);
        }

        for index in table.indices() {
            for base in resolver.direct_bases(index) {
                graph.update_edge(node(index), node(base), ());
            }
        }

        Self { graph }
    }

    /// Interfaces reachable from `index`, excluding `index` itself
    ///
    /// Cycles in erroneous input are tolerated: every node is visited once.
    pub fn interface_closure(&self, table: &SymbolTable, index: TypeIndex) -> Vec<TypeIndex> {
        let start = node(index);
        let mut dfs = Dfs::new(&self.graph, start);
        let mut interfaces = Vec::new();

        while let Some(reached) = dfs.next(&self.graph) {
            if reached == start {
                continue;
            }
            let reached = self.graph[reached];
            if table.get(reached).kind.is_interface() {
                interfaces.push(reached);
            }
        }

        trace!(
            ty = %table.display_name(index),
            interfaces = interfaces.len(),
            "computed interface closure"
        );
        interfaces
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

fn node(index: TypeIndex) -> NodeIndex {
    NodeIndex::new(index.index())
}
