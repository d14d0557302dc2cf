//! Property-based tests for visitation order independence
//!
//! The registry's final state, and therefore the findings, must not depend on
//! the order in which the host hands out symbols.

use crate::analysis::{run_analysis, CoverageAnalysis, SymbolHost, Visitation};
use crate::error::AnalysisError;
use crate::registry::CoverageRegistry;
use crate::symbols::NamedType;
use crate::tests::fixtures::FakeType;
use crate::{Program, Symbol, TypeKind};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::collections::HashMap;

/// Configuration for property-based tests
/// Runs fewer cases during development, full cases in CI
fn proptest_config() -> ProptestConfig {
    if std::env::var("CI").is_ok() {
        ProptestConfig::default()
    } else {
        ProptestConfig {
            cases: 32,
            max_shrink_iters: 100,
            ..ProptestConfig::default()
        }
    }
}

/// Named types declared across `SOURCES`, partial fragments merged
const SYMBOL_COUNT: usize = 8;

const SOURCES: [&str; 3] = [
    r#"
namespace N
{
    public interface IInterface { }
    namespace Abstractions
    {
        public interface IInterface { }
        public partial interface IPartial { }
        public class Implementation : IInterface { }
    }
}"#,
    r#"
namespace N.Abstractions
{
    public partial interface IPartial : IBase { }
    public interface IBase { }
    public interface IUnused { }
}"#,
    r#"
namespace M
{
    using N.Abstractions;
    public struct Value : IPartial { }
    public enum Kind { A }
}"#,
];

/// Visits the program's symbols in a fixed, caller-chosen order
struct PermutedHost<'p> {
    symbols: Vec<Symbol<'p>>,
}

impl<'p> SymbolHost<Symbol<'p>> for PermutedHost<'p> {
    fn visit_symbols(
        &self,
        visitor: &(dyn Fn(&Symbol<'p>) + Sync),
    ) -> Result<Visitation, AnalysisError> {
        for symbol in &self.symbols {
            visitor(symbol);
        }
        Ok(Visitation::Completed)
    }
}

fn program() -> Program {
    Program::from_sources(
        SOURCES
            .iter()
            .enumerate()
            .map(|(index, text)| (format!("Test{index}.cs"), *text)),
    )
    .unwrap()
}

fn snapshot_names(snapshot: HashMap<Symbol<'_>, bool>) -> Vec<(String, bool)> {
    let mut names: Vec<(String, bool)> = snapshot
        .into_iter()
        .map(|(symbol, implemented)| (symbol.display_name(), implemented))
        .collect();
    names.sort();
    names
}

fn visit_all<S: NamedType>(symbols: &[S]) -> CoverageAnalysis<S> {
    let analysis = CoverageAnalysis::new();
    for symbol in symbols {
        analysis.visit(symbol);
    }
    analysis
}

#[test]
fn test_reference_findings() {
    let program = program();
    assert_eq!(program.len(), SYMBOL_COUNT);
    let diagnostics = run_analysis(&PermutedHost {
        symbols: program.symbols(),
    })
    .unwrap();

    let messages: Vec<String> = diagnostics.iter().map(|d| d.message()).collect();
    assert_eq!(
        messages,
        vec![
            "Interface 'N.IInterface' is not implemented",
            "Interface 'N.Abstractions.IUnused' is not implemented",
        ]
    );
}

proptest! {
    #![proptest_config(proptest_config())]
    #[test]
    fn test_program_symbols_any_permutation(order in Just((0..SYMBOL_COUNT).collect::<Vec<_>>()).prop_shuffle()) {
        let program = program();
        let symbols = program.symbols();
        prop_assert_eq!(symbols.len(), order.len());

        let permuted: Vec<Symbol<'_>> = order.iter().map(|&index| symbols[index]).collect();
        let expected = snapshot_names(visit_all(&symbols).registry().snapshot());
        let actual = snapshot_names(visit_all(&permuted).registry().snapshot());
        prop_assert_eq!(actual, expected);

        let baseline = run_analysis(&PermutedHost { symbols }).unwrap();
        let shuffled = run_analysis(&PermutedHost { symbols: permuted }).unwrap();
        prop_assert_eq!(shuffled, baseline);
    }
}

/// Operations against a registry keyed by small integers
#[derive(Debug, Clone)]
enum Operation {
    Register(u8),
    Mark(u8),
}

fn operation() -> impl Strategy<Value = Operation> {
    prop_oneof![
        (0u8..16).prop_map(Operation::Register),
        (0u8..16).prop_map(Operation::Mark),
    ]
}

fn apply(operations: &[Operation]) -> HashMap<u8, bool> {
    let registry = CoverageRegistry::new();
    for operation in operations {
        match operation {
            Operation::Register(key) => registry.register_if_absent(*key),
            Operation::Mark(key) => registry.mark_implemented(*key),
        };
    }
    registry.into_snapshot()
}

proptest! {
    #![proptest_config(proptest_config())]
    #[test]
    fn test_registry_state_is_order_independent(
        (operations, shuffled) in prop::collection::vec(operation(), 0..64)
            .prop_flat_map(|operations| (Just(operations.clone()), Just(operations).prop_shuffle()))
    ) {
        prop_assert_eq!(apply(&operations), apply(&shuffled));
    }

    #[test]
    fn test_registry_operations_are_idempotent(operations in prop::collection::vec(operation(), 0..64)) {
        let doubled: Vec<Operation> = operations
            .iter()
            .flat_map(|operation| [operation.clone(), operation.clone()])
            .collect();
        prop_assert_eq!(apply(&operations), apply(&doubled));
    }

    #[test]
    fn test_flag_is_true_exactly_when_marked(operations in prop::collection::vec(operation(), 1..64)) {
        let snapshot = apply(&operations);
        for (key, implemented) in &snapshot {
            let marked = operations
                .iter()
                .any(|operation| matches!(operation, Operation::Mark(marked) if marked == key));
            prop_assert_eq!(*implemented, marked);
        }
    }

    #[test]
    fn test_fake_symbols_any_permutation(order in Just((0..6usize).collect::<Vec<_>>()).prop_shuffle()) {
        let base = FakeType::interface(1, &["N"], "IBase");
        let derived = FakeType::interface(2, &["N"], "IDerived");
        derived.set_interfaces(Some(vec![base.clone()]));
        let lonely = FakeType::interface(3, &[], "ILonely");
        let class = FakeType::implementor(4, TypeKind::Class, "Impl", &[derived.clone(), base.clone()]);
        let plain = FakeType::new(5, TypeKind::Struct, &["N"], "Plain");
        let kind = FakeType::new(6, TypeKind::Enum, &["N"], "Kind");
        let symbols = [base, derived, lonely, class, plain, kind];

        let permuted: Vec<FakeType> = order.iter().map(|&index| symbols[index].clone()).collect();
        let diagnostics = visit_all(&permuted).finish();
        let names: Vec<&str> = diagnostics.iter().map(|d| d.interface_name.as_str()).collect();
        prop_assert_eq!(names, vec!["ILonely"]);
    }
}
