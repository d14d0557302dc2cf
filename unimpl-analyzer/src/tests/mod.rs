//! Scenario tests for the unimplemented interface analysis
//!
//! Sources are named `Test0.cs`, `Test1.cs`, ... in the order given, and
//! locations are checked as 1-based line and column of the interface name.


mod test_order_independence;
mod test_unimplemented_scenarios;

use crate::{check_sources, CoverageDiagnostic, Scheduling};

/// Analyse sources sequentially, naming them `Test{n}.cs`
pub fn check(sources: &[&str]) -> Vec<CoverageDiagnostic> {
    check_with(sources, Scheduling::Sequential)
}

pub fn check_with(sources: &[&str], scheduling: Scheduling) -> Vec<CoverageDiagnostic> {
    let named = sources
        .iter()
        .enumerate()
        .map(|(index, text)| (format!("Test{index}.cs"), text.to_string()));
    check_sources(named, scheduling).unwrap()
}

/// `(message, "file:line:col")` pairs for compact assertions
pub fn summarize(diagnostics: &[CoverageDiagnostic]) -> Vec<(String, String)> {
    diagnostics
        .iter()
        .map(|diagnostic| (diagnostic.message(), diagnostic.location.to_string()))
        .collect()
}
