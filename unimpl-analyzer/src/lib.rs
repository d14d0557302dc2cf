//! Unimplemented interface analysis
//!
//! Reports every declared interface that no class, struct or record in the
//! program implements, directly or through inheritance.
//!
//! ## Architecture
//!
//! - **Coverage engine**: a concurrent [`CoverageRegistry`] fed by the
//!   [`SymbolDispatcher`], swept into [`CoverageDiagnostic`]s once visitation
//!   has finished. The engine only sees [`NamedType`] handles and works with
//!   any host that can produce them.
//! - **Program host**: parses sources with `unimpl-parser`, merges partial
//!   declarations, resolves base lists and computes interface closures, then
//!   visits its symbols sequentially or on a rayon pool.

pub mod analysis;
pub mod diagnostic;
pub mod dispatch;
pub mod error;
pub mod program;
pub mod qualified_name;
pub mod registry;
pub mod sweep;
pub mod symbols;

pub use analysis::{run_analysis, CoverageAnalysis, SymbolHost, Visitation};
pub use diagnostic::{
    supported_rules, CoverageDiagnostic, Rule, Severity, SourceLookup, UNIMPLEMENTED_INTERFACE,
};
pub use dispatch::{Dispatch, SymbolClass, SymbolDispatcher};
pub use error::{AnalysisError, ProgramError, ResolveError};
pub use program::{CancellationToken, LoadedSource, Program, ProgramHost, Scheduling, Symbol};
pub use qualified_name::{display_name, qualify};
pub use registry::CoverageRegistry;
pub use sweep::sweep;
pub use symbols::{Location, NamedType, TypeKind};

use std::sync::Arc;

/// Analyse an already loaded program
pub fn check_program(
    program: &Program,
    scheduling: Scheduling,
) -> Result<Vec<CoverageDiagnostic>, AnalysisError> {
    run_analysis(&ProgramHost::new(program, scheduling))
}

/// Load `(name, text)` sources and analyse them (mainly for tests)
pub fn check_sources<I, N, T>(
    sources: I,
    scheduling: Scheduling,
) -> Result<Vec<CoverageDiagnostic>, AnalysisError>
where
    I: IntoIterator<Item = (N, T)>,
    N: Into<Arc<str>>,
    T: Into<String>,
{
    let program = Program::from_sources(sources)?;
    check_program(&program, scheduling)
}

// Version and metadata
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests;
