//! Analysis orchestration
//!
//! One [`CoverageAnalysis`] exists per run. The host feeds it every named type
//! through [`CoverageAnalysis::visit`], in any order and from any number of
//! threads, and then hands it over to [`CoverageAnalysis::finish`] once
//! visitation is over. Because `finish` takes the analysis by value, no visit
//! can still be borrowing the registry when the sweep reads it.

use crate::diagnostic::CoverageDiagnostic;
use crate::dispatch::{Dispatch, SymbolDispatcher};
use crate::error::AnalysisError;
use crate::registry::CoverageRegistry;
use crate::sweep::sweep;
use crate::symbols::NamedType;
use tracing::{debug, debug_span};

/// How a host's visitation pass ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visitation {
    /// Every named type was handed to the visitor
    Completed,
    /// The host stopped early; the registry may be missing symbols
    Cancelled,
}

/// Supplies named types to an analysis run
pub trait SymbolHost<S: NamedType> {
    /// Invoke `visitor` once for every named type
    ///
    /// Calls may happen in any order and concurrently. All calls must have
    /// returned before this method does.
    fn visit_symbols(&self, visitor: &(dyn Fn(&S) + Sync)) -> Result<Visitation, AnalysisError>;
}

/// State of a single analysis run
#[derive(Debug)]
pub struct CoverageAnalysis<S: NamedType> {
    registry: CoverageRegistry<S>,
}

impl<S: NamedType> CoverageAnalysis<S> {
    pub fn new() -> Self {
        Self {
            registry: CoverageRegistry::new(),
        }
    }

    /// Per-symbol visitation hook
    pub fn visit(&self, symbol: &S) -> Dispatch {
        SymbolDispatcher::new(&self.registry).visit(symbol)
    }

    pub fn registry(&self) -> &CoverageRegistry<S> {
        &self.registry
    }

    /// End-of-run hook: sweep the final registry into diagnostics
    pub fn finish(self) -> Vec<CoverageDiagnostic> {
        debug!(
            interfaces = self.registry.len(),
            unimplemented = self.registry.unimplemented_count(),
            "visitation complete"
        );
        sweep(self.registry.into_snapshot())
    }
}

impl<S: NamedType> Default for CoverageAnalysis<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Run a complete analysis over everything `host` exposes
///
/// A cancelled visitation discards the registry and yields
/// [`AnalysisError::Cancelled`]; no partial findings are produced.
pub fn run_analysis<S, H>(host: &H) -> Result<Vec<CoverageDiagnostic>, AnalysisError>
where
    S: NamedType,
    H: SymbolHost<S> + ?Sized,
{
    let _span = debug_span!("coverage_analysis").entered();
    let analysis = CoverageAnalysis::new();

    let visitor = |symbol: &S| {
        analysis.visit(symbol);
    };

    match host.visit_symbols(&visitor)? {
        Visitation::Completed => Ok(analysis.finish()),
        Visitation::Cancelled => {
            debug!(
                interfaces = analysis.registry().len(),
                "visitation cancelled, discarding registry"
            );
            Err(AnalysisError::Cancelled)
        }
    }
}
