//! Visitation of a loaded program
//!
//! [`ProgramHost`] hands every declared type of a [`Program`] to the analysis,
//! one after another or across a rayon thread pool.

use super::{Program, Symbol};
use crate::analysis::{SymbolHost, Visitation};
use crate::error::AnalysisError;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Order in which symbols are handed to the visitor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scheduling {
    /// Declaration order, on the calling thread
    #[default]
    Sequential,
    /// Reverse declaration order, on the calling thread
    Reversed,
    /// Concurrently on a dedicated pool; `None` lets rayon pick the size
    Parallel { threads: Option<usize> },
}

/// Shared flag that stops visitation between two symbols
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Debug, Clone)]
pub struct ProgramHost<'p> {
    program: &'p Program,
    scheduling: Scheduling,
    cancellation: CancellationToken,
}

impl<'p> ProgramHost<'p> {
    pub fn new(program: &'p Program, scheduling: Scheduling) -> Self {
        Self {
            program,
            scheduling,
            cancellation: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    fn visit_in_order<'a, I>(&self, symbols: I, visitor: &(dyn Fn(&Symbol<'p>) + Sync)) -> Visitation
    where
        I: Iterator<Item = &'a Symbol<'p>>,
        'p: 'a,
    {
        for symbol in symbols {
            if self.cancellation.is_cancelled() {
                return Visitation::Cancelled;
            }
            visitor(symbol);
        }
        Visitation::Completed
    }

    fn visit_parallel(
        &self,
        symbols: &[Symbol<'p>],
        threads: Option<usize>,
        visitor: &(dyn Fn(&Symbol<'p>) + Sync),
    ) -> Result<Visitation, AnalysisError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads.unwrap_or(0))
            .thread_name(|index| format!("unimpl-visit-{index}"))
            .build()
            .map_err(|error| AnalysisError::ThreadPool {
                message: error.to_string(),
            })?;
        debug!(threads = pool.current_num_threads(), "visiting in parallel");

        let cancellation = &self.cancellation;
        let outcome = pool.install(|| {
            symbols.par_iter().try_for_each(|symbol| {
                if cancellation.is_cancelled() {
                    return Err(());
                }
                visitor(symbol);
                Ok(())
            })
        });

        Ok(match outcome {
            Ok(()) => Visitation::Completed,
            Err(()) => Visitation::Cancelled,
        })
    }
}

impl<'p> SymbolHost<Symbol<'p>> for ProgramHost<'p> {
    fn visit_symbols(
        &self,
        visitor: &(dyn Fn(&Symbol<'p>) + Sync),
    ) -> Result<Visitation, AnalysisError> {
        let symbols = self.program.symbols();
        debug!(symbols = symbols.len(), scheduling = ?self.scheduling, "visiting symbols");

        match self.scheduling {
            Scheduling::Sequential => Ok(self.visit_in_order(symbols.iter(), visitor)),
            Scheduling::Reversed => Ok(self.visit_in_order(symbols.iter().rev(), visitor)),
            Scheduling::Parallel { threads } => self.visit_parallel(&symbols, threads, visitor),
        }
    }
}
