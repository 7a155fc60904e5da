//! Diagnostic events raised by the numerical core
//!
//! Solver problems are not failures: the caller still receives a
//! result, and the event is handed to a [`DiagnosticSink`].

use std::fmt;
use std::sync::Mutex;

/// Which Vincenty problem raised an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Problem {
    Inverse,
    Direct,
}

impl Problem {
    pub fn name(&self) -> &'static str {
        match self {
            Problem::Inverse => "inverse",
            Problem::Direct => "direct",
        }
    }
}

/// A non-fatal event observed during computation
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// The iteration cap was reached before the tolerance was met
    NonConvergence {
        problem: Problem,
        iterations: u32,
        /// Last difference between successive iterates (radians)
        residual: f64,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::NonConvergence { problem, iterations, residual } => write!(
                f,
                "Vincenty {} formula failed to converge after {} iterations (residual {:e} rad)",
                problem.name(),
                iterations,
                residual
            ),
        }
    }
}

/// Receives diagnostic events. Shared across sections, hence `Send + Sync`.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to the `log` facade as warnings
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&self, diagnostic: Diagnostic) {
        log::warn!("{}", diagnostic);
    }
}

/// Keeps every diagnostic in memory
#[derive(Debug, Default)]
pub struct CollectingSink {
    events: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the events collected so far
    pub fn events(&self) -> Vec<Diagnostic> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.events().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, diagnostic: Diagnostic) {
        match self.events.lock() {
            Ok(mut events) => events.push(diagnostic),
            Err(poisoned) => poisoned.into_inner().push(diagnostic),
        }
    }
}
