//! Diagnostic stream and progress reporting for a run.
//!
//! Stability warnings are not errors: they are delivered, in the order they
//! arise, to a caller-supplied [`DiagnosticSink`]. Collect them in a `Vec`,
//! forward them to the `log` facade with [`LogSink`], or drop them with
//! [`NullSink`].
//!
//! # Example
//!
//! ```
//! use moc_rs::solver::{Diagnostic, DiagnosticKind, DiagnosticSink};
//! use moc_rs::types::{NodeIndex, StepIndex};
//!
//! let mut log: Vec<Diagnostic> = Vec::new();
//! log.emit(Diagnostic::courant_exceeded(StepIndex::new(3), 60.0, NodeIndex::new(7), 1.04, 1.0));
//! assert!(matches!(log[0].kind, DiagnosticKind::CourantExceeded { .. }));
//! ```

use std::fmt;
use std::time::Instant;

use crate::analysis::TimeStepAdjustment;
use crate::types::{NodeIndex, StepIndex};

/// What a diagnostic reports.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DiagnosticKind {
    /// The initial dt violated the CFL bound and was replaced.
    TimeStepAdjusted(TimeStepAdjustment),
    /// A neighbour of an interior update exceeded the Courant limit.
    CourantExceeded { courant: f64, limit: f64 },
}

/// One entry of the diagnostic stream.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Diagnostic {
    /// Time level the check was made at; `None` before marching starts
    pub step: Option<StepIndex>,
    /// Simulation time (s)
    pub time: f64,
    /// Node concerned, if any
    pub node: Option<NodeIndex>,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    /// Initial time step reduction, reported before the first step.
    pub fn time_step_adjusted(adjustment: TimeStepAdjustment) -> Self {
        Self {
            step: None,
            time: 0.0,
            node: None,
            kind: DiagnosticKind::TimeStepAdjusted(adjustment),
        }
    }

    /// Courant limit exceeded while updating node `node` from level `step`.
    pub fn courant_exceeded(
        step: StepIndex,
        time: f64,
        node: NodeIndex,
        courant: f64,
        limit: f64,
    ) -> Self {
        Self {
            step: Some(step),
            time,
            node: Some(node),
            kind: DiagnosticKind::CourantExceeded { courant, limit },
        }
    }

    /// True for warnings raised during marching.
    pub fn is_courant_warning(&self) -> bool {
        matches!(self.kind, DiagnosticKind::CourantExceeded { .. })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            DiagnosticKind::TimeStepAdjusted(adjustment) => {
                write!(f, "CFL violation in initial state: {}", adjustment)
            }
            DiagnosticKind::CourantExceeded { courant, limit } => {
                write!(f, "Courant {:.3} > {:.2}", courant, limit)?;
                if let Some(step) = self.step {
                    write!(f, " at {} ({:.1}s)", step, self.time)?;
                }
                if let Some(node) = self.node {
                    write!(f, ", {}", node)?;
                }
                Ok(())
            }
        }
    }
}

/// Receiver of the diagnostic stream.
pub trait DiagnosticSink {
    /// Accept one diagnostic.
    fn emit(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn emit(&mut self, diagnostic: Diagnostic) {
        (**self).emit(diagnostic);
    }
}

/// Forwards every diagnostic to `log::warn!`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        log::warn!("{}", diagnostic);
    }
}

/// Discards every diagnostic.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn emit(&mut self, _diagnostic: Diagnostic) {}
}

/// Progress reporter for long runs.
///
/// Logs at debug level each time another `report_interval_pct` percent of
/// the time levels has been computed.
#[derive(Debug)]
pub struct ProgressReporter {
    start_instant: Instant,
    total_steps: usize,
    last_reported_pct: u32,
    report_interval_pct: u32,
}

impl ProgressReporter {
    /// Create a reporter for `total_steps` time levels.
    pub fn new(total_steps: usize, report_interval_pct: u32) -> Self {
        Self {
            start_instant: Instant::now(),
            total_steps,
            last_reported_pct: 0,
            report_interval_pct: report_interval_pct.max(1),
        }
    }

    fn percent(&self, completed_steps: usize) -> u32 {
        if self.total_steps == 0 {
            return 100;
        }
        (completed_steps.min(self.total_steps) * 100 / self.total_steps) as u32
    }

    /// Report if another interval has been completed. Returns true if it did.
    pub fn maybe_report(&mut self, completed_steps: usize, time: f64) -> bool {
        let pct = self.percent(completed_steps);
        if pct < self.last_reported_pct + self.report_interval_pct {
            return false;
        }

        log::debug!(
            "{:3}% ({}/{} levels, t={:.0}s, wall {:.2}s)",
            pct,
            completed_steps,
            self.total_steps,
            time,
            self.start_instant.elapsed().as_secs_f64()
        );
        self.last_reported_pct = (pct / self.report_interval_pct) * self.report_interval_pct;
        true
    }

    /// Wall-clock time since creation (s).
    pub fn elapsed(&self) -> f64 {
        self.start_instant.elapsed().as_secs_f64()
    }
}
