//! Explicit time marching with the method of characteristics.
//!
//! Each step computes row t + 1 of the flow field from row t in three
//! phases:
//!
//! 1. Upstream boundary (node 0) from the inflow and the C- invariant of node 1
//! 2. Interior nodes 1..N-2, each from its two neighbours
//! 3. Downstream boundary (node N-1) from the C+ invariant of node N-2
//!
//! Interior updates are independent of each other. With the `parallel`
//! feature and `SchemeConfig::parallel` set they run on the rayon pool;
//! results are gathered in node order, so the diagnostic stream and the
//! first reported error do not depend on scheduling.
//!
//! Row t + 1 is committed only after all three phases succeed.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::analysis::{CflGuard, CflStats};
use crate::boundary::{BoundaryFailure, DischargeInflow, InflowHydrograph, ManningOutfall};
use crate::config::{Channel, SchemeConfig};
use crate::equations::{Characteristics, NodeHydraulics, NodeState};
use crate::mesh::{BoundaryFace, Mesh1D};
use crate::solver::{Diagnostic, DiagnosticSink, FlowField, ProgressReporter, SolveError};
use crate::time::TemporalGrid;
use crate::types::{NodeIndex, StepIndex};

/// Result of one interior update before it is checked and written.
#[derive(Clone, Copy, Debug)]
struct InteriorUpdate {
    state: NodeState,
    courant_a: f64,
    courant_b: f64,
}

/// Drives a flow field through every time level.
#[derive(Clone, Debug)]
pub struct TimeMarcher<'a> {
    channel: &'a Channel,
    mesh: &'a Mesh1D,
    grid: &'a TemporalGrid,
    hydrograph: &'a InflowHydrograph,
    chars: Characteristics,
    inflow: DischargeInflow,
    outfall: ManningOutfall,
    guard: CflGuard,
    parallel: bool,
}

impl<'a> TimeMarcher<'a> {
    /// Set up the per-step solvers for a fixed dt.
    pub fn new(
        channel: &'a Channel,
        mesh: &'a Mesh1D,
        grid: &'a TemporalGrid,
        hydrograph: &'a InflowHydrograph,
        scheme: &SchemeConfig,
    ) -> Self {
        if scheme.parallel && !cfg!(feature = "parallel") {
            log::warn!("parallel interior sweep requested but the `parallel` feature is disabled");
        }

        Self {
            channel,
            mesh,
            grid,
            hydrograph,
            chars: Characteristics::new(channel, grid.dt(), scheme.source_sign),
            inflow: DischargeInflow::new(channel),
            outfall: ManningOutfall::new(channel, scheme.outfall_iterations),
            guard: CflGuard::from_scheme(scheme),
            parallel: scheme.parallel,
        }
    }

    /// Courant statistics accumulated so far.
    pub fn cfl_stats(&self) -> CflStats {
        self.guard.stats()
    }

    /// March from the last committed row to the end of the field.
    pub fn run<S: DiagnosticSink>(
        &mut self,
        field: &mut FlowField,
        sink: &mut S,
    ) -> Result<(), SolveError> {
        let n_steps = field.n_steps().min(self.grid.n_steps());
        let mut progress = ProgressReporter::new(n_steps, 10);

        for k in field.committed_steps().saturating_sub(1)..n_steps.saturating_sub(1) {
            let t = StepIndex::new(k);
            self.step(field, t, sink)?;
            progress.maybe_report(k + 2, self.grid.time(t.next()));
        }

        log::debug!(
            "marched {} levels in {:.2}s wall time",
            field.committed_steps(),
            progress.elapsed()
        );
        Ok(())
    }

    /// Compute row t + 1 from row t.
    ///
    /// On error nothing is committed; row t + 1 may be partially written.
    pub fn step<S: DiagnosticSink>(
        &mut self,
        field: &mut FlowField,
        t: StepIndex,
        sink: &mut S,
    ) -> Result<(), SolveError> {
        let next = t.next();
        let n = field.n_nodes();
        let dt = self.grid.dt();
        let dx = self.mesh.dx;
        let time = self.grid.time(t);

        let (old, mut new) = field.step_rows(t);
        let hydraulics: Vec<NodeHydraulics> = (0..n)
            .map(|j| NodeHydraulics::evaluate(old.state(j), self.channel))
            .collect();

        // Upstream boundary
        let upstream = self
            .inflow
            .solve(&self.chars, &hydraulics[1], self.hydrograph.at(next))
            .map_err(|source| self.boundary_error(next, BoundaryFace::Upstream, source))?;
        new.set(0, upstream);

        // Interior sweep
        let updates = self.interior_updates(&hydraulics, dt, dx);
        for (j, update) in (1..n - 1).zip(updates) {
            let node = NodeIndex::new(j);
            if let Some(courant) = self.guard.check_pair(update.courant_a, update.courant_b) {
                sink.emit(Diagnostic::courant_exceeded(
                    t,
                    time,
                    node,
                    courant,
                    self.guard.limit(),
                ));
            }
            new.set(j, check_interior(next, node, update.state)?);
        }

        // Downstream boundary
        let downstream = self
            .outfall
            .solve(&self.chars, &hydraulics[n - 2], &old.state(n - 1))
            .map_err(|source| self.boundary_error(next, BoundaryFace::Downstream, source))?;
        new.set(n - 1, downstream);

        field.commit(next);
        Ok(())
    }

    fn interior_updates(&self, h: &[NodeHydraulics], dt: f64, dx: f64) -> Vec<InteriorUpdate> {
        let update = |j: usize| InteriorUpdate {
            state: self.chars.interior(&h[j - 1], &h[j + 1]),
            courant_a: h[j - 1].courant(dt, dx),
            courant_b: h[j + 1].courant(dt, dx),
        };
        let interior = 1..h.len() - 1;

        #[cfg(feature = "parallel")]
        if self.parallel {
            return interior.into_par_iter().map(update).collect();
        }

        interior.map(update).collect()
    }

    fn boundary_error(
        &self,
        step: StepIndex,
        face: BoundaryFace,
        source: BoundaryFailure,
    ) -> SolveError {
        SolveError::Boundary {
            step,
            time: self.grid.time(step),
            face,
            source,
        }
    }
}

fn check_interior(step: StepIndex, node: NodeIndex, state: NodeState) -> Result<NodeState, SolveError> {
    if !(state.depth.is_finite() && state.velocity.is_finite()) {
        return Err(SolveError::NonFinite {
            step,
            node,
            depth: state.depth,
            velocity: state.velocity,
        });
    }
    if state.depth <= 0.0 {
        return Err(SolveError::NonPhysicalDepth {
            step,
            node,
            depth: state.depth,
        });
    }
    Ok(state)
}
