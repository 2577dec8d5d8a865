//! Volume balance over a completed run.
//!
//! Over the run, the volume that entered at node 0 minus the volume that
//! left at node N-1 should equal the change in stored volume:
//!
//! ∫ Q_0 dt - ∫ Q_{N-1} dt ≈ B ∫ y(x, T) dx - B ∫ y(x, 0) dx
//!
//! Both integrals use the trapezoidal rule on the grid. The characteristics
//! scheme is not conservative, so the residual is only small, not zero.

use crate::mesh::Mesh1D;
use crate::solver::{DischargeField, FlowField};
use crate::types::{NodeIndex, StepIndex};

/// Inflow, outflow and storage volumes (m³).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MassBalance {
    pub inflow_volume: f64,
    pub outflow_volume: f64,
    pub initial_storage: f64,
    pub final_storage: f64,
}

impl MassBalance {
    /// Evaluate the balance over the committed rows of a field.
    pub fn compute(
        field: &FlowField,
        discharge: &DischargeField,
        mesh: &Mesh1D,
        width: f64,
        dt: f64,
    ) -> Self {
        let n_steps = field.committed_steps();
        let last = StepIndex::new(n_steps - 1);
        let inflow = discharge.series(NodeIndex::ZERO);
        let outflow = discharge.series(mesh.last());

        Self {
            inflow_volume: trapezoid(&inflow[..n_steps], dt),
            outflow_volume: trapezoid(&outflow[..n_steps], dt),
            initial_storage: width * trapezoid(field.depth_row(StepIndex::ZERO), mesh.dx),
            final_storage: width * trapezoid(field.depth_row(last), mesh.dx),
        }
    }

    /// Stored volume gained over the run.
    pub fn storage_change(&self) -> f64 {
        self.final_storage - self.initial_storage
    }

    /// Net inflow minus storage change.
    pub fn residual(&self) -> f64 {
        self.inflow_volume - self.outflow_volume - self.storage_change()
    }

    /// Residual relative to the inflow volume.
    pub fn relative_error(&self) -> f64 {
        self.residual() / self.inflow_volume
    }
}

/// Trapezoidal integral of equally spaced samples.
pub fn trapezoid(values: &[f64], h: f64) -> f64 {
    match values {
        [] | [_] => 0.0,
        [first, .., last] => h * (values.iter().sum::<f64>() - 0.5 * (first + last)),
    }
}
