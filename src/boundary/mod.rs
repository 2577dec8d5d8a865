//! Boundary conditions for the 1D characteristics scheme.
//!
//! Subcritical flow has one characteristic entering the domain at each end,
//! so each boundary combines the one invariant arriving from the interior
//! with one external relation.
//!
//! | Boundary | Interior relation | External relation |
//! |----------|-------------------|-------------------|
//! | `DischargeInflow` (node 0) | C- from node 1 | Q_in(t) from an `InflowHydrograph` |
//! | `ManningOutfall` (node N-1) | C+ from node N-2 | Manning rating curve |

mod downstream;
mod hydrograph;
mod upstream;

pub use downstream::ManningOutfall;
pub use hydrograph::InflowHydrograph;
pub use upstream::DischargeInflow;

use thiserror::Error;

/// Why a boundary solve produced no usable state.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum BoundaryFailure {
    /// The inflow quadratic has no real root.
    #[error("inflow quadratic has negative discriminant {discriminant}")]
    NegativeDiscriminant { discriminant: f64 },

    /// The solved depth is zero, negative or not finite.
    #[error("boundary depth {depth} is not positive")]
    NonPositiveDepth { depth: f64 },
}
