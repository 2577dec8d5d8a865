//! Governing equations.
//!
//! - Shallow water wave relations (celerity, Froude, Courant)
//! - Characteristic compatibility relations for the MOC scheme

mod characteristics;
mod shallow_water;

pub use characteristics::{Characteristics, NodeHydraulics, SourceTermSign};
pub use shallow_water::{NodeState, ShallowWater1D};
