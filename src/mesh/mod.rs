//! Channel discretization.
//!
//! - Uniform 1D node grid along the channel axis
//! - Rectangular cross-section geometry

mod mesh1d;
mod section;

pub use mesh1d::{BoundaryFace, Mesh1D};
pub use section::RectangularSection;
