//! Source terms for the 1D Saint-Venant equations.
//!
//! The momentum source along a characteristic is g (S0 - Sf): bed slope
//! drives the flow, Manning friction resists it.

mod friction;

pub use friction::{ManningFriction, NormalDepthMethod};
