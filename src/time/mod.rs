//! Time discretization and explicit marching.

mod marching;
mod temporal;

pub use marching::TimeMarcher;
pub use temporal::TemporalGrid;
