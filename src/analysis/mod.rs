//! Stability checks and post-run analysis.
//!
//! - [`CflGuard`]: initial time step reduction and per-update Courant checks
//! - [`MassBalance`]: inflow/outflow volumes against storage change
//! - [`Attenuation`]: flood peak reduction and travel time between two nodes
//!
//! # Example
//!
//! ```no_run
//! use moc_rs::analysis::{Attenuation, MassBalance};
//! use moc_rs::config::ScenarioConfig;
//! use moc_rs::simulation::Simulation;
//! use moc_rs::types::NodeIndex;
//!
//! let output = Simulation::new(ScenarioConfig::default())?.run()?;
//! let balance: MassBalance = output.mass_balance();
//! println!("volume error: {:.2}%", 100.0 * balance.relative_error());
//!
//! let att: Attenuation = output.attenuation(NodeIndex::ZERO, output.mesh.last());
//! println!("peak {:.0} -> {:.0} m³/s, lag {:.0} s", att.upstream.discharge, att.downstream.discharge, att.lag());
//! # Ok::<(), moc_rs::simulation::SimulationError>(())
//! ```

mod attenuation;
mod balance;
mod stability;

pub use attenuation::{Attenuation, PeakFlow};
pub use balance::{MassBalance, trapezoid};
pub use stability::{
    CFL_SAFETY_FACTOR, COURANT_LIMIT, CflGuard, CflStats, TimeStepAdjustment,
};
