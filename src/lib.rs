//! # moc-rs
//!
//! Explicit method-of-characteristics (MOC) solver for unsteady flow in a
//! 1D prismatic rectangular channel.
//!
//! The Saint-Venant equations are integrated along their characteristics
//! dx/dt = v ± c on a fixed node grid:
//! - Interior nodes from the C+ and C- invariants of their neighbours
//! - Inflow boundary from a discharge hydrograph (quadratic in depth)
//! - Outlet boundary from the Manning rating curve
//! - One-shot CFL adjustment of the initial time step, with per-update
//!   Courant warnings afterwards
//!
//! # Example
//!
//! ```no_run
//! use moc_rs::{NodeIndex, ScenarioConfig, Simulation};
//!
//! let output = Simulation::new(ScenarioConfig::default())?.run()?;
//! let outlet = output.mesh.last();
//! let att = output.attenuation(NodeIndex::ZERO, outlet);
//! println!("peak attenuated to {:.0}% after {:.0} s", 100.0 * att.ratio(), att.lag());
//! # Ok::<(), moc_rs::SimulationError>(())
//! ```

pub mod analysis;
pub mod boundary;
pub mod config;
pub mod equations;
pub mod mesh;
pub mod simulation;
pub mod solver;
pub mod source;
pub mod time;
pub mod types;

// Re-export main types for convenience
pub use analysis::{Attenuation, CflGuard, MassBalance, PeakFlow, TimeStepAdjustment};
pub use boundary::{BoundaryFailure, DischargeInflow, InflowHydrograph, ManningOutfall};
pub use config::{
    Channel, ConfigError, GridConfig, InflowConfig, ScenarioConfig, SchemeConfig, TimeConfig,
};
pub use equations::{Characteristics, NodeHydraulics, NodeState, ShallowWater1D, SourceTermSign};
pub use mesh::{BoundaryFace, Mesh1D, RectangularSection};
pub use simulation::{Simulation, SimulationError, SimulationOutput, run_scenario};
pub use solver::{
    Diagnostic, DiagnosticKind, DiagnosticSink, DischargeField, FlowField, LogSink, NullSink,
    SolveError,
};
pub use source::{ManningFriction, NormalDepthMethod};
pub use time::{TemporalGrid, TimeMarcher};
pub use types::{NodeIndex, StepIndex};
