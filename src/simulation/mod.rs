//! Simulation runner.
//!
//! Ties together:
//! - Scenario validation and the uniform initial state
//! - The one-shot CFL time step adjustment
//! - Time marching and the diagnostic stream
//! - Derived discharge and post-run analysis
//!
//! # Example
//! ```no_run
//! use moc_rs::config::ScenarioConfig;
//! use moc_rs::simulation::Simulation;
//! use moc_rs::solver::LogSink;
//!
//! let sim = Simulation::new(ScenarioConfig::default().with_dt(10.0))?;
//! let output = sim.run_with_sink(&mut LogSink)?;
//! println!("{} levels, min depth {:.3} m", output.n_steps(), output.field.min_depth());
//! # Ok::<(), moc_rs::simulation::SimulationError>(())
//! ```

mod runner;

pub use runner::{Simulation, SimulationError, SimulationOutput, run_scenario};
