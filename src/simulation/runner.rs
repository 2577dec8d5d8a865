//! Simulation runner implementation.
//!
//! Builds everything a run needs from a [`ScenarioConfig`], marches the flow
//! field to the end of the horizon and packages the results.

use thiserror::Error;

use crate::analysis::{Attenuation, CflGuard, CflStats, MassBalance, TimeStepAdjustment};
use crate::boundary::InflowHydrograph;
use crate::config::{Channel, ConfigError, ScenarioConfig};
use crate::equations::NodeState;
use crate::mesh::Mesh1D;
use crate::solver::{
    Diagnostic, DiagnosticSink, DischargeField, FlowField, NullSink, SolveError,
};
use crate::time::{TemporalGrid, TimeMarcher};
use crate::types::{NodeIndex, StepIndex};

// =============================================================================
// Errors
// =============================================================================

/// Anything that can stop a scenario from producing output.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("invalid scenario: {0}")]
    Config(#[from] ConfigError),

    #[error("simulation aborted: {0}")]
    Solve(#[from] SolveError),
}

// =============================================================================
// Simulation Output
// =============================================================================

/// Results of a completed run.
#[derive(Clone, Debug)]
pub struct SimulationOutput {
    /// Channel the run was made on
    pub channel: Channel,
    /// Spatial grid; node coordinates in `mesh.coordinates`
    pub mesh: Mesh1D,
    /// Time of every level (s)
    pub times: Vec<f64>,
    /// Time step actually used (s)
    pub dt: f64,
    /// Depth and velocity at every (level, node)
    pub field: FlowField,
    /// Discharge at every (level, node)
    pub discharge: DischargeField,
    /// Uniform initial state
    pub initial: NodeState,
    /// Ordered diagnostic stream
    pub diagnostics: Vec<Diagnostic>,
    /// Initial time step reduction, if one was made
    pub adjustment: Option<TimeStepAdjustment>,
    /// Courant statistics over the run
    pub cfl: CflStats,
}

impl SimulationOutput {
    /// Node coordinates (m).
    pub fn x(&self) -> &[f64] {
        &self.mesh.coordinates
    }

    /// Number of time levels.
    pub fn n_steps(&self) -> usize {
        self.times.len()
    }

    /// Last time level.
    pub fn last_step(&self) -> StepIndex {
        StepIndex::new(self.times.len() - 1)
    }

    /// Volume balance over the run.
    pub fn mass_balance(&self) -> MassBalance {
        MassBalance::compute(
            &self.field,
            &self.discharge,
            &self.mesh,
            self.channel.width,
            self.dt,
        )
    }

    /// Peak attenuation between two nodes.
    pub fn attenuation(&self, upstream: NodeIndex, downstream: NodeIndex) -> Attenuation {
        Attenuation::between(&self.discharge, upstream, downstream, self.dt)
    }

    /// Per-update Courant warnings, in emission order.
    pub fn courant_warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_courant_warning())
    }
}

// =============================================================================
// Simulation
// =============================================================================

/// Records every diagnostic and forwards it to the caller's sink.
struct Recorder<'s, S: DiagnosticSink> {
    log: Vec<Diagnostic>,
    inner: &'s mut S,
}

impl<S: DiagnosticSink> DiagnosticSink for Recorder<'_, S> {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.log.push(diagnostic);
        self.inner.emit(diagnostic);
    }
}

/// A validated scenario, ready to run.
///
/// All sizes are fixed at construction: the CFL guard has already chosen
/// dt, so the flow field is allocated exactly once per run.
#[derive(Clone, Debug)]
pub struct Simulation {
    config: ScenarioConfig,
    mesh: Mesh1D,
    grid: TemporalGrid,
    hydrograph: InflowHydrograph,
    initial: NodeState,
    adjustment: Option<TimeStepAdjustment>,
}

impl Simulation {
    /// Validate a scenario and derive grids, initial state and inflow.
    pub fn new(config: ScenarioConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let channel = &config.channel;
        let mesh = Mesh1D::uniform(channel.length, config.grid.n_nodes)?;

        let base = config.inflow.base_discharge();
        let depth = channel
            .friction()
            .normal_depth(&channel.section(), base, config.scheme.normal_depth)?;
        let initial = NodeState::new(depth, base / (channel.width * depth));
        log::info!(
            "uniform initial state: Q={:.2} m³/s, y={:.4} m, v={:.4} m/s, Fr={:.3}",
            base,
            initial.depth,
            initial.velocity,
            channel.equation().froude(&initial)
        );

        let guard = CflGuard::from_scheme(&config.scheme);
        let wave_speed = channel.equation().max_wave_speed(&initial);
        let (dt, adjustment) = guard.initial_time_step(wave_speed, mesh.dx, config.time.initial_dt);
        if let Some(adjustment) = &adjustment {
            log::info!("CFL violation in initial state: {}", adjustment);
        }

        let grid = TemporalGrid::new(config.time.duration, dt)?;
        FlowField::checked_len(grid.n_steps(), mesh.n_nodes)?;
        let hydrograph = InflowHydrograph::from_config(&config.inflow, &grid)?;
        log::info!(
            "grid: {} nodes (dx={:.1} m), {} levels (dt={:.3} s)",
            mesh.n_nodes,
            mesh.dx,
            grid.n_steps(),
            dt
        );

        Ok(Self {
            config,
            mesh,
            grid,
            hydrograph,
            initial,
            adjustment,
        })
    }

    /// The validated scenario.
    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    /// Spatial grid.
    pub fn mesh(&self) -> &Mesh1D {
        &self.mesh
    }

    /// Temporal grid with the final dt.
    pub fn temporal_grid(&self) -> &TemporalGrid {
        &self.grid
    }

    /// Inflow sampled on the temporal grid.
    pub fn hydrograph(&self) -> &InflowHydrograph {
        &self.hydrograph
    }

    /// Uniform initial state.
    pub fn initial_state(&self) -> NodeState {
        self.initial
    }

    /// Initial time step reduction, if the requested dt was unstable.
    pub fn time_step_adjustment(&self) -> Option<TimeStepAdjustment> {
        self.adjustment
    }

    /// Run to the end of the horizon, keeping diagnostics in the output only.
    pub fn run(&self) -> Result<SimulationOutput, SolveError> {
        self.run_with_sink(&mut NullSink)
    }

    /// Run to the end of the horizon, also forwarding diagnostics to `sink`.
    pub fn run_with_sink<S: DiagnosticSink>(
        &self,
        sink: &mut S,
    ) -> Result<SimulationOutput, SolveError> {
        let channel = &self.config.channel;
        let mut recorder = Recorder {
            log: Vec::new(),
            inner: sink,
        };
        if let Some(adjustment) = self.adjustment {
            recorder.emit(Diagnostic::time_step_adjusted(adjustment));
        }

        let mut field = FlowField::new_uniform(self.grid.n_steps(), self.mesh.n_nodes, self.initial);
        let mut marcher = TimeMarcher::new(
            channel,
            &self.mesh,
            &self.grid,
            &self.hydrograph,
            &self.config.scheme,
        );
        if let Err(err) = marcher.run(&mut field, &mut recorder) {
            log::error!("{}", err);
            return Err(err);
        }

        let discharge = DischargeField::from_flow(&field, &channel.section());
        let cfl = marcher.cfl_stats();
        log::info!(
            "run complete: depth range [{:.3}, {:.3}] m, max Courant {:.3}, {} Courant warnings",
            field.min_depth(),
            field.max_depth(),
            cfl.max_courant,
            cfl.violations
        );

        Ok(SimulationOutput {
            channel: *channel,
            mesh: self.mesh.clone(),
            times: self.grid.times().collect(),
            dt: self.grid.dt(),
            field,
            discharge,
            initial: self.initial,
            diagnostics: recorder.log,
            adjustment: self.adjustment,
            cfl,
        })
    }
}

/// Validate and run a scenario in one call.
pub fn run_scenario(config: ScenarioConfig) -> Result<SimulationOutput, SimulationError> {
    Ok(Simulation::new(config)?.run()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InflowConfig;

    #[test]
    fn test_reference_setup() {
        let sim = Simulation::new(ScenarioConfig::default()).unwrap();
        assert_eq!(sim.mesh().n_nodes, 51);
        assert!((sim.mesh().dx - 400.0).abs() < 1e-9);
        assert_eq!(sim.temporal_grid().n_steps(), 900);
        assert!(sim.time_step_adjustment().is_none());
        assert_eq!(sim.hydrograph().len(), 900);

        let y = (100.0 * 0.025 / (25.0 * 0.0002_f64.sqrt())).powf(0.6);
        assert!((sim.initial_state().depth - y).abs() < 1e-12);
        assert!((sim.initial_state().velocity - 100.0 / (25.0 * y)).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let err = Simulation::new(ScenarioConfig::default().with_nodes(1)).unwrap_err();
        assert_eq!(err, ConfigError::TooFewNodes(1));

        let err = Simulation::new(ScenarioConfig::default().with_duration(30.0)).unwrap_err();
        assert!(matches!(err, ConfigError::TooFewSteps { .. }));

        let err = run_scenario(
            ScenarioConfig::default().with_inflow(InflowConfig::Constant { discharge: -5.0 }),
        )
        .unwrap_err();
        assert!(matches!(err, SimulationError::Config(_)));
    }

    #[test]
    fn test_degenerate_series_is_rejected_before_sampling() {
        let config = ScenarioConfig::default().with_inflow(InflowConfig::Series {
            times: vec![f64::NAN],
            discharges: vec![100.0],
        });
        let err = Simulation::new(config).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSeries(_)));
    }

    #[test]
    fn test_oversized_field_is_rejected() {
        let err = Simulation::new(ScenarioConfig::default().with_dt(1e-9)).unwrap_err();
        assert!(matches!(err, ConfigError::TooManySteps { .. }));

        // 20_000 levels fit the grid but not a 10_001-node field
        let config = ScenarioConfig::default()
            .with_nodes(10_001)
            .with_dt(0.125)
            .with_duration(2_500.0);
        let err = Simulation::new(config).unwrap_err();
        assert_eq!(
            err,
            ConfigError::FieldTooLarge {
                n_steps: 20_000,
                n_nodes: 10_001,
                limit: crate::solver::MAX_FIELD_VALUES,
            }
        );
    }

    #[test]
    fn test_short_run_output_shape() {
        let config = ScenarioConfig::default().with_duration(600.0);
        let output = run_scenario(config).unwrap();

        assert_eq!(output.n_steps(), 30);
        assert_eq!(output.x().len(), 51);
        assert!(output.field.is_complete());
        assert_eq!(output.discharge.n_steps(), 30);
        assert!(output.diagnostics.is_empty());
        assert_eq!(output.cfl.checks, 29 * 49);
        assert!((output.times[29] - 580.0).abs() < 1e-9);
    }

    #[test]
    fn test_sink_sees_same_stream_as_output() {
        let sim = Simulation::new(ScenarioConfig::default().with_dt(60.0).with_duration(1800.0)).unwrap();
        let mut seen: Vec<Diagnostic> = Vec::new();
        let output = sim.run_with_sink(&mut seen).unwrap();
        assert!(!seen.is_empty());
        assert_eq!(seen, output.diagnostics);
    }
}
