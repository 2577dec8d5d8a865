//! Scenario configuration.
//!
//! Everything a run needs is collected in an immutable [`ScenarioConfig`]
//! that is validated once and then passed by reference. The default value
//! is the reference flood-wave scenario: a 20 km, 25 m wide channel with a
//! 100 → 500 m³/s Gaussian inflow pulse peaking after 1.5 hours.
//!
//! # Example
//!
//! ```
//! use moc_rs::config::{InflowConfig, ScenarioConfig};
//!
//! let config = ScenarioConfig::default()
//!     .with_nodes(101)
//!     .with_dt(10.0)
//!     .with_inflow(InflowConfig::Constant { discharge: 100.0 });
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::equations::{ShallowWater1D, SourceTermSign};
use crate::mesh::RectangularSection;
use crate::source::{ManningFriction, NormalDepthMethod};

/// Errors detected while validating a scenario, before any time stepping.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// A physical or numerical parameter is zero, negative or not finite.
    #[error("{parameter} must be positive and finite, got {value}")]
    NonPositive { parameter: &'static str, value: f64 },

    /// The spatial grid needs both boundary nodes.
    #[error("spatial grid needs at least 2 nodes, got {0}")]
    TooFewNodes(usize),

    /// The temporal grid needs an initial row and at least one computed row.
    #[error("duration {duration}s with dt={dt}s gives {n_steps} time levels; need at least 2")]
    TooFewSteps {
        duration: f64,
        dt: f64,
        n_steps: usize,
    },

    /// dt is so small relative to the duration that the level count overflows.
    #[error("duration {duration}s with dt={dt}s exceeds {limit} time levels")]
    TooManySteps { duration: f64, dt: f64, limit: usize },

    /// The time × node buffers would exceed the storage limit.
    #[error("{n_steps} time levels x {n_nodes} nodes exceeds the limit of {limit} values per field")]
    FieldTooLarge {
        n_steps: usize,
        n_nodes: usize,
        limit: usize,
    },

    /// The downstream fixed-point loop must run at least once.
    #[error("downstream boundary needs at least one fixed-point iteration")]
    NoOutfallIterations,

    /// Tabulated inflow is empty, unsorted or mismatched.
    #[error("invalid inflow series: {0}")]
    InvalidSeries(String),

    /// A sampled inflow discharge is not strictly positive.
    #[error("inflow discharge at step {step} is {discharge}; must be positive")]
    NonPositiveInflow { step: usize, discharge: f64 },

    /// Newton iteration for the rectangular normal depth failed.
    #[error("normal depth solve did not converge for Q={discharge} m³/s after {iterations} iterations")]
    NormalDepthDiverged { discharge: f64, iterations: usize },
}

pub(crate) fn require_positive(parameter: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { parameter, value })
    }
}

/// Prismatic rectangular channel.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Channel {
    /// Channel length L (m)
    pub length: f64,
    /// Bottom width B (m)
    pub width: f64,
    /// Manning roughness n (s/m^{1/3})
    pub manning_n: f64,
    /// Bed slope S0 (m/m)
    pub bed_slope: f64,
    /// Gravitational acceleration g (m/s²)
    pub gravity: f64,
}

impl Default for Channel {
    fn default() -> Self {
        Self {
            length: 20_000.0,
            width: 25.0,
            manning_n: 0.025,
            bed_slope: 0.0002,
            gravity: 9.81,
        }
    }
}

impl Channel {
    /// Check that every parameter is positive and finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("channel length", self.length)?;
        require_positive("channel width", self.width)?;
        require_positive("manning roughness", self.manning_n)?;
        require_positive("bed slope", self.bed_slope)?;
        require_positive("gravity", self.gravity)
    }

    /// Cross-section geometry.
    pub fn section(&self) -> RectangularSection {
        RectangularSection::new(self.width)
    }

    /// Manning friction law for this channel.
    pub fn friction(&self) -> ManningFriction {
        ManningFriction::new(self.manning_n, self.bed_slope)
    }

    /// Shallow water wave relations.
    pub fn equation(&self) -> ShallowWater1D {
        ShallowWater1D::new(self.gravity)
    }
}

/// Spatial discretization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Number of nodes N, including both boundary nodes
    pub n_nodes: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { n_nodes: 51 }
    }
}

/// Temporal discretization.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    /// Simulated duration (s)
    pub duration: f64,
    /// First guess for dt (s); replaced once if it violates the CFL bound
    pub initial_dt: f64,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            duration: 5.0 * 3600.0,
            initial_dt: 20.0,
        }
    }
}

/// Upstream inflow hydrograph.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum InflowConfig {
    /// Gaussian flood pulse on top of a constant base flow:
    /// Q(t) = Q_base + (Q_peak - Q_base) * exp(-(t - t_peak)² / (2 σ²))
    Gaussian {
        base_discharge: f64,
        peak_discharge: f64,
        peak_time: f64,
        pulse_width: f64,
    },
    /// Constant discharge.
    Constant { discharge: f64 },
    /// Tabulated hydrograph, linearly interpolated and held constant
    /// beyond either end. Times must be strictly increasing.
    Series { times: Vec<f64>, discharges: Vec<f64> },
}

impl Default for InflowConfig {
    fn default() -> Self {
        Self::Gaussian {
            base_discharge: 100.0,
            peak_discharge: 500.0,
            peak_time: 1.5 * 3600.0,
            pulse_width: 3600.0,
        }
    }
}

impl InflowConfig {
    /// Discharge used to build the steady initial state.
    pub fn base_discharge(&self) -> f64 {
        match self {
            Self::Gaussian { base_discharge, .. } => *base_discharge,
            Self::Constant { discharge } => *discharge,
            Self::Series { discharges, .. } => discharges.first().copied().unwrap_or(f64::NAN),
        }
    }

    /// Check shape parameters. Positivity of every sample is checked
    /// again once the hydrograph is sampled on the final time grid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::Gaussian {
                base_discharge,
                peak_discharge,
                peak_time,
                pulse_width,
            } => {
                require_positive("base discharge", *base_discharge)?;
                require_positive("peak discharge", *peak_discharge)?;
                require_positive("pulse width", *pulse_width)?;
                if !peak_time.is_finite() {
                    return Err(ConfigError::NonPositive {
                        parameter: "peak time",
                        value: *peak_time,
                    });
                }
                Ok(())
            }
            Self::Constant { discharge } => require_positive("discharge", *discharge),
            Self::Series { times, discharges } => {
                if times.is_empty() {
                    return Err(ConfigError::InvalidSeries("no samples".into()));
                }
                if times.len() != discharges.len() {
                    return Err(ConfigError::InvalidSeries(format!(
                        "{} times but {} discharges",
                        times.len(),
                        discharges.len()
                    )));
                }
                if times.iter().any(|t| !t.is_finite()) {
                    return Err(ConfigError::InvalidSeries("times must be finite".into()));
                }
                if times.windows(2).any(|w| !(w[1] > w[0])) {
                    return Err(ConfigError::InvalidSeries(
                        "times must be strictly increasing".into(),
                    ));
                }
                for &q in discharges {
                    require_positive("series discharge", q)?;
                }
                Ok(())
            }
        }
    }
}

/// Numerical scheme options.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemeConfig {
    /// Sign convention for the g (S0 - Sf) dt term of both invariants
    pub source_sign: SourceTermSign,
    /// How the uniform initial depth is obtained from the base discharge
    pub normal_depth: NormalDepthMethod,
    /// Fixed number of downstream fixed-point passes
    pub outfall_iterations: usize,
    /// Courant number above which a warning is emitted
    pub courant_limit: f64,
    /// Target Courant number when the initial dt has to be reduced
    pub cfl_safety_factor: f64,
    /// Run the interior sweep on the rayon pool (needs the `parallel` feature)
    pub parallel: bool,
}

impl Default for SchemeConfig {
    fn default() -> Self {
        Self {
            source_sign: SourceTermSign::default(),
            normal_depth: NormalDepthMethod::default(),
            outfall_iterations: 3,
            courant_limit: 1.0,
            cfl_safety_factor: 0.9,
            parallel: false,
        }
    }
}

impl SchemeConfig {
    /// Check the scheme options.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.outfall_iterations == 0 {
            return Err(ConfigError::NoOutfallIterations);
        }
        require_positive("courant limit", self.courant_limit)?;
        require_positive("CFL safety factor", self.cfl_safety_factor)
    }
}

/// Complete description of one flood-wave run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub channel: Channel,
    pub grid: GridConfig,
    pub time: TimeConfig,
    pub inflow: InflowConfig,
    pub scheme: SchemeConfig,
}

impl ScenarioConfig {
    /// Validate all sections.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.channel.validate()?;
        if self.grid.n_nodes < 2 {
            return Err(ConfigError::TooFewNodes(self.grid.n_nodes));
        }
        require_positive("duration", self.time.duration)?;
        require_positive("initial dt", self.time.initial_dt)?;
        self.inflow.validate()?;
        self.scheme.validate()
    }

    /// Replace the channel.
    pub fn with_channel(mut self, channel: Channel) -> Self {
        self.channel = channel;
        self
    }

    /// Set the number of nodes.
    pub fn with_nodes(mut self, n_nodes: usize) -> Self {
        self.grid.n_nodes = n_nodes;
        self
    }

    /// Set the initial time step guess.
    pub fn with_dt(mut self, dt: f64) -> Self {
        self.time.initial_dt = dt;
        self
    }

    /// Set the simulated duration.
    pub fn with_duration(mut self, duration: f64) -> Self {
        self.time.duration = duration;
        self
    }

    /// Set the upstream inflow.
    pub fn with_inflow(mut self, inflow: InflowConfig) -> Self {
        self.inflow = inflow;
        self
    }

    /// Set the source term sign convention.
    pub fn with_source_sign(mut self, sign: SourceTermSign) -> Self {
        self.scheme.source_sign = sign;
        self
    }

    /// Set the initial normal depth method.
    pub fn with_normal_depth(mut self, method: NormalDepthMethod) -> Self {
        self.scheme.normal_depth = method;
        self
    }

    /// Set the number of downstream fixed-point passes.
    pub fn with_outfall_iterations(mut self, iterations: usize) -> Self {
        self.scheme.outfall_iterations = iterations;
        self
    }

    /// Enable or disable the parallel interior sweep.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.scheme.parallel = parallel;
        self
    }
}
