//! Upstream inflow hydrograph sampled on the temporal grid.

use crate::config::{ConfigError, InflowConfig};
use crate::time::TemporalGrid;
use crate::types::StepIndex;

/// Inflow discharge Q_in(t_k), one sample per time level t_k = k dt.
#[derive(Clone, Debug, PartialEq)]
pub struct InflowHydrograph {
    dt: f64,
    values: Vec<f64>,
}

impl InflowHydrograph {
    /// Sample a configured inflow shape on the temporal grid.
    pub fn from_config(inflow: &InflowConfig, grid: &TemporalGrid) -> Result<Self, ConfigError> {
        inflow.validate()?;
        match inflow {
            InflowConfig::Gaussian {
                base_discharge,
                peak_discharge,
                peak_time,
                pulse_width,
            } => {
                let rise = peak_discharge - base_discharge;
                let two_sigma_sq = 2.0 * pulse_width * pulse_width;
                Self::from_fn(grid, |t| {
                    base_discharge + rise * (-(t - peak_time).powi(2) / two_sigma_sq).exp()
                })
            }
            InflowConfig::Constant { discharge } => Self::constant(grid, *discharge),
            InflowConfig::Series { times, discharges } => {
                Self::from_fn(grid, |t| interpolate(times, discharges, t))
            }
        }
    }

    /// Constant inflow.
    pub fn constant(grid: &TemporalGrid, discharge: f64) -> Result<Self, ConfigError> {
        Self::from_fn(grid, |_| discharge)
    }

    /// Sample an arbitrary function of time. Every sample must be positive.
    pub fn from_fn<F>(grid: &TemporalGrid, f: F) -> Result<Self, ConfigError>
    where
        F: Fn(f64) -> f64,
    {
        let values: Vec<f64> = grid.times().map(f).collect();
        if let Some((step, &discharge)) = values
            .iter()
            .enumerate()
            .find(|(_, q)| !(q.is_finite() && **q > 0.0))
        {
            return Err(ConfigError::NonPositiveInflow { step, discharge });
        }

        Ok(Self {
            dt: grid.dt(),
            values,
        })
    }

    /// Discharge at a time level.
    #[inline]
    pub fn at(&self, step: StepIndex) -> f64 {
        self.values[step.get()]
    }

    /// Number of samples (equals the number of time levels).
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if there are no samples.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Sample spacing (s).
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// All samples.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Largest sample and its time level.
    pub fn peak(&self) -> (StepIndex, f64) {
        self.values
            .iter()
            .copied()
            .enumerate()
            .fold((StepIndex::ZERO, f64::NEG_INFINITY), |best, (k, q)| {
                if q > best.1 { (StepIndex::new(k), q) } else { best }
            })
    }
}

/// Piecewise linear interpolation, held constant beyond the table ends.
/// Callers guarantee a non-empty table with increasing times.
fn interpolate(times: &[f64], values: &[f64], t: f64) -> f64 {
    let last = times.len() - 1;
    if t <= times[0] {
        return values[0];
    }
    if t >= times[last] {
        return values[last];
    }

    // First index with times[i] > t; t lies in [times[i-1], times[i])
    let i = times.partition_point(|&ti| ti <= t);
    let (t0, t1) = (times[i - 1], times[i]);
    let w = (t - t0) / (t1 - t0);
    values[i - 1] + w * (values[i] - values[i - 1])
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-10;

    fn grid() -> TemporalGrid {
        TemporalGrid::new(18_000.0, 20.0).unwrap()
    }

    #[test]
    fn test_gaussian_samples() {
        let hydro = InflowHydrograph::from_config(&InflowConfig::default(), &grid()).unwrap();
        assert_eq!(hydro.len(), 900);

        // Peak at t = 5400 s, i.e. step 270
        let (step, q) = hydro.peak();
        assert_eq!(step, StepIndex::new(270));
        assert!((q - 500.0).abs() < TOL);

        // One standard deviation before the peak
        let expected = 100.0 + 400.0 * (-0.5f64).exp();
        assert!((hydro.at(StepIndex::new(90)) - expected).abs() < TOL);

        // The pulse is already well above base flow at t = 0
        let first = hydro.at(StepIndex::ZERO);
        assert!((first - (100.0 + 400.0 * (-1.125f64).exp())).abs() < TOL);
    }

    #[test]
    fn test_constant() {
        let hydro = InflowHydrograph::constant(&grid(), 100.0).unwrap();
        assert!(hydro.values().iter().all(|&q| (q - 100.0).abs() < TOL));
    }

    #[test]
    fn test_series_interpolation_and_hold() {
        let inflow = InflowConfig::Series {
            times: vec![1000.0, 2000.0, 4000.0],
            discharges: vec![100.0, 300.0, 200.0],
        };
        let hydro = InflowHydrograph::from_config(&inflow, &grid()).unwrap();

        assert!((hydro.at(StepIndex::new(0)) - 100.0).abs() < TOL); // before table
        assert!((hydro.at(StepIndex::new(75)) - 200.0).abs() < TOL); // t = 1500
        assert!((hydro.at(StepIndex::new(100)) - 300.0).abs() < TOL); // t = 2000
        assert!((hydro.at(StepIndex::new(150)) - 250.0).abs() < TOL); // t = 3000
        assert!((hydro.at(StepIndex::new(800)) - 200.0).abs() < TOL); // after table
    }

    #[test]
    fn test_single_point_series_is_constant() {
        assert!((interpolate(&[10.0], &[42.0], -5.0) - 42.0).abs() < TOL);
        assert!((interpolate(&[10.0], &[42.0], 50.0) - 42.0).abs() < TOL);
    }

    #[test]
    fn test_rejects_non_positive_sample() {
        let err = InflowHydrograph::from_fn(&grid(), |t| 100.0 - t / 10.0).unwrap_err();
        assert_eq!(
            err,
            ConfigError::NonPositiveInflow {
                step: 50,
                discharge: 0.0
            }
        );
    }
}
