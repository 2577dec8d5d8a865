//! Temporal grid.

use crate::config::{ConfigError, require_positive};
use crate::solver::MAX_FIELD_VALUES;
use crate::types::StepIndex;

/// Most time levels a grid may hold; a field needs at least two nodes.
pub const MAX_TIME_LEVELS: usize = MAX_FIELD_VALUES / 2;

/// Fixed time levels t_k = k dt, k = 0 .. T-1, with T = floor(duration / dt).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TemporalGrid {
    duration: f64,
    dt: f64,
    n_steps: usize,
}

impl TemporalGrid {
    /// Build the grid. At least two levels are needed: the initial
    /// condition and one computed level.
    pub fn new(duration: f64, dt: f64) -> Result<Self, ConfigError> {
        require_positive("duration", duration)?;
        require_positive("dt", dt)?;

        let levels = (duration / dt).floor();
        if levels > MAX_TIME_LEVELS as f64 {
            return Err(ConfigError::TooManySteps {
                duration,
                dt,
                limit: MAX_TIME_LEVELS,
            });
        }

        let n_steps = levels as usize;
        if n_steps < 2 {
            return Err(ConfigError::TooFewSteps {
                duration,
                dt,
                n_steps,
            });
        }

        Ok(Self {
            duration,
            dt,
            n_steps,
        })
    }

    /// Time step (s).
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Requested simulated duration (s).
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Number of time levels T.
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    /// Last time level.
    pub fn last(&self) -> StepIndex {
        StepIndex::new(self.n_steps - 1)
    }

    /// Time of a level.
    #[inline]
    pub fn time(&self, t: StepIndex) -> f64 {
        t.get() as f64 * self.dt
    }

    /// Times of all levels.
    pub fn times(&self) -> impl ExactSizeIterator<Item = f64> + '_ {
        StepIndex::iter(self.n_steps).map(|t| self.time(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_grid() {
        let grid = TemporalGrid::new(18_000.0, 20.0).unwrap();
        assert_eq!(grid.n_steps(), 900);
        assert_eq!(grid.last(), StepIndex::new(899));
        assert!((grid.time(StepIndex::new(270)) - 5400.0).abs() < 1e-12);

        let times: Vec<f64> = grid.times().collect();
        assert_eq!(times.len(), 900);
        assert!((times[899] - 17_980.0).abs() < 1e-9);
    }

    #[test]
    fn test_step_count_truncates() {
        let grid = TemporalGrid::new(100.0, 30.0).unwrap();
        assert_eq!(grid.n_steps(), 3);
    }

    #[test]
    fn test_too_few_steps() {
        let err = TemporalGrid::new(30.0, 20.0).unwrap_err();
        assert_eq!(
            err,
            ConfigError::TooFewSteps {
                duration: 30.0,
                dt: 20.0,
                n_steps: 1
            }
        );
        assert!(TemporalGrid::new(10.0, -1.0).is_err());
    }

    #[test]
    fn test_too_many_steps() {
        let err = TemporalGrid::new(18_000.0, 1e-9).unwrap_err();
        assert!(matches!(err, ConfigError::TooManySteps { limit, .. } if limit == MAX_TIME_LEVELS));

        let grid = TemporalGrid::new(MAX_TIME_LEVELS as f64, 1.0).unwrap();
        assert_eq!(grid.n_steps(), MAX_TIME_LEVELS);
    }
}
