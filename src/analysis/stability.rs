//! CFL stability guard for the explicit characteristics scheme.
//!
//! The explicit update is stable only while the characteristics through a
//! new node stay within one cell: (|v| + c) dt / dx <= 1.
//!
//! Two checks are made:
//! - once, before allocation: the uniform initial state fixes dt. If its
//!   Courant number exceeds the limit, dt is replaced so the Courant number
//!   equals the safety factor.
//! - every interior update: the Courant numbers of both neighbours are
//!   checked. A violation is reported but never stops the run.
//!
//! # Example
//!
//! ```
//! use moc_rs::analysis::CflGuard;
//!
//! let guard = CflGuard::default();
//! // wave speed 10 m/s, dx = 400 m, dt = 60 s gives Courant 1.5
//! let (dt, adjustment) = guard.initial_time_step(10.0, 400.0, 60.0);
//! assert!((dt - 36.0).abs() < 1e-12);
//! assert!(adjustment.is_some());
//! ```

use serde::Serialize;

use crate::config::SchemeConfig;

/// Courant number above which a warning is emitted.
pub const COURANT_LIMIT: f64 = 1.0;

/// Target Courant number after the initial time step is reduced.
pub const CFL_SAFETY_FACTOR: f64 = 0.9;

/// Record of the one-shot initial time step reduction.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TimeStepAdjustment {
    pub original_dt: f64,
    pub adjusted_dt: f64,
    pub courant_before: f64,
    pub courant_after: f64,
}

impl std::fmt::Display for TimeStepAdjustment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "dt reduced from {:.3}s (Courant {:.3}) to {:.3}s (Courant {:.3})",
            self.original_dt, self.courant_before, self.adjusted_dt, self.courant_after
        )
    }
}

/// Counters accumulated while marching.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct CflStats {
    /// Interior updates checked
    pub checks: usize,
    /// Updates where either neighbour exceeded the limit
    pub violations: usize,
    /// Largest Courant number seen
    pub max_courant: f64,
}

/// Courant number checks with run statistics.
#[derive(Clone, Debug)]
pub struct CflGuard {
    limit: f64,
    safety_factor: f64,
    stats: CflStats,
}

impl Default for CflGuard {
    fn default() -> Self {
        Self::new(COURANT_LIMIT, CFL_SAFETY_FACTOR)
    }
}

impl CflGuard {
    /// Create a guard with a warning limit and a target Courant number.
    pub fn new(limit: f64, safety_factor: f64) -> Self {
        Self {
            limit,
            safety_factor,
            stats: CflStats::default(),
        }
    }

    /// Guard using the limits of a scheme configuration.
    pub fn from_scheme(scheme: &SchemeConfig) -> Self {
        Self::new(scheme.courant_limit, scheme.cfl_safety_factor)
    }

    /// Warning threshold.
    pub fn limit(&self) -> f64 {
        self.limit
    }

    /// Target Courant number for the initial reduction.
    pub fn safety_factor(&self) -> f64 {
        self.safety_factor
    }

    /// Accumulated statistics.
    pub fn stats(&self) -> CflStats {
        self.stats
    }

    /// Time step to allocate the run with.
    ///
    /// `wave_speed` is |v| + c of the uniform initial state. Returns the
    /// requested dt unchanged when it satisfies the limit, otherwise
    /// safety_factor dx / wave_speed together with the adjustment record.
    pub fn initial_time_step(
        &self,
        wave_speed: f64,
        dx: f64,
        dt: f64,
    ) -> (f64, Option<TimeStepAdjustment>) {
        let courant = wave_speed * dt / dx;
        if courant <= self.limit {
            return (dt, None);
        }

        let adjusted_dt = self.safety_factor * dx / wave_speed;
        let adjustment = TimeStepAdjustment {
            original_dt: dt,
            adjusted_dt,
            courant_before: courant,
            courant_after: wave_speed * adjusted_dt / dx,
        };
        (adjusted_dt, Some(adjustment))
    }

    /// Check the Courant numbers of the two neighbours of an interior update.
    ///
    /// Returns the larger one if it exceeds the limit.
    pub fn check_pair(&mut self, courant_a: f64, courant_b: f64) -> Option<f64> {
        let courant = courant_a.max(courant_b);
        self.stats.checks += 1;
        self.stats.max_courant = self.stats.max_courant.max(courant);

        if courant > self.limit {
            self.stats.violations += 1;
            Some(courant)
        } else {
            None
        }
    }

    /// Reset the counters.
    pub fn reset(&mut self) {
        self.stats = CflStats::default();
    }
}
