//! Manning bed friction for open-channel flow.
//!
//! Friction slope from Manning's equation:
//!
//! Sf = n² v |v| / R^{4/3}   (evaluated as n² v² / R^{4/3})
//!
//! and the uniform-flow relation used at the outlet and for the initial
//! condition, where friction balances gravity (Sf = S0):
//!
//! v = (√S0 / n) R^{2/3}
//!
//! Manning coefficient n has units of s/m^{1/3} and depends on bed roughness:
//! - Smooth concrete: n ≈ 0.012
//! - Natural channels: n ≈ 0.025-0.05
//! - Floodplains with vegetation: n ≈ 0.1-0.15

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::mesh::RectangularSection;

const NORMAL_DEPTH_MAX_ITER: usize = 50;
const NORMAL_DEPTH_REL_TOL: f64 = 1e-13;

/// How the uniform (normal) depth is obtained from a discharge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalDepthMethod {
    /// Closed form assuming R ≈ y (B >> y):
    /// y = (Q n / (B √S0))^{3/5}
    #[default]
    WideChannel,
    /// Newton solve of Q = (1/n) A R^{2/3} √S0 with the true hydraulic
    /// radius of the rectangular section. The resulting uniform state is
    /// an exact equilibrium of the discrete scheme.
    Rectangular,
}

/// Manning friction law on a sloping bed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ManningFriction {
    /// Manning coefficient (s/m^{1/3})
    pub manning_n: f64,
    /// Bed slope S0
    pub bed_slope: f64,
}

impl ManningFriction {
    /// Create a Manning friction law.
    pub fn new(manning_n: f64, bed_slope: f64) -> Self {
        Self {
            manning_n,
            bed_slope,
        }
    }

    /// Friction slope Sf = n² v² / R^{4/3}.
    #[inline]
    pub fn friction_slope(&self, velocity: f64, hydraulic_radius: f64) -> f64 {
        self.manning_n * self.manning_n * velocity * velocity
            / hydraulic_radius.powf(4.0 / 3.0)
    }

    /// Conveyance factor √S0 / n.
    #[inline]
    pub fn conveyance_factor(&self) -> f64 {
        self.bed_slope.sqrt() / self.manning_n
    }

    /// Uniform-flow velocity v = (√S0 / n) R^{2/3}.
    #[inline]
    pub fn uniform_velocity(&self, hydraulic_radius: f64) -> f64 {
        self.conveyance_factor() * hydraulic_radius.powf(2.0 / 3.0)
    }

    /// Uniform-flow discharge for a depth in the given section.
    pub fn uniform_discharge(&self, section: &RectangularSection, depth: f64) -> f64 {
        section.area(depth) * self.uniform_velocity(section.hydraulic_radius(depth))
    }

    /// Normal depth for a discharge.
    pub fn normal_depth(
        &self,
        section: &RectangularSection,
        discharge: f64,
        method: NormalDepthMethod,
    ) -> Result<f64, ConfigError> {
        let wide = (discharge / (section.width * self.conveyance_factor())).powf(3.0 / 5.0);
        match method {
            NormalDepthMethod::WideChannel => Ok(wide),
            NormalDepthMethod::Rectangular => self.rectangular_normal_depth(section, discharge, wide),
        }
    }

    /// Newton iteration on f(y) = k A R^{2/3} - Q, started from the
    /// wide-channel estimate. With A = B y and P = B + 2y:
    ///
    /// f'(y) = k R^{2/3} (5B/3 - 4R/3)
    fn rectangular_normal_depth(
        &self,
        section: &RectangularSection,
        discharge: f64,
        initial: f64,
    ) -> Result<f64, ConfigError> {
        let k = self.conveyance_factor();
        let mut y = initial;

        for _ in 0..NORMAL_DEPTH_MAX_ITER {
            let r = section.hydraulic_radius(y);
            let f = self.uniform_discharge(section, y) - discharge;
            let df = k * r.powf(2.0 / 3.0) * (5.0 * section.width - 4.0 * r) / 3.0;
            let step = f / df;
            y -= step;

            if !(y.is_finite() && y > 0.0) {
                break;
            }
            if step.abs() <= NORMAL_DEPTH_REL_TOL * y {
                return Ok(y);
            }
        }

        Err(ConfigError::NormalDepthDiverged {
            discharge,
            iterations: NORMAL_DEPTH_MAX_ITER,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-10;

    fn reference() -> (ManningFriction, RectangularSection) {
        (
            ManningFriction::new(0.025, 0.0002),
            RectangularSection::new(25.0),
        )
    }

    #[test]
    fn test_friction_slope_symmetric_in_velocity() {
        let (friction, section) = reference();
        let r = section.hydraulic_radius(3.0);

        let forward = friction.friction_slope(1.2, r);
        let backward = friction.friction_slope(-1.2, r);
        assert!(forward > 0.0);
        assert!((forward - backward).abs() < TOL);
    }

    #[test]
    fn test_friction_slope_scaling() {
        let (friction, section) = reference();
        let rough = ManningFriction::new(0.05, 0.0002);
        let r = section.hydraulic_radius(3.0);

        // Sf scales as n²
        let ratio = rough.friction_slope(1.0, r) / friction.friction_slope(1.0, r);
        assert!((ratio - 4.0).abs() < TOL);

        // Friction is stronger in shallower water
        let shallow = friction.friction_slope(1.0, section.hydraulic_radius(0.5));
        assert!(shallow > friction.friction_slope(1.0, r));
    }

    #[test]
    fn test_uniform_velocity_balances_bed_slope() {
        let (friction, section) = reference();
        let r = section.hydraulic_radius(3.0);
        let v = friction.uniform_velocity(r);
        assert!((friction.friction_slope(v, r) - 0.0002).abs() < 1e-15);
    }

    #[test]
    fn test_wide_channel_normal_depth_closed_form() {
        let (friction, section) = reference();
        let y = friction
            .normal_depth(&section, 100.0, NormalDepthMethod::WideChannel)
            .unwrap();
        let expected = (100.0 * 0.025 / (25.0 * 0.0002_f64.sqrt())).powf(0.6);
        assert!((y - expected).abs() < 1e-12);
        assert!((y - 3.2336).abs() < 1e-3);
    }

    #[test]
    fn test_rectangular_normal_depth_reproduces_discharge() {
        let (friction, section) = reference();
        let wide = friction
            .normal_depth(&section, 100.0, NormalDepthMethod::WideChannel)
            .unwrap();
        let y = friction
            .normal_depth(&section, 100.0, NormalDepthMethod::Rectangular)
            .unwrap();

        // The side walls add friction, so the true normal depth is larger
        assert!(y > wide);
        assert!((friction.uniform_discharge(&section, y) - 100.0).abs() < 1e-9);
        assert!((y - 3.576).abs() < 1e-3);
    }
}
