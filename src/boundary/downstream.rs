//! Downstream boundary: uniform-flow (Manning) rating curve.
//!
//! Only the C+ characteristic reaches node N-1 from inside the domain:
//!
//! v_P = Cp - (g/c_A) y_P
//!
//! The outlet is closed with the normal-flow relation v = k R^{2/3},
//! k = √S0 / n. Each pass evaluates the rating term with the hydraulic
//! radius of the outlet depth at the previous time level:
//!
//! y_P = (Cp - k R_prev^{2/3}) c_A / g
//! v_P = k R(y_P)^{2/3}
//!
//! The pass count is fixed and there is no convergence test.

use super::BoundaryFailure;
use crate::config::Channel;
use crate::equations::{Characteristics, NodeHydraulics, NodeState};
use crate::mesh::RectangularSection;
use crate::source::ManningFriction;

/// Outlet boundary using the Manning rating curve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ManningOutfall {
    section: RectangularSection,
    friction: ManningFriction,
    iterations: usize,
}

impl ManningOutfall {
    /// Create the outlet solver with a fixed number of passes (at least 1).
    pub fn new(channel: &Channel, iterations: usize) -> Self {
        Self {
            section: channel.section(),
            friction: channel.friction(),
            iterations: iterations.max(1),
        }
    }

    /// Number of fixed-point passes.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Solve for the outlet state at the new time level.
    ///
    /// `a` is node N-2 and `previous` node N-1, both at the previous time level.
    pub fn solve(
        &self,
        chars: &Characteristics,
        a: &NodeHydraulics,
        previous: &NodeState,
    ) -> Result<NodeState, BoundaryFailure> {
        let cp = chars.forward(a);
        let k = self.friction.conveyance_factor();
        let r_prev = self.section.hydraulic_radius(previous.depth);

        let mut state = *previous;
        for _ in 0..self.iterations {
            let depth = (cp - k * r_prev.powf(2.0 / 3.0)) * a.celerity / chars.g();
            if !(depth.is_finite() && depth > 0.0) {
                return Err(BoundaryFailure::NonPositiveDepth { depth });
            }
            state = NodeState {
                depth,
                velocity: self
                    .friction
                    .uniform_velocity(self.section.hydraulic_radius(depth)),
            };
        }

        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equations::SourceTermSign;
    use crate::source::NormalDepthMethod;

    const TOL: f64 = 1e-10;

    fn uniform(channel: &Channel) -> NodeState {
        let depth = channel
            .friction()
            .normal_depth(&channel.section(), 100.0, NormalDepthMethod::Rectangular)
            .unwrap();
        NodeState::new(depth, 100.0 / (channel.width * depth))
    }

    #[test]
    fn test_uniform_flow_passes_through() {
        let channel = Channel::default();
        let chars = Characteristics::new(&channel, 20.0, SourceTermSign::Additive);
        let outfall = ManningOutfall::new(&channel, 3);

        let state = uniform(&channel);
        let a = NodeHydraulics::evaluate(state, &channel);
        let p = outfall.solve(&chars, &a, &state).unwrap();

        assert!((p.depth - state.depth).abs() < TOL);
        assert!((p.velocity - state.velocity).abs() < TOL);
    }

    #[test]
    fn test_velocity_follows_rating_curve() {
        let channel = Channel::default();
        let chars = Characteristics::new(&channel, 20.0, SourceTermSign::Additive);
        let outfall = ManningOutfall::new(&channel, 3);

        let previous = uniform(&channel);
        let a = NodeHydraulics::evaluate(NodeState::new(4.0, 1.4), &channel);
        let p = outfall.solve(&chars, &a, &previous).unwrap();

        // Rising water upstream of the outlet raises the outlet depth
        assert!(p.depth > previous.depth);
        let r = channel.section().hydraulic_radius(p.depth);
        assert!((p.velocity - channel.friction().uniform_velocity(r)).abs() < TOL);
    }

    #[test]
    fn test_pass_count_does_not_change_result() {
        let channel = Channel::default();
        let chars = Characteristics::new(&channel, 20.0, SourceTermSign::Additive);
        let previous = NodeState::new(3.3, 1.2);
        let a = NodeHydraulics::evaluate(NodeState::new(3.6, 1.3), &channel);

        let once = ManningOutfall::new(&channel, 1).solve(&chars, &a, &previous).unwrap();
        let many = ManningOutfall::new(&channel, 10).solve(&chars, &a, &previous).unwrap();
        assert!((once.depth - many.depth).abs() < TOL);
        assert_eq!(ManningOutfall::new(&channel, 0).iterations(), 1);
    }

    #[test]
    fn test_draining_outlet_fails() {
        let channel = Channel::default();
        let chars = Characteristics::new(&channel, 20.0, SourceTermSign::Additive);
        let outfall = ManningOutfall::new(&channel, 3);

        // Nearly still, shallow water upstream of a deep, fast outlet
        let a = NodeHydraulics::evaluate(NodeState::new(0.05, 0.0), &channel);
        let previous = NodeState::new(10.0, 2.0);
        assert!(matches!(
            outfall.solve(&chars, &a, &previous),
            Err(BoundaryFailure::NonPositiveDepth { .. })
        ));
    }
}
