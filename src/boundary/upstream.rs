//! Upstream boundary: prescribed inflow discharge.
//!
//! Only the C- characteristic reaches node 0 from inside the domain. Combining
//! it with the continuity requirement Q_in = B y v at the boundary gives
//!
//! v_P = Cm + (g/c_B) y_P
//! Q_in = B y_P (Cm + (g/c_B) y_P)
//!
//! i.e. a y² + b y + c0 = 0 with a = B g / c_B, b = B Cm, c0 = -Q_in.
//! With a > 0 and Q_in > 0 there is exactly one positive root.

use super::BoundaryFailure;
use crate::config::Channel;
use crate::equations::{Characteristics, NodeHydraulics, NodeState};

/// Inflow boundary driven by a discharge hydrograph.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DischargeInflow {
    width: f64,
    g: f64,
}

impl DischargeInflow {
    /// Create the inflow solver for a channel.
    pub fn new(channel: &Channel) -> Self {
        Self {
            width: channel.width,
            g: channel.gravity,
        }
    }

    /// Solve for the boundary state at the new time level.
    ///
    /// `b` is node 1 at the previous time level, `discharge` the inflow at
    /// the new time level.
    pub fn solve(
        &self,
        chars: &Characteristics,
        b: &NodeHydraulics,
        discharge: f64,
    ) -> Result<NodeState, BoundaryFailure> {
        let cm = chars.backward(b);

        let qa = self.width * self.g / b.celerity;
        let qb = self.width * cm;
        let discriminant = qb * qb + 4.0 * qa * discharge;
        if !(discriminant >= 0.0) {
            return Err(BoundaryFailure::NegativeDiscriminant { discriminant });
        }

        // Rationalised root when b > 0 avoids cancellation in -b + √disc
        let sq = discriminant.sqrt();
        let depth = if qb > 0.0 {
            2.0 * discharge / (qb + sq)
        } else {
            (-qb + sq) / (2.0 * qa)
        };
        if !(depth.is_finite() && depth > 0.0) {
            return Err(BoundaryFailure::NonPositiveDepth { depth });
        }

        Ok(NodeState {
            depth,
            velocity: discharge / (self.width * depth),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equations::SourceTermSign;

    const TOL: f64 = 1e-10;

    fn setup() -> (Channel, Characteristics, DischargeInflow) {
        let channel = Channel::default();
        let chars = Characteristics::new(&channel, 20.0, SourceTermSign::Additive);
        (channel, chars, DischargeInflow::new(&channel))
    }

    #[test]
    fn test_solution_carries_inflow_and_satisfies_backward_characteristic() {
        let (channel, chars, inflow) = setup();
        let b = NodeHydraulics::evaluate(NodeState::new(3.2336, 1.237), &channel);

        for q in [50.0, 100.0, 230.0, 500.0] {
            let p = inflow.solve(&chars, &b, q).unwrap();
            assert!(p.depth > 0.0);
            assert!((p.discharge(channel.width) - q).abs() < TOL);

            // v_P - (g/c_B) y_P = Cm
            let cm = chars.backward(&b);
            let residual = p.velocity - channel.gravity / b.celerity * p.depth - cm;
            assert!(residual.abs() < TOL);
        }
    }

    #[test]
    fn test_more_inflow_raises_depth() {
        let (channel, chars, inflow) = setup();
        let b = NodeHydraulics::evaluate(NodeState::new(3.0, 1.0), &channel);

        let low = inflow.solve(&chars, &b, 100.0).unwrap();
        let high = inflow.solve(&chars, &b, 400.0).unwrap();
        assert!(high.depth > low.depth);
        assert!(high.velocity > low.velocity);
    }

    #[test]
    fn test_both_root_branches_agree() {
        // Negative Cm (b < 0) takes the textbook branch; a fast backward state
        // (b > 0) takes the rationalised branch. Both must solve the quadratic.
        let (channel, _, inflow) = setup();
        let chars = Characteristics::new(&channel, 1.0, SourceTermSign::Additive);
        for (state, positive) in [(NodeState::new(3.0, 1.0), false), (NodeState::new(0.5, 6.0), true)] {
            let b = NodeHydraulics::evaluate(state, &channel);
            let cm = chars.backward(&b);
            assert_eq!(cm > 0.0, positive);
            let p = inflow.solve(&chars, &b, 100.0).unwrap();

            let a = channel.width * channel.gravity / b.celerity;
            let f = a * p.depth * p.depth + channel.width * cm * p.depth - 100.0;
            assert!(f.abs() < 1e-8);
        }
    }

    #[test]
    fn test_non_finite_invariant_is_rejected() {
        let (channel, chars, inflow) = setup();
        let mut b = NodeHydraulics::evaluate(NodeState::new(3.0, 1.0), &channel);
        b.velocity = f64::NAN;
        assert!(matches!(
            inflow.solve(&chars, &b, 100.0),
            Err(BoundaryFailure::NegativeDiscriminant { .. })
        ));
    }
}
