//! Characteristic compatibility relations for the explicit MOC scheme.
//!
//! Along dx/dt = v ± c the Saint-Venant equations reduce to
//!
//! d/dt (v ± (g/c) y) = g (S0 - Sf)
//!
//! Discretized to first order with the state frozen at the foot of the
//! characteristic (node j∓1 at the previous time level):
//!
//! C+ : v_P + (g/c_A) y_P = v_A + (g/c_A) y_A + g (S0 - Sf_A) dt = Cp
//! C- : v_P - (g/c_B) y_P = v_B - (g/c_B) y_B + g (S0 - Sf_B) dt = Cm
//!
//! Adding and subtracting the two gives the interior update
//!
//! v_P = (Cp + Cm) / 2
//! y_P = (Cp - Cm) c_avg / (2g),   c_avg = (c_A + c_B) / 2

use serde::{Deserialize, Serialize};

use super::shallow_water::NodeState;
use crate::config::Channel;

/// Sign applied to the g (S0 - Sf) dt term in both invariants.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceTermSign {
    /// Cp = v + (g/c) y + g (S0 - Sf) dt. Consistent with the momentum
    /// equation; the uniform flow state is a fixed point.
    #[default]
    Additive,
    /// Cp = v + (g/c) y - g (S0 - Sf) dt. Friction accelerates the flow,
    /// which drives the scheme away from uniform flow and eventually to
    /// negative depths.
    Subtractive,
}

impl SourceTermSign {
    /// Apply the sign to a source contribution.
    #[inline]
    pub fn apply(self, term: f64) -> f64 {
        match self {
            Self::Additive => term,
            Self::Subtractive => -term,
        }
    }
}

/// Hydraulic quantities at the foot of a characteristic.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeHydraulics {
    pub depth: f64,
    pub velocity: f64,
    /// c = √(g y)
    pub celerity: f64,
    pub hydraulic_radius: f64,
    pub friction_slope: f64,
}

impl NodeHydraulics {
    /// Evaluate celerity, hydraulic radius and friction slope for a state.
    pub fn evaluate(state: NodeState, channel: &Channel) -> Self {
        let hydraulic_radius = channel.section().hydraulic_radius(state.depth);
        Self {
            depth: state.depth,
            velocity: state.velocity,
            celerity: channel.equation().celerity(state.depth),
            hydraulic_radius,
            friction_slope: channel
                .friction()
                .friction_slope(state.velocity, hydraulic_radius),
        }
    }

    /// Fastest characteristic speed |v| + c.
    #[inline]
    pub fn wave_speed(&self) -> f64 {
        self.velocity.abs() + self.celerity
    }

    /// Local Courant number (|v| + c) dt / dx.
    #[inline]
    pub fn courant(&self, dt: f64, dx: f64) -> f64 {
        self.wave_speed() * dt / dx
    }
}

/// Forward/backward invariants for a fixed time step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Characteristics {
    g: f64,
    bed_slope: f64,
    dt: f64,
    sign: SourceTermSign,
}

impl Characteristics {
    /// Create the invariant evaluator for a channel and time step.
    pub fn new(channel: &Channel, dt: f64, sign: SourceTermSign) -> Self {
        Self {
            g: channel.gravity,
            bed_slope: channel.bed_slope,
            dt,
            sign,
        }
    }

    /// Time step used in the source term.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Gravitational acceleration.
    pub fn g(&self) -> f64 {
        self.g
    }

    #[inline]
    fn source(&self, foot: &NodeHydraulics) -> f64 {
        self.sign
            .apply(self.g * (self.bed_slope - foot.friction_slope) * self.dt)
    }

    /// C+ invariant from the upstream-adjacent node.
    #[inline]
    pub fn forward(&self, a: &NodeHydraulics) -> f64 {
        a.velocity + (self.g / a.celerity) * a.depth + self.source(a)
    }

    /// C- invariant from the downstream-adjacent node.
    #[inline]
    pub fn backward(&self, b: &NodeHydraulics) -> f64 {
        b.velocity - (self.g / b.celerity) * b.depth + self.source(b)
    }

    /// Interior point from its two neighbours at the previous time level.
    pub fn interior(&self, a: &NodeHydraulics, b: &NodeHydraulics) -> NodeState {
        let cp = self.forward(a);
        let cm = self.backward(b);
        let c_avg = 0.5 * (a.celerity + b.celerity);

        NodeState {
            depth: (cp - cm) * c_avg / (2.0 * self.g),
            velocity: 0.5 * (cp + cm),
        }
    }
}
