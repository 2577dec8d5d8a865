//! 1D Shallow Water (Saint-Venant) equations in primitive variables.
//!
//! ∂y/∂t + v ∂y/∂x + y ∂v/∂x = 0
//! ∂v/∂t + v ∂v/∂x + g ∂y/∂x = g (S0 - Sf)
//!
//! where:
//! - y = water depth
//! - v = depth-averaged velocity
//! - S0 = bed slope, Sf = friction slope
//!
//! The system is hyperbolic with characteristic speeds v ± c, c = √(g y).

/// Primitive state (depth, velocity) at a grid node.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NodeState {
    /// Water depth y (m), positive in a well-formed flow field
    pub depth: f64,
    /// Velocity v (m/s), positive downstream
    pub velocity: f64,
}

impl NodeState {
    /// Create a node state.
    pub fn new(depth: f64, velocity: f64) -> Self {
        Self { depth, velocity }
    }

    /// Discharge Q = v B y for a rectangular section of width B.
    pub fn discharge(&self, width: f64) -> f64 {
        self.velocity * width * self.depth
    }

    /// True if depth is positive and both values are finite.
    pub fn is_physical(&self) -> bool {
        self.depth > 0.0 && self.depth.is_finite() && self.velocity.is_finite()
    }
}

/// 1D shallow water wave relations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShallowWater1D {
    /// Gravitational acceleration (default 9.81 m/s²)
    pub g: f64,
}

impl ShallowWater1D {
    /// Create shallow water relations with the given gravity.
    pub fn new(g: f64) -> Self {
        Self { g }
    }

    /// Standard gravity (9.81 m/s²).
    pub fn standard() -> Self {
        Self::new(9.81)
    }

    /// Compute wave celerity c = √(g y).
    #[inline]
    pub fn celerity(&self, depth: f64) -> f64 {
        debug_assert!(depth >= 0.0, "celerity needs non-negative depth, got {}", depth);
        (self.g * depth).sqrt()
    }

    /// Fastest characteristic speed |v| + c.
    #[inline]
    pub fn max_wave_speed(&self, state: &NodeState) -> f64 {
        state.velocity.abs() + self.celerity(state.depth)
    }

    /// Froude number Fr = |v| / c.
    pub fn froude(&self, state: &NodeState) -> f64 {
        let c = self.celerity(state.depth);
        if c > 1e-10 { state.velocity.abs() / c } else { 0.0 }
    }

    /// Check if flow is subcritical (Fr < 1).
    pub fn is_subcritical(&self, state: &NodeState) -> bool {
        self.froude(state) < 1.0
    }

    /// Courant number (|v| + c) dt / dx.
    #[inline]
    pub fn courant(&self, state: &NodeState, dt: f64, dx: f64) -> f64 {
        self.max_wave_speed(state) * dt / dx
    }
}

impl Default for ShallowWater1D {
    fn default() -> Self {
        Self::standard()
    }
}
