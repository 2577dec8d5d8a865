//! Prismatic rectangular cross-section.
//!
//! A = B y,  P = B + 2y,  R = A / P = B y / (B + 2y)
//!
//! Depth must be positive: every depth written to the flow field is checked
//! before it can reach these functions.

/// Rectangular channel cross-section of constant bottom width.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RectangularSection {
    /// Bottom width B (m)
    pub width: f64,
}

impl RectangularSection {
    /// Create a section of the given width.
    pub fn new(width: f64) -> Self {
        Self { width }
    }

    /// Flow area A = B y.
    #[inline]
    pub fn area(&self, depth: f64) -> f64 {
        self.width * depth
    }

    /// Wetted perimeter P = B + 2y.
    #[inline]
    pub fn wetted_perimeter(&self, depth: f64) -> f64 {
        self.width + 2.0 * depth
    }

    /// Hydraulic radius R = B y / (B + 2y).
    #[inline]
    pub fn hydraulic_radius(&self, depth: f64) -> f64 {
        debug_assert!(depth > 0.0, "hydraulic radius needs positive depth, got {}", depth);
        self.area(depth) / self.wetted_perimeter(depth)
    }

    /// Discharge Q = v B y.
    #[inline]
    pub fn discharge(&self, depth: f64, velocity: f64) -> f64 {
        velocity * self.area(depth)
    }
}
