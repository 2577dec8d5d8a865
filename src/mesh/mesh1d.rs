//! 1D node grid.
//!
//! The characteristics scheme works on nodes rather than elements: N nodes
//! uniformly spaced over [0, L], node 0 at the upstream end.

use crate::config::{ConfigError, require_positive};
use crate::types::NodeIndex;

/// Boundary node identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundaryFace {
    /// Upstream end (x = 0), inflow-driven
    Upstream,
    /// Downstream end (x = L), rating-curve-driven
    Downstream,
}

impl std::fmt::Display for BoundaryFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Upstream => write!(f, "upstream"),
            Self::Downstream => write!(f, "downstream"),
        }
    }
}

/// Uniform 1D grid of nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct Mesh1D {
    /// Left endpoint of domain
    pub x_min: f64,
    /// Right endpoint of domain
    pub x_max: f64,
    /// Number of nodes, boundaries included
    pub n_nodes: usize,
    /// Node spacing dx = (x_max - x_min) / (n_nodes - 1)
    pub dx: f64,
    /// Node coordinates, length n_nodes
    pub coordinates: Vec<f64>,
}

impl Mesh1D {
    /// Create a uniform grid of `n_nodes` over [0, length].
    pub fn uniform(length: f64, n_nodes: usize) -> Result<Self, ConfigError> {
        require_positive("channel length", length)?;
        if n_nodes < 2 {
            return Err(ConfigError::TooFewNodes(n_nodes));
        }

        let dx = length / (n_nodes - 1) as f64;
        let mut coordinates: Vec<f64> = (0..n_nodes).map(|j| j as f64 * dx).collect();
        // Pin the last node so x_max is exact
        coordinates[n_nodes - 1] = length;

        Ok(Self {
            x_min: 0.0,
            x_max: length,
            n_nodes,
            dx,
            coordinates,
        })
    }

    /// Physical coordinate of node j.
    pub fn x(&self, j: NodeIndex) -> f64 {
        self.coordinates[j.get()]
    }

    /// Get total domain length.
    pub fn length(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Index of the downstream boundary node.
    pub fn last(&self) -> NodeIndex {
        NodeIndex::new(self.n_nodes - 1)
    }

    /// Which boundary a node sits on, if any.
    pub fn is_boundary(&self, j: NodeIndex) -> Option<BoundaryFace> {
        if j.get() == 0 {
            Some(BoundaryFace::Upstream)
        } else if j == self.last() {
            Some(BoundaryFace::Downstream)
        } else {
            None
        }
    }

    /// Interior nodes 1..N-1 (empty when N = 2).
    pub fn interior(&self) -> impl ExactSizeIterator<Item = NodeIndex> {
        (1..self.n_nodes - 1).map(NodeIndex::new)
    }

    /// Node nearest to a physical coordinate, clamped to the grid.
    pub fn nearest_node(&self, x: f64) -> NodeIndex {
        let j = ((x - self.x_min) / self.dx).round();
        NodeIndex::new(j.clamp(0.0, (self.n_nodes - 1) as f64) as usize)
    }
}
