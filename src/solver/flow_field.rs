//! Time × node storage for the characteristics solution.
//!
//! Depth and velocity are kept in two row-major buffers of T × N values.
//! Row t holds every node at time level t; row t + 1 is computed from row t
//! only. The buffers are allocated once, after the final time step is known,
//! and filled with the uniform initial state.

use crate::config::ConfigError;
use crate::equations::NodeState;
use crate::mesh::RectangularSection;
use crate::types::{NodeIndex, StepIndex};

/// Upper bound on T × N values per buffer (512 MiB of f64).
pub const MAX_FIELD_VALUES: usize = 1 << 26;

/// Depth and velocity at every (time level, node).
#[derive(Clone, Debug, PartialEq)]
pub struct FlowField {
    n_steps: usize,
    n_nodes: usize,
    depth: Vec<f64>,
    velocity: Vec<f64>,
    /// Rows whose values are final; row 0 is the initial condition
    committed: usize,
}

/// Read-only view of one time level.
#[derive(Clone, Copy, Debug)]
pub struct RowRef<'a> {
    pub depth: &'a [f64],
    pub velocity: &'a [f64],
}

impl RowRef<'_> {
    /// State at a node.
    #[inline]
    pub fn state(&self, j: usize) -> NodeState {
        NodeState::new(self.depth[j], self.velocity[j])
    }
}

/// Mutable view of one time level.
#[derive(Debug)]
pub struct RowMut<'a> {
    pub depth: &'a mut [f64],
    pub velocity: &'a mut [f64],
}

impl RowMut<'_> {
    /// Write a state at a node.
    #[inline]
    pub fn set(&mut self, j: usize, state: NodeState) {
        self.depth[j] = state.depth;
        self.velocity[j] = state.velocity;
    }
}

impl FlowField {
    /// Values per buffer for a T × N field, if within [`MAX_FIELD_VALUES`].
    pub fn checked_len(n_steps: usize, n_nodes: usize) -> Result<usize, ConfigError> {
        n_steps
            .checked_mul(n_nodes)
            .filter(|&len| len <= MAX_FIELD_VALUES)
            .ok_or(ConfigError::FieldTooLarge {
                n_steps,
                n_nodes,
                limit: MAX_FIELD_VALUES,
            })
    }

    /// Allocate T × N values, every row set to the same state.
    pub fn new_uniform(n_steps: usize, n_nodes: usize, initial: NodeState) -> Self {
        Self {
            n_steps,
            n_nodes,
            depth: vec![initial.depth; n_steps * n_nodes],
            velocity: vec![initial.velocity; n_steps * n_nodes],
            committed: 1,
        }
    }

    /// Number of time levels T.
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    /// Number of nodes N.
    pub fn n_nodes(&self) -> usize {
        self.n_nodes
    }

    /// Number of rows with final values (initial row included).
    pub fn committed_steps(&self) -> usize {
        self.committed
    }

    /// True once every time level has been computed.
    pub fn is_complete(&self) -> bool {
        self.committed == self.n_steps
    }

    #[inline]
    fn idx(&self, t: StepIndex, j: NodeIndex) -> usize {
        t.get() * self.n_nodes + j.get()
    }

    /// Depth at (t, j).
    #[inline]
    pub fn depth(&self, t: StepIndex, j: NodeIndex) -> f64 {
        self.depth[self.idx(t, j)]
    }

    /// Velocity at (t, j).
    #[inline]
    pub fn velocity(&self, t: StepIndex, j: NodeIndex) -> f64 {
        self.velocity[self.idx(t, j)]
    }

    /// State at (t, j).
    #[inline]
    pub fn state(&self, t: StepIndex, j: NodeIndex) -> NodeState {
        let i = self.idx(t, j);
        NodeState::new(self.depth[i], self.velocity[i])
    }

    /// One time level.
    pub fn row(&self, t: StepIndex) -> RowRef<'_> {
        let range = t.get() * self.n_nodes..(t.get() + 1) * self.n_nodes;
        RowRef {
            depth: &self.depth[range.clone()],
            velocity: &self.velocity[range],
        }
    }

    /// Depth profile along the channel at one time level.
    pub fn depth_row(&self, t: StepIndex) -> &[f64] {
        self.row(t).depth
    }

    /// Velocity profile along the channel at one time level.
    pub fn velocity_row(&self, t: StepIndex) -> &[f64] {
        self.row(t).velocity
    }

    /// Depth time series at a node.
    pub fn depth_series(&self, j: NodeIndex) -> Vec<f64> {
        self.depth
            .iter()
            .skip(j.get())
            .step_by(self.n_nodes)
            .copied()
            .collect()
    }

    /// Velocity time series at a node.
    pub fn velocity_series(&self, j: NodeIndex) -> Vec<f64> {
        self.velocity
            .iter()
            .skip(j.get())
            .step_by(self.n_nodes)
            .copied()
            .collect()
    }

    /// Raw row-major depth buffer.
    pub fn depths(&self) -> &[f64] {
        &self.depth
    }

    /// Raw row-major velocity buffer.
    pub fn velocities(&self) -> &[f64] {
        &self.velocity
    }

    /// Row t for reading and row t + 1 for writing.
    ///
    /// Panics if t + 1 is outside the field.
    pub(crate) fn step_rows(&mut self, t: StepIndex) -> (RowRef<'_>, RowMut<'_>) {
        let n = self.n_nodes;
        let split = (t.get() + 1) * n;
        let (depth_old, depth_new) = self.depth.split_at_mut(split);
        let (velocity_old, velocity_new) = self.velocity.split_at_mut(split);

        (
            RowRef {
                depth: &depth_old[split - n..],
                velocity: &velocity_old[split - n..],
            },
            RowMut {
                depth: &mut depth_new[..n],
                velocity: &mut velocity_new[..n],
            },
        )
    }

    /// Mark row t as final.
    pub(crate) fn commit(&mut self, t: StepIndex) {
        self.committed = self.committed.max(t.get() + 1);
    }

    /// Smallest depth over the committed rows.
    pub fn min_depth(&self) -> f64 {
        self.depth[..self.committed * self.n_nodes]
            .iter()
            .copied()
            .fold(f64::INFINITY, f64::min)
    }

    /// Largest depth over the committed rows.
    pub fn max_depth(&self) -> f64 {
        self.depth[..self.committed * self.n_nodes]
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// True if any committed depth is not strictly positive.
    pub fn has_negative_depth(&self) -> bool {
        self.depth[..self.committed * self.n_nodes]
            .iter()
            .any(|&y| !(y > 0.0))
    }
}

/// Discharge Q = v B y at every (time level, node), derived after a run.
#[derive(Clone, Debug, PartialEq)]
pub struct DischargeField {
    n_steps: usize,
    n_nodes: usize,
    values: Vec<f64>,
}

impl DischargeField {
    /// Derive discharge from a flow field for a rectangular section.
    pub fn from_flow(field: &FlowField, section: &RectangularSection) -> Self {
        let values = field
            .depths()
            .iter()
            .zip(field.velocities())
            .map(|(&y, &v)| section.discharge(y, v))
            .collect();

        Self {
            n_steps: field.n_steps(),
            n_nodes: field.n_nodes(),
            values,
        }
    }

    /// Number of time levels.
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    /// Number of nodes.
    pub fn n_nodes(&self) -> usize {
        self.n_nodes
    }

    /// Discharge at (t, j).
    #[inline]
    pub fn at(&self, t: StepIndex, j: NodeIndex) -> f64 {
        self.values[t.get() * self.n_nodes + j.get()]
    }

    /// Discharge profile along the channel at one time level.
    pub fn row(&self, t: StepIndex) -> &[f64] {
        &self.values[t.get() * self.n_nodes..(t.get() + 1) * self.n_nodes]
    }

    /// Hydrograph at a node.
    pub fn series(&self, j: NodeIndex) -> Vec<f64> {
        self.values
            .iter()
            .skip(j.get())
            .step_by(self.n_nodes)
            .copied()
            .collect()
    }

    /// Raw row-major buffer.
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}
