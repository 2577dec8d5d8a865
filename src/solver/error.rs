//! Errors raised while marching.

use thiserror::Error;

use crate::boundary::BoundaryFailure;
use crate::mesh::BoundaryFace;
use crate::types::{NodeIndex, StepIndex};

/// A step produced no usable state. The run stops at the first one.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SolveError {
    /// A boundary solve failed.
    #[error("{face} boundary failed at {step} (time {time:.1}s): {source}")]
    Boundary {
        step: StepIndex,
        time: f64,
        face: BoundaryFace,
        #[source]
        source: BoundaryFailure,
    },

    /// An interior update gave a zero or negative depth.
    #[error("non-physical depth {depth} at {step}, {node}")]
    NonPhysicalDepth {
        step: StepIndex,
        node: NodeIndex,
        depth: f64,
    },

    /// An interior update gave NaN or infinity.
    #[error("non-finite state (depth {depth}, velocity {velocity}) at {step}, {node}")]
    NonFinite {
        step: StepIndex,
        node: NodeIndex,
        depth: f64,
        velocity: f64,
    },
}

impl SolveError {
    /// Time level that could not be computed.
    pub fn step(&self) -> StepIndex {
        match self {
            Self::Boundary { step, .. }
            | Self::NonPhysicalDepth { step, .. }
            | Self::NonFinite { step, .. } => *step,
        }
    }

    /// Node where the failure happened, if it is an interior node.
    pub fn node(&self) -> Option<NodeIndex> {
        match self {
            Self::Boundary { .. } => None,
            Self::NonPhysicalDepth { node, .. } | Self::NonFinite { node, .. } => Some(*node),
        }
    }
}
