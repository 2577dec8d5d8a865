//! Flood peak attenuation and travel time.
//!
//! A flood wave routed through a rough channel loses height and arrives
//! later downstream. Both effects are read off the node hydrographs.

use crate::solver::DischargeField;
use crate::types::{NodeIndex, StepIndex};

/// Peak of a node hydrograph.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PeakFlow {
    pub node: NodeIndex,
    pub step: StepIndex,
    /// Time of the peak (s)
    pub time: f64,
    /// Peak discharge (m³/s)
    pub discharge: f64,
}

impl PeakFlow {
    /// Largest discharge at a node; the earliest level wins ties.
    pub fn at(discharge: &DischargeField, node: NodeIndex, dt: f64) -> Self {
        let (step, peak) = discharge
            .series(node)
            .into_iter()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |best, (k, q)| {
                if q > best.1 { (k, q) } else { best }
            });

        Self {
            node,
            step: StepIndex::new(step),
            time: step as f64 * dt,
            discharge: peak,
        }
    }
}

/// Peak change between an upstream and a downstream node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Attenuation {
    pub upstream: PeakFlow,
    pub downstream: PeakFlow,
}

impl Attenuation {
    /// Compare the hydrograph peaks of two nodes.
    pub fn between(
        discharge: &DischargeField,
        upstream: NodeIndex,
        downstream: NodeIndex,
        dt: f64,
    ) -> Self {
        Self {
            upstream: PeakFlow::at(discharge, upstream, dt),
            downstream: PeakFlow::at(discharge, downstream, dt),
        }
    }

    /// Downstream peak over upstream peak (< 1 for an attenuated wave).
    pub fn ratio(&self) -> f64 {
        self.downstream.discharge / self.upstream.discharge
    }

    /// Peak reduction (m³/s).
    pub fn reduction(&self) -> f64 {
        self.upstream.discharge - self.downstream.discharge
    }

    /// Delay of the downstream peak (s).
    pub fn lag(&self) -> f64 {
        self.downstream.time - self.upstream.time
    }
}
