//! Solution storage and run-time reporting.
//!
//! # Submodules
//!
//! - [`flow_field`]: Time × node depth/velocity buffers and derived discharge
//! - [`diagnostics`]: Ordered diagnostic stream and progress reporting
//! - [`error`]: Failures that abort a run

pub mod diagnostics;
pub mod error;
pub mod flow_field;

pub use diagnostics::{
    Diagnostic, DiagnosticKind, DiagnosticSink, LogSink, NullSink, ProgressReporter,
};
pub use error::SolveError;
pub use flow_field::{DischargeField, FlowField, MAX_FIELD_VALUES, RowMut, RowRef};
