//! Strongly-typed domain types for safer APIs.
//!
//! # Example
//!
//! ```
//! use moc_rs::types::{NodeIndex, StepIndex};
//!
//! let t = StepIndex::new(10);
//! let j = NodeIndex::new(3);
//! assert_ne!(t.get(), j.get());
//! ```

mod indices;

pub use indices::{NodeIndex, StepIndex};
