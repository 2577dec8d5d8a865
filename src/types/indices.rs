//! Strongly-typed index newtypes.
//!
//! The flow field is addressed by a time step and a node; keeping the two
//! as distinct types stops `field.depth(j, t)` style transpositions.

use std::fmt;

/// Declares a `usize` newtype index whose `Display` carries a short prefix
/// (`t=` for steps, `j=` for nodes) so log lines stay unambiguous.
macro_rules! define_index {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(usize);

        impl $name {
            pub const ZERO: Self = Self(0);

            #[inline]
            pub const fn new(index: usize) -> Self {
                Self(index)
            }

            #[inline]
            pub const fn get(self) -> usize {
                self.0
            }

            /// The following index.
            #[inline]
            pub const fn next(self) -> Self {
                Self(self.0 + 1)
            }

            /// Indices 0 .. n in order.
            pub fn iter(n: usize) -> impl ExactSizeIterator<Item = Self> {
                (0..n).map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

define_index!(
    /// Time step index into the temporal grid.
    ///
    /// # Example
    ///
    /// ```
    /// use moc_rs::types::StepIndex;
    ///
    /// let t = StepIndex::new(42);
    /// assert_eq!(t.get(), 42);
    /// assert_eq!(t.to_string(), "t=42");
    /// ```
    StepIndex,
    "t="
);

define_index!(
    /// Node index into the spatial grid (0 is the upstream end).
    ///
    /// # Example
    ///
    /// ```
    /// use moc_rs::types::NodeIndex;
    ///
    /// let j = NodeIndex::new(3);
    /// assert_eq!(j.next().get(), 4);
    /// ```
    NodeIndex,
    "j="
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_next_and_zero() {
        let t = StepIndex::new(7);
        assert_eq!(t.get(), 7);
        assert_eq!(t.next(), StepIndex::new(8));
        assert!(t < t.next());
        assert_eq!(StepIndex::ZERO.get(), 0);
    }

    #[test]
    fn test_index_display() {
        assert_eq!(NodeIndex::new(12).to_string(), "j=12");
        assert_eq!(StepIndex::new(0).to_string(), "t=0");
    }

    #[test]
    fn test_index_iter() {
        let nodes: Vec<_> = NodeIndex::iter(4).collect();
        assert_eq!(nodes.len(), 4);
        assert_eq!(nodes[3], NodeIndex::new(3));
    }
}
