//! Total alignment cost newtype.

use std::cmp::Ordering;
use std::fmt;

/// Accumulated cost at the end cell of an alignment.
///
/// Infinite when the end cell is unreachable under the step pattern.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct DtwDistance(f64);

impl DtwDistance {
    pub(crate) fn new(value: f64) -> Self {
        Self(value)
    }

    /// Return the raw cost.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Return true if the end cell was reachable.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }

    /// Total ordering comparison using [`f64::total_cmp`].
    #[must_use]
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for DtwDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.0)
    }
}
