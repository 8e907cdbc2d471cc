//! Pointwise distance metrics.

use std::fmt;
use std::str::FromStr;

use crate::error::InputError;

/// Distance between two points of equal dimension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DistanceMetric {
    /// `sqrt(sum((a_k - b_k)^2))`.
    #[default]
    Euclidean,
    /// `sum(|a_k - b_k|)`, also known as city-block distance.
    Manhattan,
}

impl DistanceMetric {
    /// Return the distance between `a` and `b`.
    ///
    /// Callers guarantee `a.len() == b.len()`.
    #[must_use]
    #[inline]
    pub fn distance(self, a: &[f64], b: &[f64]) -> f64 {
        debug_assert_eq!(a.len(), b.len());
        match self {
            Self::Euclidean => a
                .iter()
                .zip(b)
                .map(|(x, y)| (x - y).powi(2))
                .sum::<f64>()
                .sqrt(),
            Self::Manhattan => a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum(),
        }
    }

    /// Return the canonical name used by [`FromStr`].
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Euclidean => "euclidean",
            Self::Manhattan => "manhattan",
        }
    }
}

impl FromStr for DistanceMetric {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "euclidean" => Ok(Self::Euclidean),
            "manhattan" | "cityblock" => Ok(Self::Manhattan),
            other => Err(InputError::UnknownMetric {
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
