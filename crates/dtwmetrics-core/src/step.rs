//! Step patterns: accumulated cost recurrences over a cost matrix.
//!
//! Recurrences follow Müller, *Information Retrieval for Music and Motion*
//! (2007), chapter 4.

use std::fmt;
use std::str::FromStr;

use tracing::{debug, instrument};

use crate::error::{DtwError, InputError};
use crate::matrix::Matrix;

/// Boundary condition on the first row of the accumulated cost matrix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SequenceMode {
    /// Align both sequences end to end; the path starts at `(0, 0)`.
    #[default]
    Whole,
    /// Search the first sequence inside the second; the first row is not
    /// accumulated so a match may start at any column.
    Sub,
}

impl SequenceMode {
    /// Return the canonical name used by [`FromStr`].
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Whole => "whole",
            Self::Sub => "sub",
        }
    }
}

impl FromStr for SequenceMode {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "whole" => Ok(Self::Whole),
            "sub" => Ok(Self::Sub),
            other => Err(InputError::UnknownSequenceMode {
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for SequenceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recurrence used to accumulate cost.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StepPattern {
    /// Unit diagonal, horizontal and vertical steps.
    #[default]
    SymmetricP0,
    /// Steps `(1,1)`, `(2,1)` and `(1,2)` only; forbids long horizontal or
    /// vertical runs and requires a length ratio of at most 2:1.
    SymmetricP1,
}

impl StepPattern {
    /// Return the canonical name used by [`FromStr`].
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SymmetricP0 => "symmetric_p0",
            Self::SymmetricP1 => "symmetric_p1",
        }
    }

    /// Check that an `n x m` alignment in `mode` is defined for this pattern.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::InvalidInput`] | `SymmetricP1` with [`SequenceMode::Sub`], or with `n < 2` / `m < 2` |
    /// | [`DtwError::LengthRatioExceeded`] | `SymmetricP1` with `n > 2m` or `m > 2n` |
    pub fn validate(self, n: usize, m: usize, mode: SequenceMode) -> Result<(), DtwError> {
        match self {
            Self::SymmetricP0 => Ok(()),
            Self::SymmetricP1 => {
                if mode == SequenceMode::Sub {
                    return Err(InputError::SubsequenceUnsupported {
                        pattern: self.as_str(),
                    }
                    .into());
                }
                let shortest = n.min(m);
                if shortest < 2 {
                    return Err(InputError::SequenceTooShort {
                        pattern: self.as_str(),
                        min: 2,
                        len: shortest,
                    }
                    .into());
                }
                if n > 2 * m || m > 2 * n {
                    return Err(DtwError::LengthRatioExceeded { n, m });
                }
                Ok(())
            }
        }
    }

    /// Accumulate `cost` under this pattern.
    ///
    /// Cells that no path can reach hold `f64::INFINITY`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`validate`](Self::validate).
    #[instrument(skip(cost), fields(n = cost.rows(), m = cost.cols()))]
    pub fn accumulate(self, cost: &Matrix, mode: SequenceMode) -> Result<Matrix, DtwError> {
        let (n, m) = cost.shape();
        self.validate(n, m, mode)?;
        let acm = match self {
            Self::SymmetricP0 => symmetric_p0(cost, mode),
            Self::SymmetricP1 => symmetric_p1(cost),
        };
        debug!(total = acm.last(), "accumulated cost matrix complete");
        Ok(acm)
    }
}

impl FromStr for StepPattern {
    type Err = DtwError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "symmetric_p0" => Ok(Self::SymmetricP0),
            "symmetric_p1" => Ok(Self::SymmetricP1),
            other => Err(DtwError::UnsupportedStepPattern {
                name: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for StepPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn symmetric_p0(cost: &Matrix, mode: SequenceMode) -> Matrix {
    let (n, m) = cost.shape();
    let mut acm = Matrix::filled(n, m, 0.0);

    acm[(0, 0)] = cost[(0, 0)];
    for i in 1..n {
        acm[(i, 0)] = acm[(i - 1, 0)] + cost[(i, 0)];
    }
    for j in 1..m {
        acm[(0, j)] = match mode {
            SequenceMode::Whole => acm[(0, j - 1)] + cost[(0, j)],
            SequenceMode::Sub => cost[(0, j)],
        };
    }

    for i in 1..n {
        for j in 1..m {
            let best = acm[(i - 1, j)].min(acm[(i, j - 1)]).min(acm[(i - 1, j - 1)]);
            acm[(i, j)] = cost[(i, j)] + best;
        }
    }
    acm
}

/// Requires `n >= 2` and `m >= 2`.
fn symmetric_p1(cost: &Matrix) -> Matrix {
    let (n, m) = cost.shape();
    let mut acm = Matrix::filled(n, m, f64::INFINITY);

    acm[(0, 0)] = 0.0;
    acm[(1, 1)] = cost[(1, 1)];

    for i in 2..n {
        for j in 2..m {
            let best = acm[(i - 1, j - 1)]
                .min(acm[(i - 2, j - 1)])
                .min(acm[(i - 1, j - 2)]);
            acm[(i, j)] = best + cost[(i, j)];
        }
    }
    acm
}
