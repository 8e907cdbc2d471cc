//! Pairwise cost matrix between two sequences.

use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::error::{DtwError, InputError};
use crate::matrix::Matrix;
use crate::metric::DistanceMetric;
use crate::sequence::SequenceView;

/// Compute the `N x M` cost matrix with entry `(i, j) = metric(a[i], b[j])`.
///
/// Rows are independent and filled in parallel using rayon.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`DtwError::InvalidInput`] | `a` and `b` have different point dimensions |
#[instrument(skip(a, b), fields(n = a.len(), m = b.len(), dim = a.dim()))]
pub fn cost_matrix(
    a: SequenceView<'_>,
    b: SequenceView<'_>,
    metric: DistanceMetric,
) -> Result<Matrix, DtwError> {
    check_dimensions(a, b)?;

    let (n, m) = (a.len(), b.len());
    let mut cost = Matrix::filled(n, m, 0.0);
    cost.as_mut_slice()
        .par_chunks_mut(m)
        .enumerate()
        .for_each(|(i, row)| {
            let p = a.point(i);
            for (cell, q) in row.iter_mut().zip(b.points()) {
                *cell = metric.distance(p, q);
            }
        });

    debug!("cost matrix complete");
    Ok(cost)
}

pub(crate) fn check_dimensions(a: SequenceView<'_>, b: SequenceView<'_>) -> Result<(), DtwError> {
    if a.dim() != b.dim() {
        return Err(InputError::DimensionMismatch {
            a: a.dim(),
            b: b.dim(),
        }
        .into());
    }
    Ok(())
}
