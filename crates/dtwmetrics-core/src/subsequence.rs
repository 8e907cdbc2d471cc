//! Subsequence search on the last row of an accumulated cost matrix.
//!
//! With [`SequenceMode::Sub`](crate::SequenceMode::Sub), `Δ(b) = D(N-1, b)` is
//! the cheapest alignment of the whole first sequence against a stretch of
//! the second sequence ending at column `b`. Local minima of `Δ` are the
//! candidate end points of matching subsequences.

use tracing::{debug, instrument};

use crate::distance::DtwDistance;
use crate::error::DtwError;
use crate::matrix::Matrix;
use crate::path::{WarpingPath, optimal_warping_path};

/// Distance profile `Δ` and its local minima.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarSubsequences {
    /// Columns `b` with `Δ(b-1) > Δ(b) < Δ(b+1)`, ascending.
    pub local_minima: Vec<usize>,
    /// The last row of the accumulated cost matrix.
    pub delta: Vec<f64>,
}

/// A candidate match ending at column `end`.
#[derive(Debug, Clone, PartialEq)]
pub struct SubsequenceMatch {
    /// Last column of the matching stretch.
    pub end: usize,
    /// `Δ(end)`.
    pub cost: DtwDistance,
    /// Backtracked path ending at `(N-1, end)`.
    pub path: WarpingPath,
}

impl SimilarSubsequences {
    /// Return the column with the smallest `Δ`, first one on ties.
    #[must_use]
    pub fn best(&self) -> Option<usize> {
        self.delta
            .iter()
            .enumerate()
            .min_by(|(_, x), (_, y)| x.total_cmp(y))
            .map(|(b, _)| b)
    }

    /// Backtrack a path for every local minimum, in ascending column order.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::InvalidSubsequenceBound`] | `acm` is not the matrix this profile came from |
    #[instrument(skip_all, fields(candidates = self.local_minima.len()))]
    pub fn matches(&self, acm: &Matrix) -> Result<Vec<SubsequenceMatch>, DtwError> {
        self.local_minima
            .iter()
            .map(|&end| {
                let path = optimal_warping_path(acm, Some(end))?;
                debug!(end, len = path.len(), "subsequence path extracted");
                Ok(SubsequenceMatch {
                    end,
                    cost: DtwDistance::new(self.delta[end]),
                    path,
                })
            })
            .collect()
    }
}

/// Extract `Δ` from the last row of `acm` and find its strict local minima.
///
/// The first and last columns are never reported as minima.
#[must_use]
#[instrument(skip(acm), fields(n = acm.rows(), m = acm.cols()))]
pub fn similar_subsequences(acm: &Matrix) -> SimilarSubsequences {
    let delta = acm.row(acm.rows() - 1).to_vec();
    let local_minima: Vec<usize> = delta
        .windows(3)
        .enumerate()
        .filter(|(_, w)| w[1] < w[0] && w[1] < w[2])
        .map(|(k, _)| k + 1)
        .collect();
    debug!(n_minima = local_minima.len(), "subsequence candidates found");
    SimilarSubsequences {
        local_minima,
        delta,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_strict_interior_minima() {
        let acm = Matrix::from_rows(vec![
            vec![9.0; 8],
            vec![0.0, 3.0, 1.0, 4.0, 4.0, 2.0, 5.0, -1.0],
        ])
        .unwrap();
        let s = similar_subsequences(&acm);
        assert_eq!(s.delta, vec![0.0, 3.0, 1.0, 4.0, 4.0, 2.0, 5.0, -1.0]);
        // 0 and 7 are endpoints; the 4.0 plateau is not strict.
        assert_eq!(s.local_minima, vec![2, 5]);
    }

    #[test]
    fn plateau_is_not_a_minimum() {
        let acm = Matrix::from_rows(vec![vec![3.0, 1.0, 1.0, 3.0]]).unwrap();
        assert!(similar_subsequences(&acm).local_minima.is_empty());
    }

    #[test]
    fn short_rows_have_no_minima() {
        let acm = Matrix::from_rows(vec![vec![1.0, 0.0]]).unwrap();
        let s = similar_subsequences(&acm);
        assert!(s.local_minima.is_empty());
        assert_eq!(s.best(), Some(1));
    }

    #[test]
    fn best_is_global_minimum() {
        let acm = Matrix::from_rows(vec![vec![4.0, 2.0, 3.0, 0.5, 6.0]]).unwrap();
        assert_eq!(similar_subsequences(&acm).best(), Some(3));
    }

    #[test]
    fn matches_end_at_each_candidate() {
        let acm = Matrix::from_rows(vec![
            vec![0.0; 6],
            vec![1.0, 0.0, 1.0, 1.0, 0.0, 1.0],
            vec![5.0, 2.0, 4.0, 3.0, 1.0, 3.0],
        ])
        .unwrap();
        let s = similar_subsequences(&acm);
        assert_eq!(s.local_minima, vec![1, 4]);
        let matches = s.matches(&acm).unwrap();
        assert_eq!(matches.len(), 2);
        for (m, &end) in matches.iter().zip(&s.local_minima) {
            assert_eq!(m.end, end);
            assert_eq!(m.cost.value(), s.delta[end]);
            let last = m.path.end().unwrap();
            assert_eq!((last.a, last.b), (2, end));
        }
    }
}
