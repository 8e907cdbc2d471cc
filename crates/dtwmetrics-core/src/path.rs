//! Warping path types and backtracking through an accumulated cost matrix.

use tracing::{debug, instrument};

use crate::error::DtwError;
use crate::matrix::Matrix;

/// A single step in a DTW warping path, mapping index `a` in the first
/// sequence (matrix row) to index `b` in the second sequence (matrix column).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WarpingStep {
    /// Index in the first sequence.
    pub a: usize,
    /// Index in the second sequence.
    pub b: usize,
}

/// An ordered sequence of warping steps from `(0, 0)` to the end cell.
#[derive(Debug, Clone, PartialEq)]
pub struct WarpingPath(Vec<WarpingStep>);

impl WarpingPath {
    /// Create a new warping path from a vector of steps.
    pub(crate) fn new(steps: Vec<WarpingStep>) -> Self {
        Self(steps)
    }

    /// Return the warping steps as a slice.
    #[must_use]
    pub fn steps(&self) -> &[WarpingStep] {
        &self.0
    }

    /// Return the number of steps in the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return true if the path contains no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Return the final step, i.e. the cell the backtrack started from.
    #[must_use]
    pub fn end(&self) -> Option<WarpingStep> {
        self.0.last().copied()
    }

    /// Return the path as `(a, b)` index pairs.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(usize, usize)> {
        self.0.iter().map(|s| (s.a, s.b)).collect()
    }
}

impl<'a> IntoIterator for &'a WarpingPath {
    type Item = &'a WarpingStep;
    type IntoIter = std::slice::Iter<'a, WarpingStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Backtrack the optimal warping path through an accumulated cost matrix.
///
/// Starts at `(N-1, end)` where `end` is `end_bound` or the last column, and
/// walks back to `(0, 0)`:
///
/// - in row 1 it moves left, in column 1 it moves up;
/// - elsewhere it moves to the cheapest of the diagonal, upper and left
///   neighbours, preferring diagonal, then upper, then left on ties.
///
/// The returned path runs start to end.
///
/// `Some(b)` is the last column of the path itself, so `Some(0)` ends at
/// `(N-1, 0)`; it is not an exclusive column count.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`DtwError::InvalidSubsequenceBound`] | `end_bound >= acm.cols()` |
#[instrument(skip(acm), fields(n = acm.rows(), m = acm.cols()))]
pub fn optimal_warping_path(
    acm: &Matrix,
    end_bound: Option<usize>,
) -> Result<WarpingPath, DtwError> {
    let (n_rows, n_cols) = acm.shape();
    let end = match end_bound {
        Some(bound) if bound >= n_cols => {
            return Err(DtwError::InvalidSubsequenceBound { bound, n_cols });
        }
        Some(bound) => bound,
        None => n_cols - 1,
    };

    let mut i = n_rows - 1;
    let mut j = end;
    let mut steps = Vec::with_capacity(n_rows + end + 1);
    steps.push(WarpingStep { a: i, b: j });

    while i > 0 && j > 0 {
        if i == 1 {
            j -= 1;
        } else if j == 1 {
            i -= 1;
        } else {
            let diag = acm[(i - 1, j - 1)];
            let up = acm[(i - 1, j)];
            let left = acm[(i, j - 1)];
            if diag <= up && diag <= left {
                i -= 1;
                j -= 1;
            } else if up <= left {
                i -= 1;
            } else {
                j -= 1;
            }
        }
        steps.push(WarpingStep { a: i, b: j });
    }

    // Finish along the matrix border. Away from degenerate single-row or
    // single-column matrices this only adds (0, 0).
    while i > 0 {
        i -= 1;
        steps.push(WarpingStep { a: i, b: j });
    }
    while j > 0 {
        j -= 1;
        steps.push(WarpingStep { a: i, b: j });
    }

    steps.reverse();
    debug!(len = steps.len(), end, "warping path extracted");
    Ok(WarpingPath::new(steps))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acm(rows: Vec<Vec<f64>>) -> Matrix {
        Matrix::from_rows(rows).unwrap()
    }

    fn assert_monotonic(path: &WarpingPath) {
        for pair in path.steps().windows(2) {
            let da = pair[1].a - pair[0].a;
            let db = pair[1].b - pair[0].b;
            assert!(da <= 1 && db <= 1, "jump between {:?} and {:?}", pair[0], pair[1]);
            assert!(da + db >= 1, "no progress at {:?}", pair[0]);
        }
    }

    #[test]
    fn flat_plateau_prefers_diagonal() {
        let path = optimal_warping_path(&acm(vec![vec![0.0; 3]; 3]), None).unwrap();
        // Diagonal from (2,2) to (1,1), then row 1 forces a left move.
        assert_eq!(path.to_pairs(), vec![(0, 0), (1, 0), (1, 1), (2, 2)]);
    }

    #[test]
    fn vertical_beats_horizontal_on_tie() {
        // At (2,2): diag=5, up=1, left=1 -> up to (1,2), then left along row 1.
        let m = acm(vec![
            vec![0.0, 0.0, 0.0],
            vec![0.0, 5.0, 1.0],
            vec![0.0, 1.0, 0.0],
        ]);
        let path = optimal_warping_path(&m, None).unwrap();
        assert_eq!(path.to_pairs(), vec![(0, 0), (1, 0), (1, 1), (1, 2), (2, 2)]);
    }

    #[test]
    fn horizontal_when_strictly_cheapest() {
        // At (2,2): diag=5, up=3, left=1 -> left to (2,1); column 1 forces up moves.
        let m = acm(vec![
            vec![0.0, 0.0, 0.0],
            vec![0.0, 5.0, 3.0],
            vec![0.0, 1.0, 0.0],
        ]);
        let path = optimal_warping_path(&m, None).unwrap();
        assert_eq!(path.to_pairs(), vec![(0, 0), (1, 0), (1, 1), (2, 1), (2, 2)]);
    }

    #[test]
    fn endpoints_and_monotonicity() {
        let m = acm(vec![
            vec![1.0, 3.0, 6.0, 10.0],
            vec![5.0, 2.0, 4.0, 7.0],
            vec![10.0, 5.0, 3.0, 5.0],
            vec![12.0, 9.0, 4.0, 4.0],
            vec![13.0, 12.0, 8.0, 6.0],
        ]);
        let path = optimal_warping_path(&m, None).unwrap();
        assert_eq!(path.steps()[0], WarpingStep { a: 0, b: 0 });
        assert_eq!(path.end(), Some(WarpingStep { a: 4, b: 3 }));
        assert_monotonic(&path);
        assert!(path.len() <= 5 + 4 - 1);
    }

    #[test]
    fn end_bound_stops_early() {
        let m = acm(vec![vec![0.0; 5]; 3]);
        let path = optimal_warping_path(&m, Some(2)).unwrap();
        assert_eq!(path.end(), Some(WarpingStep { a: 2, b: 2 }));
        assert_eq!(path.steps()[0], WarpingStep { a: 0, b: 0 });
        assert_monotonic(&path);
    }

    #[test]
    fn end_bound_zero_walks_first_column() {
        let m = acm(vec![vec![0.0; 4]; 3]);
        let path = optimal_warping_path(&m, Some(0)).unwrap();
        assert_eq!(path.to_pairs(), vec![(0, 0), (1, 0), (2, 0)]);
    }

    #[test]
    fn rejects_end_bound_past_last_column() {
        let m = acm(vec![vec![0.0; 4]; 2]);
        let result = optimal_warping_path(&m, Some(4));
        assert!(matches!(
            result,
            Err(DtwError::InvalidSubsequenceBound { bound: 4, n_cols: 4 })
        ));
    }

    #[test]
    fn single_row_walks_left() {
        let m = acm(vec![vec![1.0, 2.0, 3.0]]);
        let path = optimal_warping_path(&m, None).unwrap();
        assert_eq!(path.to_pairs(), vec![(0, 0), (0, 1), (0, 2)]);
    }

    #[test]
    fn single_cell() {
        let m = acm(vec![vec![7.0]]);
        let path = optimal_warping_path(&m, None).unwrap();
        assert_eq!(path.to_pairs(), vec![(0, 0)]);
    }

    #[test]
    fn infinite_cells_are_avoided() {
        // Mimics a symmetric_p1 matrix: only the diagonal is finite.
        let inf = f64::INFINITY;
        let m = acm(vec![
            vec![0.0, inf, inf, inf],
            vec![inf, 1.0, inf, inf],
            vec![inf, inf, 2.0, inf],
            vec![inf, inf, inf, 3.0],
        ]);
        let path = optimal_warping_path(&m, None).unwrap();
        assert_eq!(path.to_pairs(), vec![(0, 0), (1, 0), (1, 1), (2, 2), (3, 3)]);
    }
}
