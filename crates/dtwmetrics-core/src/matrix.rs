//! Dense row-major matrix for cost and accumulated cost values.

use std::ops::{Index, IndexMut};

use crate::error::InputError;

/// Dense `rows x cols` matrix of `f64`, stored row-major in a flat vector.
///
/// Cell `(i, j)` lives at `data[i * cols + j]`. Always has at least one row
/// and one column.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Create a matrix with every cell set to `value`.
    pub(crate) fn filled(rows: usize, cols: usize, value: f64) -> Self {
        debug_assert!(rows > 0 && cols > 0);
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    /// Create a matrix from pre-computed row-major data.
    pub(crate) fn from_raw(rows: usize, cols: usize, data: Vec<f64>) -> Self {
        debug_assert_eq!(data.len(), rows * cols);
        Self { rows, cols, data }
    }

    /// Build a matrix from nested rows, e.g. an accumulated cost matrix
    /// produced elsewhere.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`InputError::EmptyMatrix`] | No rows, or a zero-width first row |
    /// | [`InputError::RaggedMatrix`] | A row differs in width from the first |
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, InputError> {
        let cols = rows.first().map_or(0, Vec::len);
        if cols == 0 {
            return Err(InputError::EmptyMatrix);
        }
        let n_rows = rows.len();
        let mut data = Vec::with_capacity(n_rows * cols);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != cols {
                return Err(InputError::RaggedMatrix {
                    row,
                    expected: cols,
                    got: values.len(),
                });
            }
            data.extend(values);
        }
        Ok(Self::from_raw(n_rows, cols, data))
    }

    /// Return the number of rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Return the number of columns.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Return `(rows, cols)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Return the value at `(i, j)`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= rows` or `j >= cols`.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self[(i, j)]
    }

    /// Return row `i` as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `i >= rows`.
    #[must_use]
    pub fn row(&self, i: usize) -> &[f64] {
        assert!(i < self.rows, "row index {i} out of bounds for {} rows", self.rows);
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Return the bottom-right cell.
    #[must_use]
    pub fn last(&self) -> f64 {
        self.data[self.data.len() - 1]
    }

    /// Iterate over rows in order.
    pub fn iter_rows(&self) -> std::slice::ChunksExact<'_, f64> {
        self.data.chunks_exact(self.cols)
    }

    /// Return the row-major buffer.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Mutable row-major buffer, for row-parallel fills.
    pub(crate) fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Return a copy with rows and columns swapped.
    #[must_use]
    pub fn transposed(&self) -> Self {
        let mut data = Vec::with_capacity(self.data.len());
        for j in 0..self.cols {
            data.extend((0..self.rows).map(|i| self.data[i * self.cols + j]));
        }
        Self::from_raw(self.cols, self.rows, data)
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (i, j): (usize, usize)) -> &Self::Output {
        assert!(i < self.rows, "row index {i} out of bounds for {} rows", self.rows);
        assert!(j < self.cols, "column index {j} out of bounds for {} columns", self.cols);
        &self.data[i * self.cols + j]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut Self::Output {
        assert!(i < self.rows, "row index {i} out of bounds for {} rows", self.rows);
        assert!(j < self.cols, "column index {j} out of bounds for {} columns", self.cols);
        &mut self.data[i * self.cols + j]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_matrix() -> Matrix {
        // 2 x 3
        Matrix::from_rows(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap()
    }

    #[test]
    fn shape_and_access() {
        let m = make_matrix();
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m.get(0, 2), 3.0);
        assert_eq!(m[(1, 0)], 4.0);
        assert_eq!(m.last(), 6.0);
    }

    #[test]
    fn rows_are_contiguous() {
        let m = make_matrix();
        assert_eq!(m.row(1), &[4.0, 5.0, 6.0]);
        let rows: Vec<&[f64]> = m.iter_rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn transpose_swaps_axes() {
        let t = make_matrix().transposed();
        assert_eq!(t.shape(), (3, 2));
        assert_eq!(t.row(0), &[1.0, 4.0]);
        assert_eq!(t.row(2), &[3.0, 6.0]);
    }

    #[test]
    fn index_mut_writes_cell() {
        let mut m = Matrix::filled(2, 2, 0.0);
        m[(1, 1)] = 9.0;
        assert_eq!(m.as_slice(), &[0.0, 0.0, 0.0, 9.0]);
    }

    #[test]
    fn from_rows_rejects_ragged() {
        let result = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0]]);
        assert!(matches!(
            result,
            Err(InputError::RaggedMatrix { row: 1, expected: 2, got: 1 })
        ));
    }

    #[test]
    fn from_rows_rejects_empty() {
        assert!(matches!(Matrix::from_rows(vec![]), Err(InputError::EmptyMatrix)));
        assert!(matches!(Matrix::from_rows(vec![vec![]]), Err(InputError::EmptyMatrix)));
    }

    #[test]
    #[should_panic(expected = "column index 3 out of bounds")]
    fn index_out_of_bounds_panics() {
        let m = make_matrix();
        let _ = m[(0, 3)];
    }
}
