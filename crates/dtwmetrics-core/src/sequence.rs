//! Sequence types with validation guarantees.

use crate::error::InputError;

/// Owned, validated sequence of points.
///
/// Stored row-major with shape `(len, dim)`. Guaranteed non-empty, with
/// `dim >= 1` and every component finite. Scalar input is promoted to
/// dimension 1.
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    data: Vec<f64>,
    dim: usize,
}

impl Sequence {
    /// Create a one-dimensional sequence from scalar values.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`InputError::EmptySequence`] | `values` is empty |
    /// | [`InputError::NonFiniteValue`] | Any value is NaN or infinite |
    pub fn new(values: Vec<f64>) -> Result<Self, InputError> {
        Self::from_flat(values, 1)
    }

    /// Create a sequence from a row-major buffer of `len * dim` values.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`InputError::ZeroDimension`] | `dim` is zero |
    /// | [`InputError::EmptySequence`] | `data` is empty |
    /// | [`InputError::UnevenBuffer`] | `data.len()` is not a multiple of `dim` |
    /// | [`InputError::NonFiniteValue`] | Any value is NaN or infinite |
    pub fn from_flat(data: Vec<f64>, dim: usize) -> Result<Self, InputError> {
        validate(&data, dim)?;
        Ok(Self { data, dim })
    }

    /// Create a sequence from a list of points of equal dimension.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`InputError::EmptySequence`] | `points` is empty |
    /// | [`InputError::ZeroDimension`] | The first point has no components |
    /// | [`InputError::RaggedPoint`] | A point differs in dimension from the first |
    /// | [`InputError::NonFiniteValue`] | Any component is NaN or infinite |
    pub fn from_points(points: Vec<Vec<f64>>) -> Result<Self, InputError> {
        let Some(first) = points.first() else {
            return Err(InputError::EmptySequence);
        };
        let dim = first.len();
        if dim == 0 {
            return Err(InputError::ZeroDimension);
        }
        let mut data = Vec::with_capacity(points.len() * dim);
        for (index, point) in points.into_iter().enumerate() {
            if point.len() != dim {
                return Err(InputError::RaggedPoint {
                    index,
                    expected: dim,
                    got: point.len(),
                });
            }
            data.extend(point);
        }
        Self::from_flat(data, dim)
    }

    /// Borrow this sequence as a zero-copy view.
    #[must_use]
    pub fn as_view(&self) -> SequenceView<'_> {
        SequenceView {
            data: &self.data,
            dim: self.dim,
        }
    }

    /// Return the number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len() / self.dim
    }

    /// Return true if the sequence has no points.
    ///
    /// Always `false` for a constructed [`Sequence`]; provided for the
    /// `len_without_is_empty` convention.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Return the number of components per point.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Return point `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    #[must_use]
    pub fn point(&self, index: usize) -> &[f64] {
        self.as_view().point(index)
    }

    /// Consume and return the row-major buffer.
    #[must_use]
    pub fn into_inner(self) -> Vec<f64> {
        self.data
    }
}

impl TryFrom<Vec<f64>> for Sequence {
    type Error = InputError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(values)
    }
}

/// Borrowed, validated view into a sequence.
#[derive(Debug, Clone, Copy)]
pub struct SequenceView<'a> {
    data: &'a [f64],
    dim: usize,
}

impl<'a> SequenceView<'a> {
    /// Create a view over a row-major slice of `len * dim` values.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Sequence::from_flat`].
    pub fn new(data: &'a [f64], dim: usize) -> Result<Self, InputError> {
        validate(data, dim)?;
        Ok(Self { data, dim })
    }

    /// Create a one-dimensional view over scalar values.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Sequence::new`].
    pub fn scalar(data: &'a [f64]) -> Result<Self, InputError> {
        Self::new(data, 1)
    }

    /// Return the underlying row-major slice.
    #[must_use]
    pub fn as_slice(&self) -> &'a [f64] {
        self.data
    }

    /// Return the number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len() / self.dim
    }

    /// Return true if the view has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Return the number of components per point.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Return point `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    #[must_use]
    pub fn point(&self, index: usize) -> &'a [f64] {
        &self.data[index * self.dim..(index + 1) * self.dim]
    }

    /// Iterate over points in order.
    pub fn points(&self) -> std::slice::ChunksExact<'a, f64> {
        self.data.chunks_exact(self.dim)
    }
}

fn validate(data: &[f64], dim: usize) -> Result<(), InputError> {
    if dim == 0 {
        return Err(InputError::ZeroDimension);
    }
    if data.is_empty() {
        return Err(InputError::EmptySequence);
    }
    if data.len() % dim != 0 {
        return Err(InputError::UnevenBuffer {
            len: data.len(),
            dim,
        });
    }
    if let Some(pos) = data.iter().position(|v| !v.is_finite()) {
        return Err(InputError::NonFiniteValue { index: pos / dim });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_vec() {
        let result = Sequence::new(vec![]);
        assert!(matches!(result, Err(InputError::EmptySequence)));
    }

    #[test]
    fn rejects_nan() {
        let result = Sequence::new(vec![1.0, f64::NAN, 3.0]);
        assert!(matches!(result, Err(InputError::NonFiniteValue { index: 1 })));
    }

    #[test]
    fn non_finite_index_is_point_index() {
        let result = Sequence::from_flat(vec![1.0, 2.0, 3.0, f64::INFINITY], 2);
        assert!(matches!(result, Err(InputError::NonFiniteValue { index: 1 })));
    }

    #[test]
    fn scalar_input_promoted_to_dim_one() {
        let s = Sequence::new(vec![1.0, 2.0, 3.0]).unwrap();
        assert_eq!(s.len(), 3);
        assert_eq!(s.dim(), 1);
        assert_eq!(s.point(2), &[3.0]);
    }

    #[test]
    fn from_points_flattens_row_major() {
        let s = Sequence::from_points(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(s.len(), 2);
        assert_eq!(s.dim(), 2);
        assert_eq!(s.point(1), &[3.0, 4.0]);
        assert_eq!(s.into_inner(), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn from_points_rejects_ragged() {
        let result = Sequence::from_points(vec![vec![1.0, 2.0], vec![3.0]]);
        assert!(matches!(
            result,
            Err(InputError::RaggedPoint { index: 1, expected: 2, got: 1 })
        ));
    }

    #[test]
    fn from_points_rejects_zero_dimension() {
        let result = Sequence::from_points(vec![vec![], vec![]]);
        assert!(matches!(result, Err(InputError::ZeroDimension)));
    }

    #[test]
    fn from_flat_rejects_uneven_buffer() {
        let result = Sequence::from_flat(vec![1.0, 2.0, 3.0], 2);
        assert!(matches!(result, Err(InputError::UnevenBuffer { len: 3, dim: 2 })));
    }

    #[test]
    fn view_points_iterate_in_order() {
        let data = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let view = SequenceView::new(&data, 3).unwrap();
        let points: Vec<&[f64]> = view.points().collect();
        assert_eq!(points, vec![&[1.0, 2.0, 3.0][..], &[4.0, 5.0, 6.0][..]]);
    }

    #[test]
    fn view_rejects_empty() {
        let result = SequenceView::scalar(&[]);
        assert!(matches!(result, Err(InputError::EmptySequence)));
    }

    #[test]
    fn try_from_vec() {
        let s: Result<Sequence, _> = vec![1.0, 2.0].try_into();
        assert!(s.is_ok());
    }
}
