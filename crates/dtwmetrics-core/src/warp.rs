//! Projection of a sequence along a warping path.

use tracing::instrument;

use crate::error::DtwError;
use crate::path::WarpingPath;
use crate::sequence::SequenceView;

/// Which side of the path indexes the projected sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Projection {
    /// The sequence is the first one (rows); each step `(a, b)` emits
    /// `(b, sequence[a])`, landing in the second sequence's index space.
    #[default]
    RowsOntoColumns,
    /// The sequence is the second one (columns); each step `(a, b)` emits
    /// `(a, sequence[b])`, landing in the first sequence's index space.
    ColumnsOntoRows,
}

/// A sequence reindexed along a warping path.
///
/// Entry `k` pairs a target index with the point that the path aligns to it.
/// Points are stored row-major with the source sequence's dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct WarpedSequence {
    indices: Vec<usize>,
    values: Vec<f64>,
    dim: usize,
}

impl WarpedSequence {
    /// Return the number of entries (one per path step).
    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Return true if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Return the point dimension.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Return the target indices in path order.
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Return the point of entry `k`.
    ///
    /// # Panics
    ///
    /// Panics if `k >= len()`.
    #[must_use]
    pub fn value(&self, k: usize) -> &[f64] {
        &self.values[k * self.dim..(k + 1) * self.dim]
    }

    /// Iterate over `(target_index, point)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[f64])> + '_ {
        self.indices
            .iter()
            .copied()
            .zip(self.values.chunks_exact(self.dim))
    }
}

/// Project the first sequence of an alignment into the second one's index
/// space: every step `(a, b)` yields `(b, sequence[a])`.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`DtwError::IndexOutOfRange`] | A step's row index is `>= sequence.len()` |
pub fn warped_sequence(
    sequence: SequenceView<'_>,
    path: &WarpingPath,
) -> Result<WarpedSequence, DtwError> {
    warp(sequence, path, Projection::RowsOntoColumns)
}

/// Project `sequence` along `path` in the given direction.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`DtwError::IndexOutOfRange`] | A step indexes past the end of `sequence` |
#[instrument(skip(sequence, path), fields(len = sequence.len(), steps = path.len()))]
pub fn warp(
    sequence: SequenceView<'_>,
    path: &WarpingPath,
    projection: Projection,
) -> Result<WarpedSequence, DtwError> {
    let len = sequence.len();
    let mut indices = Vec::with_capacity(path.len());
    let mut values = Vec::with_capacity(path.len() * sequence.dim());

    for step in path {
        let (source, target) = match projection {
            Projection::RowsOntoColumns => (step.a, step.b),
            Projection::ColumnsOntoRows => (step.b, step.a),
        };
        if source >= len {
            return Err(DtwError::IndexOutOfRange { index: source, len });
        }
        indices.push(target);
        values.extend_from_slice(sequence.point(source));
    }

    Ok(WarpedSequence {
        indices,
        values,
        dim: sequence.dim(),
    })
}
