//! Error types for DTW computation and input validation.

/// Errors from cost matrix, accumulated cost, path and projection stages.
#[derive(Debug, thiserror::Error)]
pub enum DtwError {
    /// Returned when a sequence, matrix or selector string is malformed.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputError),

    /// Returned when a step pattern name does not match a known recurrence.
    #[error("unsupported step pattern \"{name}\" (expected symmetric_p0 or symmetric_p1)")]
    UnsupportedStepPattern {
        /// The name that failed to parse.
        name: String,
    },

    /// Returned when `symmetric_p1` is asked to align sequences whose lengths
    /// differ by more than a factor of two.
    #[error("length ratio exceeds 2:1 for symmetric_p1 ({n} x {m})")]
    LengthRatioExceeded {
        /// Length of the first sequence.
        n: usize,
        /// Length of the second sequence.
        m: usize,
    },

    /// Returned when a subsequence end bound lies outside the matrix columns.
    #[error("subsequence end bound {bound} must be below column count {n_cols}")]
    InvalidSubsequenceBound {
        /// The requested end column.
        bound: usize,
        /// Number of columns in the accumulated cost matrix.
        n_cols: usize,
    },

    /// Returned when a warping path references a point the sequence does not have.
    #[error("path index {index} out of range for sequence of length {len}")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Length of the projected sequence.
        len: usize,
    },
}

/// Details for [`DtwError::InvalidInput`].
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    /// Returned when a sequence has no points.
    #[error("sequence must be non-empty")]
    EmptySequence,

    /// Returned when points are declared with zero components.
    #[error("point dimension must be at least 1")]
    ZeroDimension,

    /// Returned when a flat buffer does not divide evenly into points.
    #[error("buffer of {len} values is not a multiple of dimension {dim}")]
    UnevenBuffer {
        /// Number of values supplied.
        len: usize,
        /// Requested point dimension.
        dim: usize,
    },

    /// Returned when a point has a different number of components than the first.
    #[error("point {index} has {got} components, expected {expected}")]
    RaggedPoint {
        /// Position of the offending point.
        index: usize,
        /// Dimension of the first point.
        expected: usize,
        /// Dimension of the offending point.
        got: usize,
    },

    /// Returned when a sequence contains NaN or an infinity.
    #[error("non-finite value at point {index}")]
    NonFiniteValue {
        /// Position of the first point holding a non-finite component.
        index: usize,
    },

    /// Returned when two sequences with different point dimensions are compared.
    #[error("dimension mismatch: {a} vs {b}")]
    DimensionMismatch {
        /// Dimension of the first sequence.
        a: usize,
        /// Dimension of the second sequence.
        b: usize,
    },

    /// Returned when a sequence mode name is neither `whole` nor `sub`.
    #[error("unknown sequence mode \"{value}\" (expected whole or sub)")]
    UnknownSequenceMode {
        /// The name that failed to parse.
        value: String,
    },

    /// Returned when a distance metric name is not recognised.
    #[error("unknown distance metric \"{value}\" (expected euclidean, manhattan or cityblock)")]
    UnknownMetric {
        /// The name that failed to parse.
        value: String,
    },

    /// Returned when subsequence search is requested with a pattern that only
    /// defines whole-sequence boundaries.
    #[error("step pattern {pattern} supports whole-sequence matching only")]
    SubsequenceUnsupported {
        /// Name of the step pattern.
        pattern: &'static str,
    },

    /// Returned when a sequence is too short for the step pattern's seed cells.
    #[error("step pattern {pattern} needs sequences of length >= {min}, got {len}")]
    SequenceTooShort {
        /// Name of the step pattern.
        pattern: &'static str,
        /// Minimum supported length.
        min: usize,
        /// Length that was supplied.
        len: usize,
    },

    /// Returned when matrix rows are missing or of unequal width.
    #[error("matrix rows must be non-empty and of equal width (row {row} has {got}, expected {expected})")]
    RaggedMatrix {
        /// Index of the offending row.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        got: usize,
    },

    /// Returned when a matrix is built with no rows or no columns.
    #[error("matrix must have at least one row and one column")]
    EmptyMatrix,
}
