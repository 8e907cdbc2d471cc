//! Dynamic Time Warping metrics.
//!
//! Pure math library, zero I/O. Builds the pointwise cost matrix between two
//! sequences, accumulates it under a step pattern (`symmetric_p0` with
//! whole or subsequence boundaries, or `symmetric_p1`), backtracks the
//! optimal warping path and projects a sequence along it.
//!
//! ```
//! use dtwmetrics_core::{Dtw, Sequence};
//!
//! let a = Sequence::new(vec![0.0, 1.0, 2.0, 1.0]).unwrap();
//! let b = Sequence::new(vec![0.0, 1.0, 1.0, 2.0, 1.0]).unwrap();
//! let alignment = Dtw::new().compute_all(a.as_view(), b.as_view()).unwrap();
//! assert_eq!(alignment.distance().value(), 0.0);
//! assert_eq!(alignment.path.to_pairs().first(), Some(&(0, 0)));
//! assert_eq!(alignment.path.to_pairs().last(), Some(&(3, 4)));
//! ```

mod cost;
mod distance;
mod dtw;
mod error;
mod matrix;
mod metric;
mod path;
mod sequence;
mod step;
mod subsequence;
mod warp;

pub use cost::cost_matrix;
pub use distance::DtwDistance;
pub use dtw::{Alignment, Dtw, accumulated_cost_matrix, compute_all};
pub use error::{DtwError, InputError};
pub use matrix::Matrix;
pub use metric::DistanceMetric;
pub use path::{WarpingPath, WarpingStep, optimal_warping_path};
pub use sequence::{Sequence, SequenceView};
pub use step::{SequenceMode, StepPattern};
pub use subsequence::{SimilarSubsequences, SubsequenceMatch, similar_subsequences};
pub use warp::{Projection, WarpedSequence, warp, warped_sequence};
