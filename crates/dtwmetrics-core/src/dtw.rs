//! DTW pipeline: cost matrix, accumulated cost, warping path, warped sequence.

use tracing::{debug, instrument};

use crate::cost::{check_dimensions, cost_matrix};
use crate::distance::DtwDistance;
use crate::error::DtwError;
use crate::matrix::Matrix;
use crate::metric::DistanceMetric;
use crate::path::{WarpingPath, optimal_warping_path};
use crate::sequence::SequenceView;
use crate::step::{SequenceMode, StepPattern};
use crate::subsequence::{SimilarSubsequences, similar_subsequences};
use crate::warp::{Projection, WarpedSequence, warp};

/// Immutable DTW configuration. Thread-safe and copyable.
///
/// # Defaults
///
/// | Parameter      | Default                     |
/// |----------------|-----------------------------|
/// | `metric`       | [`DistanceMetric::Euclidean`] |
/// | `step_pattern` | [`StepPattern::SymmetricP0`]  |
/// | `mode`         | [`SequenceMode::Whole`]       |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dtw {
    metric: DistanceMetric,
    step_pattern: StepPattern,
    mode: SequenceMode,
}

impl Dtw {
    /// Create a calculator with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pointwise distance metric.
    #[must_use]
    pub fn with_metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Set the accumulation recurrence.
    #[must_use]
    pub fn with_step_pattern(mut self, step_pattern: StepPattern) -> Self {
        self.step_pattern = step_pattern;
        self
    }

    /// Set whole-sequence or subsequence matching.
    #[must_use]
    pub fn with_sequence_mode(mut self, mode: SequenceMode) -> Self {
        self.mode = mode;
        self
    }

    /// Return the distance metric.
    #[must_use]
    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    /// Return the step pattern.
    #[must_use]
    pub fn step_pattern(&self) -> StepPattern {
        self.step_pattern
    }

    /// Return the sequence mode.
    #[must_use]
    pub fn sequence_mode(&self) -> SequenceMode {
        self.mode
    }

    /// Compute the cost matrix between `a` and `b` under this metric.
    ///
    /// # Errors
    ///
    /// See [`cost_matrix`].
    pub fn cost_matrix(&self, a: SequenceView<'_>, b: SequenceView<'_>) -> Result<Matrix, DtwError> {
        cost_matrix(a, b, self.metric)
    }

    /// Compute the accumulated cost matrix between `a` and `b`.
    ///
    /// Preconditions of the step pattern are checked before the cost matrix
    /// is built.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::InvalidInput`] | Dimension mismatch, or a mode/length the step pattern does not define |
    /// | [`DtwError::LengthRatioExceeded`] | `SymmetricP1` with lengths more than 2:1 apart |
    #[instrument(skip(a, b), fields(n = a.len(), m = b.len()))]
    pub fn accumulated_cost_matrix(
        &self,
        a: SequenceView<'_>,
        b: SequenceView<'_>,
    ) -> Result<Matrix, DtwError> {
        self.precheck(a, b)?;
        let cost = self.cost_matrix(a, b)?;
        self.step_pattern.accumulate(&cost, self.mode)
    }

    /// Run the full pipeline and return every intermediate result.
    ///
    /// The warped sequence projects `b` into `a`'s index space: each path step
    /// `(i, j)` yields `(i, b[j])`, ready to overlay on `a`. In
    /// [`SequenceMode::Sub`] the subsequence profile is attached and the path
    /// still ends in the last column; use [`SimilarSubsequences::matches`] for
    /// per-candidate paths.
    ///
    /// # Errors
    ///
    /// Same conditions as [`accumulated_cost_matrix`](Self::accumulated_cost_matrix).
    #[instrument(skip(a, b), fields(n = a.len(), m = b.len()))]
    pub fn compute_all(&self, a: SequenceView<'_>, b: SequenceView<'_>) -> Result<Alignment, DtwError> {
        self.precheck(a, b)?;
        let cost = self.cost_matrix(a, b)?;
        let accumulated = self.step_pattern.accumulate(&cost, self.mode)?;
        let path = optimal_warping_path(&accumulated, None)?;
        let warped = warp(b, &path, Projection::ColumnsOntoRows)?;
        let subsequences = match self.mode {
            SequenceMode::Sub => Some(similar_subsequences(&accumulated)),
            SequenceMode::Whole => None,
        };

        let distance = DtwDistance::new(accumulated.last());
        debug!(%distance, path_len = path.len(), "alignment complete");
        Ok(Alignment {
            config: *self,
            cost,
            accumulated,
            path,
            warped,
            subsequences,
            distance,
        })
    }

    fn precheck(&self, a: SequenceView<'_>, b: SequenceView<'_>) -> Result<(), DtwError> {
        check_dimensions(a, b)?;
        self.step_pattern.validate(a.len(), b.len(), self.mode)
    }
}

/// Every output of one DTW computation.
#[derive(Debug, Clone)]
pub struct Alignment {
    /// Configuration that produced this alignment.
    pub config: Dtw,
    /// Pointwise cost matrix.
    pub cost: Matrix,
    /// Accumulated cost matrix.
    pub accumulated: Matrix,
    /// Optimal warping path to the last cell.
    pub path: WarpingPath,
    /// Second sequence projected along `path` into the first one's index space.
    pub warped: WarpedSequence,
    /// Distance profile and local minima, in subsequence mode only.
    pub subsequences: Option<SimilarSubsequences>,
    distance: DtwDistance,
}

impl Alignment {
    /// Return the accumulated cost at the bottom-right cell.
    #[must_use]
    pub fn distance(&self) -> DtwDistance {
        self.distance
    }
}

/// Compute the accumulated cost matrix for one explicit configuration.
///
/// # Errors
///
/// See [`Dtw::accumulated_cost_matrix`].
pub fn accumulated_cost_matrix(
    a: SequenceView<'_>,
    b: SequenceView<'_>,
    metric: DistanceMetric,
    step_pattern: StepPattern,
    mode: SequenceMode,
) -> Result<Matrix, DtwError> {
    Dtw::new()
        .with_metric(metric)
        .with_step_pattern(step_pattern)
        .with_sequence_mode(mode)
        .accumulated_cost_matrix(a, b)
}

/// Run the full pipeline for one explicit configuration.
///
/// # Errors
///
/// See [`Dtw::compute_all`].
pub fn compute_all(
    a: SequenceView<'_>,
    b: SequenceView<'_>,
    metric: DistanceMetric,
    step_pattern: StepPattern,
    mode: SequenceMode,
) -> Result<Alignment, DtwError> {
    Dtw::new()
        .with_metric(metric)
        .with_step_pattern(step_pattern)
        .with_sequence_mode(mode)
        .compute_all(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InputError;
    use crate::path::WarpingStep;
    use crate::sequence::Sequence;

    fn seq(values: &[f64]) -> Sequence {
        Sequence::new(values.to_vec()).unwrap()
    }

    #[test]
    fn identical_sequences_cost_zero() {
        let a = seq(&[1.0, 2.0, 3.0, 2.0]);
        let alignment = Dtw::new().compute_all(a.as_view(), a.as_view()).unwrap();
        assert_eq!(alignment.distance().value(), 0.0);
    }

    #[test]
    fn hand_computed_2x2() {
        // a=[0,1], b=[1,0]
        // C = [[1,0],[0,1]]
        // D(0,0)=1, D(0,1)=1, D(1,0)=1, D(1,1)=1+min(1,1,1)=2
        let a = seq(&[0.0, 1.0]);
        let b = seq(&[1.0, 0.0]);
        let acm = Dtw::new().accumulated_cost_matrix(a.as_view(), b.as_view()).unwrap();
        assert_eq!(acm.as_slice(), &[1.0, 1.0, 1.0, 2.0]);
    }

    #[test]
    fn compute_all_outputs_are_consistent() {
        let a = seq(&[1.0, 5.0, 2.0, 8.0, 3.0]);
        let b = seq(&[2.0, 4.0, 7.0]);
        let alignment = Dtw::new().compute_all(a.as_view(), b.as_view()).unwrap();

        assert_eq!(alignment.cost.shape(), (5, 3));
        assert_eq!(alignment.accumulated.shape(), (5, 3));
        assert_eq!(alignment.path.steps()[0], WarpingStep { a: 0, b: 0 });
        assert_eq!(alignment.path.end(), Some(WarpingStep { a: 4, b: 2 }));
        assert_eq!(alignment.warped.len(), alignment.path.len());
        assert_eq!(alignment.distance().value(), alignment.accumulated.get(4, 2));
        assert!(alignment.subsequences.is_none());
    }

    #[test]
    fn warped_is_second_sequence_in_first_frame() {
        // C = [[1,9,11],[9,1,1]]; path (0,0) (1,0) (1,1) (1,2)
        let a = seq(&[10.0, 20.0]);
        let b = seq(&[11.0, 19.0, 21.0]);
        let alignment = Dtw::new().compute_all(a.as_view(), b.as_view()).unwrap();
        assert_eq!(alignment.path.to_pairs(), vec![(0, 0), (1, 0), (1, 1), (1, 2)]);

        let pairs: Vec<(usize, f64)> = alignment.warped.iter().map(|(i, v)| (i, v[0])).collect();
        assert_eq!(pairs, vec![(0, 11.0), (1, 11.0), (1, 19.0), (1, 21.0)]);
    }

    #[test]
    fn sub_mode_attaches_profile() {
        let a = seq(&[1.0, 2.0]);
        let b = seq(&[5.0, 1.0, 2.0, 5.0, 5.0]);
        let alignment = Dtw::new()
            .with_sequence_mode(SequenceMode::Sub)
            .compute_all(a.as_view(), b.as_view())
            .unwrap();
        let subs = alignment.subsequences.as_ref().unwrap();
        assert_eq!(subs.delta.len(), 5);
        assert_eq!(subs.local_minima, vec![2]);
        assert_eq!(subs.delta[2], 0.0);
    }

    #[test]
    fn p1_precondition_checked_before_cost_matrix() {
        let a = seq(&[0.0; 7]);
        let b = seq(&[0.0; 3]);
        let result = Dtw::new()
            .with_step_pattern(StepPattern::SymmetricP1)
            .compute_all(a.as_view(), b.as_view());
        assert!(matches!(result, Err(DtwError::LengthRatioExceeded { n: 7, m: 3 })));
    }

    #[test]
    fn dimension_mismatch_rejected() {
        let a = seq(&[1.0, 2.0]);
        let b = Sequence::from_points(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let result = Dtw::new().accumulated_cost_matrix(a.as_view(), b.as_view());
        assert!(matches!(
            result,
            Err(DtwError::InvalidInput(InputError::DimensionMismatch { .. }))
        ));
    }

    #[test]
    fn free_functions_match_builder() {
        let a = seq(&[0.0, 1.0, 4.0, 9.0]);
        let b = seq(&[0.0, 2.0, 3.0, 8.0]);
        let built = Dtw::new()
            .with_metric(DistanceMetric::Manhattan)
            .accumulated_cost_matrix(a.as_view(), b.as_view())
            .unwrap();
        let free = accumulated_cost_matrix(
            a.as_view(),
            b.as_view(),
            DistanceMetric::Manhattan,
            StepPattern::SymmetricP0,
            SequenceMode::Whole,
        )
        .unwrap();
        assert_eq!(built, free);

        let all = compute_all(
            a.as_view(),
            b.as_view(),
            DistanceMetric::Manhattan,
            StepPattern::SymmetricP0,
            SequenceMode::Whole,
        )
        .unwrap();
        assert_eq!(all.accumulated, free);
        assert_eq!(all.config.metric(), DistanceMetric::Manhattan);
    }

    #[test]
    fn default_configuration() {
        let dtw = Dtw::new();
        assert_eq!(dtw.metric(), DistanceMetric::Euclidean);
        assert_eq!(dtw.step_pattern(), StepPattern::SymmetricP0);
        assert_eq!(dtw.sequence_mode(), SequenceMode::Whole);
    }
}
