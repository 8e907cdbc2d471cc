//! JSON result writer for alignment and subsequence outputs.

use std::fs;
use std::path::{Path, PathBuf};

use dtwmetrics_core::{Alignment, Matrix, SimilarSubsequences, SubsequenceMatch};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::IoError;
use crate::domain::ExperimentName;

/// Writes DTW results to JSON files.
///
/// Creates the output directory on construction if it does not exist.
/// Output files are named `{experiment}_alignment.json` and
/// `{experiment}_subsequences.json`. Infinite accumulated costs (unreachable
/// cells under `symmetric_p1`) are written as `null`.
pub struct ResultWriter {
    output_dir: PathBuf,
    experiment: ExperimentName,
}

impl ResultWriter {
    /// Create a new writer targeting the given directory and experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::OutputDirCreate`] if the directory cannot be created.
    #[instrument(skip_all, fields(dir = %output_dir.display(), experiment = %experiment))]
    pub fn new(output_dir: &Path, experiment: ExperimentName) -> Result<Self, IoError> {
        fs::create_dir_all(output_dir).map_err(|e| IoError::OutputDirCreate {
            path: output_dir.to_path_buf(),
            source: e,
        })?;
        debug!("output directory ready");
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            experiment,
        })
    }

    /// Write a full alignment to `{experiment}_alignment.json`.
    ///
    /// Returns the path of the written file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::WriteFile`] if the file cannot be written.
    #[instrument(skip_all)]
    pub fn write_alignment(&self, alignment: &Alignment) -> Result<PathBuf, IoError> {
        let path = self.output_path("alignment");

        let warped: Vec<WarpedEntry<'_>> = alignment
            .warped
            .iter()
            .map(|(index, value)| WarpedEntry { index, value })
            .collect();

        let artifact = AlignmentArtifact {
            experiment: self.experiment.as_str(),
            metric: alignment.config.metric().as_str(),
            step_pattern: alignment.config.step_pattern().as_str(),
            sequence_mode: alignment.config.sequence_mode().as_str(),
            distance: finite(alignment.distance().value()),
            shape: alignment.cost.shape(),
            cost: rows(&alignment.cost),
            accumulated: rows(&alignment.accumulated),
            path: alignment.path.to_pairs(),
            warped,
        };

        self.write_json(&path, &artifact)?;
        info!(path = %path.display(), "alignment written");
        Ok(path)
    }

    /// Write a subsequence profile and its matches to
    /// `{experiment}_subsequences.json`.
    ///
    /// Returns the path of the written file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::WriteFile`] if the file cannot be written.
    #[instrument(skip_all, fields(candidates = matches.len()))]
    pub fn write_subsequences(
        &self,
        profile: &SimilarSubsequences,
        matches: &[SubsequenceMatch],
    ) -> Result<PathBuf, IoError> {
        let path = self.output_path("subsequences");

        let artifact = SubsequenceArtifact {
            experiment: self.experiment.as_str(),
            best: profile.best(),
            local_minima: &profile.local_minima,
            delta: profile.delta.iter().copied().map(finite).collect(),
            matches: matches
                .iter()
                .map(|m| MatchEntry {
                    end: m.end,
                    cost: finite(m.cost.value()),
                    path: m.path.to_pairs(),
                })
                .collect(),
        };

        self.write_json(&path, &artifact)?;
        info!(path = %path.display(), "subsequences written");
        Ok(path)
    }

    fn output_path(&self, kind: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}_{kind}.json", self.experiment.as_str()))
    }

    fn write_json<T: Serialize>(&self, path: &Path, artifact: &T) -> Result<(), IoError> {
        let json = serde_json::to_string_pretty(artifact).expect("serialization cannot fail");
        fs::write(path, &json).map_err(|e| IoError::WriteFile {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

fn rows(matrix: &Matrix) -> Vec<Vec<Option<f64>>> {
    matrix
        .iter_rows()
        .map(|row| row.iter().copied().map(finite).collect())
        .collect()
}

// --- Shadow structs for JSON serialization ---

#[derive(Serialize)]
struct AlignmentArtifact<'a> {
    experiment: &'a str,
    metric: &'static str,
    step_pattern: &'static str,
    sequence_mode: &'static str,
    distance: Option<f64>,
    shape: (usize, usize),
    cost: Vec<Vec<Option<f64>>>,
    accumulated: Vec<Vec<Option<f64>>>,
    path: Vec<(usize, usize)>,
    warped: Vec<WarpedEntry<'a>>,
}

#[derive(Serialize)]
struct WarpedEntry<'a> {
    index: usize,
    value: &'a [f64],
}

#[derive(Serialize)]
struct SubsequenceArtifact<'a> {
    experiment: &'a str,
    best: Option<usize>,
    local_minima: &'a [usize],
    delta: Vec<Option<f64>>,
    matches: Vec<MatchEntry>,
}

#[derive(Serialize)]
struct MatchEntry {
    end: usize,
    cost: Option<f64>,
    path: Vec<(usize, usize)>,
}
