//! CSV sequence reader with full input validation.

use std::path::{Path, PathBuf};

use dtwmetrics_core::Sequence;
use tracing::{debug, info, instrument};

use crate::IoError;
use crate::domain::SequenceData;

/// Reads one sequence from a CSV file.
///
/// Expected CSV format:
/// - Header row required; each header names one point component
/// - `x,y,...`
/// - One row per point, all rows must have the same number of columns
///
/// By default every column is read and the point dimension equals the column
/// count. [`with_columns`](Self::with_columns) restricts and reorders them.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::CsvParse`] | Malformed CSV record |
/// | [`IoError::ColumnNotFound`] | A selected column is missing from the header |
/// | [`IoError::EmptySequence`] | Zero data rows after header |
/// | [`IoError::InconsistentRowLength`] | Row has different column count than header |
/// | [`IoError::NonFiniteValue`] | Cell is NaN, Inf, or unparseable float |
pub struct SequenceReader {
    path: PathBuf,
    columns: Option<Vec<String>>,
}

impl SequenceReader {
    /// Create a new reader for the given CSV file path.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            columns: None,
        }
    }

    /// Read only the named columns, in the given order.
    #[must_use]
    pub fn with_columns(mut self, columns: Vec<String>) -> Self {
        self.columns = Some(columns);
        self
    }

    /// Read and validate the CSV file, returning a [`SequenceData`].
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<SequenceData, IoError> {
        let file = std::fs::File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;

        // flexible(true) so that our own InconsistentRowLength check fires
        // instead of a low-level CsvParse error.
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let header = rdr.headers().map_err(|e| self.csv_error(e))?.clone();
        let expected_cols = header.len();

        // Resolve selected columns to header positions.
        let (names, positions): (Vec<String>, Vec<usize>) = match &self.columns {
            None => header.iter().enumerate().map(|(i, h)| (h.to_string(), i)).unzip(),
            Some(wanted) => wanted
                .iter()
                .map(|name| {
                    header
                        .iter()
                        .position(|h| h == name)
                        .map(|i| (name.clone(), i))
                        .ok_or_else(|| IoError::ColumnNotFound {
                            path: self.path.clone(),
                            column: name.clone(),
                        })
                })
                .collect::<Result<Vec<_>, _>>()?
                .into_iter()
                .unzip(),
        };
        debug!(expected_cols, dim = positions.len(), "read CSV header");

        let mut data = Vec::new();
        let mut n_rows = 0usize;
        for (row_index, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| self.csv_error(e))?;

            if record.len() != expected_cols {
                return Err(IoError::InconsistentRowLength {
                    path: self.path.clone(),
                    row_index,
                    expected: expected_cols,
                    got: record.len(),
                });
            }

            for (&col, name) in positions.iter().zip(&names) {
                let raw = record.get(col).unwrap_or("");
                let value: f64 = raw
                    .parse()
                    .ok()
                    .filter(|v: &f64| v.is_finite())
                    .ok_or_else(|| IoError::NonFiniteValue {
                        path: self.path.clone(),
                        row_index,
                        column: name.clone(),
                        raw: raw.to_string(),
                    })?;
                data.push(value);
            }
            n_rows += 1;
        }

        if n_rows == 0 {
            return Err(IoError::EmptySequence {
                path: self.path.clone(),
            });
        }

        let sequence = Sequence::from_flat(data, positions.len())
            .map_err(dtwmetrics_core::DtwError::from)?;
        info!(len = sequence.len(), dim = sequence.dim(), "sequence loaded");

        Ok(SequenceData {
            columns: names,
            sequence,
        })
    }

    fn csv_error(&self, e: csv::Error) -> IoError {
        IoError::CsvParse {
            path: self.path.clone(),
            offset: e.position().map_or(0, |p| p.byte()),
            source: e,
        }
    }
}
