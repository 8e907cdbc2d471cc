use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use dtwmetrics_core::{DistanceMetric, Dtw, SequenceMode, StepPattern};
use dtwmetrics_io::{ExperimentName, ResultWriter, SequenceData, SequenceReader};

#[derive(Parser)]
#[command(name = "dtwmetrics")]
#[command(about = "Dynamic Time Warping alignment and subsequence search")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Number of threads for parallel computation (defaults to all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,
}

/// Shared input and output options.
#[derive(Args, Debug, Clone)]
struct InputArgs {
    /// Path to the first sequence CSV (rows of the cost matrix)
    #[arg(long)]
    reference: PathBuf,

    /// Path to the second sequence CSV (columns of the cost matrix)
    #[arg(long)]
    query: PathBuf,

    /// Comma-separated CSV columns to use as point components (default: all)
    #[arg(long, value_delimiter = ',')]
    columns: Vec<String>,

    /// Pointwise distance: "euclidean" or "manhattan"
    #[arg(long, default_value = "euclidean")]
    metric: String,

    /// Experiment name for output files (must match [a-zA-Z0-9_-]+)
    #[arg(long)]
    experiment: String,

    /// Output directory for result files
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,
}

#[derive(Subcommand)]
enum Command {
    /// Align two sequences and write every intermediate result
    Align {
        #[command(flatten)]
        input: InputArgs,

        /// Step pattern: "symmetric_p0" or "symmetric_p1"
        #[arg(long, default_value = "symmetric_p0")]
        step_pattern: String,

        /// Boundary condition: "whole" or "sub" (symmetric_p0 only)
        #[arg(long, default_value = "whole")]
        sequence_mode: String,
    },

    /// Find stretches of the query that match the whole reference
    Subsequence {
        #[command(flatten)]
        input: InputArgs,
    },
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct AlignOutput {
    experiment: String,
    n: usize,
    m: usize,
    metric: &'static str,
    step_pattern: &'static str,
    sequence_mode: &'static str,
    distance: Option<f64>,
    path_len: usize,
    artifact: PathBuf,
}

#[derive(Serialize)]
struct SubsequenceOutput {
    experiment: String,
    n: usize,
    m: usize,
    metric: &'static str,
    best: Option<usize>,
    matches: Vec<MatchOutput>,
    artifact: PathBuf,
}

#[derive(Serialize)]
struct MatchOutput {
    end: usize,
    cost: Option<f64>,
}

fn read_sequence(path: &Path, columns: &[String]) -> Result<SequenceData> {
    let mut reader = SequenceReader::new(path);
    if !columns.is_empty() {
        reader = reader.with_columns(columns.to_vec());
    }
    reader
        .read()
        .with_context(|| format!("failed to read {}", path.display()))
}

fn read_pair(input: &InputArgs) -> Result<(SequenceData, SequenceData)> {
    let reference = read_sequence(&input.reference, &input.columns)?;
    let query = read_sequence(&input.query, &input.columns)?;
    info!(
        n = reference.sequence.len(),
        m = query.sequence.len(),
        dim = reference.sequence.dim(),
        "sequences loaded"
    );
    Ok((reference, query))
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Configure Rayon thread pool
    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    match cli.command {
        Command::Align {
            input,
            step_pattern,
            sequence_mode,
        } => {
            let experiment_name = ExperimentName::new(input.experiment.clone())?;
            let metric: DistanceMetric = input.metric.parse()?;
            let step_pattern: StepPattern = step_pattern.parse()?;
            let sequence_mode: SequenceMode = sequence_mode.parse()?;

            let (reference, query) = read_pair(&input)?;

            let dtw = Dtw::new()
                .with_metric(metric)
                .with_step_pattern(step_pattern)
                .with_sequence_mode(sequence_mode);
            let alignment = dtw
                .compute_all(reference.sequence.as_view(), query.sequence.as_view())
                .context("alignment failed")?;
            info!(distance = %alignment.distance(), "alignment computed");

            // Write JSON artifact
            let writer = ResultWriter::new(&input.output_dir, experiment_name)?;
            let artifact = writer.write_alignment(&alignment)?;

            // Build and print stdout summary
            let output = AlignOutput {
                experiment: input.experiment,
                n: reference.sequence.len(),
                m: query.sequence.len(),
                metric: metric.as_str(),
                step_pattern: step_pattern.as_str(),
                sequence_mode: sequence_mode.as_str(),
                distance: finite(alignment.distance().value()),
                path_len: alignment.path.len(),
                artifact,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Subsequence { input } => {
            let experiment_name = ExperimentName::new(input.experiment.clone())?;
            let metric: DistanceMetric = input.metric.parse()?;

            let (reference, query) = read_pair(&input)?;

            let dtw = Dtw::new()
                .with_metric(metric)
                .with_sequence_mode(SequenceMode::Sub);
            let alignment = dtw
                .compute_all(reference.sequence.as_view(), query.sequence.as_view())
                .context("subsequence search failed")?;
            let Some(profile) = alignment.subsequences.as_ref() else {
                anyhow::bail!("subsequence mode produced no distance profile");
            };
            let matches = profile
                .matches(&alignment.accumulated)
                .context("failed to extract subsequence paths")?;
            info!(candidates = matches.len(), best = ?profile.best(), "subsequences found");

            // Write JSON artifact
            let writer = ResultWriter::new(&input.output_dir, experiment_name)?;
            let artifact = writer.write_subsequences(profile, &matches)?;

            // Build and print stdout summary
            let output = SubsequenceOutput {
                experiment: input.experiment,
                n: reference.sequence.len(),
                m: query.sequence.len(),
                metric: metric.as_str(),
                best: profile.best(),
                matches: matches
                    .iter()
                    .map(|m| MatchOutput {
                        end: m.end,
                        cost: finite(m.cost.value()),
                    })
                    .collect(),
                artifact,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
