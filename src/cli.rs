use std::path::PathBuf;

use clap::Parser;

use crate::config::PredictionMode;
use crate::constants::{MAX_INTERNAL_BATCH_SIZE, MODEL_DIR_ENV};

#[derive(Parser, Debug)]
#[command(name = "magika", version)]
#[command(
    about = "Identify the content type of files by sampling their bytes and running a \
                   pre-trained classifier."
)]
pub struct Cli {
    /// Files to identify (supporting globs); "-" reads from stdin.
    #[arg(required = true, num_args(1..))]
    pub paths: Vec<String>,

    /// Identify files inside directories recursively.
    #[arg(short = 'r', long = "recursive")]
    pub recursive: bool,

    /// Report symlinks as such instead of identifying their target.
    #[arg(long = "no-dereference")]
    pub no_dereference: bool,

    /// How much the classifier's confidence is trusted.
    #[arg(long = "prediction-mode", value_enum, default_value_t = PredictionMode::HighConfidence)]
    pub prediction_mode: PredictionMode,

    /// Print results as a JSON array.
    #[arg(long = "json", conflicts_with = "jsonl")]
    pub json: bool,

    /// Print one JSON object per line.
    #[arg(long = "jsonl")]
    pub jsonl: bool,

    /// Print only the content-type label.
    #[arg(short = 'l', long = "label", conflicts_with_all = ["json", "jsonl"])]
    pub label: bool,

    /// Append the prediction score to each line.
    #[arg(short = 's', long = "output-score")]
    pub output_score: bool,

    /// Force colored output.
    #[arg(long = "colors", conflicts_with = "no_colors")]
    pub colors: bool,

    /// Disable colored output.
    #[arg(long = "no-colors")]
    pub no_colors: bool,

    /// Number of files sampled before each round of inference.
    #[arg(
        long = "batch-size",
        default_value_t = MAX_INTERNAL_BATCH_SIZE as u64,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub batch_size: u64,

    /// Glob patterns to exclude files from processing.
    #[arg(short = 'x', long = "exclude")]
    pub exclude: Vec<String>,

    /// Directory holding model.onnx and config.min.json.
    #[arg(long = "model-dir", env = MODEL_DIR_ENV)]
    pub model_dir: Option<PathBuf>,

    /// Content-type table to use instead of the built-in one.
    #[arg(long = "content-types")]
    pub content_types: Option<PathBuf>,

    /// Log progress information.
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Log debug information.
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,
}
