use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::constants::MAX_INTERNAL_BATCH_SIZE;

/// How far the classifier's confidence is trusted before falling back to a
/// generic `txt`/`unknown` label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PredictionMode {
    BestGuess,
    MediumConfidence,
    #[default]
    HighConfidence,
}

/// Pipeline configuration, fixed for the lifetime of a `Magika` instance.
#[derive(Debug, Clone)]
pub struct Config {
    pub prediction_mode: PredictionMode,
    /// Report symlinks as `symlink` instead of identifying their target.
    pub no_dereference: bool,
    pub verbose: bool,
    pub debug: bool,
    /// Inputs sampled before each round of inference.
    pub batch_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prediction_mode: PredictionMode::default(),
            no_dereference: false,
            verbose: false,
            debug: false,
            batch_size: MAX_INTERNAL_BATCH_SIZE,
        }
    }
}

impl Config {
    /// Build a Config from parsed CLI arguments
    pub fn from_cli(cli: &Cli) -> Self {
        Config {
            prediction_mode: cli.prediction_mode,
            no_dereference: cli.no_dereference,
            verbose: cli.verbose,
            debug: cli.debug,
            batch_size: cli.batch_size as usize,
        }
    }

    pub fn with_prediction_mode(
        mut self,
        mode: PredictionMode,
    ) -> Self {
        self.prediction_mode = mode;
        self
    }

    pub fn with_no_dereference(
        mut self,
        no_dereference: bool,
    ) -> Self {
        self.no_dereference = no_dereference;
        self
    }

    /// Default `tracing` filter for the requested verbosity.
    pub fn log_filter(&self) -> &'static str {
        if self.debug {
            "debug"
        } else if self.verbose {
            "info"
        } else {
            "warn"
        }
    }
}
