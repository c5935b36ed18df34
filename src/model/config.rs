use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BLOCK_SIZE, DEFAULT_MEDIUM_CONFIDENCE_THRESHOLD, DEFAULT_MIN_FILE_SIZE_FOR_DL,
    DEFAULT_PADDING_TOKEN, DEFAULT_WINDOW_SIZE, MAX_INTERNAL_BATCH_SIZE, MAX_WINDOW_SIZE,
};
use crate::error::{MagikaError, Result};
use crate::features::{FeatureEncoder, FeatureExtractor, WindowSizes};

/// Constants that travel with a trained model: window geometry, label
/// space, per-label thresholds and the label overwrite map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_window")]
    pub beg_size: usize,
    #[serde(default = "default_window")]
    pub mid_size: usize,
    #[serde(default = "default_window")]
    pub end_size: usize,
    #[serde(default = "default_medium_threshold")]
    pub medium_confidence_threshold: f32,
    #[serde(default = "default_min_file_size")]
    pub min_file_size_for_dl: usize,
    #[serde(default = "default_padding_token")]
    pub padding_token: i32,
    #[serde(default = "default_block_size")]
    pub block_size: usize,
    pub target_labels_space: Vec<String>,
    #[serde(default)]
    pub thresholds: HashMap<String, f32>,
    #[serde(default)]
    pub overwrite_map: HashMap<String, String>,
    #[serde(default = "default_max_batch")]
    pub max_internal_batch_size: usize,
    #[serde(default)]
    pub version: Option<String>,
}

fn default_window() -> usize {
    DEFAULT_WINDOW_SIZE
}

fn default_medium_threshold() -> f32 {
    DEFAULT_MEDIUM_CONFIDENCE_THRESHOLD
}

fn default_min_file_size() -> usize {
    DEFAULT_MIN_FILE_SIZE_FOR_DL
}

fn default_padding_token() -> i32 {
    DEFAULT_PADDING_TOKEN
}

fn default_block_size() -> usize {
    DEFAULT_BLOCK_SIZE
}

fn default_max_batch() -> usize {
    MAX_INTERNAL_BATCH_SIZE
}

impl ModelConfig {
    /// Default geometry over the given label space, no thresholds or
    /// overwrites.
    pub fn with_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            beg_size: DEFAULT_WINDOW_SIZE,
            mid_size: DEFAULT_WINDOW_SIZE,
            end_size: DEFAULT_WINDOW_SIZE,
            medium_confidence_threshold: DEFAULT_MEDIUM_CONFIDENCE_THRESHOLD,
            min_file_size_for_dl: DEFAULT_MIN_FILE_SIZE_FOR_DL,
            padding_token: DEFAULT_PADDING_TOKEN,
            block_size: DEFAULT_BLOCK_SIZE,
            target_labels_space: labels.into_iter().map(Into::into).collect(),
            thresholds: HashMap::new(),
            overwrite_map: HashMap::new(),
            max_internal_batch_size: MAX_INTERNAL_BATCH_SIZE,
            version: None,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: ModelConfig =
            serde_json::from_str(json).map_err(|source| MagikaError::Json {
                what: "model config",
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|source| MagikaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<()> {
        let sizes = self.window_sizes();
        if sizes.max() > MAX_WINDOW_SIZE {
            return Err(MagikaError::InvalidConfig(format!(
                "window sizes {}/{}/{} exceed {MAX_WINDOW_SIZE}",
                sizes.beg, sizes.mid, sizes.end
            )));
        }
        if self.block_size < sizes.max() {
            return Err(MagikaError::InvalidConfig(format!(
                "block_size {} is smaller than the largest window {}",
                self.block_size,
                sizes.max()
            )));
        }
        if self.min_file_size_for_dl == 0 || self.min_file_size_for_dl > self.beg_size {
            return Err(MagikaError::InvalidConfig(format!(
                "min_file_size_for_dl {} must be in 1..={}",
                self.min_file_size_for_dl, self.beg_size
            )));
        }
        if (0..=255).contains(&self.padding_token) {
            return Err(MagikaError::InvalidConfig(format!(
                "padding_token {} collides with a byte value",
                self.padding_token
            )));
        }
        if self.target_labels_space.is_empty() {
            return Err(MagikaError::InvalidConfig(
                "target_labels_space is empty".to_string(),
            ));
        }
        if self.max_internal_batch_size == 0 {
            return Err(MagikaError::InvalidConfig(
                "max_internal_batch_size must be positive".to_string(),
            ));
        }
        let in_unit = |t: f32| (0.0..=1.0).contains(&t);
        if !in_unit(self.medium_confidence_threshold) {
            return Err(MagikaError::InvalidConfig(format!(
                "medium_confidence_threshold {} is outside [0, 1]",
                self.medium_confidence_threshold
            )));
        }
        if let Some((label, t)) = self.thresholds.iter().find(|(_, t)| !in_unit(**t)) {
            return Err(MagikaError::InvalidConfig(format!(
                "threshold {t} for {label} is outside [0, 1]"
            )));
        }
        Ok(())
    }

    pub fn window_sizes(&self) -> WindowSizes {
        WindowSizes::new(self.beg_size, self.mid_size, self.end_size)
    }

    pub fn input_column_size(&self) -> usize {
        self.window_sizes().input_column_size()
    }

    pub fn num_labels(&self) -> usize {
        self.target_labels_space.len()
    }

    pub fn extractor(&self) -> FeatureExtractor {
        FeatureExtractor::new(
            FeatureEncoder::new(self.window_sizes(), self.padding_token),
            self.block_size,
        )
    }

    /// Canonical label for a raw model label.
    pub fn overwrite<'a>(
        &'a self,
        label: &'a str,
    ) -> &'a str {
        self.overwrite_map
            .get(label)
            .map(String::as_str)
            .unwrap_or(label)
    }

    /// Per-label threshold, the medium threshold when the label has none.
    pub fn threshold_for(
        &self,
        label: &str,
    ) -> f32 {
        self.thresholds
            .get(label)
            .copied()
            .unwrap_or(self.medium_confidence_threshold)
    }
}
