use std::collections::HashMap;
use std::hash::Hash;

use ndarray::{Array2, ArrayView1, ArrayView2};
use tracing::debug;

use crate::error::{MagikaError, Result};
use crate::features::{Features, WindowSizes};
use crate::model::config::ModelConfig;
use crate::model::engine::InferenceEngine;

/// Argmax label and its score for one input.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelOutput {
    pub label: String,
    pub score: f32,
}

/// Runs pending features through the engine in bounded sub-batches.
pub struct BatchInference<'a> {
    engine: &'a dyn InferenceEngine,
    label_space: &'a [String],
    sizes: WindowSizes,
    max_rows: usize,
}

impl<'a> BatchInference<'a> {
    pub fn new(
        engine: &'a dyn InferenceEngine,
        config: &'a ModelConfig,
    ) -> Self {
        Self {
            engine,
            label_space: &config.target_labels_space,
            sizes: config.window_sizes(),
            max_rows: config.max_internal_batch_size,
        }
    }

    pub fn with_max_rows(
        mut self,
        max_rows: usize,
    ) -> Self {
        self.max_rows = max_rows.max(1);
        self
    }

    /// One engine call per `max_rows` items; every identifier appears in
    /// the returned map exactly once.
    pub fn run<K: Eq + Hash>(
        &self,
        items: Vec<(K, Features)>,
    ) -> Result<HashMap<K, ModelOutput>> {
        let mut outputs = HashMap::with_capacity(items.len());
        let total = items.len();
        let mut pending = items.into_iter().peekable();
        let mut sub_batch = 0usize;
        while pending.peek().is_some() {
            let (keys, features): (Vec<K>, Vec<Features>) =
                pending.by_ref().take(self.max_rows).unzip();
            debug!(
                "sub-batch {sub_batch}: {} of {total} rows",
                features.len()
            );
            let tensor = build_tensor(&features, self.sizes);
            let scores = self.engine.run(tensor.view())?;
            let decoded = decode_scores(scores.view(), self.label_space)?;
            if decoded.len() != keys.len() {
                return Err(MagikaError::Engine(format!(
                    "engine returned {} rows for {} inputs",
                    decoded.len(),
                    keys.len()
                )));
            }
            outputs.extend(keys.into_iter().zip(decoded));
            sub_batch += 1;
        }
        Ok(outputs)
    }
}

/// Stack `beg ++ mid ++ end` rows into an `(n, input_column_size)` tensor.
///
/// Panics if a feature vector does not match `sizes`.
pub fn build_tensor(
    features: &[Features],
    sizes: WindowSizes,
) -> Array2<f32> {
    let mut tensor = Array2::<f32>::zeros((features.len(), sizes.input_column_size()));
    for (mut row, f) in tensor.rows_mut().into_iter().zip(features) {
        assert_eq!(f.sizes(), sizes, "feature lengths do not match the model");
        for (cell, v) in row.iter_mut().zip(f.iter()) {
            *cell = v as f32;
        }
    }
    tensor
}

pub fn decode_scores(
    scores: ArrayView2<'_, f32>,
    label_space: &[String],
) -> Result<Vec<ModelOutput>> {
    if scores.ncols() != label_space.len() {
        return Err(MagikaError::Engine(format!(
            "engine returned {} scores per row for {} labels",
            scores.ncols(),
            label_space.len()
        )));
    }
    scores
        .rows()
        .into_iter()
        .map(|row| {
            let (idx, score) = argmax(row);
            if !score.is_finite() {
                return Err(MagikaError::Engine(format!(
                    "engine returned a row without a finite score (best {score})"
                )));
            }
            Ok(ModelOutput {
                label: label_space[idx].clone(),
                score,
            })
        })
        .collect()
}

/// Leftmost index of the maximum.
pub fn argmax(row: ArrayView1<'_, f32>) -> (usize, f32) {
    let mut best = (0, f32::NEG_INFINITY);
    for (i, &v) in row.iter().enumerate() {
        if v > best.1 {
            best = (i, v);
        }
    }
    best
}
