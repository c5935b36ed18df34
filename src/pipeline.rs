use std::path::Path;

use tracing::{debug, info};

use crate::config::Config;
use crate::constants::BUFFER_PATH;
use crate::content::ContentTypeTable;
use crate::error::{MagikaError, Result};
use crate::identify::{DecisionPolicy, FastPath, FastPathClassifier, MagikaResult, Sample, compose};
use crate::model::{BatchInference, InferenceEngine, ModelConfig, ModelOutput};

/// Identification pipeline: fast path, feature extraction, batched
/// inference, decision policy and result composition.
///
/// Holds the engine handle and the content-type table for its whole
/// lifetime. Calls take `&self` and run sequentially.
pub struct Magika {
    config: Config,
    model_config: ModelConfig,
    table: ContentTypeTable,
    engine: Option<Box<dyn InferenceEngine>>,
    fast_path: FastPathClassifier,
}

impl Magika {
    /// Build a pipeline around an already-loaded engine.
    pub fn with_engine(
        config: Config,
        model_config: ModelConfig,
        table: ContentTypeTable,
        engine: Box<dyn InferenceEngine>,
    ) -> Result<Self> {
        model_config.validate()?;
        let fast_path = FastPathClassifier::new(
            model_config.extractor(),
            model_config.min_file_size_for_dl,
            !config.no_dereference,
        );
        info!(
            "pipeline ready: {} labels, windows {}/{}/{}, mode {:?}",
            model_config.num_labels(),
            model_config.beg_size,
            model_config.mid_size,
            model_config.end_size,
            config.prediction_mode
        );
        Ok(Self {
            config,
            model_config,
            table,
            engine: Some(engine),
            fast_path,
        })
    }

    /// Load `model.onnx` and `config.min.json` from `model_dir`.
    #[cfg(feature = "onnx")]
    pub fn from_model_dir(
        config: Config,
        model_dir: &Path,
        table: ContentTypeTable,
    ) -> Result<Self> {
        use crate::constants::{MODEL_CONFIG_FILE_NAME, MODEL_FILE_NAME};
        use crate::model::OrtEngine;

        let model_config = ModelConfig::from_path(&model_dir.join(MODEL_CONFIG_FILE_NAME))?;
        let engine = OrtEngine::from_file(&model_dir.join(MODEL_FILE_NAME))?;
        Self::with_engine(config, model_config, table, Box::new(engine))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn model_config(&self) -> &ModelConfig {
        &self.model_config
    }

    pub fn content_types(&self) -> &ContentTypeTable {
        &self.table
    }

    /// Release the engine. Safe to call more than once; every later
    /// identification call fails with [`MagikaError::Disposed`].
    pub fn dispose(&mut self) {
        if self.engine.take().is_some() {
            debug!("inference engine disposed");
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.engine.is_none()
    }

    pub fn identify(
        &self,
        path: &Path,
    ) -> Result<MagikaResult> {
        let mut results = self.identify_many(&[path])?;
        results
            .pop()
            .ok_or_else(|| MagikaError::Engine("no result produced".to_string()))
    }

    pub fn identify_bytes(
        &self,
        content: &[u8],
    ) -> Result<MagikaResult> {
        let engine = self.engine()?;
        let sample = self.fast_path.probe_bytes(content);
        let mut results = self.resolve(engine, vec![(BUFFER_PATH.to_string(), sample)])?;
        results
            .pop()
            .ok_or_else(|| MagikaError::Engine("no result produced".to_string()))
    }

    /// Results come back in input order. Inputs are sampled `batch_size`
    /// at a time and each round goes through the engine together.
    pub fn identify_many<P: AsRef<Path>>(
        &self,
        paths: &[P],
    ) -> Result<Vec<MagikaResult>> {
        let engine = self.engine()?;
        let mut results = Vec::with_capacity(paths.len());
        for chunk in paths.chunks(self.config.batch_size.max(1)) {
            let samples = chunk
                .iter()
                .map(|p| {
                    let path = p.as_ref();
                    (path.display().to_string(), self.fast_path.probe_path(path))
                })
                .collect();
            results.extend(self.resolve(engine, samples)?);
        }
        Ok(results)
    }

    fn engine(&self) -> Result<&dyn InferenceEngine> {
        self.engine.as_deref().ok_or(MagikaError::Disposed)
    }

    fn resolve(
        &self,
        engine: &dyn InferenceEngine,
        samples: Vec<(String, Sample)>,
    ) -> Result<Vec<MagikaResult>> {
        let mut slots: Vec<(String, Option<FastPath>)> = Vec::with_capacity(samples.len());
        let mut pending = Vec::new();
        for (idx, (path, sample)) in samples.into_iter().enumerate() {
            match sample {
                Sample::Terminal(fast) => {
                    debug!("{path}: fast path {}", fast.label());
                    slots.push((path, Some(fast)));
                }
                Sample::Features(features) => {
                    pending.push((idx, features));
                    slots.push((path, None));
                }
            }
        }

        let mut outputs = if pending.is_empty() {
            Default::default()
        } else {
            debug!("running inference on {} inputs", pending.len());
            BatchInference::new(engine, &self.model_config).run(pending)?
        };

        let policy =
            DecisionPolicy::new(self.config.prediction_mode, &self.model_config, &self.table);
        slots
            .into_iter()
            .enumerate()
            .map(|(idx, (path, fast))| match fast {
                Some(fast) => Ok(compose(
                    path,
                    None,
                    fast.label(),
                    1.0,
                    &self.table,
                    fast.symlink_target(),
                )),
                None => {
                    let raw: ModelOutput = outputs.remove(&idx).ok_or_else(|| {
                        MagikaError::Engine(format!("no prediction for {path}"))
                    })?;
                    let decision = policy.decide(&raw);
                    Ok(compose(
                        path,
                        Some(&raw),
                        &decision.label,
                        decision.score,
                        &self.table,
                        None,
                    ))
                }
            })
            .collect()
    }
}
