#![allow(dead_code)]
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use magika::{Config, ContentTypeTable, InferenceEngine, Magika, MagikaError, ModelConfig, PredictionMode};
use ndarray::{Array2, ArrayView2};

pub const LABELS: [&str; 5] = ["python", "markdown", "pebin", "randombytes", "javascript"];

pub fn model_config() -> ModelConfig {
    let mut cfg = ModelConfig::with_labels(LABELS);
    cfg.thresholds.insert("python".into(), 0.9);
    cfg.thresholds.insert("markdown".into(), 0.75);
    cfg.overwrite_map
        .insert("randombytes".into(), "unknown".into());
    cfg
}

/// Records how many rows each engine call received.
#[derive(Clone, Default)]
pub struct CallLog {
    rows: Arc<Mutex<Vec<usize>>>,
    calls: Arc<AtomicUsize>,
}

impl CallLog {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn rows(&self) -> Vec<usize> {
        self.rows.lock().unwrap().clone()
    }

    fn record(
        &self,
        rows: usize,
    ) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.rows.lock().unwrap().push(rows);
    }
}

/// Picks a label from the first feature byte: `#` → markdown, `M` → pebin,
/// `\xff` → randombytes, anything else → python. The winner gets `score`.
pub struct FirstByteEngine {
    pub score: f32,
    pub log: CallLog,
}

impl FirstByteEngine {
    pub fn new(score: f32) -> Self {
        Self {
            score,
            log: CallLog::default(),
        }
    }
}

impl InferenceEngine for FirstByteEngine {
    fn run(
        &self,
        input: ArrayView2<'_, f32>,
    ) -> magika::Result<Array2<f32>> {
        self.log.record(input.nrows());
        let n = LABELS.len();
        let rest = (1.0 - self.score) / (n - 1) as f32;
        let mut out = Array2::from_elem((input.nrows(), n), rest);
        for (i, row) in input.rows().into_iter().enumerate() {
            let winner = match row[0] as u32 {
                0x23 => 1,
                0x4d => 2,
                0xff => 3,
                _ => 0,
            };
            out[[i, winner]] = self.score;
        }
        Ok(out)
    }
}

pub struct FailingEngine;

impl InferenceEngine for FailingEngine {
    fn run(
        &self,
        _input: ArrayView2<'_, f32>,
    ) -> magika::Result<Array2<f32>> {
        Err(MagikaError::Engine("boom".to_string()))
    }
}

pub fn magika_with(
    engine: impl InferenceEngine + 'static,
    mode: PredictionMode,
) -> Magika {
    magika_with_config(engine, Config::default().with_prediction_mode(mode), model_config())
}

pub fn magika_with_config(
    engine: impl InferenceEngine + 'static,
    config: Config,
    model_config: ModelConfig,
) -> Magika {
    Magika::with_engine(
        config,
        model_config,
        ContentTypeTable::builtin().unwrap(),
        Box::new(engine),
    )
    .unwrap()
}

/// A logged engine plus the pipeline that owns it.
pub fn logged_magika(
    score: f32,
    mode: PredictionMode,
) -> (Magika, CallLog) {
    let engine = FirstByteEngine::new(score);
    let log = engine.log.clone();
    (magika_with(engine, mode), log)
}

pub fn python_source(lines: usize) -> String {
    (0..lines)
        .map(|i| format!("def f{i}(x):\n    return x * {i}\n"))
        .collect()
}
