pub mod batch;
pub mod config;
pub mod engine;

pub use batch::{BatchInference, ModelOutput};
pub use config::ModelConfig;
#[cfg(feature = "onnx")]
pub use engine::OrtEngine;
pub use engine::InferenceEngine;
