//! The seam between the pipeline and the trained classifier.

use ndarray::{Array2, ArrayView2};

use crate::error::Result;

/// An opaque classifier: `(rows, input_column_size)` features in,
/// `(rows, num_labels)` scores out.
pub trait InferenceEngine: Send {
    fn run(
        &self,
        input: ArrayView2<'_, f32>,
    ) -> Result<Array2<f32>>;
}

#[cfg(feature = "onnx")]
pub use onnx::OrtEngine;

#[cfg(feature = "onnx")]
mod onnx {
    use std::path::Path;
    use std::sync::Mutex;

    use ndarray::{Array2, ArrayView2, Ix2};
    use ort::session::Session;
    use ort::session::builder::{GraphOptimizationLevel, SessionBuilder};
    use ort::value::Tensor;
    use tracing::debug;

    use super::InferenceEngine;
    use crate::error::{MagikaError, Result};

    /// ONNX Runtime session with a single input and a single output.
    pub struct OrtEngine {
        session: Mutex<Session>,
        input_name: String,
        output_name: String,
    }

    impl OrtEngine {
        pub fn from_file(path: &Path) -> Result<Self> {
            let session = builder()?
                .commit_from_file(path)
                .map_err(MagikaError::engine)?;
            debug!("loaded model from {}", path.display());
            Self::from_session(session)
        }

        pub fn from_bytes(model: &[u8]) -> Result<Self> {
            let session = builder()?
                .commit_from_memory(model)
                .map_err(MagikaError::engine)?;
            Self::from_session(session)
        }

        fn from_session(session: Session) -> Result<Self> {
            let input_name = session
                .inputs
                .first()
                .map(|i| i.name.clone())
                .ok_or_else(|| MagikaError::Engine("model declares no inputs".to_string()))?;
            let output_name = session
                .outputs
                .first()
                .map(|o| o.name.clone())
                .ok_or_else(|| MagikaError::Engine("model declares no outputs".to_string()))?;
            Ok(Self {
                session: Mutex::new(session),
                input_name,
                output_name,
            })
        }
    }

    fn builder() -> Result<SessionBuilder> {
        Session::builder()
            .and_then(|b| b.with_optimization_level(GraphOptimizationLevel::Level3))
            .map_err(MagikaError::engine)
    }

    impl InferenceEngine for OrtEngine {
        fn run(
            &self,
            input: ArrayView2<'_, f32>,
        ) -> Result<Array2<f32>> {
            let tensor = Tensor::from_array(input.to_owned()).map_err(MagikaError::engine)?;
            let mut session = self
                .session
                .lock()
                .map_err(|e| MagikaError::Engine(format!("lock error: {e}")))?;
            let outputs = session
                .run(ort::inputs![self.input_name.as_str() => tensor])
                .map_err(MagikaError::engine)?;
            let scores = outputs[self.output_name.as_str()]
                .try_extract_array::<f32>()
                .map_err(MagikaError::engine)?;
            scores
                .into_dimensionality::<Ix2>()
                .map(|view| view.to_owned())
                .map_err(MagikaError::engine)
        }
    }
}
