//! Error type shared by the identification pipeline.
//!
//! Per-input problems (missing files, permission errors, undecodable bytes)
//! never show up here: they are terminal labels in a `MagikaResult`. This
//! enum only carries failures that invalidate the pipeline instance itself.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = MagikaError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum MagikaError {
    /// Reading a model or content-type artifact failed.
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An artifact was not valid JSON for its schema.
    #[error("failed to parse {what}: {source}")]
    Json {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The model configuration is inconsistent.
    #[error("invalid model config: {0}")]
    InvalidConfig(String),

    /// The inference engine failed to load or run.
    #[error("inference engine error: {0}")]
    Engine(String),

    /// `dispose` was called on the pipeline before this request.
    #[error("the inference engine has been disposed")]
    Disposed,
}

impl MagikaError {
    pub fn engine(err: impl std::fmt::Display) -> Self {
        MagikaError::Engine(err.to_string())
    }
}
