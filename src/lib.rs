pub mod cli;
pub mod config;
pub mod constants;
pub mod content;
pub mod error;
pub mod features;
pub mod identify;
pub mod io;
pub mod model;
pub mod pipeline;
pub mod ui;

pub use config::{Config, PredictionMode};
pub use content::{ContentType, ContentTypeTable};
pub use error::{MagikaError, Result};
pub use features::Features;
pub use identify::{ContentTypeFields, MagikaResult};
pub use model::{InferenceEngine, ModelConfig, ModelOutput};
pub use pipeline::Magika;
