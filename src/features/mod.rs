pub mod encoder;
pub mod window;

pub use encoder::{FeatureEncoder, Features, WindowSizes};
pub use window::{FeatureExtractor, TrimmedSpan};
