pub mod fast_path;
pub mod policy;
pub mod result;

pub use fast_path::{FastPath, FastPathClassifier, Sample};
pub use policy::{Decision, DecisionPolicy};
pub use result::{ContentTypeFields, MagikaResult, compose};
