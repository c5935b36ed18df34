pub mod table;

pub use table::{ContentType, ContentTypeTable};
