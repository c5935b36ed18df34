// Centralized magic numbers & default values
pub const MAX_WINDOW_SIZE: usize = 512;
pub const DEFAULT_WINDOW_SIZE: usize = 512;
pub const DEFAULT_BLOCK_SIZE: usize = 4096;
pub const DEFAULT_PADDING_TOKEN: i32 = 256;
pub const DEFAULT_MIN_FILE_SIZE_FOR_DL: usize = 16;
pub const DEFAULT_MEDIUM_CONFIDENCE_THRESHOLD: f32 = 0.5;
pub const MAX_INTERNAL_BATCH_SIZE: usize = 1000;

/// Bytes stripped from the edges of the content before windows are taken.
pub const WHITESPACE_BYTES: [u8; 6] = [b' ', b'\t', b'\n', 0x0b, 0x0c, b'\r'];

pub const MODEL_FILE_NAME: &str = "model.onnx";
pub const MODEL_CONFIG_FILE_NAME: &str = "config.min.json";
pub const MODEL_DIR_ENV: &str = "MAGIKA_MODEL_DIR";

/// Path reported for in-memory buffers.
pub const BUFFER_PATH: &str = "-";
/// Placeholder in description/magic strings replaced by a symlink target.
pub const PATH_TOKEN: &str = "<path>";

pub mod labels {
    pub const FILE_DOES_NOT_EXIST: &str = "file_does_not_exist";
    pub const DIRECTORY: &str = "directory";
    pub const SYMLINK: &str = "symlink";
    pub const EMPTY: &str = "empty";
    pub const PERMISSION_ERROR: &str = "permission_error";
    pub const ERROR: &str = "error";
    pub const TXT: &str = "txt";
    pub const UNKNOWN: &str = "unknown";
}
