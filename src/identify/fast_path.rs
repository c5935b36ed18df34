use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

use tracing::{debug, warn};

use crate::constants::labels;
use crate::features::{FeatureExtractor, Features};

/// A terminal classification reached without the inference engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FastPath {
    DoesNotExist,
    Directory,
    Symlink { target: String },
    Empty,
    PermissionError,
    Error,
    Text,
    Unknown,
}

impl FastPath {
    pub fn label(&self) -> &'static str {
        match self {
            FastPath::DoesNotExist => labels::FILE_DOES_NOT_EXIST,
            FastPath::Directory => labels::DIRECTORY,
            FastPath::Symlink { .. } => labels::SYMLINK,
            FastPath::Empty => labels::EMPTY,
            FastPath::PermissionError => labels::PERMISSION_ERROR,
            FastPath::Error => labels::ERROR,
            FastPath::Text => labels::TXT,
            FastPath::Unknown => labels::UNKNOWN,
        }
    }

    pub fn symlink_target(&self) -> Option<&str> {
        match self {
            FastPath::Symlink { target } => Some(target),
            _ => None,
        }
    }

    /// Too few meaningful bytes for the model: decide on strict UTF-8.
    pub fn from_utf8_check(bytes: &[u8]) -> Self {
        if std::str::from_utf8(bytes).is_ok() {
            FastPath::Text
        } else {
            FastPath::Unknown
        }
    }

    pub fn from_io_error(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => FastPath::DoesNotExist,
            io::ErrorKind::PermissionDenied => FastPath::PermissionError,
            _ => FastPath::Error,
        }
    }
}

/// Either a terminal label or features to send to the model.
#[derive(Debug, Clone, PartialEq)]
pub enum Sample {
    Terminal(FastPath),
    Features(Features),
}

pub struct FastPathClassifier {
    extractor: FeatureExtractor,
    min_file_size_for_dl: usize,
    dereference: bool,
}

impl FastPathClassifier {
    pub fn new(
        extractor: FeatureExtractor,
        min_file_size_for_dl: usize,
        dereference: bool,
    ) -> Self {
        Self {
            extractor,
            min_file_size_for_dl,
            dereference,
        }
    }

    pub fn probe_path(
        &self,
        path: &Path,
    ) -> Sample {
        match self.try_probe_path(path) {
            Ok(sample) => sample,
            Err(e) => {
                let fast = FastPath::from_io_error(&e);
                if fast != FastPath::DoesNotExist {
                    warn!("{}: {e}", path.display());
                }
                Sample::Terminal(fast)
            }
        }
    }

    fn try_probe_path(
        &self,
        path: &Path,
    ) -> io::Result<Sample> {
        let mut meta = fs::symlink_metadata(path)?;
        if meta.file_type().is_symlink() {
            if !self.dereference {
                let target = resolve_target(path);
                debug!("{} is a symlink to {target}", path.display());
                return Ok(Sample::Terminal(FastPath::Symlink { target }));
            }
            meta = fs::metadata(path)?;
        }
        if meta.is_dir() {
            return Ok(Sample::Terminal(FastPath::Directory));
        }
        if !meta.is_file() {
            debug!("{} is not a regular file", path.display());
            return Ok(Sample::Terminal(FastPath::Unknown));
        }

        let total = meta.len();
        if total == 0 {
            return Ok(Sample::Terminal(FastPath::Empty));
        }
        let mut file = File::open(path)?;
        if total <= self.min_file_size_for_dl as u64 {
            let content = read_prefix(&mut file, total)?;
            return Ok(Sample::Terminal(FastPath::from_utf8_check(&content)));
        }
        let features = self.extractor.extract_from_reader(&mut file, total)?;
        Ok(self.check_features(features))
    }

    pub fn probe_bytes(
        &self,
        content: &[u8],
    ) -> Sample {
        if content.is_empty() {
            return Sample::Terminal(FastPath::Empty);
        }
        if content.len() <= self.min_file_size_for_dl {
            return Sample::Terminal(FastPath::from_utf8_check(content));
        }
        self.check_features(self.extractor.extract_from_bytes(content))
    }

    /// Content that trims down to fewer than `min_file_size_for_dl` bytes
    /// gets the same UTF-8 shortcut as a tiny file.
    fn check_features(
        &self,
        features: Features,
    ) -> Sample {
        let padding = self.extractor.encoder().padding_token();
        let short = features
            .beg()
            .get(self.min_file_size_for_dl - 1)
            .is_some_and(|&v| v == padding);
        if short {
            Sample::Terminal(FastPath::from_utf8_check(
                &features.leading_bytes(padding),
            ))
        } else {
            Sample::Features(features)
        }
    }
}

/// At most `limit` bytes, even if the file grew since it was stat'ed.
fn read_prefix<R: Read>(
    reader: R,
    limit: u64,
) -> io::Result<Vec<u8>> {
    let mut content = Vec::with_capacity(limit as usize);
    reader.take(limit).read_to_end(&mut content)?;
    Ok(content)
}

fn resolve_target(path: &Path) -> String {
    dunce::canonicalize(path)
        .or_else(|_| fs::read_link(path))
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{FeatureEncoder, WindowSizes};

    fn classifier() -> FastPathClassifier {
        let extractor =
            FeatureExtractor::new(FeatureEncoder::new(WindowSizes::new(32, 32, 32), 256), 64);
        FastPathClassifier::new(extractor, 16, true)
    }

    #[test]
    fn tiny_buffers_use_utf8() {
        let c = classifier();
        assert_eq!(c.probe_bytes(b"hello"), Sample::Terminal(FastPath::Text));
        assert_eq!(
            c.probe_bytes(&[0xff, 0xfe, 0x00, 0x01, 0x02]),
            Sample::Terminal(FastPath::Unknown)
        );
        assert_eq!(c.probe_bytes(b""), Sample::Terminal(FastPath::Empty));
    }

    #[test]
    fn whitespace_heavy_buffers_short_circuit() {
        let c = classifier();
        let mut content = vec![b' '; 100];
        content.extend_from_slice(b"abc");
        content.extend(vec![b'\n'; 100]);
        assert_eq!(c.probe_bytes(&content), Sample::Terminal(FastPath::Text));
    }

    #[test]
    fn enough_bytes_go_to_the_model() {
        let c = classifier();
        let sample = c.probe_bytes(b"fn main() { println!(\"hello\"); }");
        assert!(matches!(sample, Sample::Features(_)));
    }

    #[test]
    fn paths_are_probed_before_reading() {
        let dir = tempfile::tempdir().unwrap();
        let c = classifier();
        assert_eq!(
            c.probe_path(dir.path()),
            Sample::Terminal(FastPath::Directory)
        );
        assert_eq!(
            c.probe_path(&dir.path().join("missing")),
            Sample::Terminal(FastPath::DoesNotExist)
        );

        let empty = dir.path().join("empty");
        fs::write(&empty, b"").unwrap();
        assert_eq!(c.probe_path(&empty), Sample::Terminal(FastPath::Empty));

        let tiny = dir.path().join("tiny");
        fs::write(&tiny, b"hi\n").unwrap();
        assert_eq!(c.probe_path(&tiny), Sample::Terminal(FastPath::Text));
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_follow_the_dereference_flag() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("target.txt");
        fs::write(&target, b"hello").unwrap();
        let link = dir.path().join("link");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        assert_eq!(classifier().probe_path(&link), Sample::Terminal(FastPath::Text));

        let extractor =
            FeatureExtractor::new(FeatureEncoder::new(WindowSizes::new(32, 32, 32), 256), 64);
        let no_deref = FastPathClassifier::new(extractor, 16, false);
        match no_deref.probe_path(&link) {
            Sample::Terminal(FastPath::Symlink { target: t }) => {
                assert!(t.ends_with("target.txt"), "{t}")
            }
            other => panic!("unexpected {other:?}"),
        }

        let dangling = dir.path().join("dangling");
        std::os::unix::fs::symlink(dir.path().join("gone"), &dangling).unwrap();
        assert_eq!(
            classifier().probe_path(&dangling),
            Sample::Terminal(FastPath::DoesNotExist)
        );
    }

    #[test]
    fn tiny_reads_stop_at_the_stat_size() {
        let grown = io::Cursor::new(vec![b'a'; 4096]);
        assert_eq!(read_prefix(grown, 5).unwrap(), b"aaaaa");
    }

    #[test]
    fn io_errors_map_to_labels() {
        let denied = io::Error::from(io::ErrorKind::PermissionDenied);
        assert_eq!(FastPath::from_io_error(&denied), FastPath::PermissionError);
        let other = io::Error::other("boom");
        assert_eq!(FastPath::from_io_error(&other).label(), "error");
    }
}
