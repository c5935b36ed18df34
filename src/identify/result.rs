use serde::Serialize;

use crate::constants::PATH_TOKEN;
use crate::content::{ContentType, ContentTypeTable};
use crate::model::ModelOutput;

/// A label, its score and the table metadata that goes with it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentTypeFields {
    pub ct_label: String,
    pub score: f32,
    pub group: String,
    pub mime_type: String,
    pub magic: String,
    pub description: String,
}

impl ContentTypeFields {
    fn from_content_type(
        ct: ContentType,
        score: f32,
    ) -> Self {
        Self {
            ct_label: ct.label,
            score,
            group: ct.group,
            mime_type: ct.mime_type,
            magic: ct.magic,
            description: ct.description,
        }
    }
}

/// What identification returns for one input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MagikaResult {
    /// File path, or `-` for in-memory buffers.
    pub path: String,
    /// Raw classifier output; `None` when the fast path decided.
    pub dl: Option<ContentTypeFields>,
    pub output: ContentTypeFields,
}

impl MagikaResult {
    pub fn label(&self) -> &str {
        &self.output.ct_label
    }

    pub fn score(&self) -> f32 {
        self.output.score
    }

    pub fn is_fast_path(&self) -> bool {
        self.dl.is_none()
    }
}

/// Merge classifier output and the final label with table metadata.
///
/// `symlink_target` replaces the `<path>` token in magic and description.
pub fn compose(
    path: String,
    raw: Option<&ModelOutput>,
    output_label: &str,
    output_score: f32,
    table: &ContentTypeTable,
    symlink_target: Option<&str>,
) -> MagikaResult {
    let dl = raw.map(|out| ContentTypeFields::from_content_type(table.lookup(&out.label), out.score));
    let mut output =
        ContentTypeFields::from_content_type(table.lookup(output_label), output_score);
    if let Some(target) = symlink_target {
        output.magic = output.magic.replace(PATH_TOKEN, target);
        output.description = output.description.replace(PATH_TOKEN, target);
    }
    MagikaResult { path, dl, output }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ContentTypeTable {
        ContentTypeTable::builtin().unwrap()
    }

    #[test]
    fn fast_path_result_has_no_dl_record() {
        let r = compose("-".into(), None, "empty", 1.0, &table(), None);
        assert!(r.is_fast_path());
        assert_eq!(r.label(), "empty");
        assert_eq!(r.score(), 1.0);
        assert_eq!(r.output.group, "inode");
    }

    #[test]
    fn symlink_target_is_substituted() {
        let r = compose(
            "link".into(),
            None,
            "symlink",
            1.0,
            &table(),
            Some("/tmp/target"),
        );
        assert_eq!(r.output.description, "Symbolic link to /tmp/target");
        assert_eq!(r.output.magic, "symbolic link to /tmp/target");
    }

    #[test]
    fn dl_keeps_raw_label_and_score() {
        let raw = ModelOutput {
            label: "python".into(),
            score: 0.42,
        };
        let r = compose("a.py".into(), Some(&raw), "txt", 0.42, &table(), None);
        let dl = r.dl.as_ref().unwrap();
        assert_eq!(dl.ct_label, "python");
        assert_eq!(dl.mime_type, "text/x-python");
        assert_eq!(r.label(), "txt");
        assert_eq!(r.output.score, 0.42);
    }

    #[test]
    fn serializes_missing_dl_as_null() {
        let r = compose("-".into(), None, "empty", 1.0, &table(), None);
        let json = serde_json::to_value(&r).unwrap();
        assert!(json["dl"].is_null());
        assert_eq!(json["output"]["ct_label"], "empty");
    }
}
