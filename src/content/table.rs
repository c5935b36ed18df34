use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MagikaError, Result};

const BUILTIN_TABLE: &str = include_str!("../../assets/content_types_kb.min.json");

const FALLBACK_MIME_TYPE: &str = "application/unknown";
const FALLBACK_GROUP: &str = "unknown";
const FALLBACK_MAGIC: &str = "Unknown";
const FALLBACK_DESCRIPTION: &str = "Unknown binary data";

pub const TEXT_TAG: &str = "text";

/// Descriptive metadata for one content-type label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentType {
    pub label: String,
    pub mime_type: String,
    pub group: String,
    pub magic: String,
    pub description: String,
    pub extensions: Vec<String>,
    pub tags: Vec<String>,
}

impl ContentType {
    /// Entry used for labels the table does not know.
    pub fn fallback(label: &str) -> Self {
        Self {
            label: label.to_string(),
            mime_type: FALLBACK_MIME_TYPE.to_string(),
            group: FALLBACK_GROUP.to_string(),
            magic: FALLBACK_MAGIC.to_string(),
            description: FALLBACK_DESCRIPTION.to_string(),
            extensions: Vec::new(),
            tags: Vec::new(),
        }
    }

    pub fn is_text(&self) -> bool {
        self.tags.iter().any(|t| t == TEXT_TAG)
    }
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    mime_type: Option<String>,
    group: Option<String>,
    magic: Option<String>,
    description: Option<String>,
    #[serde(default)]
    extensions: Vec<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    is_text: bool,
}

impl RawEntry {
    fn into_content_type(
        self,
        label: String,
    ) -> ContentType {
        let mut tags = self.tags;
        if self.is_text && !tags.iter().any(|t| t == TEXT_TAG) {
            tags.push(TEXT_TAG.to_string());
        }
        ContentType {
            mime_type: self
                .mime_type
                .unwrap_or_else(|| FALLBACK_MIME_TYPE.to_string()),
            group: self.group.unwrap_or_else(|| FALLBACK_GROUP.to_string()),
            magic: self.magic.unwrap_or_else(|| FALLBACK_MAGIC.to_string()),
            description: self
                .description
                .unwrap_or_else(|| FALLBACK_DESCRIPTION.to_string()),
            extensions: self.extensions,
            tags,
            label,
        }
    }
}

/// Read-only label → metadata map.
#[derive(Debug, Clone)]
pub struct ContentTypeTable {
    entries: HashMap<String, ContentType>,
}

impl ContentTypeTable {
    /// The table shipped inside the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_TABLE)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let raw: HashMap<String, RawEntry> =
            serde_json::from_str(json).map_err(|source| MagikaError::Json {
                what: "content-type table",
                source,
            })?;
        let entries = raw
            .into_iter()
            .map(|(label, entry)| {
                let ct = entry.into_content_type(label.clone());
                (label, ct)
            })
            .collect();
        Ok(Self { entries })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|source| MagikaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn get(
        &self,
        label: &str,
    ) -> Option<&ContentType> {
        self.entries.get(label)
    }

    /// Exact-match lookup with the documented fallback values.
    pub fn lookup(
        &self,
        label: &str,
    ) -> ContentType {
        self.get(label)
            .cloned()
            .unwrap_or_else(|| ContentType::fallback(label))
    }

    pub fn is_text(
        &self,
        label: &str,
    ) -> bool {
        self.get(label).is_some_and(ContentType::is_text)
    }

    pub fn contains(
        &self,
        label: &str,
    ) -> bool {
        self.entries.contains_key(label)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}
