use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use glob::glob;
use globset::{Glob, GlobSetBuilder};
use ignore::WalkBuilder;
use path_slash::PathExt;
use tracing::warn;

use crate::constants::BUFFER_PATH;

/// One thing to identify, as given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Stdin,
    Path(PathBuf),
}

#[derive(Debug)]
pub struct InvalidExcludePatterns {
    pub patterns: Vec<String>,
}

impl std::fmt::Display for InvalidExcludePatterns {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(
            f,
            "Every --exclude pattern was invalid: {:?}",
            self.patterns
        )
    }
}

impl std::error::Error for InvalidExcludePatterns {}

pub fn expand_paths(paths: Vec<String>) -> Result<Vec<Input>> {
    let mut expanded = Vec::new();

    for p in paths {
        if p == BUFFER_PATH {
            expanded.push(Input::Stdin);
            continue;
        }
        // Normalize Windows path separators for glob patterns
        let pattern = p.replace('\\', "/");
        let pattern_results =
            glob(&pattern).map_err(|e| anyhow!("Invalid glob pattern {}: {:?}", pattern, e))?;

        let mut has_match = false;
        for path_res in pattern_results {
            has_match = true;
            expanded.push(Input::Path(path_res?));
        }
        // No matches: keep it literal so missing files still get a result
        if !has_match {
            expanded.push(Input::Path(PathBuf::from(&p)));
        }
    }

    Ok(expanded)
}

/// Replace directories by the files under them when `recursive` is set.
/// Without it a directory stays a single input.
pub fn collect_inputs(
    inputs: Vec<Input>,
    recursive: bool,
) -> Vec<Input> {
    let mut results = Vec::with_capacity(inputs.len());
    for input in inputs {
        match input {
            Input::Path(path) if recursive && path.is_dir() => {
                results.extend(walk_dir(&path).into_iter().map(Input::Path));
            }
            other => results.push(other),
        }
    }
    results
}

/// Every non-directory entry under `root`, symlinks included, sorted.
pub fn walk_dir(root: &Path) -> Vec<PathBuf> {
    let walker = WalkBuilder::new(root)
        .follow_links(false)
        .standard_filters(false)
        .build();

    let mut files = Vec::new();
    for entry_result in walker {
        match entry_result {
            Ok(entry) => {
                if entry.file_type().is_some_and(|ft| !ft.is_dir()) {
                    files.push(entry.into_path());
                }
            }
            Err(e) => {
                warn!("Could not process entry in {:?}: {:?}", root, e);
            }
        }
    }
    files.sort();
    files
}

/// Drop inputs whose path (absolute or relative to `root`) matches any
/// pattern. Invalid patterns are skipped with a warning.
pub fn apply_excludes(
    inputs: Vec<Input>,
    exclude: &[String],
    root: &Path,
) -> Result<Vec<Input>> {
    if exclude.is_empty() {
        return Ok(inputs);
    }
    let raw_patterns: Vec<String> = exclude.iter().map(|p| p.replace('\\', "/")).collect();
    let mut builder = GlobSetBuilder::new();
    let mut valid = 0usize;
    for pattern in &raw_patterns {
        match Glob::new(pattern) {
            Ok(glob) => {
                builder.add(glob);
                valid += 1;
            }
            Err(_) => warn!("invalid --exclude pattern: {pattern}"),
        }
    }
    if valid == 0 {
        return Err(anyhow!(InvalidExcludePatterns {
            patterns: raw_patterns,
        }));
    }

    let matcher = builder.build()?;
    Ok(inputs
        .into_iter()
        .filter(|input| match input {
            Input::Stdin => true,
            Input::Path(path) => {
                let abs = path.to_slash_lossy();
                let rel = path.strip_prefix(root).ok().map(|p| p.to_slash_lossy());
                let rel: &str = rel.as_deref().unwrap_or(&abs);
                !matcher.is_match(rel) && !matcher.is_match(&*abs)
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dash_means_stdin() {
        let inputs = expand_paths(vec!["-".into()]).unwrap();
        assert_eq!(inputs, vec![Input::Stdin]);
    }

    #[test]
    fn unmatched_literal_is_kept() {
        let inputs = expand_paths(vec!["/no/such/file".into()]).unwrap();
        assert_eq!(inputs, vec![Input::Path(PathBuf::from("/no/such/file"))]);
    }

    #[test]
    fn all_invalid_excludes_error() {
        let err = apply_excludes(vec![Input::Stdin], &["[".to_string()], Path::new("."))
            .unwrap_err();
        assert!(err.to_string().contains("Every --exclude pattern"), "{err}");
    }
}
