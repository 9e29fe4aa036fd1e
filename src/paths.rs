//! Filesystem path → site URL conversion.
//!
//! Every image path in the manifest is written as a site-relative URL:
//!
//! ```text
//! base:   /srv/site
//! file:   /srv/site/images/game/people/001.jpg
//! URL:    /images/game/people/001.jpg
//! repo:   /quiz/images/game/people/001.jpg      (repository_name = "quiz")
//! ```
//!
//! URLs always use `/`, start with exactly one `/`, and never carry the
//! host's path separator. The same separator rule produces category keys.

use std::path::{Component, Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PathError {
    #[error("{path} is not inside base directory {base}")]
    OutsideBase { path: PathBuf, base: PathBuf },
}

/// Join a relative path's components with `/`.
///
/// Backslashes inside names are folded to `/` too, so the result is the same
/// whichever platform produced the path. An empty path yields `""`.
pub fn slash_path(rel: &Path) -> String {
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().replace('\\', "/")),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Category key for `dir` relative to the scan `root`.
///
/// The root itself is `"."`. Directories outside the root fall back to their
/// full slash-joined path, which cannot happen for walker output.
pub fn category_key(root: &Path, dir: &Path) -> String {
    let rel = dir.strip_prefix(root).unwrap_or(dir);
    let key = slash_path(rel);
    if key.is_empty() { ".".to_string() } else { key }
}

/// Converts filesystem paths under a base directory into site URLs.
#[derive(Debug, Clone)]
pub struct UrlFormatter {
    base: PathBuf,
    repository_name: Option<String>,
}

impl UrlFormatter {
    /// `repository_name` is trimmed of slashes; blank means no prefix.
    pub fn new(base: impl Into<PathBuf>, repository_name: Option<&str>) -> Self {
        let repository_name = repository_name
            .map(|r| r.trim().trim_matches('/').to_string())
            .filter(|r| !r.is_empty());
        Self {
            base: base.into(),
            repository_name,
        }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn repository_name(&self) -> Option<&str> {
        self.repository_name.as_deref()
    }

    /// Format `path` as a site URL.
    pub fn format(&self, path: &Path) -> Result<String, PathError> {
        let rel = path
            .strip_prefix(&self.base)
            .map_err(|_| PathError::OutsideBase {
                path: path.to_path_buf(),
                base: self.base.clone(),
            })?;
        let rel = slash_path(rel);
        let rel = rel.trim_start_matches('/');

        Ok(match &self.repository_name {
            Some(repo) => format!("/{repo}/{rel}"),
            None => format!("/{rel}"),
        })
    }
}
