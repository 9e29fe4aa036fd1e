//! Directory walking and image classification.
//!
//! Stage 1 of a manifest build. Walks the scan root depth-first and sorts
//! every image it finds into a [`Catalog`] keyed by category.
//!
//! ## Directory Structure
//!
//! ```text
//! images/game/                     # Scan root, category "."
//! ├── cover.png                    # Question in "."
//! ├── people/                      # (no images of its own, no category)
//! │   ├── photo/                   # Category "people/photo"
//! │   │   ├── 001.jpg              # Question
//! │   │   ├── 002.jpg              # Question
//! │   │   └── answer/              # Answer folder for "people/photo"
//! │   │       └── 001.jpg          # answers["001"]
//! │   └── screenshot/              # Category "people/screenshot"
//! │       └── a.webp
//! └── notes.txt                    # Not an image, ignored
//! ```
//!
//! ## Classification
//!
//! Each directory entry is classified once, as an [`EntryKind`], before it is
//! folded into the catalog:
//!
//! - **Answer sub-directory**: a directory named like the answer marker. Its
//!   direct image children become answers of the *parent* category, keyed by
//!   file stem. It is never recursed into.
//! - **Regular sub-directory**: recursed into (when sub-directories are
//!   enabled).
//! - **Image file**: a regular file with an allow-listed extension, recorded
//!   as a question of its containing directory.
//! - **Other**: ignored.
//!
//! Entries are visited in the order the filesystem reports them. A category
//! only exists once it has received a question or an answer.

use crate::config::{ManifestMode, ScanConfig};
use crate::paths::category_key;
use log::debug;
use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Traversal error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Scan root does not exist: {0}")]
    RootNotFound(PathBuf),
    #[error("Scan root is not a directory: {0}")]
    RootNotDirectory(PathBuf),
    #[error("Scan root {path} is not readable: {source}")]
    RootUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl ScanError {
    /// True for problems with the configured root rather than the tree below it.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ScanError::RootNotFound(_)
                | ScanError::RootNotDirectory(_)
                | ScanError::RootUnreadable { .. }
        )
    }
}

/// Images collected for one category, as filesystem paths.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Category {
    /// Question images in enumeration order.
    pub questions: Vec<PathBuf>,
    /// Answer images keyed by file stem. Later duplicates replace earlier ones.
    pub answers: BTreeMap<String, PathBuf>,
}

impl Category {
    pub fn image_count(&self) -> usize {
        self.questions.len() + self.answers.len()
    }
}

/// Walker output: category key → collected images.
pub type Catalog = BTreeMap<String, Category>;

/// Walker settings derived from [`ScanConfig`].
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Lowercase extensions without the leading dot.
    pub extensions: Vec<String>,
    pub include_subdirectories: bool,
    /// Answer marker, `None` disables answer classification.
    pub answer_folder: Option<String>,
}

impl ScanOptions {
    /// Flat manifests have no answers, so the marker is dropped and answer
    /// folders become ordinary categories.
    pub fn from_config(scan: &ScanConfig, mode: ManifestMode) -> Self {
        let answer_folder = match mode {
            ManifestMode::Structured => Some(scan.answer_folder.clone()),
            ManifestMode::Flat => None,
        };
        Self {
            extensions: scan.normalized_extensions(),
            include_subdirectories: scan.include_subdirectories,
            answer_folder,
        }
    }

    fn has_image_extension(&self, path: &Path) -> bool {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        !ext.is_empty() && self.extensions.iter().any(|e| *e == ext)
    }

    fn is_answer_folder(&self, name: &OsStr) -> bool {
        self.answer_folder
            .as_deref()
            .is_some_and(|marker| name == OsStr::new(marker))
    }
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self::from_config(&ScanConfig::default(), ManifestMode::Structured)
    }
}

/// What a directory entry means to the walker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    RegularSubdirectory,
    AnswerSubdirectory,
    ImageFile,
    Other,
}

impl EntryKind {
    /// Classify a walker entry. File types follow symlinks.
    pub fn of(entry: &DirEntry, options: &ScanOptions) -> Self {
        let file_type = entry.file_type();
        if file_type.is_dir() {
            if options.is_answer_folder(entry.file_name()) {
                EntryKind::AnswerSubdirectory
            } else {
                EntryKind::RegularSubdirectory
            }
        } else if file_type.is_file() && options.has_image_extension(entry.path()) {
            EntryKind::ImageFile
        } else {
            EntryKind::Other
        }
    }
}

/// Check that `root` is an existing, readable directory.
pub fn check_root(root: &Path) -> Result<(), ScanError> {
    let metadata = match fs::metadata(root) {
        Ok(m) => m,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ScanError::RootNotFound(root.to_path_buf()));
        }
        Err(e) => {
            return Err(ScanError::RootUnreadable {
                path: root.to_path_buf(),
                source: e,
            });
        }
    };
    if !metadata.is_dir() {
        return Err(ScanError::RootNotDirectory(root.to_path_buf()));
    }
    fs::read_dir(root).map_err(|source| ScanError::RootUnreadable {
        path: root.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// [`check_root`], then canonicalize so paths can be compared to the base.
pub fn resolve_root(root: &Path) -> Result<PathBuf, ScanError> {
    check_root(root)?;
    Ok(fs::canonicalize(root)?)
}

/// Walk `root` and collect every image into a [`Catalog`].
pub fn scan(root: &Path, options: &ScanOptions) -> Result<Catalog, ScanError> {
    check_root(root)?;

    let mut catalog = Catalog::new();
    let mut walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(true)
        .into_iter();

    while let Some(entry) = walker.next() {
        let entry = entry?;
        match EntryKind::of(&entry, options) {
            EntryKind::AnswerSubdirectory => {
                walker.skip_current_dir();
                scan_answers(entry.path(), root, options, &mut catalog)?;
            }
            EntryKind::RegularSubdirectory => {
                if !options.include_subdirectories {
                    debug!("Skipping sub-directory {}", entry.path().display());
                    walker.skip_current_dir();
                }
            }
            EntryKind::ImageFile => {
                let dir = entry.path().parent().unwrap_or(root);
                let key = category_key(root, dir);
                catalog
                    .entry(key)
                    .or_default()
                    .questions
                    .push(entry.into_path());
            }
            EntryKind::Other => {}
        }
    }

    debug!(
        "Scanned {}: {} categories, {} images",
        root.display(),
        catalog.len(),
        catalog.values().map(Category::image_count).sum::<usize>()
    );
    Ok(catalog)
}

/// Record the direct image children of `answer_dir` as answers of its parent.
///
/// Sub-directories of an answer folder, including nested answer folders, are
/// not visited.
fn scan_answers(
    answer_dir: &Path,
    root: &Path,
    options: &ScanOptions,
    catalog: &mut Catalog,
) -> Result<(), ScanError> {
    let parent = answer_dir.parent().unwrap_or(root);
    let key = category_key(root, parent);
    debug!("Answer folder {} → category {key}", answer_dir.display());

    for entry in WalkDir::new(answer_dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
    {
        let entry = entry?;
        if !entry.file_type().is_file() || !options.has_image_extension(entry.path()) {
            continue;
        }
        let Some(stem) = entry.path().file_stem() else {
            continue;
        };
        let id = stem.to_string_lossy().into_owned();
        let path = entry.into_path();
        if let Some(previous) = catalog
            .entry(key.clone())
            .or_default()
            .answers
            .insert(id.clone(), path)
        {
            debug!("Answer {id} in {key} replaces {}", previous.display());
        }
    }
    Ok(())
}
