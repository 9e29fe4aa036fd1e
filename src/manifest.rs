//! The image manifest and the builder that produces it.
//!
//! A build is scan → format: the walker's [`Catalog`] of filesystem paths is
//! turned into a [`Manifest`] of site URLs. The manifest comes in two shapes,
//! selected by [`ManifestMode`]:
//!
//! ```json
//! // Flat
//! { "people/photo": ["/images/game/people/photo/001.jpg"] }
//!
//! // Structured
//! {
//!   "people/photo": {
//!     "questions": ["/images/game/people/photo/001.jpg"],
//!     "answers": { "001": "/images/game/people/photo/answer/001.jpg" }
//!   }
//! }
//! ```
//!
//! Category keys and answer ids serialize in sorted order, so repeated builds
//! of the same tree produce identical JSON.

use crate::config::{ManifestConfig, ManifestMode};
use crate::paths::{PathError, UrlFormatter};
use crate::scan::{self, Catalog, ScanError, ScanOptions};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Path(#[from] PathError),
    #[error("Base path {path} is not usable: {source}")]
    Base {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl BuildError {
    /// True when the build failed on configuration, before any traversal.
    pub fn is_config_error(&self) -> bool {
        match self {
            BuildError::Scan(e) => e.is_config_error(),
            BuildError::Base { .. } => true,
            BuildError::Path(_) => false,
        }
    }
}

/// Questions and answers of one category, as URLs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryEntry {
    pub questions: Vec<String>,
    pub answers: BTreeMap<String, String>,
}

/// Category key → image URLs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Manifest {
    Flat(BTreeMap<String, Vec<String>>),
    Structured(BTreeMap<String, CategoryEntry>),
}

/// Borrowed view of one category, independent of manifest shape.
#[derive(Debug, Clone, Copy)]
pub struct CategoryView<'a> {
    pub key: &'a str,
    pub questions: &'a [String],
    /// `None` for flat manifests.
    pub answers: Option<&'a BTreeMap<String, String>>,
}

impl Manifest {
    pub fn mode(&self) -> ManifestMode {
        match self {
            Manifest::Flat(_) => ManifestMode::Flat,
            Manifest::Structured(_) => ManifestMode::Structured,
        }
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        match self {
            Manifest::Flat(m) => m.len(),
            Manifest::Structured(m) => m.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Categories in key order.
    pub fn categories(&self) -> Vec<CategoryView<'_>> {
        match self {
            Manifest::Flat(m) => m
                .iter()
                .map(|(key, questions)| CategoryView {
                    key,
                    questions,
                    answers: None,
                })
                .collect(),
            Manifest::Structured(m) => m
                .iter()
                .map(|(key, entry)| CategoryView {
                    key,
                    questions: &entry.questions,
                    answers: Some(&entry.answers),
                })
                .collect(),
        }
    }

    /// Every URL in the manifest, questions before answers per category.
    pub fn urls(&self) -> Vec<&str> {
        self.categories()
            .into_iter()
            .flat_map(|c| {
                c.questions
                    .iter()
                    .chain(c.answers.into_iter().flat_map(|a| a.values()))
                    .map(String::as_str)
            })
            .collect()
    }

    pub fn image_count(&self) -> usize {
        self.urls().len()
    }
}

/// Convert a walker catalog into a manifest of URLs.
///
/// With `sort` set, question lists are sorted by URL; otherwise they keep the
/// walker's enumeration order.
pub fn format_catalog(
    catalog: Catalog,
    formatter: &UrlFormatter,
    mode: ManifestMode,
    sort: bool,
) -> Result<Manifest, PathError> {
    let format_questions = |paths: Vec<PathBuf>| -> Result<Vec<String>, PathError> {
        let mut urls = paths
            .iter()
            .map(|p| formatter.format(p))
            .collect::<Result<Vec<_>, _>>()?;
        if sort {
            urls.sort();
        }
        Ok(urls)
    };

    Ok(match mode {
        ManifestMode::Flat => {
            let mut flat = BTreeMap::new();
            for (key, category) in catalog {
                flat.insert(key, format_questions(category.questions)?);
            }
            Manifest::Flat(flat)
        }
        ManifestMode::Structured => {
            let mut structured = BTreeMap::new();
            for (key, category) in catalog {
                let answers = category
                    .answers
                    .iter()
                    .map(|(id, p)| Ok((id.clone(), formatter.format(p)?)))
                    .collect::<Result<BTreeMap<_, _>, PathError>>()?;
                structured.insert(
                    key,
                    CategoryEntry {
                        questions: format_questions(category.questions)?,
                        answers,
                    },
                );
            }
            Manifest::Structured(structured)
        }
    })
}

/// Build the manifest described by `config`.
///
/// The root is checked before anything is walked; a missing root is a
/// configuration error. Root and base are canonicalized so URLs come out the
/// same whatever form the paths were given in.
pub fn build_manifest(config: &ManifestConfig) -> Result<Manifest, BuildError> {
    let root = scan::resolve_root(&config.root_dir)?;
    let base = fs::canonicalize(&config.base_path).map_err(|source| BuildError::Base {
        path: config.base_path.clone(),
        source,
    })?;

    let options = ScanOptions::from_config(&config.scan, config.output.mode);
    let catalog = scan::scan(&root, &options)?;

    let formatter = UrlFormatter::new(base, config.repository_name());
    let manifest = format_catalog(catalog, &formatter, config.output.mode, config.output.sort)?;

    info!(
        "Built {:?} manifest: {} categories, {} images",
        manifest.mode(),
        manifest.len(),
        manifest.image_count()
    );
    Ok(manifest)
}
