//! Shared test utilities for the image-list test suite.
//!
//! Provides fixture setup and lookup helpers for scan-phase (`Catalog`) and
//! build-phase (`Manifest`) data.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let project = setup_project();
//! let manifest = build_manifest(&project_config(project.path())).unwrap();
//!
//! let photo = structured_entry(&manifest, "people/photo");
//! assert_eq!(photo.answers.len(), 2);
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::config::ManifestConfig;
use crate::manifest::{CategoryEntry, Manifest};
use crate::scan::{Catalog, Category};

// =========================================================================
// Fixture setup
// =========================================================================

fn fixtures_dir() -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/game")
}

/// Copy `fixtures/game/` to a temp directory and return it.
///
/// The temp directory itself is the scan root.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    copy_dir_recursive(&fixtures_dir(), tmp.path()).unwrap();
    tmp
}

/// Temp project directory with `fixtures/game/` copied to `images/game/`.
pub fn setup_project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("images/game");
    std::fs::create_dir_all(&root).unwrap();
    copy_dir_recursive(&fixtures_dir(), &root).unwrap();
    tmp
}

/// Stock config anchored at `project_dir`, with the placeholder disabled.
pub fn project_config(project_dir: &Path) -> ManifestConfig {
    let mut config = ManifestConfig::default().anchored(project_dir);
    config.placeholder.enabled = false;
    config
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Lookups: panic with the available keys on a miss
// =========================================================================

/// Find a catalog category by key. Panics if not found.
pub fn find_category<'a>(catalog: &'a Catalog, key: &str) -> &'a Category {
    catalog.get(key).unwrap_or_else(|| {
        let keys: Vec<&str> = catalog.keys().map(String::as_str).collect();
        panic!("category '{key}' not found. Available: {keys:?}")
    })
}

/// Answer ids of a catalog category, sorted.
pub fn answer_ids(category: &Category) -> Vec<&str> {
    category.answers.keys().map(String::as_str).collect()
}

/// Find a category in a structured manifest. Panics if not found or if the
/// manifest is flat.
pub fn structured_entry<'a>(manifest: &'a Manifest, key: &str) -> &'a CategoryEntry {
    let Manifest::Structured(map) = manifest else {
        panic!("expected a structured manifest, got {:?}", manifest.mode())
    };
    map.get(key).unwrap_or_else(|| {
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        panic!("category '{key}' not found. Available: {keys:?}")
    })
}
