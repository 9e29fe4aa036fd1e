//! Writing the manifest to disk and checking the result.
//!
//! The manifest is written as pretty-printed JSON (2-space indent) with a
//! plain overwrite. There is no temp-file rename, so an interrupted write can
//! leave a truncated file behind; [`verify_manifest_file`] exists to catch
//! that after the fact, it never repairs anything.

use crate::manifest::Manifest;
use log::info;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Manifest file {0} does not exist")]
    Missing(std::path::PathBuf),
}

/// Serialize `manifest` as it will appear on disk.
pub fn to_json(manifest: &Manifest) -> Result<String, WriteError> {
    Ok(serde_json::to_string_pretty(manifest)?)
}

/// Write `manifest` to `path`, creating the parent directory if needed and
/// replacing any existing file.
pub fn write_manifest(manifest: &Manifest, path: &Path) -> Result<(), WriteError> {
    let json = to_json(manifest)?;
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, json)?;
    info!("Wrote manifest to {}", path.display());
    Ok(())
}

/// Read `path` back and parse it as JSON.
///
/// Returns the number of top-level categories on success.
pub fn verify_manifest_file(path: &Path) -> Result<usize, WriteError> {
    if !path.exists() {
        return Err(WriteError::Missing(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&content)?;
    Ok(value.as_object().map(|o| o.len()).unwrap_or(0))
}
