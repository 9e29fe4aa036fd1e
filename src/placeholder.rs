//! Default image placeholder.
//!
//! The site falls back to `images/default.jpg` when a category has no
//! images. This module makes sure the directory exists and, while the image
//! itself is missing, leaves a `README.txt` telling the user what to put there.

use log::debug;
use std::fs;
use std::path::Path;

pub const DEFAULT_IMAGE_NAME: &str = "default.jpg";
pub const README_NAME: &str = "README.txt";

/// What [`ensure_placeholder`] did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PlaceholderStatus {
    pub created_dir: bool,
    pub created_readme: bool,
    /// `default.jpg` is already present.
    pub has_default_image: bool,
}

fn readme_text(default_image: &Path) -> String {
    format!(
        "\
Default image location: {}
Put your default image here and name it {DEFAULT_IMAGE_NAME}.

Recommended:
- Format: JPG, PNG or WebP
- Size: 800x600 or 1024x768
- File size: under 500KB
",
        default_image.display()
    )
}

/// Create `dir` and its `README.txt` if needed.
///
/// An existing `README.txt` is never overwritten.
pub fn ensure_placeholder(dir: &Path) -> std::io::Result<PlaceholderStatus> {
    let mut status = PlaceholderStatus::default();

    if !dir.exists() {
        fs::create_dir_all(dir)?;
        status.created_dir = true;
        debug!("Created placeholder directory {}", dir.display());
    }

    let default_image = dir.join(DEFAULT_IMAGE_NAME);
    if default_image.exists() {
        status.has_default_image = true;
        return Ok(status);
    }

    let readme = dir.join(README_NAME);
    if !readme.exists() {
        fs::write(&readme, readme_text(&default_image))?;
        status.created_readme = true;
        debug!("Wrote {}", readme.display());
    }
    Ok(status)
}
