//! # image-list
//!
//! Builds the image manifest for a static quiz site. The filesystem is the
//! data source: every directory under the scan root is a category, the images
//! in it are its questions, and an `answer/` sub-directory holds the matching
//! answers, paired by file name.
//!
//! # Pipeline
//!
//! ```text
//! 1. Scan     images/game/  →  Catalog          (filesystem → paths by category)
//! 2. Format   Catalog       →  Manifest         (paths → site URLs)
//! 3. Write    Manifest      →  js/image-list.json
//! ```
//!
//! Scan and format are pure with respect to the output file, so `check` runs
//! them without writing anything.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Walks the root, classifies entries, collects questions and answers |
//! | [`paths`] | Filesystem path → `/`-rooted URL, category keys |
//! | [`manifest`] | Manifest types (flat and structured) and [`manifest::build_manifest`] |
//! | [`writer`] | Pretty JSON output and read-back validation |
//! | [`config`] | `image-list.toml` loading, merging, and validation |
//! | [`placeholder`] | Default image directory and README |
//! | [`output`] | CLI output formatting |
//! | [`logging`] | `env_logger` setup |
//!
//! # Manifest Shapes
//!
//! Structured (default):
//!
//! ```json
//! {
//!   "people/photo": {
//!     "questions": ["/images/game/people/photo/001.jpg"],
//!     "answers": { "001": "/images/game/people/photo/answer/001.jpg" }
//!   }
//! }
//! ```
//!
//! Flat, for sites that have no answers. Answer folders are then ordinary
//! categories:
//!
//! ```json
//! { "people/photo": ["/images/game/people/photo/001.jpg"] }
//! ```
//!
//! # GitHub Pages
//!
//! Project sites are served below `/<repository>/`. Setting
//! `repository_name` (or passing `--repo`) prefixes every URL with it; root
//! domain sites leave it unset.

pub mod config;
pub mod logging;
pub mod manifest;
pub mod output;
pub mod paths;
pub mod placeholder;
pub mod scan;
pub mod writer;

#[cfg(test)]
pub(crate) mod test_helpers;
