//! Build configuration.
//!
//! Handles loading, validating, and merging `image-list.toml`. Stock defaults
//! are overridden by the user's config file, which is in turn overridden by
//! command-line flags.
//!
//! ## Config File Location
//!
//! The config file is optional and lives in the project directory (the
//! directory the site is served from):
//!
//! ```text
//! site/
//! ├── image-list.toml          # Build config (optional)
//! ├── images/
//! │   ├── default.jpg          # Placeholder image
//! │   └── game/                # Scan root
//! │       ├── people/
//! │       │   ├── 001.jpg      # Question image
//! │       │   └── answer/
//! │       │       └── 001.jpg  # Answer for 001
//! │       └── brands/
//! └── js/
//!     └── image-list.json      # Generated manifest
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! root_dir = "images/game"          # Directory to scan
//! output_file = "js/image-list.json"
//! base_path = "."                   # Stripped from paths to form URLs
//! # repository_name = "my-repo"     # GitHub Pages project prefix
//!
//! [scan]
//! image_extensions = [".jpg", ".jpeg", ".png", ".gif", ".webp"]
//! include_subdirectories = true
//! answer_folder = "answer"
//!
//! [output]
//! mode = "structured"               # or "flat"
//! sort = true
//! validate = true
//!
//! [placeholder]
//! enabled = true
//! dir = "images"
//! ```
//!
//! Relative paths are resolved against the project directory. Unknown keys
//! are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the config file looked up in the project directory.
pub const CONFIG_FILE_NAME: &str = "image-list.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config file not found: {0}")]
    Missing(PathBuf),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Manifest build configuration loaded from `image-list.toml`.
///
/// All fields have defaults matching the conventional site layout. User
/// config files need only specify the values they want to override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ManifestConfig {
    /// Directory to scan for images.
    pub root_dir: PathBuf,
    /// Where the JSON manifest is written.
    pub output_file: PathBuf,
    /// Directory stripped from every image path to form its URL.
    pub base_path: PathBuf,
    /// GitHub Pages repository name for project sites (`/<repo>/...` URLs).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository_name: Option<String>,
    /// Directory walking settings.
    pub scan: ScanConfig,
    /// Manifest shape and post-write checks.
    pub output: OutputConfig,
    /// Default placeholder setup.
    pub placeholder: PlaceholderConfig,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("images/game"),
            output_file: PathBuf::from("js/image-list.json"),
            base_path: PathBuf::from("."),
            repository_name: None,
            scan: ScanConfig::default(),
            output: OutputConfig::default(),
            placeholder: PlaceholderConfig::default(),
        }
    }
}

impl ManifestConfig {
    /// Validate config values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scan.image_extensions.is_empty() {
            return Err(ConfigError::Validation(
                "scan.image_extensions must not be empty".into(),
            ));
        }
        if self
            .scan
            .image_extensions
            .iter()
            .any(|e| e.trim_start_matches('.').is_empty())
        {
            return Err(ConfigError::Validation(
                "scan.image_extensions entries must not be empty".into(),
            ));
        }
        let answer = self.scan.answer_folder.as_str();
        if answer.is_empty() || answer.contains(['/', '\\']) || answer == "." || answer == ".." {
            return Err(ConfigError::Validation(format!(
                "scan.answer_folder must be a plain directory name, got {answer:?}"
            )));
        }
        if let Some(repo) = self.repository_name()
            && repo.contains(['/', '\\'])
        {
            return Err(ConfigError::Validation(format!(
                "repository_name must be a single path segment, got {repo:?}"
            )));
        }
        Ok(())
    }

    /// Repository prefix with surrounding slashes trimmed, or `None` when
    /// unset or blank.
    pub fn repository_name(&self) -> Option<&str> {
        self.repository_name
            .as_deref()
            .map(|r| r.trim().trim_matches('/'))
            .filter(|r| !r.is_empty())
    }

    /// Resolve every relative path against `project_dir`.
    ///
    /// Absolute paths are left untouched (`Path::join` replaces the base).
    pub fn anchored(mut self, project_dir: &Path) -> Self {
        self.root_dir = project_dir.join(&self.root_dir);
        self.output_file = project_dir.join(&self.output_file);
        self.base_path = project_dir.join(&self.base_path);
        self.placeholder.dir = project_dir.join(&self.placeholder.dir);
        self
    }
}

/// Directory walking settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    /// Allow-listed extensions, matched case-insensitively. The leading dot
    /// is optional.
    pub image_extensions: Vec<String>,
    /// Recurse into sub-directories. When false only the root is collected.
    pub include_subdirectories: bool,
    /// Reserved directory name whose images are answers for the parent.
    pub answer_folder: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            image_extensions: [".jpg", ".jpeg", ".png", ".gif", ".webp"]
                .iter()
                .map(|e| e.to_string())
                .collect(),
            include_subdirectories: true,
            answer_folder: "answer".to_string(),
        }
    }
}

impl ScanConfig {
    /// Extensions lowercased with the leading dot removed (`".JPG"` → `"jpg"`).
    pub fn normalized_extensions(&self) -> Vec<String> {
        self.image_extensions
            .iter()
            .map(|e| e.trim().trim_start_matches('.').to_lowercase())
            .collect()
    }
}

/// Shape of the emitted manifest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManifestMode {
    /// `{ category: [url, ...] }`, answer folders are ordinary categories.
    Flat,
    /// `{ category: { questions: [url, ...], answers: { id: url } } }`.
    #[default]
    Structured,
}

/// Manifest shape and post-write checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub mode: ManifestMode,
    /// Sort question lists by URL. Without it, lists follow filesystem
    /// enumeration order.
    pub sort: bool,
    /// Read the written file back and check it parses as JSON.
    pub validate: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            mode: ManifestMode::default(),
            sort: true,
            validate: true,
        }
    }
}

/// Placeholder setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlaceholderConfig {
    pub enabled: bool,
    /// Directory expected to hold `default.jpg`.
    pub dir: PathBuf,
}

impl Default for PlaceholderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: PathBuf::from("images"),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged on top of.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(ManifestConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, then deserialize and
/// validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<ManifestConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ManifestConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the build config for a project.
///
/// With `explicit` set, that file must exist. Otherwise `image-list.toml` in
/// `project_dir` is used when present and stock defaults when not.
pub fn load_config(
    project_dir: &Path,
    explicit: Option<&Path>,
) -> Result<ManifestConfig, ConfigError> {
    let overlay = match explicit {
        Some(path) => Some(
            load_raw_config(path)?.ok_or_else(|| ConfigError::Missing(path.to_path_buf()))?,
        ),
        None => load_raw_config(&project_dir.join(CONFIG_FILE_NAME))?,
    };
    resolve_config(overlay)
}

/// Returns a fully-commented stock `image-list.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# image-list configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Relative paths are resolved against
# the project directory (--project-dir, default: current directory).
#
# Unknown keys will cause an error.

# Directory scanned for images. Each sub-directory becomes a category.
root_dir = "images/game"

# Where the JSON manifest is written (overwritten on every run).
output_file = "js/image-list.json"

# Stripped from every image path to form its URL:
#   <base_path>/images/game/people/001.jpg -> /images/game/people/001.jpg
base_path = "."

# GitHub Pages repository name for project sites served from
# https://<user>.github.io/<repository_name>. Leave unset for a root domain.
# Can also be set per run with --repo <name>.
# repository_name = "my-repo"

# ---------------------------------------------------------------------------
# Scanning
# ---------------------------------------------------------------------------
[scan]
# Allow-listed extensions, matched case-insensitively.
image_extensions = [".jpg", ".jpeg", ".png", ".gif", ".webp"]

# Recurse into sub-directories. When false only the root is collected.
include_subdirectories = true

# Images inside a directory with this name are answers for the parent
# category, keyed by file name without extension.
answer_folder = "answer"

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------
[output]
# "structured": { category: { questions: [...], answers: { id: url } } }
# "flat":       { category: [url, ...] } (answer folders are plain categories)
mode = "structured"

# Sort question lists by URL instead of filesystem order.
sort = true

# Read the manifest back after writing and check it parses.
validate = true

# ---------------------------------------------------------------------------
# Placeholder
# ---------------------------------------------------------------------------
[placeholder]
# Create the placeholder directory and a README.txt explaining where
# default.jpg goes when it is missing.
enabled = true
dir = "images"
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_paths() {
        let config = ManifestConfig::default();
        assert_eq!(config.root_dir, PathBuf::from("images/game"));
        assert_eq!(config.output_file, PathBuf::from("js/image-list.json"));
        assert_eq!(config.base_path, PathBuf::from("."));
        assert_eq!(config.repository_name, None);
    }

    #[test]
    fn default_config_scan_settings() {
        let config = ManifestConfig::default();
        assert_eq!(
            config.scan.image_extensions,
            vec![".jpg", ".jpeg", ".png", ".gif", ".webp"]
        );
        assert!(config.scan.include_subdirectories);
        assert_eq!(config.scan.answer_folder, "answer");
        assert_eq!(config.output.mode, ManifestMode::Structured);
        assert!(config.output.sort);
    }

    #[test]
    fn normalized_extensions_strip_dot_and_lowercase() {
        let scan = ScanConfig {
            image_extensions: vec![".JPG".into(), "png".into(), " .WebP".into()],
            ..ScanConfig::default()
        };
        assert_eq!(scan.normalized_extensions(), vec!["jpg", "png", "webp"]);
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
repository_name = "quiz"

[output]
mode = "flat"
"#;
        let config: ManifestConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.repository_name.as_deref(), Some("quiz"));
        assert_eq!(config.output.mode, ManifestMode::Flat);
        // Defaults preserved
        assert!(config.output.sort);
        assert_eq!(config.root_dir, PathBuf::from("images/game"));
    }

    #[test]
    fn unknown_keys_rejected() {
        let result: Result<ManifestConfig, _> = toml::from_str("colour = \"red\"");
        assert!(result.is_err());
    }

    #[test]
    fn repository_name_trimmed() {
        let config = ManifestConfig {
            repository_name: Some("/my-repo/".into()),
            ..ManifestConfig::default()
        };
        assert_eq!(config.repository_name(), Some("my-repo"));
    }

    #[test]
    fn blank_repository_name_is_none() {
        let config = ManifestConfig {
            repository_name: Some("  ".into()),
            ..ManifestConfig::default()
        };
        assert_eq!(config.repository_name(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn nested_repository_name_invalid() {
        let config = ManifestConfig {
            repository_name: Some("org/repo".into()),
            ..ManifestConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn empty_extensions_invalid() {
        let mut config = ManifestConfig::default();
        config.scan.image_extensions.clear();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));

        config.scan.image_extensions = vec![".".into()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn answer_folder_must_be_plain_name() {
        let mut config = ManifestConfig::default();
        config.scan.answer_folder = "a/b".into();
        assert!(config.validate().is_err());

        config.scan.answer_folder = String::new();
        assert!(config.validate().is_err());

        config.scan.answer_folder = "solutions".into();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn anchored_joins_relative_paths() {
        let config = ManifestConfig::default().anchored(Path::new("/srv/site"));
        assert_eq!(config.root_dir, PathBuf::from("/srv/site/images/game"));
        assert_eq!(
            config.output_file,
            PathBuf::from("/srv/site/js/image-list.json")
        );
        assert_eq!(config.placeholder.dir, PathBuf::from("/srv/site/images"));
    }

    #[test]
    fn anchored_keeps_absolute_paths() {
        let config = ManifestConfig {
            root_dir: PathBuf::from("/data/images"),
            ..ManifestConfig::default()
        }
        .anchored(Path::new("/srv/site"));
        assert_eq!(config.root_dir, PathBuf::from("/data/images"));
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path(), None).unwrap();
        assert_eq!(config, ManifestConfig::default());
    }

    #[test]
    fn load_config_reads_project_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE_NAME),
            r#"
root_dir = "pics"

[scan]
answer_folder = "solutions"
"#,
        )
        .unwrap();

        let config = load_config(tmp.path(), None).unwrap();
        assert_eq!(config.root_dir, PathBuf::from("pics"));
        assert_eq!(config.scan.answer_folder, "solutions");
        // Unspecified values should be defaults
        assert!(config.scan.include_subdirectories);
        assert_eq!(config.scan.image_extensions.len(), 5);
    }

    #[test]
    fn load_config_explicit_file_must_exist() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope.toml");
        let result = load_config(tmp.path(), Some(&missing));
        assert!(matches!(result, Err(ConfigError::Missing(_))));
    }

    #[test]
    fn load_config_explicit_file_wins_over_project_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE_NAME), "root_dir = \"a\"").unwrap();
        let explicit = tmp.path().join("other.toml");
        fs::write(&explicit, "root_dir = \"b\"").unwrap();

        let config = load_config(tmp.path(), Some(&explicit)).unwrap();
        assert_eq!(config.root_dir, PathBuf::from("b"));
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE_NAME), "this is not valid toml [[[").unwrap();
        let result = load_config(tmp.path(), None);
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_validates_after_merge() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE_NAME),
            "[scan]\nimage_extensions = []\n",
        )
        .unwrap();
        let result = load_config(tmp.path(), None);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("root_dir = \"a\"\nbase_path = \".\"").unwrap();
        let overlay: toml::Value = toml::from_str("root_dir = \"b\"").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["root_dir"].as_str(), Some("b"));
        assert_eq!(merged["base_path"].as_str(), Some("."));
    }

    #[test]
    fn merge_toml_nested_tables() {
        let base: toml::Value = toml::from_str("[output]\nsort = true\nvalidate = true").unwrap();
        let overlay: toml::Value = toml::from_str("[output]\nsort = false").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["output"]["sort"].as_bool(), Some(false));
        assert_eq!(merged["output"]["validate"].as_bool(), Some(true));
    }

    #[test]
    fn merge_toml_arrays_replaced_not_appended() {
        let base: toml::Value = toml::from_str("exts = [\"jpg\", \"png\"]").unwrap();
        let overlay: toml::Value = toml::from_str("exts = [\"gif\"]").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["exts"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn stock_config_toml_parses_to_defaults() {
        let config: ManifestConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, ManifestConfig::default());
    }
}
