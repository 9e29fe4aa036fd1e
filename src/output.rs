//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Deployment
//!
//! ```text
//! Deployment
//!     Project site: https://<user>.github.io/quiz
//!     URL prefix: /quiz/
//! ```
//!
//! ## Build
//!
//! ```text
//! Categories
//! 001 . (1 image)
//!     /images/game/cover.png
//! 002 people/photo (2 images, 2 answers)
//!     /images/game/people/photo/001.jpg
//!     /images/game/people/photo/002.JPEG
//!     Answers: 001, 002
//! 003 people/screenshot (5 images)
//!     /images/game/people/screenshot/a.webp
//!     /images/game/people/screenshot/b.gif
//!     /images/game/people/screenshot/c.png
//!     ... and 2 more
//!
//! Found 3 categories, 10 images → js/image-list.json
//! ```
//!
//! # Architecture
//!
//! Each section has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure and do no I/O.

use crate::manifest::Manifest;
use crate::placeholder::{DEFAULT_IMAGE_NAME, PlaceholderStatus, README_NAME};
use std::path::Path;

/// Sample URLs shown per category before collapsing into "... and N more".
const PREVIEW_COUNT: usize = 3;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn count(n: usize, singular: &str, plural: &str) -> String {
    if n == 1 {
        format!("{n} {singular}")
    } else {
        format!("{n} {plural}")
    }
}

/// Category header: index, key, question count, and answer count if any.
///
/// ```text
/// 001 people/photo (2 images, 2 answers)
/// 002 . (1 image)
/// ```
fn category_header(index: usize, key: &str, questions: usize, answers: usize) -> String {
    let mut detail = count(questions, "image", "images");
    if answers > 0 {
        detail.push_str(&format!(", {}", count(answers, "answer", "answers")));
    }
    format!("{} {} ({})", format_index(index), key, detail)
}

// ============================================================================
// Deployment
// ============================================================================

/// Describe how URLs will be rooted on the published site.
pub fn format_deploy_info(repository_name: Option<&str>) -> Vec<String> {
    let mut lines = vec!["Deployment".to_string()];
    match repository_name {
        Some(repo) => {
            lines.push(format!("    Project site: https://<user>.github.io/{repo}"));
            lines.push(format!("    URL prefix: /{repo}/"));
        }
        None => {
            lines.push("    Root domain: https://<user>.github.io".to_string());
            lines.push("    URL prefix: /".to_string());
        }
    }
    lines
}

pub fn print_deploy_info(repository_name: Option<&str>) {
    for line in format_deploy_info(repository_name) {
        println!("{}", line);
    }
}

// ============================================================================
// Placeholder
// ============================================================================

/// Report placeholder setup. Empty when nothing needed doing.
pub fn format_placeholder_status(dir: &Path, status: &PlaceholderStatus) -> Vec<String> {
    let mut lines = Vec::new();
    if status.created_dir {
        lines.push(format!("Created {}/", dir.display()));
    }
    if status.created_readme {
        lines.push(format!(
            "No {DEFAULT_IMAGE_NAME} yet, see {}",
            dir.join(README_NAME).display()
        ));
    }
    lines
}

pub fn print_placeholder_status(dir: &Path, status: &PlaceholderStatus) {
    for line in format_placeholder_status(dir, status) {
        println!("{}", line);
    }
}

// ============================================================================
// Build
// ============================================================================

/// Format the manifest summary: every category with a short URL preview.
///
/// `output` is the file the manifest was written to, or `None` for a dry run.
pub fn format_build_output(manifest: &Manifest, output: Option<&Path>) -> Vec<String> {
    let mut lines = vec!["Categories".to_string()];

    for (i, category) in manifest.categories().iter().enumerate() {
        let answers = category.answers.map(|a| a.len()).unwrap_or(0);
        lines.push(category_header(
            i + 1,
            category.key,
            category.questions.len(),
            answers,
        ));

        for url in category.questions.iter().take(PREVIEW_COUNT) {
            lines.push(format!("    {}", url));
        }
        if category.questions.len() > PREVIEW_COUNT {
            lines.push(format!(
                "    ... and {} more",
                category.questions.len() - PREVIEW_COUNT
            ));
        }
        if let Some(answers) = category.answers
            && !answers.is_empty()
        {
            let ids: Vec<&str> = answers.keys().map(String::as_str).collect();
            lines.push(format!("    Answers: {}", ids.join(", ")));
        }
    }

    lines.push(String::new());
    let summary = format!(
        "Found {}, {}",
        count(manifest.len(), "category", "categories"),
        count(manifest.image_count(), "image", "images")
    );
    match output {
        Some(path) => lines.push(format!("{} \u{2192} {}", summary, path.display())),
        None => lines.push(summary),
    }
    lines
}

pub fn print_build_output(manifest: &Manifest, output: Option<&Path>) {
    for line in format_build_output(manifest, output) {
        println!("{}", line);
    }
}
