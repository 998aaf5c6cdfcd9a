//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Each image is shown by its position in the gallery and its filename.
//! Paths are shown relative to the output directory where possible, so the
//! output reads as an inventory of the generated site.
//!
//! # Output Format
//!
//! ## Build
//!
//! ```text
//! Found 3 images
//! Ordered by aspect ratio
//! Images
//!     001 square.png → img/square.png
//!     002 wide.jpg → img/wide.jpg
//!     003 tall.jpg → img/tall.jpg
//! Thumbnails
//!     001 square.png → thumbnails/thumb_square.png
//!     ...
//! Page → index.html
//!
//! Generated 3 images, 3 thumbnails → webpage/index.html
//! ```
//!
//! ## Check
//!
//! ```text
//! 001 square.png
//!     Source: /photos/square.png
//! 002 wide.jpg
//!     Source: /photos/wide.jpg
//!
//! 2 images
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::pipeline::{BuildEvent, BuildReport, ImageClass};
use std::path::Path;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// `path` relative to `root` when it lives under it, as given otherwise.
fn display_relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

// ============================================================================
// Build output
// ============================================================================

/// Format a single build progress event as display lines.
///
/// The first image of each class is preceded by a section header.
pub fn format_build_event(event: &BuildEvent, output_root: &Path) -> Vec<String> {
    match event {
        BuildEvent::Discovered { count } => vec![format!("Found {}", plural(*count, "image"))],
        BuildEvent::Ordered { .. } => vec!["Ordered by aspect ratio".to_string()],
        BuildEvent::ImageWritten {
            index,
            class,
            source,
            output,
            ..
        } => {
            let mut lines = Vec::new();
            if *index == 0 {
                lines.push(
                    match class {
                        ImageClass::Full => "Images",
                        ImageClass::Thumbnail => "Thumbnails",
                    }
                    .to_string(),
                );
            }
            lines.push(format!(
                "{}{} {} \u{2192} {}",
                indent(1),
                format_index(index + 1),
                file_name(source),
                display_relative(output, output_root)
            ));
            lines
        }
        BuildEvent::PageWritten { path } => {
            vec![format!(
                "Page \u{2192} {}",
                display_relative(path, output_root)
            )]
        }
    }
}

/// Format the closing summary of a successful build.
pub fn format_build_summary(report: &BuildReport) -> Vec<String> {
    let mut counts = plural(report.images.len(), "image");
    if !report.thumbnails.is_empty() {
        counts.push_str(&format!(", {}", plural(report.thumbnails.len(), "thumbnail")));
    }
    vec![
        String::new(),
        format!("Generated {} \u{2192} {}", counts, report.page.display()),
    ]
}

/// Print build summary to stdout.
pub fn print_build_summary(report: &BuildReport) {
    for line in format_build_summary(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Check output
// ============================================================================

/// Format the gallery order found by `check`.
pub fn format_check_output<P: AsRef<Path>>(ordered: &[P]) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, path) in ordered.iter().enumerate() {
        let path = path.as_ref();
        lines.push(format!("{} {}", format_index(i + 1), file_name(path)));
        lines.push(format!("{}Source: {}", indent(1), path.display()));
    }
    if !ordered.is_empty() {
        lines.push(String::new());
    }
    lines.push(plural(ordered.len(), "image"));
    lines
}

/// Print check output to stdout.
pub fn print_check_output<P: AsRef<Path>>(ordered: &[P]) {
    for line in format_check_output(ordered) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
