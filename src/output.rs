//! CLI output formatting for the authoring commands.
//!
//! Output is **information-centric**: every card leads with its positional
//! index and caption, the way it reads on the page, with the asset that
//! backs it shown as indented context.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! 001 No. 07 — Harbor
//!     Preview: ./images/project-07.png (1600×900)
//!     Skipped: 1 candidate
//! 002 No. 00 — Draft
//!     Skipped: no project number
//! 003 No. 12 — Kiln
//!     No preview (5 candidates tried)
//!
//! Resolved 1 of 3 cards
//! ```
//!
//! ## Render
//!
//! ```text
//! Gallery → dist/index.html
//!     3 cards in 3 columns
//!     Assets: ./images/project-NN.{jpg,jpeg,png,webp,pdf}
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::config::GalleryConfig;
use crate::naming::AssetKind;
use crate::resolver::CardReport;
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

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

// ============================================================================
// Check output
// ============================================================================

/// Format the offline resolution report, one entry per catalog card.
pub fn format_check_output(reports: &[CardReport]) -> Vec<String> {
    let mut lines = Vec::new();

    for (i, report) in reports.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), report.caption));
        lines.extend(card_context(report));
    }

    if !reports.is_empty() {
        lines.push(String::new());
    }
    let resolved = reports.iter().filter(|r| r.is_resolved()).count();
    lines.push(format!(
        "Resolved {} of {}",
        resolved,
        plural(reports.len(), "card")
    ));

    lines
}

fn card_context(report: &CardReport) -> Vec<String> {
    let ctx = indent(1);
    let Some(resolution) = &report.resolution else {
        return vec![format!("{}Skipped: no project number", ctx)];
    };

    let mut lines = Vec::new();
    match &resolution.resolved {
        Some(candidate) => {
            let detail = match (candidate.kind(), report.preview.as_ref().and_then(|p| p.natural_size)) {
                (AssetKind::Image, Some((w, h))) => format!(" ({}\u{00d7}{})", w, h),
                (AssetKind::Document, _) => " (document)".to_string(),
                _ => String::new(),
            };
            lines.push(format!("{}Preview: {}{}", ctx, candidate.src(), detail));
            if resolution.failures > 0 {
                lines.push(format!(
                    "{}Skipped: {}",
                    ctx,
                    plural(resolution.failures, "candidate")
                ));
            }
        }
        None => lines.push(format!(
            "{}No preview ({} tried)",
            ctx,
            plural(resolution.failures, "candidate")
        )),
    }
    lines
}

/// Print the check report to stdout.
pub fn print_check_output(reports: &[CardReport]) {
    for line in format_check_output(reports) {
        println!("{}", line);
    }
}

// ============================================================================
// Render output
// ============================================================================

/// Format the summary printed after the page scaffold is written.
pub fn format_render_output(config: &GalleryConfig, page_path: &Path) -> Vec<String> {
    let ctx = indent(1);
    vec![
        format!("{} \u{2192} {}", config.page.title, page_path.display()),
        format!(
            "{}{} in {}",
            ctx,
            plural(config.cards.len(), "card"),
            plural(config.page.columns as usize, "column")
        ),
        format!(
            "{}Assets: {}/project-NN.{{{}}}",
            ctx,
            config.asset_dir.trim_end_matches('/'),
            config.extensions.join(",")
        ),
    ]
}

/// Print the render summary to stdout.
pub fn print_render_output(config: &GalleryConfig, page_path: &Path) {
    for line in format_render_output(config, page_path) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
