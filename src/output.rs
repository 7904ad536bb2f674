//! CLI output formatting for every operation.
//!
//! # Information-First Display
//!
//! Output leads with what an entity *is* (its positional index and display
//! title) and shows where it lives as indented context lines. File paths are
//! secondary, so listings read like a table of contents.
//!
//! # Output Format
//!
//! ## Listing poems
//!
//! ```text
//! winter (2 poems)
//!     001 morning light
//!         Date: 2024.01.05
//!         Id: 0b6f…
//!         Source: poems/2024.01.05_1_morning-light.txt
//!     002 (2024.01.06_1_.txt)
//!         ...
//! ```
//!
//! ## Generate
//!
//! ```text
//! winter → site
//!     001 morning light → 2024.01.05_1_morning-light.html
//!     002 first snow → 2024.01.06_1_first-snow.html
//!     Index → index.html
//!
//! Skipped
//!     poems/notes.txt
//!         filename does not match <YYYY.MM.DD>_<N>_<title>.txt: notes.txt
//!
//! Sources: 1 copied, 1 unchanged (2 total)
//! Generated 2 pages
//! ```
//!
//! # Architecture
//!
//! Each operation has a `format_*` function returning `Vec<String>` for
//! testability; [`print_lines`] writes them to stdout. Format functions are
//! pure: no I/O, no side effects.

use crate::api::{ImportReport, PoemListing};
use crate::generate::GenerateReport;
use crate::index::INDEX_FILENAME;
use crate::naming::{basename, display_title};
use crate::types::{ConfigurationRecord, MatchedBy, PoemRecord, RemovedPoem};

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Format a poem line: titled poems show their display title, untitled ones
/// show the source filename in parens.
///
/// ```text
/// 001 morning light
/// 002 (2024.01.06_1_.txt)
/// ```
fn poem_line(index: usize, title: &str, filepath: &str) -> String {
    if title.is_empty() {
        format!("{} ({})", format_index(index), basename(filepath))
    } else {
        format!("{} {}", format_index(index), display_title(title))
    }
}

fn poem_count(n: usize) -> String {
    match n {
        1 => "1 poem".to_string(),
        n => format!("{} poems", n),
    }
}

fn poem_context(record: &PoemRecord, depth: usize) -> Vec<String> {
    let pad = indent(depth);
    vec![
        format!("{}Date: {}", pad, record.date),
        format!("{}Id: {}", pad, record.id),
        format!("{}Source: {}", pad, record.filepath),
    ]
}

fn matched_by_label(matched_by: MatchedBy) -> &'static str {
    match matched_by {
        MatchedBy::Id => "id",
        MatchedBy::Title => "title",
        MatchedBy::Filepath => "filepath",
        MatchedBy::Basename => "filename",
    }
}

// ============================================================================
// Configurations
// ============================================================================

pub fn format_config_list(configs: &[ConfigurationRecord]) -> Vec<String> {
    if configs.is_empty() {
        return vec!["No saved configurations".to_string()];
    }
    let mut lines = Vec::with_capacity(configs.len() * 2);
    for (i, config) in configs.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), config.name));
        lines.push(format!("{}Store: {}", indent(1), config.backing_file.display()));
    }
    lines
}

pub fn format_config_added(config: &ConfigurationRecord) -> Vec<String> {
    vec![
        format!("Added configuration {}", config.name),
        format!("{}Store: {}", indent(1), config.backing_file.display()),
    ]
}

pub fn format_config_removed(config: &ConfigurationRecord) -> Vec<String> {
    vec![
        format!("Removed configuration {}", config.name),
        format!("{}Deleted: {}", indent(1), config.backing_file.display()),
    ]
}

// ============================================================================
// Poems
// ============================================================================

pub fn format_poem_list(listing: &PoemListing) -> Vec<String> {
    let mut lines = vec![format!(
        "{} ({})",
        listing.configuration.name,
        poem_count(listing.poems.len())
    )];
    for (i, poem) in listing.poems.iter().enumerate() {
        lines.push(format!(
            "{}{}",
            indent(1),
            poem_line(i + 1, &poem.title, &poem.filepath)
        ));
        lines.extend(poem_context(poem, 2));
    }
    lines
}

pub fn format_poem_added(config: &ConfigurationRecord, poem: &PoemRecord) -> Vec<String> {
    let mut lines = vec![format!(
        "Added \"{}\" to {}",
        display_title(&poem.title),
        config.name
    )];
    lines.extend(poem_context(poem, 1));
    lines
}

pub fn format_poem_removed(config: &ConfigurationRecord, removed: &RemovedPoem) -> Vec<String> {
    let mut lines = vec![format!(
        "Removed \"{}\" from {} (matched by {})",
        display_title(&removed.record.title),
        config.name,
        matched_by_label(removed.matched_by)
    )];
    lines.extend(poem_context(&removed.record, 1));
    lines
}

pub fn format_import_report(report: &ImportReport) -> Vec<String> {
    let mut lines = vec![format!(
        "Imported into {} ({})",
        report.configuration.name,
        poem_count(report.added.len())
    )];
    for (i, poem) in report.added.iter().enumerate() {
        lines.push(format!(
            "{}{}",
            indent(1),
            poem_line(i + 1, &poem.title, &poem.filepath)
        ));
        lines.push(format!("{}Source: {}", indent(2), poem.filepath));
    }
    if !report.rejected.is_empty() {
        lines.push(String::new());
        lines.push("Not imported".to_string());
        for file in &report.rejected {
            lines.push(format!("{}{}", indent(1), file.path.display()));
            lines.push(format!("{}{}", indent(2), file.reason));
        }
    }
    lines
}

// ============================================================================
// Generate
// ============================================================================

pub fn format_generate_report(report: &GenerateReport) -> Vec<String> {
    let mut lines = vec![format!(
        "{} \u{2192} {}",
        report.configuration.name,
        report.destination.display()
    )];

    for (i, page) in report.pages.iter().enumerate() {
        lines.push(format!(
            "{}{} \u{2192} {}",
            indent(1),
            poem_line(i + 1, &page.title, &page.source_basename),
            page.output_filename
        ));
    }
    lines.push(format!("{}Index \u{2192} {}", indent(1), INDEX_FILENAME));

    if !report.skipped.is_empty() {
        lines.push(String::new());
        lines.push("Skipped".to_string());
        for skipped in &report.skipped {
            lines.push(format!("{}{}", indent(1), skipped.filepath));
            lines.push(format!("{}{}", indent(2), skipped.reason));
        }
    }

    lines.push(String::new());
    lines.push(format!("Sources: {}", report.copies));
    if report.stylesheet_written {
        lines.push("Stylesheet: styles.css written".to_string());
    }
    lines.push(match report.pages.len() {
        1 => "Generated 1 page".to_string(),
        n => format!("Generated {} pages", n),
    });
    lines
}

/// Print formatted lines to stdout.
pub fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
