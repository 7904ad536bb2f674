//! Poem page builder.
//!
//! Each poem gets one self-contained HTML page named after its source file:
//!
//! ```text
//! src/2024.01.05_1_morning-light.txt  →  2024.01.05_1_morning-light.html
//! ```
//!
//! The page does not inline the poem. A small script fetches
//! `/src/<source basename>` when the page is viewed, so editing the text of a
//! poem never requires regenerating its page.
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! All interpolated text is escaped.

use crate::config::SiteConfig;
use crate::error::ValidationError;
use crate::naming::{self, display_title};
use crate::types::PageArtifact;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Site subdirectory holding copied poem sources, also their URL prefix.
pub const SOURCE_DIR: &str = "src";

const LOADER_JS: &str = include_str!("../static/poem.js");

/// Derive the page for a source filename.
///
/// The output filename always mirrors the source name; `title_override` only
/// changes the displayed title.
pub fn build_page(
    source_filename: &str,
    title_override: Option<&str>,
) -> Result<PageArtifact, ValidationError> {
    let parsed = naming::parse_poem_filename(source_filename)?;
    let output_filename = parsed.page_filename();
    Ok(PageArtifact {
        source_basename: source_filename.to_string(),
        output_filename,
        title: title_override
            .map(str::to_string)
            .unwrap_or_else(|| parsed.title.clone()),
        date: parsed.date,
    })
}

/// Absolute URL the page fetches its poem text from.
pub fn source_url(source_basename: &str) -> String {
    format!("/{}/{}", SOURCE_DIR, encode_path_segment(source_basename))
}

/// Write the page to `<dest_dir>/<output_filename>`.
pub fn write_page(page: &PageArtifact, site: &SiteConfig, dest_dir: &Path) -> io::Result<PathBuf> {
    let path = dest_dir.join(&page.output_filename);
    fs::write(&path, render_page(page, site).into_string())?;
    Ok(path)
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure shared by pages and the index.
pub(crate) fn base_document(title: &str, stylesheet: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                link rel="stylesheet" href=(stylesheet);
                title { (title) }
            }
            body {
                (content)
            }
        }
    }
}

/// Renders a single poem page.
pub fn render_page(page: &PageArtifact, site: &SiteConfig) -> Markup {
    let title = display_title(&page.title);

    let content = html! {
        header.poem-header {
            a.back href="index.html" { "← " (site.title) }
            h1 { (title) }
            p.poem-date { (page.date) }
        }
        main {
            div #poem.poem data-src=(source_url(&page.source_basename)) {}
        }
        script { (PreEscaped(LOADER_JS)) }
    };

    base_document(&title, &site.stylesheet, content)
}

/// Percent-encode everything outside the RFC 3986 unreserved set.
pub(crate) fn encode_path_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
