//! Table-of-contents builder.
//!
//! Renders `index.html` with one row per page, in exactly the order the pages
//! are given. This module never sorts: callers that want chronological order
//! sort the poem records before building pages.

use crate::config::SiteConfig;
use crate::naming::display_title;
use crate::page::{base_document, encode_path_segment};
use crate::types::PageArtifact;
use maud::{Markup, html};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const INDEX_FILENAME: &str = "index.html";

/// Renders the index page listing every poem page.
pub fn render_index(pages: &[PageArtifact], site: &SiteConfig) -> Markup {
    let content = html! {
        header.index-header {
            h1 { (site.title) }
        }
        main {
            @if pages.is_empty() {
                p.empty { "No poems yet." }
            } @else {
                table.poem-index {
                    tbody {
                        @for page in pages {
                            tr {
                                td.poem-date { (page.date) }
                                td.poem-title {
                                    a href=(encode_path_segment(&page.output_filename)) {
                                        (display_title(&page.title))
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    };

    base_document(&site.title, &site.stylesheet, content)
}

/// Write `<dest_dir>/index.html`.
pub fn write_index(pages: &[PageArtifact], site: &SiteConfig, dest_dir: &Path) -> io::Result<PathBuf> {
    let path = dest_dir.join(INDEX_FILENAME);
    fs::write(&path, render_index(pages, site).into_string())?;
    Ok(path)
}
