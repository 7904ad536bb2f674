//! Static site generation.
//!
//! Resolves a configuration, loads its poems, and writes the site:
//!
//! ```text
//! dest/
//! ├── index.html                          # Table of contents, catalog order
//! ├── styles.css                          # Bundled stylesheet (only if absent)
//! ├── 2024.01.05_1_morning-light.html     # One page per poem
//! └── src/
//!     └── 2024.01.05_1_morning-light.txt  # Copied poem sources
//! ```
//!
//! ## Failure policy
//!
//! The run aborts only when the configuration cannot be resolved, its store
//! cannot be read, or the destination directories or index cannot be written.
//! Everything that goes wrong with a single poem (bad filename, missing source,
//! failed copy) skips that poem with a warning and the batch continues.
//!
//! ## Reproducibility
//!
//! Output contains nothing time- or run-dependent. Source copies whose content
//! already matches (by SHA-256) are left untouched, and the bundled stylesheet
//! is never overwritten, so regenerating unchanged inputs yields byte-identical
//! files.

use crate::config::{SiteConfig, ToolConfig};
use crate::error::{EntityKind, Error, Result};
use crate::index;
use crate::naming::basename;
use crate::page::{self, SOURCE_DIR};
use crate::poem_store::PoemStore;
use crate::registry::ConfigStore;
use crate::types::{ConfigSelector, ConfigurationRecord, PageArtifact, PoemRecord, SiteOrder};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const STYLESHEET_FILENAME: &str = "styles.css";
const STYLESHEET: &str = include_str!("../static/styles.css");

/// A poem left out of the site, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedPoem {
    pub filepath: String,
    pub reason: String,
}

/// Outcome of one generation run.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateReport {
    pub configuration: ConfigurationRecord,
    pub destination: PathBuf,
    /// Pages written, in index order.
    pub pages: Vec<PageArtifact>,
    pub skipped: Vec<SkippedPoem>,
    pub copies: CopyStats,
    /// True if the bundled stylesheet was written on this run.
    pub stylesheet_written: bool,
}

/// Generate the site for the selected configuration into `dest`.
pub fn generate_site(
    config: &ToolConfig,
    selector: ConfigSelector<'_>,
    dest: &Path,
    order: SiteOrder,
) -> Result<GenerateReport> {
    let registry = ConfigStore::open(config.store_paths())?;
    let configuration = registry.resolve(selector)?;
    generate_configuration(&configuration, &config.site, dest, order)
}

/// Generate the site for an already-resolved configuration.
pub fn generate_configuration(
    configuration: &ConfigurationRecord,
    site: &SiteConfig,
    dest: &Path,
    order: SiteOrder,
) -> Result<GenerateReport> {
    let src_dir = dest.join(SOURCE_DIR);
    fs::create_dir_all(&src_dir)?;

    let mut records = PoemStore::open(configuration).list()?;
    if order == SiteOrder::Chronological {
        // Stable: poems sharing a date keep catalog order.
        records.sort_by(|a, b| a.date.cmp(&b.date));
    }

    let mut pages = Vec::with_capacity(records.len());
    let mut skipped = Vec::new();
    let mut copies = CopyStats::default();
    let mut claimed: HashMap<String, String> = HashMap::new();

    for record in &records {
        match build_poem(record, site, dest, &src_dir, &mut claimed, &mut copies) {
            Ok(page) => pages.push(page),
            Err(e) => {
                tracing::warn!(filepath = %record.filepath, error = %e, "skipping poem");
                skipped.push(SkippedPoem {
                    filepath: record.filepath.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    let stylesheet_written = site.write_stylesheet && write_stylesheet_if_absent(dest)?;
    index::write_index(&pages, site, dest)?;

    tracing::info!(
        configuration = %configuration.name,
        pages = pages.len(),
        skipped = skipped.len(),
        "generated site at {}",
        dest.display()
    );

    Ok(GenerateReport {
        configuration: configuration.clone(),
        destination: dest.to_path_buf(),
        pages,
        skipped,
        copies,
        stylesheet_written,
    })
}

/// Build, copy, and write one poem's page.
///
/// `claimed` maps source basenames already used in this run to the filepath
/// that claimed them; a second poem with the same basename would overwrite the
/// first one's page and source copy, so it is rejected.
fn build_poem(
    record: &PoemRecord,
    site: &SiteConfig,
    dest: &Path,
    src_dir: &Path,
    claimed: &mut HashMap<String, String>,
    copies: &mut CopyStats,
) -> Result<PageArtifact> {
    let name = basename(&record.filepath);
    let page = page::build_page(name, Some(&record.title))?;

    if let Some(owner) = claimed.get(name) {
        return Err(Error::duplicate(
            EntityKind::SourceFile,
            format!("{} (already generated from {})", name, owner),
        ));
    }

    let source = Path::new(&record.filepath);
    if !source.is_file() {
        return Err(Error::not_found(EntityKind::SourceFile, &record.filepath));
    }

    let outcome = copy_source(source, &src_dir.join(name))?;
    tracing::debug!(source = %record.filepath, ?outcome, "source copy");
    copies.record(outcome);

    page::write_page(&page, site, dest)?;
    claimed.insert(name.to_string(), record.filepath.clone());
    Ok(page)
}

// ============================================================================
// Source copying
// ============================================================================

/// What happened to one source file during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    /// Written to the site's source directory.
    Copied,
    /// Destination already had identical content.
    Unchanged,
    /// Source already lives at the destination path.
    InPlace,
}

/// Copy `source` to `target` unless they are the same file or already match.
pub fn copy_source(source: &Path, target: &Path) -> io::Result<CopyOutcome> {
    if is_same_file(source, target) {
        return Ok(CopyOutcome::InPlace);
    }
    if target.is_file() && hash_file(source)? == hash_file(target)? {
        return Ok(CopyOutcome::Unchanged);
    }
    fs::copy(source, target)?;
    Ok(CopyOutcome::Copied)
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// SHA-256 hash of a file's contents, returned as a hex string.
pub fn hash_file(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    let digest = Sha256::digest(&bytes);
    Ok(format!("{:x}", digest))
}

fn write_stylesheet_if_absent(dest: &Path) -> io::Result<bool> {
    let path = dest.join(STYLESHEET_FILENAME);
    if path.exists() {
        return Ok(false);
    }
    fs::write(path, STYLESHEET)?;
    Ok(true)
}

/// Summary of source copying for a generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CopyStats {
    pub copied: u32,
    pub unchanged: u32,
    pub in_place: u32,
}

impl CopyStats {
    pub fn record(&mut self, outcome: CopyOutcome) {
        match outcome {
            CopyOutcome::Copied => self.copied += 1,
            CopyOutcome::Unchanged => self.unchanged += 1,
            CopyOutcome::InPlace => self.in_place += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.copied + self.unchanged + self.in_place
    }
}

impl fmt::Display for CopyStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unchanged == 0 && self.in_place == 0 {
            return write!(f, "{} copied", self.copied);
        }
        write!(f, "{} copied, {} unchanged", self.copied, self.unchanged)?;
        if self.in_place > 0 {
            write!(f, ", {} in place", self.in_place)?;
        }
        write!(f, " ({} total)", self.total())
    }
}
