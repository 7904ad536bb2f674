//! Records shared between the stores, the builders, and the CLI output.
//!
//! These types are the only data that crosses module boundaries. Stores own
//! their on-disk line format; everything above them works with these values.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A named collection of poems and the store file backing it.
///
/// `backing_file` is derived from `name` when the configuration is added and is
/// never chosen independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationRecord {
    pub name: String,
    pub backing_file: PathBuf,
}

/// One poem registered under a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoemRecord {
    /// Opaque token assigned at ingestion; never recomputed or reused.
    pub id: String,
    /// Canonical `YYYY.MM.DD`.
    pub date: String,
    pub title: String,
    /// Path to the source text, unique within a configuration.
    pub filepath: String,
}

/// A page derived from a poem filename. Recomputed on every generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageArtifact {
    pub source_basename: String,
    pub output_filename: String,
    pub date: String,
    pub title: String,
}

/// Which configuration an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSelector<'a> {
    Named(&'a str),
    /// The first configuration in registry order.
    First,
}

impl<'a> From<Option<&'a str>> for ConfigSelector<'a> {
    fn from(name: Option<&'a str>) -> Self {
        match name {
            Some(name) => ConfigSelector::Named(name),
            None => ConfigSelector::First,
        }
    }
}

/// Order in which poems are turned into pages and listed in the index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SiteOrder {
    /// Store order, passed through untouched.
    #[default]
    Catalog,
    /// Oldest first by date; poems sharing a date keep store order.
    Chronological,
}

/// Which field of a [`PoemRecord`] matched a removal identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchedBy {
    Id,
    Title,
    Filepath,
    Basename,
}

/// A poem removed from a store, with the field its identifier matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemovedPoem {
    pub record: PoemRecord,
    pub matched_by: MatchedBy,
}
