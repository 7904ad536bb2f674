//! Error taxonomy shared by the stores, the page builders, and the API.
//!
//! Every public operation returns [`Result`]. Lookup misses and duplicate adds
//! are ordinary values of [`Error`], not panics; the CLI decides how to print
//! them.

use crate::config::ConfigError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// What kind of thing a [`Error::NotFound`] or [`Error::Duplicate`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Configuration,
    Poem,
    SourceFile,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntityKind::Configuration => "configuration",
            EntityKind::Poem => "poem",
            EntityKind::SourceFile => "source file",
        };
        f.write_str(label)
    }
}

/// Input that fails a grammar or would corrupt the line format.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("filename does not match <YYYY.MM.DD>_<N>_<title>.txt: {0}")]
    Filename(String),
    #[error("invalid configuration name '{name}': {reason}")]
    ConfigName { name: String, reason: &'static str },
    #[error("invalid {field} '{value}': {reason}")]
    Field {
        field: &'static str,
        value: String,
        reason: &'static str,
    },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("{kind} not found: {name}")]
    NotFound { kind: EntityKind, name: String },
    #[error("{kind} already exists: {name}")]
    Duplicate { kind: EntityKind, name: String },
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// A mutation found a line it cannot parse and refused to rewrite the file.
    #[error("refusing to rewrite {}: unparseable line {line}: {content:?}", .path.display())]
    Corrupt {
        path: PathBuf,
        line: usize,
        content: String,
    },
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn not_found(kind: EntityKind, name: impl Into<String>) -> Self {
        Error::NotFound {
            kind,
            name: name.into(),
        }
    }

    pub(crate) fn duplicate(kind: EntityKind, name: impl Into<String>) -> Self {
        Error::Duplicate {
            kind,
            name: name.into(),
        }
    }

    /// True for lookup misses of any kind.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, Error::Duplicate { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
