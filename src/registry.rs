//! Configuration registry.
//!
//! The registry is a single file, `<store dir>/_base.cfg` by default, with one
//! line per configuration:
//!
//! ```text
//! winter,config/winter.cfg
//! love-poems,config/love-poems.cfg
//! ```
//!
//! Line order is insertion order and is the order [`ConfigStore::list`] returns.
//! The first line is the implicit default configuration.
//!
//! ## Reads are lenient, rewrites are strict
//!
//! Lines that do not split into exactly two comma-separated fields are skipped
//! when listing. A removal, which rewrites the whole file, refuses to run if any
//! line is unparseable, so a damaged registry is never silently truncated.
//!
//! ## Cascade
//!
//! Removing a configuration rewrites the registry first and deletes the backing
//! store file second. An interruption in between leaves an orphaned store file,
//! never a registry line pointing at a deleted file.

use crate::config::StorePaths;
use crate::error::{EntityKind, Error, Result, ValidationError};
use crate::flatfile;
use crate::types::{ConfigSelector, ConfigurationRecord};
use std::fs;
use std::io;
use std::path::PathBuf;

const FIELD_COUNT: usize = 2;

/// Flat-file registry of configurations.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    paths: StorePaths,
}

impl ConfigStore {
    /// Open the registry, creating the store directory and an empty registry
    /// file if they do not exist yet.
    pub fn open(paths: StorePaths) -> Result<Self> {
        fs::create_dir_all(&paths.dir)?;
        let registry = paths.registry_file();
        if !registry.is_file() {
            fs::write(&registry, "")?;
        }
        Ok(Self { paths })
    }

    pub fn paths(&self) -> &StorePaths {
        &self.paths
    }

    /// All configurations in registry order. Malformed lines are skipped.
    pub fn list(&self) -> Result<Vec<ConfigurationRecord>> {
        let lines = flatfile::read_lines(&self.paths.registry_file())?;
        Ok(lines.iter().filter_map(|l| l.text().and_then(parse_line)).collect())
    }

    pub fn get(&self, name: &str) -> Result<ConfigurationRecord> {
        self.list()?
            .into_iter()
            .find(|r| r.name == name)
            .ok_or_else(|| Error::not_found(EntityKind::Configuration, name))
    }

    /// The first configuration in registry order.
    pub fn get_first(&self) -> Result<ConfigurationRecord> {
        self.list()?
            .into_iter()
            .next()
            .ok_or_else(|| Error::not_found(EntityKind::Configuration, "(none registered)"))
    }

    pub fn resolve(&self, selector: ConfigSelector<'_>) -> Result<ConfigurationRecord> {
        match selector {
            ConfigSelector::Named(name) => self.get(name),
            ConfigSelector::First => self.get_first(),
        }
    }

    /// Register a configuration and create its empty backing store file.
    ///
    /// Fails with [`Error::Duplicate`] without touching anything if the name is
    /// already registered. The duplicate check and the append are separate
    /// file operations.
    pub fn add(&self, name: &str) -> Result<ConfigurationRecord> {
        let record = ConfigurationRecord {
            name: name.to_string(),
            backing_file: self.paths.backing_file(name),
        };
        validate_name(name, &self.paths)?;
        let line = format_line(&record);
        if parse_line(&line).as_ref() != Some(&record) {
            return Err(ValidationError::ConfigName {
                name: name.to_string(),
                reason: "its store path cannot be written to the registry",
            }
            .into());
        }

        if self.list()?.iter().any(|r| r.name == name) {
            return Err(Error::duplicate(EntityKind::Configuration, name));
        }

        // Store file first: an interruption leaves an orphan file, not a
        // registry line without a file.
        fs::write(&record.backing_file, "")?;
        flatfile::append_line(&self.paths.registry_file(), &line)?;
        tracing::debug!(name, file = %record.backing_file.display(), "added configuration");
        Ok(record)
    }

    /// Unregister a configuration and delete its backing store file.
    ///
    /// Every registry line carrying `name` is dropped. Returns the first one.
    /// Only the store file derived from `name` is ever deleted: a line pointing
    /// anywhere else is unregistered but its file is left alone.
    pub fn remove(&self, name: &str) -> Result<ConfigurationRecord> {
        let path = self.paths.registry_file();
        let lines = flatfile::read_lines(&path)?;

        let mut kept = Vec::with_capacity(lines.len());
        let mut removed: Option<ConfigurationRecord> = None;
        for line in &lines {
            let Some((text, record)) = line.text().and_then(|t| parse_line(t).map(|r| (t, r)))
            else {
                return Err(line.corrupt(&path));
            };
            if record.name == name {
                removed.get_or_insert(record);
            } else {
                kept.push(text.to_string());
            }
        }

        let removed = removed.ok_or_else(|| Error::not_found(EntityKind::Configuration, name))?;
        flatfile::rewrite(&path, &kept)?;

        let expected = self.paths.backing_file(name);
        if removed.backing_file != expected {
            tracing::warn!(
                file = %removed.backing_file.display(),
                expected = %expected.display(),
                "registry line points outside the store, leaving file in place"
            );
            return Ok(removed);
        }
        match fs::remove_file(&removed.backing_file) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::warn!(
                    file = %removed.backing_file.display(),
                    "store file was already missing"
                );
            }
            Err(e) => return Err(e.into()),
        }
        Ok(removed)
    }
}

/// Check that a configuration name can be used as a store filename.
pub fn validate_name(name: &str, paths: &StorePaths) -> std::result::Result<(), ValidationError> {
    let invalid = |reason| ValidationError::ConfigName {
        name: name.to_string(),
        reason,
    };
    if name.trim().is_empty() {
        return Err(invalid("must not be empty"));
    }
    if name.contains([',', '/', '\\']) || name.chars().any(char::is_control) {
        return Err(invalid("must not contain ',', path separators, or control characters"));
    }
    if name.starts_with('.') {
        return Err(invalid("must not start with '.'"));
    }
    if paths.backing_file(name) == paths.registry_file() {
        return Err(invalid("collides with the registry file"));
    }
    Ok(())
}

fn parse_line(text: &str) -> Option<ConfigurationRecord> {
    let fields: Vec<&str> = text.split(',').collect();
    if fields.len() != FIELD_COUNT {
        return None;
    }
    Some(ConfigurationRecord {
        name: fields[0].to_string(),
        backing_file: PathBuf::from(fields[1]),
    })
}

fn format_line(record: &ConfigurationRecord) -> String {
    format!("{},{}", record.name, record.backing_file.to_string_lossy())
}
