//! Tool settings module.
//!
//! Handles loading and validating the optional `poems.toml` settings file.
//! Every value has a default, so the file is only needed to move the store or
//! restyle the generated site.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [store]
//! dir = "config"           # Directory holding the registry and store files
//! registry = "_base.cfg"   # Registry filename inside `dir`
//! extension = "cfg"        # Extension of per-configuration store files
//!
//! [site]
//! title = "Poems"          # Heading of the generated index page
//! stylesheet = "/styles.css" # Stylesheet href linked from every page
//! write_stylesheet = true  # Write a bundled styles.css if none exists
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Settings file looked up in the working directory when none is given.
pub const DEFAULT_SETTINGS_FILE: &str = "poems.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Tool settings loaded from `poems.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolConfig {
    /// Where the registry and per-configuration stores live.
    pub store: StoreConfig,
    /// Presentation of the generated site.
    pub site: SiteConfig,
}

impl ToolConfig {
    /// Validate config values are usable as paths.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation("store.dir must not be empty".into()));
        }
        if self.store.registry.is_empty() {
            return Err(ConfigError::Validation(
                "store.registry must not be empty".into(),
            ));
        }
        if self.store.registry.contains(['/', '\\']) {
            return Err(ConfigError::Validation(
                "store.registry must be a bare filename".into(),
            ));
        }
        if self.store.extension.is_empty() || self.store.extension.starts_with('.') {
            return Err(ConfigError::Validation(
                "store.extension must be non-empty and written without a leading dot".into(),
            ));
        }
        Ok(())
    }

    /// The explicit store configuration handed to both stores.
    pub fn store_paths(&self) -> StorePaths {
        StorePaths {
            dir: self.store.dir.clone(),
            registry: self.store.registry.clone(),
            extension: self.store.extension.clone(),
        }
    }
}

/// Store location settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    pub dir: PathBuf,
    pub registry: String,
    pub extension: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("config"),
            registry: "_base.cfg".to_string(),
            extension: "cfg".to_string(),
        }
    }
}

/// Generated site settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Heading and `<title>` of the index page.
    pub title: String,
    /// Stylesheet href linked from every page.
    pub stylesheet: String,
    /// Write the bundled stylesheet to `<dest>/styles.css` when none exists.
    pub write_stylesheet: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Poems".to_string(),
            stylesheet: "/styles.css".to_string(),
            write_stylesheet: true,
        }
    }
}

/// Resolved store locations.
///
/// Both stores take this value in their constructors instead of reading
/// global constants, so tests can point them at a temporary directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePaths {
    pub dir: PathBuf,
    pub registry: String,
    pub extension: String,
}

impl StorePaths {
    /// Default layout (`config/_base.cfg`, `config/<name>.cfg`) rooted at `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let defaults = StoreConfig::default();
        Self {
            dir: dir.into(),
            registry: defaults.registry,
            extension: defaults.extension,
        }
    }

    pub fn registry_file(&self) -> PathBuf {
        self.dir.join(&self.registry)
    }

    /// Backing store file for a configuration name.
    pub fn backing_file(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", name, self.extension))
    }
}

/// Load settings from a `poems.toml` file.
///
/// A missing file yields the stock defaults; a malformed one is an error.
pub fn load_config(path: &Path) -> Result<ToolConfig, ConfigError> {
    if !path.exists() {
        return Ok(ToolConfig::default());
    }
    let content = fs::read_to_string(path)?;
    let config: ToolConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `poems.toml` with all keys and explanations.
///
/// Printed by the `gen-config` command.
pub fn stock_config_toml() -> &'static str {
    r##"# poemsite settings
#
# Every key is optional. Values below are the defaults.

[store]
# Directory holding the registry file and one store file per configuration.
dir = "config"
# Registry filename inside `dir`. One `name,backing_file` line per configuration.
registry = "_base.cfg"
# Extension of per-configuration store files: `<dir>/<name>.<extension>`.
extension = "cfg"

[site]
# Heading and <title> of the generated index.html.
title = "Poems"
# Stylesheet href linked from every generated page.
stylesheet = "/styles.css"
# Write a small bundled stylesheet to <dest>/styles.css when none exists.
# An existing file is never overwritten.
write_stylesheet = true
"##
}
