//! Named operations exposed to the command line.
//!
//! [`PoemTool`] is the only thing `main.rs` talks to. Each method opens the
//! stores it needs from the tool settings, performs one operation, and returns
//! either a payload or a typed [`Error`](crate::error::Error). Nothing here
//! prints.

use crate::config::ToolConfig;
use crate::error::Result;
use crate::generate::{self, GenerateReport};
use crate::naming::SOURCE_EXTENSION;
use crate::poem_store::{self, PoemStore};
use crate::registry::ConfigStore;
use crate::types::{ConfigSelector, ConfigurationRecord, PoemRecord, RemovedPoem, SiteOrder};
use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct PoemTool {
    config: ToolConfig,
}

/// Poems of one configuration.
#[derive(Debug, Clone, Serialize)]
pub struct PoemListing {
    pub configuration: ConfigurationRecord,
    pub poems: Vec<PoemRecord>,
}

/// A file that `import` did not add, with the reason.
#[derive(Debug, Clone, Serialize)]
pub struct RejectedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of importing a directory of poems.
#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub configuration: ConfigurationRecord,
    pub added: Vec<PoemRecord>,
    pub rejected: Vec<RejectedFile>,
}

impl PoemTool {
    pub fn new(config: ToolConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    fn registry(&self) -> Result<ConfigStore> {
        ConfigStore::open(self.config.store_paths())
    }

    fn resolve(&self, name: Option<&str>) -> Result<ConfigurationRecord> {
        self.registry()?.resolve(ConfigSelector::from(name))
    }

    pub fn list_configs(&self) -> Result<Vec<ConfigurationRecord>> {
        self.registry()?.list()
    }

    pub fn add_config(&self, name: &str) -> Result<ConfigurationRecord> {
        self.registry()?.add(name)
    }

    /// Remove a configuration together with its poem store.
    pub fn remove_config(&self, name: &str) -> Result<ConfigurationRecord> {
        self.registry()?.remove(name)
    }

    /// `None` selects the first configuration.
    pub fn list_poems(&self, config: Option<&str>) -> Result<PoemListing> {
        let configuration = self.resolve(config)?;
        let poems = PoemStore::open(&configuration).list()?;
        Ok(PoemListing {
            configuration,
            poems,
        })
    }

    pub fn add_poem(
        &self,
        config: Option<&str>,
        source: &Path,
        title: Option<&str>,
    ) -> Result<(ConfigurationRecord, PoemRecord)> {
        let configuration = self.resolve(config)?;
        let record = poem_store::ingest(source, title)?;
        let record = PoemStore::open(&configuration).add(record)?;
        Ok((configuration, record))
    }

    /// Add every `.txt` file directly inside `dir`, in filename order.
    ///
    /// Files that fail validation or are already registered are reported in
    /// [`ImportReport::rejected`]; they do not stop the import.
    pub fn import(&self, config: Option<&str>, dir: &Path) -> Result<ImportReport> {
        let configuration = self.resolve(config)?;
        let store = PoemStore::open(&configuration);

        let mut added = Vec::new();
        let mut rejected = Vec::new();
        let entries = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();
        for entry in entries {
            let entry = entry.map_err(std::io::Error::from)?;
            let is_poem = {
                let name = entry.file_name().to_string_lossy();
                entry.file_type().is_file()
                    && !name.starts_with('.')
                    && name.ends_with(SOURCE_EXTENSION)
            };
            if !is_poem {
                continue;
            }
            let path = entry.into_path();
            match poem_store::ingest(&path, None).and_then(|r| store.add(r)) {
                Ok(record) => added.push(record),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "not imported");
                    rejected.push(RejectedFile {
                        path,
                        reason: e.to_string(),
                    });
                }
            }
        }

        Ok(ImportReport {
            configuration,
            added,
            rejected,
        })
    }

    /// Remove a poem by id, title, filepath, or filename.
    pub fn remove_poem(
        &self,
        config: Option<&str>,
        identifier: &str,
    ) -> Result<(ConfigurationRecord, RemovedPoem)> {
        let configuration = self.resolve(config)?;
        let removed = PoemStore::open(&configuration).remove(identifier)?;
        Ok((configuration, removed))
    }

    pub fn generate_site(
        &self,
        config: Option<&str>,
        dest: &Path,
        order: SiteOrder,
    ) -> Result<GenerateReport> {
        generate::generate_site(&self.config, ConfigSelector::from(config), dest, order)
    }
}
