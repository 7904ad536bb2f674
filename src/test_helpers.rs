//! Shared test utilities for the poemsite test suite.
//!
//! Provides temp-dir store setup, poem file writers, and a directory snapshot
//! for comparing generated sites across runs.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! let config = tool_config_in(tmp.path());
//! let source = write_poem(&tmp.path().join("poems"), "2024.01.05_1_a.txt", "text");
//! ```

use crate::config::{StorePaths, ToolConfig};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;

// =========================================================================
// Store setup
// =========================================================================

/// A fresh temp dir and store paths rooted in its `config/` subdirectory.
pub fn temp_store() -> (TempDir, StorePaths) {
    let tmp = TempDir::new().unwrap();
    let paths = StorePaths::in_dir(tmp.path().join("config"));
    (tmp, paths)
}

/// Default tool settings with the store moved under `root/config`.
pub fn tool_config_in(root: &Path) -> ToolConfig {
    let mut config = ToolConfig::default();
    config.store.dir = root.join("config");
    config
}

// =========================================================================
// Poem files
// =========================================================================

/// Write a poem source file, creating `dir` if needed. Returns its path.
pub fn write_poem(dir: &Path, name: &str, text: &str) -> PathBuf {
    fs::create_dir_all(dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, text).unwrap();
    path
}

// =========================================================================
// Site snapshots
// =========================================================================

/// Every file under `root`, keyed by relative path, with its bytes.
pub fn snapshot_dir(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    WalkDir::new(root)
        .into_iter()
        .map(|e| e.unwrap())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let rel = e.path().strip_prefix(root).unwrap().to_path_buf();
            (rel, fs::read(e.path()).unwrap())
        })
        .collect()
}
