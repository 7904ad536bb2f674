//! Fixtures shared by the integration tests.

use poemsite::api::PoemTool;
use poemsite::config::ToolConfig;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A tool whose store lives under `root/config`.
pub fn tool_in(root: &Path) -> PoemTool {
    let mut config = ToolConfig::default();
    config.store.dir = root.join("config");
    PoemTool::new(config)
}

/// Write a poem source file, creating `dir` if needed. Returns its path.
pub fn write_poem(dir: &Path, name: &str, text: &str) -> PathBuf {
    fs::create_dir_all(dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, text).unwrap();
    path
}

/// Every file under `root`, keyed by relative path, with its bytes.
pub fn snapshot(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
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
