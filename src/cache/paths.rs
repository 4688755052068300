// Cache path utilities.
// Constructs filesystem paths for the store, config file, and log file.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "icondeck")
}

/// Get the base cache directory (~/.cache/icondeck on Linux).
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Directory holding one JSON file per persisted key.
pub fn store_dir() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join("store"))
}

/// Log file used while the terminal UI owns the screen.
pub fn log_path() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join("icondeck.log"))
}

/// Default configuration file location.
pub fn config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Path of a persisted key inside a store directory.
pub fn key_path(root: &Path, key: &str) -> PathBuf {
    root.join(format!("{}.json", sanitize_key(key)))
}

/// Sanitize a key for use as a file name.
/// Replaces problematic characters with underscores.
fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '.' => '_',
            _ => c,
        })
        .collect()
}
