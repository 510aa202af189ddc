//! Runtime configuration.

use std::path::PathBuf;

pub const DEFAULT_ROOT: &str = "temp_files";
pub const DEFAULT_MANIFEST: &str = "input_files.json";

/// Environment variable that overrides the working directory.
pub const ROOT_ENV: &str = "ARKSCRIPT_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding input and generated documents
    pub root: PathBuf,
    /// File name, inside `root`, of the staged-input manifest
    pub manifest: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            root: PathBuf::from(DEFAULT_ROOT),
            manifest: DEFAULT_MANIFEST.to_string(),
        }
    }
}

impl Config {
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Config {
            root: root.into(),
            ..Default::default()
        }
    }

    /// Defaults, with the root taken from `ARKSCRIPT_DIR` when it is set.
    pub fn from_env() -> Self {
        match std::env::var_os(ROOT_ENV) {
            Some(dir) if !dir.is_empty() => Config::with_root(dir),
            _ => Config::default(),
        }
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(&self.manifest)
    }
}
