//! Working-directory housekeeping.
//!
//! A workspace is one directory holding the staged input documents, a JSON
//! manifest naming them, and whatever the scripts generate. Executing a script
//! first clears the previous run's outputs, so the directory only ever holds
//! the inputs plus the latest results.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::{
    codec::{PageCodec, default_codec},
    config::Config,
    interpreter::Interpreter,
    output::RunResult,
    storage::{LocalStorage, validate_name},
};

/// Extensions accepted as inputs, compared case-insensitively.
pub const ALLOWED_EXTENSIONS: [&str; 2] = [".txt", ".pdf"];

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("'{0}' must be a .txt or .pdf document")]
    DisallowedExtension(String),

    #[error("'{0}' is not a usable file name")]
    InvalidName(String),

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> WorkspaceError + '_ {
    move |source| WorkspaceError::Io {
        path: path.to_path_buf(),
        source,
    }
}

pub fn is_allowed(name: &str) -> bool {
    let lower = name.to_lowercase();
    ALLOWED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

pub struct Workspace {
    config: Config,
    interpreter: Interpreter<LocalStorage, Box<dyn PageCodec>>,
}

impl Workspace {
    /// Opens the workspace at `config.root`, creating the directory if needed.
    pub fn open(config: Config) -> Result<Self, WorkspaceError> {
        Workspace::with_codec(config, default_codec())
    }

    pub fn with_codec(config: Config, codec: Box<dyn PageCodec>) -> Result<Self, WorkspaceError> {
        fs::create_dir_all(&config.root).map_err(io_error(&config.root))?;
        let storage = LocalStorage::new(config.root.clone());
        Ok(Workspace {
            config,
            interpreter: Interpreter::new(storage, codec),
        })
    }

    pub fn root(&self) -> &Path {
        &self.config.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Copies `paths` into the workspace under their file names and records
    /// them as inputs. Nothing is copied if any path is rejected.
    pub fn stage<P: AsRef<Path>>(&self, paths: &[P]) -> Result<Vec<String>, WorkspaceError> {
        let mut staged = Vec::with_capacity(paths.len());
        for path in paths {
            let path = path.as_ref();
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or_else(|| WorkspaceError::InvalidName(path.display().to_string()))?;
            if !is_allowed(name) {
                return Err(WorkspaceError::DisallowedExtension(name.to_string()));
            }
            if name == self.config.manifest || validate_name(name).is_err() {
                return Err(WorkspaceError::InvalidName(name.to_string()));
            }
            staged.push((path, name.to_string()));
        }

        let mut inputs = self.inputs();
        for (path, name) in &staged {
            let dest = self.config.root.join(name);
            fs::copy(path, &dest).map_err(io_error(path))?;
            tracing::info!(input = %name, "staged");
            inputs.insert(name.clone());
        }
        self.save_manifest(&inputs)?;

        Ok(staged.into_iter().map(|(_, name)| name).collect())
    }

    /// Names listed in the manifest. A missing or unreadable manifest means
    /// no inputs.
    pub fn inputs(&self) -> BTreeSet<String> {
        let Ok(raw) = fs::read_to_string(self.config.manifest_path()) else {
            return BTreeSet::new();
        };
        match serde_json::from_str::<Vec<serde_json::Value>>(&raw) {
            Ok(entries) => entries
                .into_iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .filter(|name| is_allowed(name))
                .collect(),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring invalid manifest");
                BTreeSet::new()
            }
        }
    }

    fn save_manifest(&self, inputs: &BTreeSet<String>) -> Result<(), WorkspaceError> {
        let names: Vec<&String> = inputs.iter().filter(|n| is_allowed(n)).collect();
        let json = serde_json::to_string(&names)?;
        let path = self.config.manifest_path();
        fs::write(&path, json).map_err(io_error(&path))
    }

    /// Deletes every file that is neither an input nor the manifest.
    /// Returns how many were removed.
    pub fn clean_outputs(&self) -> Result<usize, WorkspaceError> {
        let inputs = self.inputs();
        self.remove_files(|name| name != self.config.manifest && !inputs.contains(name))
    }

    /// Deletes every file in the workspace, inputs and manifest included.
    pub fn reset(&self) -> Result<usize, WorkspaceError> {
        self.remove_files(|_| true)
    }

    fn remove_files(&self, doomed: impl Fn(&str) -> bool) -> Result<usize, WorkspaceError> {
        let root = &self.config.root;
        let mut removed = 0;
        for entry in fs::read_dir(root).map_err(io_error(root))? {
            let entry = entry.map_err(io_error(root))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if !doomed(&name) {
                continue;
            }
            match fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) => tracing::warn!(file = %name, error = %e, "could not delete"),
            }
        }
        tracing::debug!(removed, "workspace cleaned");
        Ok(removed)
    }

    /// Clears the previous outputs, then runs `source` against the workspace.
    pub fn execute(&self, source: &str) -> Result<RunResult, WorkspaceError> {
        self.clean_outputs()?;
        Ok(self.run(source))
    }

    /// Runs `source` leaving earlier outputs in place.
    pub fn run(&self, source: &str) -> RunResult {
        self.interpreter.run(source)
    }
}
