//! Filesystem layout of a registry
//!
//! Everything is derived from two injected locations: the storage root and
//! the target settings file. Defaults live here but are only consulted by the
//! CLI shell.

use std::path::{Path, PathBuf};

use crate::constants::{storage, target};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryPaths {
    root: PathBuf,
    target: PathBuf,
}

impl RegistryPaths {
    /// Relative locations are resolved against the current directory so the
    /// record paths written to metadata stay valid from any working directory
    pub fn new(root: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            root: absolutize(root.into()),
            target: absolutize(target.into()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn configs_dir(&self) -> PathBuf {
        self.root.join(storage::CONFIGS_DIR)
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.root.join(storage::METADATA_FILENAME)
    }

    /// Stored content location for a record identity
    pub fn record_path(&self, id: &str) -> PathBuf {
        self.configs_dir()
            .join(id)
            .with_extension(storage::RECORD_EXTENSION)
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Target path with the backup suffix appended (`settings.json.backup`)
    pub fn backup_path(&self) -> PathBuf {
        let mut raw = self.target.clone().into_os_string();
        raw.push(target::BACKUP_SUFFIX);
        PathBuf::from(raw)
    }
}

fn absolutize(path: PathBuf) -> PathBuf {
    std::path::absolute(&path).unwrap_or(path)
}

/// `~/.claude-switch`
pub fn default_root() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(storage::APP_DIR))
}

/// `~/.claude/settings.json`
pub fn default_target() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(target::APP_DIR).join(target::FILENAME))
}
