//! Moving records onto the target settings file
//!
//! Apply keeps a single backup slot next to the target. The backup is taken
//! only when a target already exists, and is restored only when this very
//! apply created it.

use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use super::{ConfigRecord, Registry, RegistryError};
use crate::storage;

/// What an apply does (or did): optional backup, then copy onto the target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyPlan {
    pub record: ConfigRecord,
    pub source: PathBuf,
    pub target: PathBuf,
    /// Set when the target exists and will be backed up first
    pub backup: Option<PathBuf>,
}

/// What a remove would delete
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovePlan {
    pub record: ConfigRecord,
    pub file: PathBuf,
    pub file_exists: bool,
}

impl Registry {
    /// Describe an apply without touching the filesystem
    pub fn plan_apply(&self, identifier: &str) -> Result<ApplyPlan, RegistryError> {
        let record = self.get(identifier)?;
        let target = self.paths.target().to_path_buf();
        let backup = storage::file_exists(&target).then(|| self.paths.backup_path());
        Ok(ApplyPlan {
            source: record.file_path.clone(),
            record: record.clone(),
            target,
            backup,
        })
    }

    /// Describe a remove without touching the filesystem
    pub fn plan_remove(&self, identifier: &str) -> Result<RemovePlan, RegistryError> {
        let record = self.get(identifier)?;
        Ok(RemovePlan {
            file: record.file_path.clone(),
            file_exists: storage::file_exists(&record.file_path),
            record: record.clone(),
        })
    }

    /// Copy a record onto the target file, backing up the previous target
    pub fn apply(&self, identifier: &str) -> Result<ApplyPlan, RegistryError> {
        let record = self.get(identifier)?;
        Self::validate_record(record)?;

        let plan = self.plan_apply(identifier)?;
        if let Some(backup) = &plan.backup {
            storage::safe_copy(&plan.target, backup)?;
            info!(backup = %backup.display(), "Backed up current settings");
        }

        copy_with_restore(&plan.source, &plan.target, plan.backup.as_deref())?;

        info!(id = %plan.record.id, name = %plan.record.name, target = %plan.target.display(), "Applied config");
        Ok(plan)
    }

    /// Ids of records whose stored bytes match the current target file
    ///
    /// Empty when the target is absent or unreadable.
    pub fn active_ids(&self) -> Vec<String> {
        let Ok(current) = storage::read(self.paths.target()) else {
            return Vec::new();
        };
        self.records
            .iter()
            .filter(|r| storage::read(&r.file_path).is_ok_and(|content| content == current))
            .map(|r| r.id.clone())
            .collect()
    }
}

/// Copy `source` onto `target`, putting `backup` back if the copy fails
fn copy_with_restore(source: &Path, target: &Path, backup: Option<&Path>) -> Result<(), RegistryError> {
    let Err(source_err) = storage::safe_copy(source, target) else {
        return Ok(());
    };
    error!(target = %target.display(), error = %source_err, "Failed to copy config onto target");

    let restore_error = backup.and_then(|backup| storage::safe_copy(backup, target).err());
    match (&restore_error, backup) {
        (Some(err), _) => warn!(error = %err, "Failed to restore settings from backup"),
        (None, Some(backup)) => info!(backup = %backup.display(), "Restored settings from backup"),
        (None, None) => {}
    }

    Err(RegistryError::ApplyFailed {
        target: target.to_path_buf(),
        source: source_err,
        restore_error,
    })
}
