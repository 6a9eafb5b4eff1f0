//! Registry of named settings snapshots
//!
//! The registry keeps every [`ConfigRecord`] in memory and mirrors the whole
//! collection to a single JSON metadata document after each change. Content
//! lives in one file per record under `configs/`, named after the record id.
//!
//! - **add / remove** mutate the collection and persist it
//! - **apply** copies a record onto the target file (see `apply.rs`)
//! - **validate** re-checks stored content without touching anything

mod apply;
mod error;
pub mod paths;
mod record;

pub use apply::{ApplyPlan, RemovePlan};
pub use error::RegistryError;
pub use paths::RegistryPaths;
pub use record::ConfigRecord;

use chrono::Utc;
use std::path::Path;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::storage::{self, StorageError};
use crate::validation;

pub struct Registry {
    paths: RegistryPaths,
    records: Vec<ConfigRecord>,
}

impl Registry {
    /// Load the metadata document (or start empty) and make sure the storage
    /// directories exist
    pub fn open(paths: RegistryPaths) -> Result<Self, RegistryError> {
        storage::ensure_dir(paths.root())?;
        storage::ensure_dir(&paths.configs_dir())?;

        let records = Self::load_records(&paths)?;
        info!(
            root = %paths.root().display(),
            count = records.len(),
            "Loaded config registry"
        );
        Ok(Self { paths, records })
    }

    fn load_records(paths: &RegistryPaths) -> Result<Vec<ConfigRecord>, RegistryError> {
        let metadata_path = paths.metadata_path();
        let data = match storage::read(&metadata_path) {
            Ok(data) => data,
            Err(StorageError::SourceNotFound(_)) => {
                debug!(path = %metadata_path.display(), "No metadata document yet, starting empty");
                return Ok(Vec::new());
            }
            Err(err) => return Err(err.into()),
        };

        serde_json::from_slice(&data).map_err(|source| RegistryError::CorruptMetadata {
            path: metadata_path,
            source,
        })
    }

    /// Rewrite the whole metadata document
    fn save(&self) -> Result<(), RegistryError> {
        let json = serde_json::to_string_pretty(&self.records).map_err(RegistryError::Serialize)?;
        storage::atomic_write(&self.paths.metadata_path(), json.as_bytes())?;
        debug!(count = self.records.len(), "Saved config metadata");
        Ok(())
    }

    pub fn paths(&self) -> &RegistryPaths {
        &self.paths
    }

    /// Records in insertion order
    pub fn list(&self) -> &[ConfigRecord] {
        &self.records
    }

    /// Look up a record by id, falling back to name
    pub fn get(&self, identifier: &str) -> Result<&ConfigRecord, RegistryError> {
        self.records
            .iter()
            .find(|r| r.id == identifier)
            .or_else(|| self.records.iter().find(|r| r.name == identifier))
            .ok_or_else(|| RegistryError::NotFound(identifier.to_string()))
    }

    /// Store `content` as a new record
    ///
    /// Name and description are trimmed. Nothing is left on disk when any
    /// step fails.
    pub fn add(
        &mut self,
        content: &[u8],
        name: &str,
        description: &str,
    ) -> Result<ConfigRecord, RegistryError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if self.records.iter().any(|r| r.name == name) {
            return Err(RegistryError::DuplicateName(name.to_string()));
        }
        validation::validate(content)?;

        let id = Uuid::new_v4().to_string();
        let record = ConfigRecord {
            file_path: self.paths.record_path(&id),
            id,
            name: name.to_string(),
            description: description.trim().to_string(),
            created_at: Utc::now(),
        };

        storage::atomic_write(&record.file_path, content)?;
        self.records.push(record.clone());

        if let Err(err) = self.save() {
            self.records.pop();
            if let Err(cleanup) = storage::remove_if_exists(&record.file_path) {
                warn!(path = %record.file_path.display(), error = %cleanup, "Failed to roll back stored config file");
            }
            return Err(err);
        }

        info!(id = %record.id, name = %record.name, "Added config");
        Ok(record)
    }

    /// [`add`](Self::add) with content read from a file
    pub fn add_from_file(
        &mut self,
        source: &Path,
        name: &str,
        description: &str,
    ) -> Result<ConfigRecord, RegistryError> {
        let content = storage::read(source)?;
        self.add(&content, name, description)
    }

    /// Drop a record from the metadata, then delete its stored file
    ///
    /// Metadata is persisted first; if that fails the record is put back and
    /// nothing on disk changes. A stored file that cannot be deleted
    /// afterwards is left behind as an unreferenced orphan.
    pub fn remove(&mut self, identifier: &str) -> Result<ConfigRecord, RegistryError> {
        let id = self.get(identifier)?.id.clone();
        let Some(index) = self.records.iter().position(|r| r.id == id) else {
            return Err(RegistryError::NotFound(identifier.to_string()));
        };

        let record = self.records.remove(index);
        if let Err(err) = self.save() {
            self.records.insert(index, record);
            return Err(err);
        }

        match storage::remove_if_exists(&record.file_path) {
            Ok(true) => {}
            Ok(false) => {
                debug!(path = %record.file_path.display(), "Stored config file was already absent");
            }
            Err(err) => {
                warn!(path = %record.file_path.display(), error = %err, "Config removed from metadata but its file could not be deleted");
            }
        }

        info!(id = %record.id, name = %record.name, "Removed config");
        Ok(record)
    }

    /// Re-check a record's stored content
    pub fn validate(&self, identifier: &str) -> Result<(), RegistryError> {
        let record = self.get(identifier)?;
        Self::validate_record(record).map(|_| ())
    }

    /// Validate every record, collecting all failures in list order
    pub fn validate_all(&self) -> Vec<(ConfigRecord, RegistryError)> {
        self.records
            .iter()
            .filter_map(|record| {
                Self::validate_record(record)
                    .err()
                    .map(|err| (record.clone(), err))
            })
            .collect()
    }

    /// Read and validate stored content, returning the bytes on success
    fn validate_record(record: &ConfigRecord) -> Result<Vec<u8>, RegistryError> {
        let content = storage::read(&record.file_path)?;
        validation::validate(&content).map_err(|source| RegistryError::InvalidRecord {
            name: record.name.clone(),
            id: record.id.clone(),
            source,
        })?;
        Ok(content)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::validation::ValidationError;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    /// Registry rooted in a fresh temp dir, target under `<tmp>/app/settings.json`
    pub(crate) fn test_registry() -> (TempDir, Registry) {
        let dir = tempdir().unwrap();
        let paths = RegistryPaths::new(
            dir.path().join("store"),
            dir.path().join("app").join("settings.json"),
        );
        let registry = Registry::open(paths).unwrap();
        (dir, registry)
    }

    fn reopen(registry: &Registry) -> Registry {
        Registry::open(registry.paths().clone()).unwrap()
    }

    fn stored_files(registry: &Registry) -> Vec<std::path::PathBuf> {
        fs::read_dir(registry.paths().configs_dir())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect()
    }

    /// Swap the metadata document for a directory so the next save fails
    fn block_metadata(registry: &Registry) {
        let path = registry.paths().metadata_path();
        let _ = fs::remove_file(&path);
        fs::create_dir(&path).unwrap();
    }

    #[test]
    fn test_open_creates_directories() {
        let (_dir, registry) = test_registry();
        assert!(registry.paths().root().is_dir());
        assert!(registry.paths().configs_dir().is_dir());
        assert!(registry.list().is_empty());
        assert!(!registry.paths().metadata_path().exists());
    }

    #[test]
    fn test_open_rejects_corrupt_metadata() {
        let (_dir, registry) = test_registry();
        fs::write(registry.paths().metadata_path(), b"{ not an array").unwrap();

        let err = Registry::open(registry.paths().clone()).err().unwrap();
        assert!(matches!(err, RegistryError::CorruptMetadata { .. }), "got {err:?}");
    }

    #[test]
    fn test_add_then_get_by_id_and_name() {
        let (_dir, mut registry) = test_registry();
        let content = br#"{"theme": "dark"}"#;

        let added = registry.add(content, "work", "Work setup").unwrap();
        assert!(!added.id.is_empty());

        for identifier in [added.id.as_str(), "work"] {
            let found = registry.get(identifier).unwrap();
            assert_eq!(found, &added);
            assert_eq!(found.description, "Work setup");
            assert_eq!(fs::read(&found.file_path).unwrap(), content);
        }
        assert_eq!(added.file_path, registry.paths().record_path(&added.id));
    }

    #[test]
    fn test_add_trims_name_and_description() {
        let (_dir, mut registry) = test_registry();
        let added = registry.add(b"{}", "  padded  ", "  text \n").unwrap();
        assert_eq!(added.name, "padded");
        assert_eq!(added.description, "text");
    }

    #[test]
    fn test_add_rejects_blank_name() {
        let (_dir, mut registry) = test_registry();
        let err = registry.add(b"{}", "   ", "").unwrap_err();
        assert!(matches!(err, RegistryError::EmptyName));
        assert!(stored_files(&registry).is_empty());
    }

    #[test]
    fn test_add_duplicate_name_changes_nothing() {
        let (_dir, mut registry) = test_registry();
        let first = registry.add(b"{\"a\": 1}", "base", "").unwrap();
        let metadata_before = fs::read(registry.paths().metadata_path()).unwrap();

        let err = registry.add(b"{\"b\": 2}", "base", "other").unwrap_err();

        assert!(matches!(err, RegistryError::DuplicateName(ref n) if n == "base"));
        assert_eq!(registry.list(), &[first.clone()]);
        assert_eq!(stored_files(&registry), vec![first.file_path.clone()]);
        assert_eq!(fs::read(registry.paths().metadata_path()).unwrap(), metadata_before);
    }

    #[test]
    fn test_add_invalid_json_leaves_nothing() {
        let (_dir, mut registry) = test_registry();

        let err = registry.add(b"not json", "bad", "").unwrap_err();

        assert!(matches!(err.validation(), Some(ValidationError::InvalidJson(_))), "got {err:?}");
        assert!(registry.list().is_empty());
        assert!(stored_files(&registry).is_empty());
    }

    #[test]
    fn test_add_non_object_is_rejected() {
        let (_dir, mut registry) = test_registry();
        let err = registry.add(b"[1, 2]", "list", "").unwrap_err();
        assert!(matches!(err.validation(), Some(ValidationError::NotAnObject { .. })));
    }

    #[test]
    fn test_add_rolls_back_when_metadata_save_fails() {
        let (_dir, mut registry) = test_registry();
        block_metadata(&registry);

        let err = registry.add(b"{}", "base", "").unwrap_err();

        assert!(matches!(err, RegistryError::Storage(_)), "got {err:?}");
        assert!(registry.list().is_empty());
        assert!(stored_files(&registry).is_empty());
    }

    #[test]
    fn test_add_from_file_missing_source() {
        let (dir, mut registry) = test_registry();
        let err = registry
            .add_from_file(&dir.path().join("nope.json"), "x", "")
            .unwrap_err();
        assert!(matches!(err, RegistryError::Storage(StorageError::SourceNotFound(_))));
    }

    #[test]
    fn test_add_from_file_reads_content() {
        let (dir, mut registry) = test_registry();
        let source = dir.path().join("edited.json");
        fs::write(&source, b"{\"fontSize\": 14}").unwrap();

        let added = registry.add_from_file(&source, "edited", "").unwrap();

        assert_eq!(fs::read(&added.file_path).unwrap(), b"{\"fontSize\": 14}");
    }

    #[test]
    fn test_get_unknown_is_not_found() {
        let (_dir, registry) = test_registry();
        let err = registry.get("missing").unwrap_err();
        assert!(matches!(err, RegistryError::NotFound(ref id) if id == "missing"));
    }

    #[test]
    fn test_get_prefers_id_over_name() {
        let (_dir, mut registry) = test_registry();
        let first = registry.add(b"{}", "first", "").unwrap();
        // A record whose name collides with another record's id
        let second = registry.add(b"{}", &first.id, "").unwrap();

        assert_eq!(registry.get(&first.id).unwrap().id, first.id);
        assert_eq!(registry.get(&second.id).unwrap().id, second.id);
    }

    #[test]
    fn test_list_keeps_insertion_order() {
        let (_dir, mut registry) = test_registry();
        for name in ["zeta", "alpha", "mid"] {
            registry.add(b"{}", name, "").unwrap();
        }
        let names: Vec<&str> = registry.list().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_reload_reproduces_collection() {
        let (_dir, mut registry) = test_registry();
        registry.add(b"{}", "one", "first").unwrap();
        registry.add(b"{\"x\": true}", "two", "").unwrap();
        registry.add(b"{}", "three", "third").unwrap();

        let reloaded = reopen(&registry);

        assert_eq!(reloaded.list(), registry.list());
    }

    #[test]
    fn test_relative_root_stores_absolute_file_paths() {
        let dir = tempfile::tempdir_in(".").unwrap();
        let relative = Path::new(dir.path().file_name().unwrap()).join("store");
        let mut registry = Registry::open(RegistryPaths::new(&relative, "app/settings.json")).unwrap();

        let added = registry.add(b"{}", "base", "").unwrap();

        assert!(added.file_path.is_absolute(), "got {}", added.file_path.display());
        let reloaded = reopen(&registry);
        assert!(reloaded.list()[0].file_path.is_absolute());
        assert!(reloaded.validate("base").is_ok());
    }

    #[test]
    fn test_metadata_document_format() {
        let (_dir, mut registry) = test_registry();
        let added = registry.add(b"{}", "base", "").unwrap();

        let text = fs::read_to_string(registry.paths().metadata_path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        let entry = &value.as_array().unwrap()[0];

        assert!(text.starts_with("[\n  {\n    \"id\""));
        assert_eq!(entry["id"], added.id.as_str());
        assert_eq!(entry["name"], "base");
        assert_eq!(entry["description"], "");
        assert!(entry["created_at"].is_string());
        assert_eq!(entry["file_path"], added.file_path.to_str().unwrap());
    }

    #[test]
    fn test_remove_deletes_record_and_file() {
        let (_dir, mut registry) = test_registry();
        let added = registry.add(b"{}", "base", "").unwrap();
        let keep = registry.add(b"{}", "keep", "").unwrap();

        let removed = registry.remove("base").unwrap();

        assert_eq!(removed.id, added.id);
        assert!(matches!(registry.get("base"), Err(RegistryError::NotFound(_))));
        assert!(matches!(registry.get(&added.id), Err(RegistryError::NotFound(_))));
        assert!(!added.file_path.exists());
        assert_eq!(reopen(&registry).list(), &[keep]);
    }

    #[test]
    fn test_remove_tolerates_missing_file() {
        let (_dir, mut registry) = test_registry();
        let added = registry.add(b"{}", "base", "").unwrap();
        fs::remove_file(&added.file_path).unwrap();

        registry.remove(&added.id).unwrap();

        assert!(registry.list().is_empty());
    }

    #[test]
    fn test_remove_succeeds_when_file_cannot_be_deleted() {
        let (_dir, mut registry) = test_registry();
        let added = registry.add(b"{}", "base", "").unwrap();
        // A non-empty directory in place of the stored file defeats the delete
        fs::remove_file(&added.file_path).unwrap();
        fs::create_dir(&added.file_path).unwrap();
        fs::write(added.file_path.join("inner"), b"x").unwrap();

        let removed = registry.remove("base").unwrap();

        assert_eq!(removed.id, added.id);
        assert!(registry.list().is_empty());
        assert!(reopen(&registry).list().is_empty());
        assert!(added.file_path.join("inner").exists());
    }

    #[test]
    fn test_remove_unknown_is_not_found() {
        let (_dir, mut registry) = test_registry();
        assert!(matches!(registry.remove("ghost"), Err(RegistryError::NotFound(_))));
    }

    #[test]
    fn test_remove_keeps_everything_when_metadata_save_fails() {
        let (_dir, mut registry) = test_registry();
        registry.add(b"{}", "first", "").unwrap();
        let target = registry.add(b"{\"k\": 1}", "second", "").unwrap();
        registry.add(b"{}", "third", "").unwrap();
        let before = registry.list().to_vec();
        block_metadata(&registry);

        let err = registry.remove("second").unwrap_err();

        assert!(matches!(err, RegistryError::Storage(_)), "got {err:?}");
        assert_eq!(registry.list(), before.as_slice());
        assert_eq!(fs::read(&target.file_path).unwrap(), b"{\"k\": 1}");
    }

    #[test]
    fn test_validate_detects_corruption() {
        let (_dir, mut registry) = test_registry();
        let added = registry.add(b"{}", "base", "").unwrap();
        assert!(registry.validate("base").is_ok());

        fs::write(&added.file_path, b"[]").unwrap();

        let err = registry.validate("base").unwrap_err();
        assert!(matches!(err, RegistryError::InvalidRecord { ref name, .. } if name == "base"));
        assert!(matches!(err.validation(), Some(ValidationError::NotAnObject { .. })));
    }

    #[test]
    fn test_validate_missing_file_is_storage_error() {
        let (_dir, mut registry) = test_registry();
        let added = registry.add(b"{}", "base", "").unwrap();
        fs::remove_file(&added.file_path).unwrap();

        let err = registry.validate(&added.id).unwrap_err();
        assert!(matches!(err, RegistryError::Storage(StorageError::SourceNotFound(_))));
    }

    #[test]
    fn test_validate_all_collects_every_failure() {
        let (_dir, mut registry) = test_registry();
        let bad_json = registry.add(b"{}", "bad-json", "").unwrap();
        registry.add(b"{}", "fine", "").unwrap();
        let bad_shape = registry.add(b"{}", "bad-shape", "").unwrap();
        fs::write(&bad_json.file_path, b"{oops").unwrap();
        fs::write(&bad_shape.file_path, b"null").unwrap();

        let failures = registry.validate_all();

        let names: Vec<&str> = failures.iter().map(|(r, _)| r.name.as_str()).collect();
        assert_eq!(names, ["bad-json", "bad-shape"]);
        assert!(matches!(failures[0].1.validation(), Some(ValidationError::InvalidJson(_))));
        assert!(matches!(failures[1].1.validation(), Some(ValidationError::NotAnObject { .. })));
    }

    #[test]
    fn test_validate_all_empty_when_all_valid() {
        let (_dir, mut registry) = test_registry();
        registry.add(b"{}", "a", "").unwrap();
        registry.add(b"{\"b\": 1}", "b", "").unwrap();
        assert!(registry.validate_all().is_empty());
    }
}
