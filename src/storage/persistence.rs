//! Snapshot persistence for the record store.
//!
//! The whole store (rows and id counters) is written as one MessagePack
//! document. Writes go to a temporary file in the target directory which is
//! then renamed over the snapshot, so a crash never leaves a torn file.

use super::InMemoryStorage;
use crate::core::GatewayError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("I/O error on snapshot {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize snapshot: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    #[error("Failed to deserialize snapshot: {0}")]
    Decode(#[from] rmp_serde::decode::Error),

    #[error("Unsupported snapshot version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
}

pub type Result<T> = std::result::Result<T, SnapshotError>;

impl From<SnapshotError> for GatewayError {
    fn from(err: SnapshotError) -> Self {
        GatewayError::Storage(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    pub created_at: DateTime<Utc>,
    pub row_count: usize,
}

#[derive(Debug, Deserialize)]
pub struct DatabaseSnapshot {
    pub version: u32,
    pub storage: InMemoryStorage,
    pub metadata: SnapshotMetadata,
}

#[derive(Serialize)]
struct DatabaseSnapshotRef<'a> {
    version: u32,
    storage: &'a InMemoryStorage,
    metadata: SnapshotMetadata,
}

#[derive(Debug, Clone)]
pub struct SnapshotManager {
    snapshot_path: PathBuf,
}

impl SnapshotManager {
    pub fn new<P: AsRef<Path>>(snapshot_path: P) -> Self {
        Self {
            snapshot_path: snapshot_path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.snapshot_path
    }

    pub fn exists(&self) -> bool {
        self.snapshot_path.exists()
    }

    pub fn encode(storage: &InMemoryStorage) -> Result<Vec<u8>> {
        let snapshot = DatabaseSnapshotRef {
            version: SNAPSHOT_VERSION,
            storage,
            metadata: SnapshotMetadata {
                created_at: Utc::now(),
                row_count: storage.total_rows(),
            },
        };
        Ok(rmp_serde::to_vec_named(&snapshot)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<DatabaseSnapshot> {
        let snapshot: DatabaseSnapshot = rmp_serde::from_slice(bytes)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: snapshot.version,
                expected: SNAPSHOT_VERSION,
            });
        }
        Ok(snapshot)
    }

    /// Atomically replaces the snapshot file with `bytes`.
    pub fn write(&self, bytes: &[u8]) -> Result<()> {
        let dir = match self.snapshot_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|source| self.io_error(source))?;

        let mut temp = NamedTempFile::new_in(&dir).map_err(|source| self.io_error(source))?;
        temp.write_all(bytes).map_err(|source| self.io_error(source))?;
        temp.as_file()
            .sync_all()
            .map_err(|source| self.io_error(source))?;
        temp.persist(&self.snapshot_path)
            .map_err(|err| self.io_error(err.error))?;
        Ok(())
    }

    pub fn save(&self, storage: &InMemoryStorage) -> Result<()> {
        let bytes = Self::encode(storage)?;
        self.write(&bytes)
    }

    /// Loads the snapshot, or `None` when no snapshot has been written yet.
    pub fn load(&self) -> Result<Option<DatabaseSnapshot>> {
        if !self.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&self.snapshot_path).map_err(|source| self.io_error(source))?;
        Self::decode(&bytes).map(Some)
    }

    fn io_error(&self, source: std::io::Error) -> SnapshotError {
        SnapshotError::Io {
            path: self.snapshot_path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ResourceKind;
    use crate::models::{Category, CategoryDraft};
    use tempfile::TempDir;

    fn storage_with_categories(names: &[&str]) -> InMemoryStorage {
        let mut storage = InMemoryStorage::new();
        for name in names {
            let draft: CategoryDraft =
                serde_json::from_value(serde_json::json!({ "name": name })).unwrap();
            storage.insert::<Category>(draft, Utc::now()).unwrap();
        }
        storage
    }

    #[test]
    fn test_snapshot_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let manager = SnapshotManager::new(temp_dir.path().join("nested/catalog.snapshot"));
        let mut storage = storage_with_categories(&["Science", "Art", "Music"]);
        storage
            .delete::<Category>(3, crate::storage::DeletePolicy::Cascade)
            .unwrap();

        manager.save(&storage).unwrap();
        assert!(manager.exists());

        let loaded = manager.load().unwrap().unwrap();
        assert_eq!(loaded.metadata.row_count, 2);
        assert_eq!(loaded.storage, storage);
        assert_eq!(loaded.storage.row_count(ResourceKind::Category), 2);
        // The id counter survives, so id 3 is not handed out again.
        assert_eq!(loaded.storage.categories.peek_next_id(), 4);
    }

    #[test]
    fn test_missing_snapshot_loads_as_none() {
        let temp_dir = TempDir::new().unwrap();
        let manager = SnapshotManager::new(temp_dir.path().join("absent.snapshot"));
        assert!(manager.load().unwrap().is_none());
    }

    #[test]
    fn test_corrupt_snapshot_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.snapshot");
        fs::write(&path, b"not messagepack").unwrap();

        let err = SnapshotManager::new(&path).load().unwrap_err();
        assert!(matches!(err, SnapshotError::Decode(_)));
    }
}
