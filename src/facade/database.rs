use crate::core::{GatewayError, RecordId, RecordRef, ResourceKind, Result};
use crate::models::{Lesson, Resource, Review};
use crate::storage::{DeletePolicy, InMemoryStorage, SnapshotManager};
use chrono::Utc;
use std::path::Path;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// The CRUD contract over every registered record type.
///
/// Each call is atomic: reads share the store, writes hold it exclusively
/// for validation, the write itself and, when a snapshot file is configured,
/// the snapshot rewrite. A write whose snapshot fails is not applied.
pub struct Database {
    storage: RwLock<InMemoryStorage>,
    delete_policy: DeletePolicy,
    snapshots: Option<SnapshotManager>,
}

impl Database {
    /// Empty, memory-only database.
    pub fn new() -> Self {
        Self {
            storage: RwLock::new(InMemoryStorage::new()),
            delete_policy: DeletePolicy::default(),
            snapshots: None,
        }
    }

    /// Database backed by a snapshot file, restored from it when the file exists.
    pub fn open_snapshot<P: AsRef<Path>>(path: P) -> Result<Self> {
        let manager = SnapshotManager::new(path);
        let storage = match manager.load()? {
            Some(snapshot) => {
                info!(
                    path = %manager.path().display(),
                    rows = snapshot.metadata.row_count,
                    saved_at = %snapshot.metadata.created_at,
                    "restored snapshot"
                );
                snapshot.storage
            }
            None => {
                info!(path = %manager.path().display(), "no snapshot yet, starting empty");
                InMemoryStorage::new()
            }
        };

        Ok(Self {
            storage: RwLock::new(storage),
            delete_policy: DeletePolicy::default(),
            snapshots: Some(manager),
        })
    }

    pub fn with_delete_policy(mut self, policy: DeletePolicy) -> Self {
        self.delete_policy = policy;
        self
    }

    pub fn delete_policy(&self) -> DeletePolicy {
        self.delete_policy
    }

    pub fn is_persistent(&self) -> bool {
        self.snapshots.is_some()
    }

    pub async fn row_count(&self, kind: ResourceKind) -> usize {
        self.storage.read().await.row_count(kind)
    }

    pub async fn list<R: Resource>(&self) -> Vec<R> {
        let storage = self.storage.read().await;
        R::table(&storage).scan()
    }

    pub async fn retrieve<R: Resource>(&self, id: RecordId) -> Result<R> {
        let storage = self.storage.read().await;
        storage.get::<R>(id).cloned()
    }

    /// Stores a new record under the next id of its table.
    ///
    /// # Example
    ///
    /// ```
    /// use coursebase::Database;
    /// use coursebase::models::{Category, CategoryDraft};
    ///
    /// # tokio_test::block_on(async {
    /// let db = Database::new();
    /// let draft = CategoryDraft {
    ///     name: "Science".to_string(),
    ///     description: String::new(),
    /// };
    /// let category = db.create::<Category>(draft).await.unwrap();
    /// assert_eq!(category.id, 1);
    /// # });
    /// ```
    pub async fn create<R: Resource>(&self, draft: R::Draft) -> Result<R> {
        let record = self
            .mutate(|storage| storage.insert::<R>(draft, Utc::now()))
            .await?;
        debug!(resource = R::KIND.name(), id = record.id(), "record created");
        Ok(record)
    }

    /// Overwrites every writable field of an existing record.
    pub async fn update<R: Resource>(&self, id: RecordId, draft: R::Draft) -> Result<R> {
        let record = self
            .mutate(|storage| storage.replace::<R>(id, draft))
            .await?;
        debug!(resource = R::KIND.name(), id, "record replaced");
        Ok(record)
    }

    pub async fn partial_update<R: Resource>(&self, id: RecordId, patch: R::Patch) -> Result<R> {
        let record = self
            .mutate(|storage| storage.patch::<R>(id, patch))
            .await?;
        debug!(resource = R::KIND.name(), id, "record patched");
        Ok(record)
    }

    /// Deletes a record and returns every row that went with it.
    pub async fn destroy<R: Resource>(&self, id: RecordId) -> Result<Vec<RecordRef>> {
        let policy = self.delete_policy;
        let removed = self
            .mutate(|storage| storage.delete::<R>(id, policy))
            .await?;
        debug!(
            resource = R::KIND.name(),
            id,
            cascaded = removed.len().saturating_sub(1),
            "record deleted"
        );
        Ok(removed)
    }

    /// Records of type `R` that reference `parent`, in id order.
    pub async fn related<R: Resource>(&self, parent: RecordRef) -> Result<Vec<R>> {
        let storage = self.storage.read().await;
        if !storage.contains(parent) {
            return Err(GatewayError::not_found(parent.kind, parent.id));
        }
        let table = R::table(&storage);
        Ok(table
            .referencing(parent)
            .into_iter()
            .filter_map(|id| table.get(id).cloned())
            .collect())
    }

    /// Lessons of a course in their `order`, ties broken by id.
    pub async fn course_lessons(&self, course: RecordId) -> Result<Vec<Lesson>> {
        let mut lessons = self
            .related::<Lesson>(RecordRef::new(ResourceKind::Course, course))
            .await?;
        lessons.sort_by_key(|lesson| (lesson.order, lesson.id));
        Ok(lessons)
    }

    pub async fn course_reviews(&self, course: RecordId) -> Result<Vec<Review>> {
        self.related::<Review>(RecordRef::new(ResourceKind::Course, course))
            .await
    }

    async fn mutate<T>(&self, op: impl FnOnce(&mut InMemoryStorage) -> Result<T>) -> Result<T> {
        let mut storage = self.storage.write().await;
        let Some(manager) = &self.snapshots else {
            return op(&mut *storage);
        };

        let mut staged = storage.clone();
        let value = op(&mut staged)?;
        let bytes = SnapshotManager::encode(&staged)?;
        let manager = manager.clone();
        tokio::task::spawn_blocking(move || manager.write(&bytes))
            .await
            .map_err(|err| GatewayError::Storage(format!("snapshot writer failed: {err}")))??;

        *storage = staged;
        Ok(value)
    }
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}
