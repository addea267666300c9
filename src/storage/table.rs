use crate::core::{RecordId, RecordRef};
use crate::models::Resource;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Rows of one record type, keyed by id.
///
/// Ids come from a per-table counter that only moves forward, so an id is
/// never handed out twice even after its row is deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table<R> {
    rows: BTreeMap<RecordId, R>,
    next_id: RecordId,
}

impl<R> Default for Table<R> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<R: Resource> Table<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// The id the next insert will receive.
    pub fn peek_next_id(&self) -> RecordId {
        self.next_id
    }

    pub fn allocate_id(&mut self) -> RecordId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Stores a row under its own id, replacing any previous version.
    /// Returns `true` when a row with that id already existed.
    pub fn put(&mut self, record: R) -> bool {
        let id = record.id();
        if id >= self.next_id {
            self.next_id = id + 1;
        }
        self.rows.insert(id, record).is_some()
    }

    pub fn get(&self, id: RecordId) -> Option<&R> {
        self.rows.get(&id)
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.rows.contains_key(&id)
    }

    pub fn remove(&mut self, id: RecordId) -> Option<R> {
        self.rows.remove(&id)
    }

    /// All rows in ascending id order.
    pub fn scan(&self) -> Vec<R> {
        self.rows.values().cloned().collect()
    }

    /// Ids of the rows holding a reference to `target`.
    pub fn referencing(&self, target: RecordRef) -> Vec<RecordId> {
        self.rows
            .values()
            .filter(|row| row.refers_to(target))
            .map(|row| row.id())
            .collect()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
