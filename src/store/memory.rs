//! In-process firework store.

use super::{FireworkId, FireworkRecord, FireworkStore, NewFirework, StoreError};
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug)]
struct Inner {
    /// Next id to assign. Ids are never reused.
    next_id: FireworkId,
    records: BTreeMap<FireworkId, FireworkRecord>,
}

/// A store that keeps records in memory behind a read-write lock.
///
/// Writers are serialized by the lock, which makes create and the
/// read-modify-write of an update atomic.
#[derive(Debug)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Creates an empty store; the first record gets id 1.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                next_id: 1,
                records: BTreeMap::new(),
            }),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>, StoreError> {
        self.inner
            .read()
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>, StoreError> {
        self.inner
            .write()
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FireworkStore for MemoryStore {
    fn insert(&self, firework: NewFirework) -> Result<FireworkRecord, StoreError> {
        let mut inner = self.write()?;
        let id = inner.next_id;
        inner.next_id += 1;

        let now = Utc::now();
        let record = FireworkRecord {
            id,
            is_shareable: firework.is_shareable,
            pixel_data: firework.pixel_data,
            created_at: now,
            updated_at: now,
        };
        inner.records.insert(id, record.clone());

        tracing::trace!(id, "Inserted firework");
        Ok(record)
    }

    fn get(&self, id: FireworkId) -> Result<FireworkRecord, StoreError> {
        self.read()?
            .records
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    fn list(&self) -> Result<Vec<FireworkRecord>, StoreError> {
        Ok(self.read()?.records.values().cloned().collect())
    }

    fn set_shareable(
        &self,
        id: FireworkId,
        is_shareable: bool,
    ) -> Result<FireworkRecord, StoreError> {
        let mut inner = self.write()?;
        let record = inner
            .records
            .get_mut(&id)
            .ok_or(StoreError::NotFound(id))?;

        record.is_shareable = is_shareable;
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    fn delete(&self, id: FireworkId) -> Result<(), StoreError> {
        self.write()?
            .records
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    fn count(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::PackedBytes;
    use std::sync::Arc;

    fn new_firework(is_shareable: bool) -> NewFirework {
        NewFirework {
            is_shareable,
            pixel_data: PackedBytes::from_vec(vec![1, 0, 1]),
        }
    }

    #[test]
    fn test_ids_start_at_one_and_increase() {
        let store = MemoryStore::new();

        let first = store.insert(new_firework(true)).unwrap();
        let second = store.insert(new_firework(false)).unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(first.created_at, first.updated_at);
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let store = MemoryStore::new();

        let first = store.insert(new_firework(true)).unwrap();
        store.delete(first.id).unwrap();
        let second = store.insert(new_firework(true)).unwrap();

        assert_eq!(second.id, 2);
    }

    #[test]
    fn test_get_missing() {
        let store = MemoryStore::new();
        assert!(matches!(store.get(7), Err(StoreError::NotFound(7))));
    }

    #[test]
    fn test_set_shareable_keeps_pixels() {
        let store = MemoryStore::new();
        let created = store.insert(new_firework(false)).unwrap();

        let updated = store.set_shareable(created.id, true).unwrap();

        assert!(updated.is_shareable);
        assert_eq!(updated.pixel_data, created.pixel_data);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(store.get(created.id).unwrap(), updated);
    }

    #[test]
    fn test_set_shareable_missing() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.set_shareable(3, true),
            Err(StoreError::NotFound(3))
        ));
    }

    #[test]
    fn test_delete_missing() {
        let store = MemoryStore::new();
        assert!(matches!(store.delete(1), Err(StoreError::NotFound(1))));
    }

    #[test]
    fn test_list_in_id_order() {
        let store = MemoryStore::new();
        for i in 0..5 {
            store.insert(new_firework(i % 2 == 0)).unwrap();
        }
        store.delete(3).unwrap();

        let ids: Vec<_> = store.list().unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 4, 5]);
        assert_eq!(store.count().unwrap(), 4);
    }

    #[test]
    fn test_concurrent_inserts_get_distinct_ids() {
        let store = Arc::new(MemoryStore::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    (0..25)
                        .map(|_| store.insert(new_firework(true)).unwrap().id)
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut ids: Vec<_> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        ids.sort_unstable();
        ids.dedup();

        assert_eq!(ids.len(), 200);
    }
}
