//! Repository over a key-value store.

use super::KeyValueStore;
use crate::shared::{BoardRecord, Id};
use crate::storage::ports::{RecordRepository, RepositoryError, RepositoryResult};
use async_trait::async_trait;
use std::sync::Mutex;

/// Repository keeping each collection as one JSON list in a key-value store.
///
/// Saves upsert by identifier. Records saved with a temporary identifier are
/// stored under its canonical form.
#[derive(Debug)]
pub struct LocalRepository<S> {
    store: S,
    write_lock: Mutex<()>,
}

impl<S: KeyValueStore> LocalRepository<S> {
    /// Creates a repository over `store`.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Returns the underlying key-value store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    fn read_collection<T: BoardRecord>(&self) -> RepositoryResult<Vec<T>> {
        let collection = T::COLLECTION;
        let Some(raw) = self
            .store
            .read(collection.storage_key())
            .map_err(RepositoryError::persistence)?
        else {
            return Ok(Vec::new());
        };
        serde_json::from_str(&raw)
            .map_err(|err| RepositoryError::corrupt(collection.as_str(), err.to_string()))
    }

    fn write_collection<T: BoardRecord>(&self, records: &[T]) -> RepositoryResult<()> {
        let raw = serde_json::to_string(records).map_err(RepositoryError::persistence)?;
        self.store
            .write(T::COLLECTION.storage_key(), &raw)
            .map_err(RepositoryError::persistence)
    }

    fn locked<R>(&self, apply: impl FnOnce() -> RepositoryResult<R>) -> RepositoryResult<R> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|err| RepositoryError::persistence(std::io::Error::other(err.to_string())))?;
        apply()
    }
}

#[async_trait]
impl<S, T> RecordRepository<T> for LocalRepository<S>
where
    S: KeyValueStore,
    T: BoardRecord,
{
    async fn load_all(&self) -> RepositoryResult<Vec<T>> {
        self.read_collection()
    }

    async fn save(&self, record: &T) -> RepositoryResult<T> {
        self.locked(|| {
            let canonical_id = record.id().to_canonical();
            let saved = record.clone().with_id(canonical_id);
            let mut records: Vec<T> = self.read_collection()?;
            let mut replaced = false;
            for stored in records
                .iter_mut()
                .filter(|stored| stored.id() == canonical_id || stored.id() == record.id())
            {
                *stored = saved.clone();
                replaced = true;
            }
            if !replaced {
                records.push(saved.clone());
            }
            self.write_collection(&records)?;
            Ok(saved)
        })
    }

    async fn delete(&self, id: Id<T>) -> RepositoryResult<bool> {
        self.locked(|| {
            let mut records: Vec<T> = self.read_collection()?;
            let before = records.len();
            records.retain(|stored| stored.id() != id);
            if records.len() == before {
                return Ok(false);
            }
            self.write_collection(&records)?;
            Ok(true)
        })
    }

    async fn mirror(&self, records: &[T]) -> RepositoryResult<()> {
        self.locked(|| self.write_collection(records))
    }
}
