//! Remote persistence with a transparent local fallback.
//!
//! Every operation is tried against the remote store first. The first remote
//! failure is logged and switches the repository to the local store for the
//! rest of the session. The local store also keeps a mirror of each
//! collection, refreshed after every applied change.

use crate::shared::{BoardRecord, Id};
use crate::storage::ports::{RecordRepository, RepositoryError, RepositoryResult};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};

/// Repository that prefers `R` and falls back to `L`.
#[derive(Debug)]
pub struct FallbackRepository<R, L> {
    remote: R,
    local: L,
    degraded: AtomicBool,
}

impl<R, L> FallbackRepository<R, L> {
    /// Combines a remote and a local repository.
    #[must_use]
    pub const fn new(remote: R, local: L) -> Self {
        Self {
            remote,
            local,
            degraded: AtomicBool::new(false),
        }
    }

    /// Returns `true` once a remote failure has switched to the local store.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::Acquire)
    }

    /// Returns the local repository.
    #[must_use]
    pub const fn local(&self) -> &L {
        &self.local
    }

    fn degrade(&self, operation: &'static str, collection: &'static str, err: &RepositoryError) {
        let first = !self.degraded.swap(true, Ordering::AcqRel);
        if first {
            tracing::warn!(
                operation,
                collection,
                error = %err,
                "remote store failed, switching to local storage"
            );
        } else {
            tracing::warn!(operation, collection, error = %err, "remote store failed");
        }
    }
}

#[async_trait]
impl<T, R, L> RecordRepository<T> for FallbackRepository<R, L>
where
    T: BoardRecord,
    R: RecordRepository<T>,
    L: RecordRepository<T>,
{
    async fn load_all(&self) -> RepositoryResult<Vec<T>> {
        if !self.is_degraded() {
            match self.remote.load_all().await {
                Ok(records) => {
                    if let Err(err) = self.local.mirror(&records).await {
                        tracing::warn!(
                            collection = T::COLLECTION.as_str(),
                            error = %err,
                            "local mirror not refreshed"
                        );
                    }
                    return Ok(records);
                }
                Err(err) => self.degrade("load", T::COLLECTION.as_str(), &err),
            }
        }
        self.local.load_all().await
    }

    async fn save(&self, record: &T) -> RepositoryResult<T> {
        if !self.is_degraded() {
            match self.remote.save(record).await {
                Ok(saved) => return Ok(saved),
                Err(err) => self.degrade("save", T::COLLECTION.as_str(), &err),
            }
        }
        self.local.save(record).await
    }

    async fn delete(&self, id: Id<T>) -> RepositoryResult<bool> {
        if !self.is_degraded() {
            match self.remote.delete(id).await {
                Ok(removed) => return Ok(removed),
                Err(err) => self.degrade("delete", T::COLLECTION.as_str(), &err),
            }
        }
        self.local.delete(id).await
    }

    async fn mirror(&self, records: &[T]) -> RepositoryResult<()> {
        self.local.mirror(records).await
    }
}
