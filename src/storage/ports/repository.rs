//! Repository port for board records.

use crate::board::domain::{Issue, Project, Sprint, Stage};
use crate::organization::domain::{Company, Squad};
use crate::shared::{BoardRecord, Id};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Persistence contract for one record kind.
#[async_trait]
pub trait RecordRepository<T: BoardRecord>: Send + Sync {
    /// Loads every stored record of the kind.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] when the store cannot be read or decoded.
    async fn load_all(&self) -> RepositoryResult<Vec<T>>;

    /// Inserts or updates a record and returns it with its canonical
    /// identifier.
    ///
    /// A record with a temporary identifier is inserted; any other record
    /// replaces the stored one with the same identifier.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] when the record cannot be written.
    async fn save(&self, record: &T) -> RepositoryResult<T>;

    /// Deletes a record. Returns `false` when no record had the identifier.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] when the record cannot be removed.
    async fn delete(&self, id: Id<T>) -> RepositoryResult<bool>;

    /// Overwrites the local copy of the collection with `records`.
    ///
    /// Stores without a local copy ignore the call.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] when the local copy cannot be written.
    async fn mirror(&self, _records: &[T]) -> RepositoryResult<()> {
        Ok(())
    }
}

/// Persistence for every board record kind.
pub trait BoardRepository:
    RecordRepository<Project>
    + RecordRepository<Issue>
    + RecordRepository<Stage>
    + RecordRepository<Sprint>
    + RecordRepository<Squad>
    + RecordRepository<Company>
{
}

impl<R> BoardRepository for R where
    R: RecordRepository<Project>
        + RecordRepository<Issue>
        + RecordRepository<Stage>
        + RecordRepository<Sprint>
        + RecordRepository<Squad>
        + RecordRepository<Company>
{
}

/// Errors returned by repository implementations.
#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    /// A stored value could not be decoded into a record.
    #[error("corrupt {collection} data: {message}")]
    Corrupt {
        /// Collection holding the value.
        collection: &'static str,
        /// Decoder message.
        message: String,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl RepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Reports a value that could not be decoded.
    pub fn corrupt(collection: &'static str, message: impl Into<String>) -> Self {
        Self::Corrupt {
            collection,
            message: message.into(),
        }
    }
}
