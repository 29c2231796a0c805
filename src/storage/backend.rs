//! Startup selection of the persistence variant.

use crate::config::{StorageConfig, StorageMode};
use crate::shared::Id;
use crate::storage::adapters::fallback::FallbackRepository;
use crate::storage::adapters::local::{FileKeyValueStore, LocalRepository};
use crate::storage::adapters::postgres::{PostgresRepository, RemoteRecord};
use crate::storage::ports::{RecordRepository, RepositoryError, RepositoryResult};
use async_trait::async_trait;

/// Local repository over the configured directory.
pub type LocalFiles = LocalRepository<FileKeyValueStore>;

/// Persistence variant chosen once at startup.
#[derive(Debug)]
pub enum PersistenceBackend {
    /// Remote database with the local files as fallback and mirror.
    Remote(FallbackRepository<PostgresRepository, LocalFiles>),
    /// Local files only.
    Local(LocalFiles),
}

impl PersistenceBackend {
    /// Selects the variant described by `config`.
    ///
    /// The remote variant is used only when it is requested, a database URL
    /// is configured and a connection succeeds; otherwise the local files
    /// are used. Connecting blocks the calling thread.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Persistence`] when the local directory
    /// cannot be opened.
    pub fn from_config(config: &StorageConfig) -> RepositoryResult<Self> {
        let local = LocalRepository::new(
            FileKeyValueStore::open(&config.local_dir).map_err(RepositoryError::persistence)?,
        );
        if config.mode == StorageMode::Local {
            tracing::info!(dir = %config.local_dir, "using local storage");
            return Ok(Self::Local(local));
        }
        let Some(url) = config.database_url.as_deref() else {
            tracing::warn!("no database url configured, using local storage");
            return Ok(Self::Local(local));
        };
        match PostgresRepository::connect(url, config.pool_size) {
            Ok(remote) => {
                tracing::info!(dir = %config.local_dir, "using remote storage with local fallback");
                Ok(Self::Remote(FallbackRepository::new(remote, local)))
            }
            Err(err) => {
                tracing::warn!(error = %err, "remote storage unavailable, using local storage");
                Ok(Self::Local(local))
            }
        }
    }

    /// Returns the variant name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Remote(_) => "remote",
            Self::Local(_) => "local",
        }
    }
}

#[async_trait]
impl<T: RemoteRecord> RecordRepository<T> for PersistenceBackend {
    async fn load_all(&self) -> RepositoryResult<Vec<T>> {
        match self {
            Self::Remote(repository) => repository.load_all().await,
            Self::Local(repository) => repository.load_all().await,
        }
    }

    async fn save(&self, record: &T) -> RepositoryResult<T> {
        match self {
            Self::Remote(repository) => repository.save(record).await,
            Self::Local(repository) => repository.save(record).await,
        }
    }

    async fn delete(&self, id: Id<T>) -> RepositoryResult<bool> {
        match self {
            Self::Remote(repository) => repository.delete(id).await,
            Self::Local(repository) => repository.delete(id).await,
        }
    }

    async fn mirror(&self, records: &[T]) -> RepositoryResult<()> {
        match self {
            Self::Remote(repository) => repository.mirror(records).await,
            Self::Local(repository) => repository.mirror(records).await,
        }
    }
}
