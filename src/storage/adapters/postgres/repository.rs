//! `PostgreSQL` repository implementation for board records.

use super::models::{CompanyRow, IssueRow, ProjectRow, SprintRow, SquadRow, StageRow};
use super::schema::{companies, issues, projects, sprints, squads, stages};
use crate::board::domain::{Issue, Project, Sprint, Stage};
use crate::organization::domain::{Company, Squad};
use crate::shared::{BoardRecord, Id};
use crate::storage::ports::{RecordRepository, RepositoryError, RepositoryResult};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};

/// `PostgreSQL` connection pool type used by the board adapter.
pub type BoardPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed board repository.
#[derive(Debug, Clone)]
pub struct PostgresRepository {
    pool: BoardPgPool,
}

impl PostgresRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: BoardPgPool) -> Self {
        Self { pool }
    }

    /// Builds a pool for `database_url` and checks that it can connect.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Persistence`] when no connection can be
    /// established.
    pub fn connect(database_url: &str, pool_size: u32) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(database_url);
        let pool = Pool::builder()
            .max_size(pool_size)
            .build(manager)
            .map_err(RepositoryError::persistence)?;
        Ok(Self::new(pool))
    }

    async fn run_blocking<F, T>(&self, f: F) -> RepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(RepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(RepositoryError::persistence)?
    }
}

/// A record kind with a table in the remote database.
pub trait RemoteRecord: BoardRecord {
    /// Loads every row of the table.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] when the query fails or a row is invalid.
    fn load(connection: &mut PgConnection) -> RepositoryResult<Vec<Self>>;

    /// Inserts the record or updates the row with the same identifier.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] when the statement fails.
    fn upsert(connection: &mut PgConnection, record: &Self) -> RepositoryResult<()>;

    /// Deletes the row with the identifier, returning the number removed.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] when the statement fails.
    fn remove(connection: &mut PgConnection, id: Id<Self>) -> RepositoryResult<usize>;
}

#[async_trait]
impl<T: RemoteRecord> RecordRepository<T> for PostgresRepository {
    async fn load_all(&self) -> RepositoryResult<Vec<T>> {
        self.run_blocking(T::load).await
    }

    async fn save(&self, record: &T) -> RepositoryResult<T> {
        let saved = record.clone().with_id(record.id().to_canonical());
        let row_source = saved.clone();
        self.run_blocking(move |connection| T::upsert(connection, &row_source))
            .await?;
        Ok(saved)
    }

    async fn delete(&self, id: Id<T>) -> RepositoryResult<bool> {
        let removed = self
            .run_blocking(move |connection| T::remove(connection, id))
            .await?;
        Ok(removed > 0)
    }
}

impl RemoteRecord for Project {
    fn load(connection: &mut PgConnection) -> RepositoryResult<Vec<Self>> {
        projects::table
            .order(projects::created_at.asc())
            .select(ProjectRow::as_select())
            .load::<ProjectRow>(connection)
            .map_err(RepositoryError::persistence)?
            .into_iter()
            .map(ProjectRow::into_record)
            .collect()
    }

    fn upsert(connection: &mut PgConnection, record: &Self) -> RepositoryResult<()> {
        let row = ProjectRow::from_record(record);
        diesel::insert_into(projects::table)
            .values(&row)
            .on_conflict(projects::id)
            .do_update()
            .set(&row)
            .execute(connection)
            .map_err(RepositoryError::persistence)?;
        Ok(())
    }

    fn remove(connection: &mut PgConnection, id: Id<Self>) -> RepositoryResult<usize> {
        diesel::delete(projects::table.filter(projects::id.eq(id.uuid())))
            .execute(connection)
            .map_err(RepositoryError::persistence)
    }
}

impl RemoteRecord for Issue {
    fn load(connection: &mut PgConnection) -> RepositoryResult<Vec<Self>> {
        issues::table
            .order((issues::project_id.asc(), issues::number.asc()))
            .select(IssueRow::as_select())
            .load::<IssueRow>(connection)
            .map_err(RepositoryError::persistence)?
            .into_iter()
            .map(IssueRow::into_record)
            .collect()
    }

    fn upsert(connection: &mut PgConnection, record: &Self) -> RepositoryResult<()> {
        let row = IssueRow::from_record(record)?;
        diesel::insert_into(issues::table)
            .values(&row)
            .on_conflict(issues::id)
            .do_update()
            .set(&row)
            .execute(connection)
            .map_err(RepositoryError::persistence)?;
        Ok(())
    }

    fn remove(connection: &mut PgConnection, id: Id<Self>) -> RepositoryResult<usize> {
        diesel::delete(issues::table.filter(issues::id.eq(id.uuid())))
            .execute(connection)
            .map_err(RepositoryError::persistence)
    }
}

impl RemoteRecord for Stage {
    fn load(connection: &mut PgConnection) -> RepositoryResult<Vec<Self>> {
        stages::table
            .order((stages::project_id.asc(), stages::position.asc()))
            .select(StageRow::as_select())
            .load::<StageRow>(connection)
            .map_err(RepositoryError::persistence)?
            .into_iter()
            .map(StageRow::into_record)
            .collect()
    }

    fn upsert(connection: &mut PgConnection, record: &Self) -> RepositoryResult<()> {
        let row = StageRow::from_record(record)?;
        diesel::insert_into(stages::table)
            .values(&row)
            .on_conflict(stages::id)
            .do_update()
            .set(&row)
            .execute(connection)
            .map_err(RepositoryError::persistence)?;
        Ok(())
    }

    fn remove(connection: &mut PgConnection, id: Id<Self>) -> RepositoryResult<usize> {
        diesel::delete(stages::table.filter(stages::id.eq(id.uuid())))
            .execute(connection)
            .map_err(RepositoryError::persistence)
    }
}

impl RemoteRecord for Sprint {
    fn load(connection: &mut PgConnection) -> RepositoryResult<Vec<Self>> {
        sprints::table
            .order(sprints::created_at.asc())
            .select(SprintRow::as_select())
            .load::<SprintRow>(connection)
            .map_err(RepositoryError::persistence)?
            .into_iter()
            .map(SprintRow::into_record)
            .collect()
    }

    fn upsert(connection: &mut PgConnection, record: &Self) -> RepositoryResult<()> {
        let row = SprintRow::from_record(record)?;
        diesel::insert_into(sprints::table)
            .values(&row)
            .on_conflict(sprints::id)
            .do_update()
            .set(&row)
            .execute(connection)
            .map_err(RepositoryError::persistence)?;
        Ok(())
    }

    fn remove(connection: &mut PgConnection, id: Id<Self>) -> RepositoryResult<usize> {
        diesel::delete(sprints::table.filter(sprints::id.eq(id.uuid())))
            .execute(connection)
            .map_err(RepositoryError::persistence)
    }
}

impl RemoteRecord for Squad {
    fn load(connection: &mut PgConnection) -> RepositoryResult<Vec<Self>> {
        let rows = squads::table
            .order(squads::created_at.asc())
            .select(SquadRow::as_select())
            .load::<SquadRow>(connection)
            .map_err(RepositoryError::persistence)?;
        Ok(rows.into_iter().map(SquadRow::into_record).collect())
    }

    fn upsert(connection: &mut PgConnection, record: &Self) -> RepositoryResult<()> {
        let row = SquadRow::from_record(record)?;
        diesel::insert_into(squads::table)
            .values(&row)
            .on_conflict(squads::id)
            .do_update()
            .set(&row)
            .execute(connection)
            .map_err(RepositoryError::persistence)?;
        Ok(())
    }

    fn remove(connection: &mut PgConnection, id: Id<Self>) -> RepositoryResult<usize> {
        diesel::delete(squads::table.filter(squads::id.eq(id.uuid())))
            .execute(connection)
            .map_err(RepositoryError::persistence)
    }
}

impl RemoteRecord for Company {
    fn load(connection: &mut PgConnection) -> RepositoryResult<Vec<Self>> {
        companies::table
            .order(companies::created_at.asc())
            .select(CompanyRow::as_select())
            .load::<CompanyRow>(connection)
            .map_err(RepositoryError::persistence)?
            .into_iter()
            .map(CompanyRow::into_record)
            .collect()
    }

    fn upsert(connection: &mut PgConnection, record: &Self) -> RepositoryResult<()> {
        let row = CompanyRow::from_record(record)?;
        diesel::insert_into(companies::table)
            .values(&row)
            .on_conflict(companies::id)
            .do_update()
            .set(&row)
            .execute(connection)
            .map_err(RepositoryError::persistence)?;
        Ok(())
    }

    fn remove(connection: &mut PgConnection, id: Id<Self>) -> RepositoryResult<usize> {
        diesel::delete(companies::table.filter(companies::id.eq(id.uuid())))
            .execute(connection)
            .map_err(RepositoryError::persistence)
    }
}
