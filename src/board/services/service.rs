//! Board service: command dispatch over the entity store and optimistic
//! persistence of the resulting diff.

use super::{BoardCommand, Notice, StateDiff};
use crate::board::domain::{
    BoardDomainError, Change, EntityStore, Issue, IssueError, MoveError, Project, RecordRef, Sprint,
    SprintError, SprintStatus, Stage, StageError, StageKey, StoredRecord, issues, lifecycle,
    pipeline, placement, registry,
};
use crate::config::{ConfigError, SprintboardConfig};
use crate::organization::domain::{Company, OrganizationError, Squad};
use crate::shared::{BoardRecord, Collection, Id};
use crate::storage::ports::{BoardRepository, RecordRepository, RepositoryError};
use mockable::Clock;
use std::cmp::Reverse;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;

/// Service-level errors for board operations.
#[derive(Debug, Error)]
pub enum BoardServiceError {
    /// Scalar validation failed.
    #[error(transparent)]
    Domain(#[from] BoardDomainError),
    /// An issue operation was rejected.
    #[error(transparent)]
    Issue(#[from] IssueError),
    /// A stage operation was rejected.
    #[error(transparent)]
    Stage(#[from] StageError),
    /// A sprint operation was rejected.
    #[error(transparent)]
    Sprint(#[from] SprintError),
    /// A board move was rejected.
    #[error(transparent)]
    Move(#[from] MoveError),
    /// A squad or company operation was rejected.
    #[error(transparent)]
    Organization(#[from] OrganizationError),
    /// Loading persisted records failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    /// A thread panicked while holding the board state.
    #[error("board state lock poisoned")]
    StatePoisoned,
}

/// Result type for board service operations.
pub type BoardServiceResult<T> = Result<T, BoardServiceError>;

/// Rule settings the service applies to every command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSettings {
    /// Largest accepted attachment, in bytes.
    pub max_attachment_bytes: u64,
    /// Stage whose issues count as finished when a sprint closes.
    pub done_key: StageKey,
}

impl BoardSettings {
    /// Reads the settings from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for a malformed done stage key.
    pub fn from_config(config: &SprintboardConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            max_attachment_bytes: config.attachments.max_bytes,
            done_key: config.board.done_key()?,
        })
    }
}

impl Default for BoardSettings {
    fn default() -> Self {
        let config = SprintboardConfig::default();
        Self {
            max_attachment_bytes: config.attachments.max_bytes,
            done_key: StageKey::done(),
        }
    }
}

/// Summary of a startup load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Records loaded across all collections.
    pub records: usize,
    /// Projects that received the default pipeline because they had none.
    pub seeded_projects: usize,
}

/// Board orchestration service.
///
/// The service owns the [`EntityStore`]. Commands are applied to it one at
/// a time; the resulting diff is then written to the repository. Storage
/// failures are logged and never undo the in-memory change.
pub struct BoardService<R, C>
where
    R: BoardRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    settings: BoardSettings,
    state: RwLock<EntityStore>,
}

impl<R, C> BoardService<R, C>
where
    R: BoardRepository,
    C: Clock + Send + Sync,
{
    /// Creates a service with an empty store.
    #[must_use]
    pub fn new(repository: Arc<R>, clock: Arc<C>, settings: BoardSettings) -> Self {
        Self {
            repository,
            clock,
            settings,
            state: RwLock::new(EntityStore::new()),
        }
    }

    /// Returns the rule settings.
    #[must_use]
    pub const fn settings(&self) -> &BoardSettings {
        &self.settings
    }

    /// Replaces the store with every persisted record.
    ///
    /// Projects without stages receive the default pipeline, which is
    /// persisted like any other change.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Repository`] when a collection cannot be
    /// loaded.
    pub async fn load(&self) -> BoardServiceResult<LoadReport> {
        let squads = RecordRepository::<Squad>::load_all(&*self.repository).await?;
        let companies = RecordRepository::<Company>::load_all(&*self.repository).await?;
        let projects = RecordRepository::<Project>::load_all(&*self.repository).await?;
        let stages = RecordRepository::<Stage>::load_all(&*self.repository).await?;
        let sprints = RecordRepository::<Sprint>::load_all(&*self.repository).await?;
        let loaded_issues = RecordRepository::<Issue>::load_all(&*self.repository).await?;
        let records = squads.len()
            + companies.len()
            + projects.len()
            + stages.len()
            + sprints.len()
            + loaded_issues.len();

        let (seeded_projects, mut diff) = {
            let mut store = self.write_state()?;
            let mut fresh = EntityStore::new();
            fresh.replace_all(squads);
            fresh.replace_all(companies);
            fresh.replace_all(projects);
            fresh.replace_all(stages);
            fresh.replace_all(sprints);
            fresh.replace_all(loaded_issues);
            let project_ids: Vec<_> = fresh.projects().iter().map(Project::id).collect();
            let seeded = project_ids
                .into_iter()
                .filter(|project| registry::ensure_pipeline(&mut fresh, *project))
                .count();
            let changes = fresh.take_changes();
            *store = fresh;
            (seeded, StateDiff::new(None, changes, Vec::new()))
        };
        self.persist(&mut diff).await;
        tracing::info!(records, seeded_projects, "board loaded");
        Ok(LoadReport {
            records,
            seeded_projects,
        })
    }

    /// Applies a command and persists the records it changed.
    ///
    /// # Errors
    ///
    /// Returns the controller error when the command is rejected; the store
    /// is left unchanged in that case.
    pub async fn dispatch(&self, command: BoardCommand) -> BoardServiceResult<StateDiff> {
        let name = command.name();
        let mut diff = {
            let mut store = self.write_state()?;
            let applied = self.apply(&mut store, command);
            let changes = store.take_changes();
            let (subject, notices) = applied.inspect_err(|err| {
                tracing::debug!(command = name, error = %err, "command rejected");
            })?;
            StateDiff::new(subject, changes, notices)
        };
        tracing::debug!(command = name, changes = diff.changes().len(), "command applied");
        self.persist(&mut diff).await;
        Ok(diff)
    }

    /// Runs `view` against the current store.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::StatePoisoned`] when the store lock is
    /// poisoned.
    pub fn read<T>(&self, view: impl FnOnce(&EntityStore) -> T) -> BoardServiceResult<T> {
        let store = self.read_state()?;
        Ok(view(&store))
    }

    /// Returns a copy of the current store.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::StatePoisoned`] when the store lock is
    /// poisoned.
    pub fn snapshot(&self) -> BoardServiceResult<EntityStore> {
        self.read(Clone::clone)
    }

    fn apply(
        &self,
        store: &mut EntityStore,
        command: BoardCommand,
    ) -> BoardServiceResult<(Option<RecordRef>, Vec<Notice>)> {
        let clock = &*self.clock;
        let max_bytes = self.settings.max_attachment_bytes;
        let mut notices = Vec::new();
        let subject = match command {
            BoardCommand::CreateProject(draft) => {
                Some(RecordRef::Project(registry::create_project(store, draft, clock)?))
            }
            BoardCommand::DeleteProject(id) => {
                let removed = registry::delete_project(store, id, clock)?;
                notices.push(Notice::ProjectContentsRemoved {
                    issues: removed.issues,
                    sprints: removed.sprints,
                    stages: removed.stages,
                });
                None
            }
            BoardCommand::SaveSquad(draft) => {
                Some(RecordRef::Squad(registry::save_squad(store, draft, clock)?))
            }
            BoardCommand::DeleteSquad(id) => {
                let detached = registry::delete_squad(store, id)?;
                note(&mut notices, detached, Notice::ProjectsWithoutSquad);
                None
            }
            BoardCommand::SaveCompany(draft) => {
                Some(RecordRef::Company(registry::save_company(store, draft, clock)?))
            }
            BoardCommand::DeleteCompany(id) => {
                let detached = registry::delete_company(store, id)?;
                note(&mut notices, detached, Notice::ContractsDetached);
                None
            }
            BoardCommand::SaveStage(draft) => {
                Some(RecordRef::Stage(pipeline::save_stage(store, draft, clock)?))
            }
            BoardCommand::DeleteStage(id) => {
                let deletion = pipeline::delete_stage(store, id, clock)?;
                note(&mut notices, deletion.reassigned, |count| {
                    Notice::StatusesReassigned {
                        fallback: deletion.fallback_key,
                        count,
                    }
                });
                None
            }
            BoardCommand::CreateIssue { project, fields } => Some(RecordRef::Issue(
                issues::create_issue(store, project, fields, max_bytes, clock)?,
            )),
            BoardCommand::UpdateIssue { issue, fields } => {
                issues::update_issue(store, issue, fields, max_bytes, clock)?;
                Some(RecordRef::Issue(issue))
            }
            BoardCommand::DeleteIssue(id) => {
                let deletion = issues::delete_issue(store, id, clock)?;
                note(&mut notices, deletion.orphaned, |count| {
                    Notice::ChildrenOrphaned { issue: id, count }
                });
                None
            }
            BoardCommand::MoveIssue { issue, to } => {
                placement::move_issue(store, issue, &to, clock)?;
                Some(RecordRef::Issue(issue))
            }
            BoardCommand::CreateSprint(draft) => {
                Some(RecordRef::Sprint(lifecycle::create_sprint(store, draft, clock)?))
            }
            BoardCommand::AddToSprint { sprint, issues } => {
                let outcome = lifecycle::add_issues_to_sprint(store, sprint, &issues, clock)?;
                notices.extend(outcome.requires_confirmation.then_some(
                    Notice::ExceptionalSprintAddition {
                        sprint,
                        added: outcome.added,
                    },
                ));
                Some(RecordRef::Sprint(sprint))
            }
            BoardCommand::ActivateSprint(sprint) => {
                lifecycle::activate_sprint(store, sprint, clock)?;
                Some(RecordRef::Sprint(sprint))
            }
            BoardCommand::CloseSprint(sprint) => {
                let done_key = &self.settings.done_key;
                let outcome = lifecycle::close_sprint(store, sprint, done_key, clock)?;
                notices.extend(
                    (outcome.closed_from == SprintStatus::Refinement)
                        .then_some(Notice::ClosedFromRefinement(sprint)),
                );
                note(&mut notices, outcome.returned_to_backlog, |count| {
                    Notice::IssuesReturnedToBacklog { sprint, count }
                });
                Some(RecordRef::Sprint(sprint))
            }
            BoardCommand::DeleteSprint(sprint) => {
                let returned = lifecycle::delete_sprint(store, sprint, clock)?;
                note(&mut notices, returned, |count| Notice::IssuesReturnedToBacklog {
                    sprint,
                    count,
                });
                None
            }
            BoardCommand::RemoveFromSprint { sprint, issue } => {
                lifecycle::remove_from_sprint(store, sprint, issue, clock)?;
                Some(RecordRef::Sprint(sprint))
            }
        };
        Ok((subject, notices))
    }

    async fn persist(&self, diff: &mut StateDiff) {
        let mut upserts = Vec::new();
        let mut removals = Vec::new();
        for change in diff.changes() {
            match *change {
                Change::Upserted(record) => upserts.push(record),
                Change::Removed(record) => removals.push(record),
            }
        }
        upserts.sort_by_key(|record| load_rank(record.collection()));
        removals.sort_by_key(|record| Reverse(load_rank(record.collection())));

        for record in upserts {
            if let Some(canonical) = self.save_ref(record).await {
                diff.rewrite(record, canonical);
            }
        }
        for record in removals {
            self.delete_ref(record).await;
        }
        for collection in diff.touched_collections() {
            self.mirror_collection(collection).await;
        }
    }

    async fn save_ref(&self, record: RecordRef) -> Option<RecordRef> {
        match record {
            RecordRef::Project(id) => self.save_record(id).await.map(RecordRef::Project),
            RecordRef::Issue(id) => self.save_record(id).await.map(RecordRef::Issue),
            RecordRef::Stage(id) => self.save_record(id).await.map(RecordRef::Stage),
            RecordRef::Sprint(id) => self.save_record(id).await.map(RecordRef::Sprint),
            RecordRef::Squad(id) => self.save_record(id).await.map(RecordRef::Squad),
            RecordRef::Company(id) => self.save_record(id).await.map(RecordRef::Company),
        }
    }

    /// Saves one record and writes a new canonical identifier back into the
    /// store. Returns the identifier when it changed.
    async fn save_record<T>(&self, id: Id<T>) -> Option<Id<T>>
    where
        T: StoredRecord,
        R: RecordRepository<T>,
    {
        let record = self.read(|store| store.get(id).cloned()).ok().flatten()?;
        let saved = match RecordRepository::<T>::save(&*self.repository, &record).await {
            Ok(saved) => saved,
            Err(err) => {
                tracing::warn!(
                    collection = T::COLLECTION.as_str(),
                    id = %id,
                    error = %err,
                    "record not persisted"
                );
                return None;
            }
        };
        let canonical = saved.id();
        if canonical == id {
            return None;
        }
        let mut store = self.write_state().ok()?;
        store.reassign(id, canonical).then_some(canonical)
    }

    async fn delete_ref(&self, record: RecordRef) {
        match record {
            RecordRef::Project(id) => self.delete_record(id).await,
            RecordRef::Issue(id) => self.delete_record(id).await,
            RecordRef::Stage(id) => self.delete_record(id).await,
            RecordRef::Sprint(id) => self.delete_record(id).await,
            RecordRef::Squad(id) => self.delete_record(id).await,
            RecordRef::Company(id) => self.delete_record(id).await,
        }
    }

    async fn delete_record<T>(&self, id: Id<T>)
    where
        T: StoredRecord,
        R: RecordRepository<T>,
    {
        if id.is_temporary() {
            return;
        }
        if let Err(err) = RecordRepository::<T>::delete(&*self.repository, id).await {
            tracing::warn!(
                collection = T::COLLECTION.as_str(),
                id = %id,
                error = %err,
                "record deletion not persisted"
            );
        }
    }

    async fn mirror_collection(&self, collection: Collection) {
        match collection {
            Collection::Projects => self.mirror_records::<Project>().await,
            Collection::Issues => self.mirror_records::<Issue>().await,
            Collection::Stages => self.mirror_records::<Stage>().await,
            Collection::Sprints => self.mirror_records::<Sprint>().await,
            Collection::Squads => self.mirror_records::<Squad>().await,
            Collection::Companies => self.mirror_records::<Company>().await,
        }
    }

    async fn mirror_records<T>(&self)
    where
        T: StoredRecord,
        R: RecordRepository<T>,
    {
        let Ok(records) = self.read(|store| store.all::<T>().to_vec()) else {
            return;
        };
        if let Err(err) = RecordRepository::<T>::mirror(&*self.repository, &records).await {
            tracing::warn!(
                collection = T::COLLECTION.as_str(),
                error = %err,
                "local mirror not refreshed"
            );
        }
    }

    fn read_state(&self) -> BoardServiceResult<RwLockReadGuard<'_, EntityStore>> {
        self.state
            .read()
            .map_err(|_| BoardServiceError::StatePoisoned)
    }

    fn write_state(&self) -> BoardServiceResult<RwLockWriteGuard<'_, EntityStore>> {
        self.state
            .write()
            .map_err(|_| BoardServiceError::StatePoisoned)
    }
}

fn note(notices: &mut Vec<Notice>, count: usize, notice: impl FnOnce(usize) -> Notice) {
    if count > 0 {
        notices.push(notice(count));
    }
}

fn load_rank(collection: Collection) -> usize {
    Collection::ALL
        .iter()
        .position(|candidate| *candidate == collection)
        .unwrap_or(Collection::ALL.len())
}
