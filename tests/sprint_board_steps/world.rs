//! Shared world state for sprint board BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use eyre::eyre;
use mockable::DefaultClock;
use rstest::fixture;
use sprintboard::board::domain::{Issue, IssueId, ProjectId, SprintId};
use sprintboard::board::services::{
    BoardCommand, BoardService, BoardServiceError, BoardSettings, StateDiff,
};
use sprintboard::storage::adapters::local::{LocalRepository, MemoryKeyValueStore};

/// Service type used by the BDD world.
pub type TestBoardService = BoardService<LocalRepository<MemoryKeyValueStore>, DefaultClock>;

/// Scenario world for sprint board behaviour tests.
pub struct BoardWorld {
    pub service: TestBoardService,
    pub project: Option<ProjectId>,
    pub sprint: Option<SprintId>,
    pub issues: HashMap<String, IssueId>,
    pub last_result: Option<Result<StateDiff, BoardServiceError>>,
}

impl BoardWorld {
    /// Creates a world over an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        let service = BoardService::new(
            Arc::new(LocalRepository::new(MemoryKeyValueStore::new())),
            Arc::new(DefaultClock),
            BoardSettings::default(),
        );
        Self {
            service,
            project: None,
            sprint: None,
            issues: HashMap::new(),
            last_result: None,
        }
    }

    pub fn project(&self) -> Result<ProjectId, eyre::Report> {
        self.project
            .ok_or_else(|| eyre!("missing project in scenario world"))
    }

    pub fn sprint(&self) -> Result<SprintId, eyre::Report> {
        self.sprint
            .ok_or_else(|| eyre!("missing sprint in scenario world"))
    }

    pub fn issue_id(&self, title: &str) -> Result<IssueId, eyre::Report> {
        self.issues
            .get(title)
            .copied()
            .ok_or_else(|| eyre!("no issue titled {title:?} in scenario world"))
    }

    /// Returns a copy of the stored issue.
    pub fn issue(&self, title: &str) -> Result<Issue, eyre::Report> {
        let id = self.issue_id(title)?;
        self.service
            .read(|store| store.issue(id).cloned())?
            .ok_or_else(|| eyre!("issue {title:?} is not stored"))
    }

    /// Dispatches a command and keeps its result for later assertions.
    pub fn record(&mut self, command: BoardCommand) {
        self.last_result = Some(run_async(self.service.dispatch(command)));
    }

    /// Dispatches a command that must succeed during scenario setup.
    pub fn expect_applied(&self, command: BoardCommand) -> Result<StateDiff, eyre::Report> {
        let name = command.name();
        run_async(self.service.dispatch(command))
            .map_err(|err| eyre!("{name} failed during scenario setup: {err}"))
    }

    pub fn last_result(&self) -> Result<&Result<StateDiff, BoardServiceError>, eyre::Report> {
        self.last_result
            .as_ref()
            .ok_or_else(|| eyre!("no command has been dispatched"))
    }
}

impl Default for BoardWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> BoardWorld {
    BoardWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
