//! Command dispatch and persistence orchestration tests.

use std::sync::Arc;

use super::fixtures::{FixedClock, clock, squad_draft};
use crate::board::domain::{
    Issue, IssueType, Project, ProjectDraft, ProjectId, RecordRef, Sprint, SprintDraft, SprintError, Stage,
    issues::IssueFields,
};
use crate::board::services::{
    BoardCommand, BoardService, BoardServiceError, BoardSettings, Notice,
};
use crate::organization::domain::{Squad, SquadId};
use crate::shared::{BoardRecord, Collection, Id};
use crate::storage::adapters::local::{LocalRepository, MemoryKeyValueStore};
use crate::storage::ports::{RecordRepository, RepositoryError, RepositoryResult};
use async_trait::async_trait;
use chrono::NaiveDate;
use rstest::{fixture, rstest};

type MemoryRepository = LocalRepository<MemoryKeyValueStore>;
type TestService = BoardService<MemoryRepository, FixedClock>;

/// Repository whose every call fails.
struct OfflineRepository;

#[async_trait]
impl<T: BoardRecord> RecordRepository<T> for OfflineRepository {
    async fn load_all(&self) -> RepositoryResult<Vec<T>> {
        Err(offline())
    }

    async fn save(&self, _record: &T) -> RepositoryResult<T> {
        Err(offline())
    }

    async fn delete(&self, _id: Id<T>) -> RepositoryResult<bool> {
        Err(offline())
    }
}

fn offline() -> RepositoryError {
    RepositoryError::persistence(std::io::Error::other("database offline"))
}

#[fixture]
fn repository() -> Arc<MemoryRepository> {
    Arc::new(LocalRepository::new(MemoryKeyValueStore::new()))
}

#[fixture]
fn service(repository: Arc<MemoryRepository>, clock: FixedClock) -> TestService {
    BoardService::new(repository, Arc::new(clock), BoardSettings::default())
}

async fn project(service: &TestService) -> (SquadId, ProjectId) {
    let squad = service
        .dispatch(BoardCommand::SaveSquad(squad_draft("Core")))
        .await
        .expect("squad saves")
        .subject_id::<Squad>()
        .expect("squad subject");
    let project = service
        .dispatch(BoardCommand::CreateProject(ProjectDraft {
            name: "Sprintboard".to_owned(),
            key: "SB".to_owned(),
            description: String::new(),
            squad_id: squad,
        }))
        .await
        .expect("project saves")
        .subject_id::<Project>()
        .expect("project subject");
    (squad, project)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn saved_records_receive_canonical_ids(
    repository: Arc<MemoryRepository>,
    clock: FixedClock,
) {
    let service = BoardService::new(
        Arc::clone(&repository),
        Arc::new(clock),
        BoardSettings::default(),
    );

    let (squad, project) = project(&service).await;

    assert!(!squad.is_temporary());
    assert!(!project.is_temporary());
    let stored_projects = RecordRepository::<Project>::load_all(&*repository)
        .await
        .expect("projects load");
    let stored_stages = RecordRepository::<Stage>::load_all(&*repository)
        .await
        .expect("stages load");
    assert_eq!(stored_projects.iter().map(BoardRecord::id).collect::<Vec<_>>(), [project]);
    assert_eq!(stored_stages.len(), 4);
    assert!(stored_stages.iter().all(|stage| stage.project_id() == project));
    let in_memory = service
        .read(|store| store.project(project).map(Project::squad_id))
        .expect("store readable");
    assert_eq!(in_memory, Some(Some(squad)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn diff_lists_every_changed_record(service: TestService) {
    let (_, project) = project(&service).await;

    let diff = service
        .dispatch(BoardCommand::CreateIssue {
            project,
            fields: IssueFields::new("First", IssueType::Task),
        })
        .await
        .expect("issue saves");

    let issue = diff.subject_id::<Issue>().expect("issue subject");
    assert!(!issue.is_temporary());
    assert!(diff.upserted(RecordRef::Issue(issue)));
    assert_eq!(diff.touched_collections(), [Collection::Issues]);
    assert!(diff.notices().is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_commands_change_nothing(service: TestService) {
    let (_, project) = project(&service).await;
    let before = service.snapshot().expect("store readable");

    let result = service
        .dispatch(BoardCommand::CreateSprint(SprintDraft {
            project_id: project,
            name: "Sprint 0".to_owned(),
            weeks: 0,
            goal: String::new(),
            start_date: NaiveDate::from_ymd_opt(2026, 3, 2).expect("valid date"),
        }))
        .await;

    assert!(matches!(
        result,
        Err(BoardServiceError::Sprint(SprintError::InvalidSprintDuration))
    ));
    assert_eq!(service.snapshot().expect("store readable"), before);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn closing_a_refining_sprint_raises_notices(service: TestService) {
    let (_, project) = project(&service).await;
    let issue = service
        .dispatch(BoardCommand::CreateIssue {
            project,
            fields: IssueFields::new("Planned", IssueType::Task),
        })
        .await
        .expect("issue saves")
        .subject_id::<Issue>()
        .expect("issue subject");
    let sprint = service
        .dispatch(BoardCommand::CreateSprint(SprintDraft {
            project_id: project,
            name: "Sprint 1".to_owned(),
            weeks: 2,
            goal: String::new(),
            start_date: NaiveDate::from_ymd_opt(2026, 3, 2).expect("valid date"),
        }))
        .await
        .expect("sprint saves")
        .subject_id::<Sprint>()
        .expect("sprint subject");
    service
        .dispatch(BoardCommand::AddToSprint {
            sprint,
            issues: vec![issue],
        })
        .await
        .expect("issue joins");

    let diff = service
        .dispatch(BoardCommand::CloseSprint(sprint))
        .await
        .expect("sprint closes");

    assert_eq!(
        diff.notices(),
        [
            Notice::ClosedFromRefinement(sprint),
            Notice::IssuesReturnedToBacklog { sprint, count: 1 },
        ]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_squad_reports_unassigned_projects(service: TestService) {
    let (squad, project) = project(&service).await;

    let diff = service
        .dispatch(BoardCommand::DeleteSquad(squad))
        .await
        .expect("squad deletes");

    assert_eq!(diff.notices(), [Notice::ProjectsWithoutSquad(1)]);
    assert!(diff.removed(RecordRef::Squad(squad)));
    assert!(diff.upserted(RecordRef::Project(project)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn storage_failures_keep_the_applied_change(clock: FixedClock) {
    let service = BoardService::new(
        Arc::new(OfflineRepository),
        Arc::new(clock),
        BoardSettings::default(),
    );

    let diff = service
        .dispatch(BoardCommand::SaveSquad(squad_draft("Core")))
        .await
        .expect("command applies despite storage failure");

    let squad: SquadId = diff.subject_id().expect("squad subject");
    assert!(squad.is_temporary());
    assert_eq!(
        service
            .read(|store| store.squads().len())
            .expect("store readable"),
        1
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn loading_fails_when_storage_is_unreadable(clock: FixedClock) {
    let service = BoardService::new(
        Arc::new(OfflineRepository),
        Arc::new(clock),
        BoardSettings::default(),
    );

    let result = service.load().await;

    assert!(matches!(result, Err(BoardServiceError::Repository(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn loading_seeds_pipelines_for_projects_without_stages(
    repository: Arc<MemoryRepository>,
    clock: FixedClock,
) {
    let writer = BoardService::new(
        Arc::clone(&repository),
        Arc::new(clock),
        BoardSettings::default(),
    );
    let (_, project) = project(&writer).await;
    RecordRepository::<Stage>::mirror(&*repository, &[])
        .await
        .expect("stages cleared");
    let reader = BoardService::new(
        Arc::clone(&repository),
        Arc::new(clock),
        BoardSettings::default(),
    );

    let report = reader.load().await.expect("board loads");

    assert_eq!(report.seeded_projects, 1);
    assert_eq!(report.records, 2);
    let pipeline_len = reader
        .read(|store| store.pipeline(project).len())
        .expect("store readable");
    assert_eq!(pipeline_len, 4);
    let persisted = RecordRepository::<Stage>::load_all(&*repository)
        .await
        .expect("stages load");
    assert_eq!(persisted.len(), 4);
    assert!(persisted.iter().all(|stage| !stage.id().is_temporary()));
}
