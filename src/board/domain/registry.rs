//! Projects, squads and companies.
//!
//! Creating a project seeds the default stage pipeline. Deleting a project
//! removes everything it owns, while deleting a squad or company only clears
//! the references other records hold to it.

use super::{
    BoardDomainError, EntityStore, Issue, Project, ProjectDraft, ProjectId, Sprint, Stage,
};
use crate::organization::domain::{
    Company, CompanyDraft, CompanyId, OrganizationError, Squad, SquadDraft, SquadId,
};
use crate::shared::BoardRecord;
use mockable::Clock;

/// Records removed together with a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectDeletion {
    /// Issues removed.
    pub issues: usize,
    /// Sprints removed.
    pub sprints: usize,
    /// Stages removed.
    pub stages: usize,
}

/// Creates a project with the default stage pipeline.
///
/// # Errors
///
/// Returns [`BoardDomainError::SquadNotFound`] for an unknown squad,
/// [`BoardDomainError::DuplicateProjectKey`] when the upper-cased key is
/// taken, and the validation errors of [`Project::new`].
pub fn create_project(
    store: &mut EntityStore,
    draft: ProjectDraft,
    clock: &impl Clock,
) -> Result<ProjectId, BoardDomainError> {
    if !store.contains(draft.squad_id) {
        return Err(BoardDomainError::SquadNotFound(draft.squad_id));
    }
    let project = Project::new(draft, clock.utc())?;
    if store
        .projects()
        .iter()
        .any(|other| other.key() == project.key())
    {
        return Err(BoardDomainError::DuplicateProjectKey(
            project.key().as_str().to_owned(),
        ));
    }
    let id = store.insert(project);
    for stage in Stage::default_pipeline(id) {
        store.insert(stage);
    }
    Ok(id)
}

/// Seeds the default pipeline into a project that has no stages.
///
/// Returns `true` when stages were added.
pub fn ensure_pipeline(store: &mut EntityStore, project: ProjectId) -> bool {
    if !store.pipeline(project).is_empty() {
        return false;
    }
    for stage in Stage::default_pipeline(project) {
        store.insert(stage);
    }
    true
}

/// Deletes a project with its issues, sprints and stages.
///
/// Issues of other projects still pointing at a removed issue lose their
/// parent link.
///
/// # Errors
///
/// Returns [`BoardDomainError::ProjectNotFound`] for an unknown project.
pub fn delete_project(
    store: &mut EntityStore,
    id: ProjectId,
    clock: &impl Clock,
) -> Result<ProjectDeletion, BoardDomainError> {
    if !store.contains(id) {
        return Err(BoardDomainError::ProjectNotFound(id));
    }
    let issues: Vec<_> = store.issues_of(id).map(Issue::id).collect();
    let sprints: Vec<_> = store
        .sprints()
        .iter()
        .filter(|sprint| sprint.project_id() == id)
        .map(Sprint::id)
        .collect();
    let stages: Vec<_> = store
        .stages()
        .iter()
        .filter(|stage| stage.project_id() == id)
        .map(Stage::id)
        .collect();
    let strays: Vec<_> = store
        .issues()
        .iter()
        .filter(|issue| issue.project_id() != id)
        .filter(|issue| issue.parent_id().is_some_and(|parent| issues.contains(&parent)))
        .map(Issue::id)
        .collect();
    let timestamp = clock.utc();
    for stray in strays {
        store.update(stray, |issue: &mut Issue| issue.clear_parent(timestamp));
    }
    for issue in &issues {
        store.remove::<Issue>(*issue);
    }
    for sprint in &sprints {
        store.remove::<Sprint>(*sprint);
    }
    for stage in &stages {
        store.remove::<Stage>(*stage);
    }
    store.remove::<Project>(id);
    Ok(ProjectDeletion {
        issues: issues.len(),
        sprints: sprints.len(),
        stages: stages.len(),
    })
}

/// Creates a squad or replaces an existing one, keeping its creation time.
///
/// # Errors
///
/// Returns [`OrganizationError::SquadNotFound`] when the draft names an
/// unknown squad, and the validation errors of [`Squad::new`].
pub fn save_squad(
    store: &mut EntityStore,
    draft: SquadDraft,
    clock: &impl Clock,
) -> Result<SquadId, OrganizationError> {
    let created_at = draft
        .id
        .map(|id| {
            store
                .squad(id)
                .map(Squad::created_at)
                .ok_or(OrganizationError::SquadNotFound(id))
        })
        .transpose()?
        .unwrap_or_else(|| clock.utc());
    let squad = Squad::new(draft, created_at)?;
    Ok(store.upsert(squad))
}

/// Deletes a squad, clearing it from the projects it worked on.
///
/// Returns the number of projects left without a squad.
///
/// # Errors
///
/// Returns [`OrganizationError::SquadNotFound`] for an unknown squad.
pub fn delete_squad(store: &mut EntityStore, id: SquadId) -> Result<usize, OrganizationError> {
    if !store.contains(id) {
        return Err(OrganizationError::SquadNotFound(id));
    }
    let projects: Vec<_> = store
        .projects()
        .iter()
        .filter(|project| project.squad_id() == Some(id))
        .map(Project::id)
        .collect();
    for project in &projects {
        store.update(*project, |target: &mut Project| target.forget_squad(id));
    }
    store.remove::<Squad>(id);
    Ok(projects.len())
}

/// Creates a company or replaces an existing one, keeping its creation
/// time.
///
/// # Errors
///
/// Returns [`OrganizationError::CompanyNotFound`] when the draft names an
/// unknown company, and the validation errors of [`Company::new`].
pub fn save_company(
    store: &mut EntityStore,
    draft: CompanyDraft,
    clock: &impl Clock,
) -> Result<CompanyId, OrganizationError> {
    let created_at = draft
        .id
        .map(|id| {
            store
                .company(id)
                .map(Company::created_at)
                .ok_or(OrganizationError::CompanyNotFound(id))
        })
        .transpose()?
        .unwrap_or_else(|| clock.utc());
    let company = Company::new(draft, created_at)?;
    Ok(store.upsert(company))
}

/// Deletes a company, clearing member contracts that referenced it.
///
/// Returns the number of squads whose members were updated.
///
/// # Errors
///
/// Returns [`OrganizationError::CompanyNotFound`] for an unknown company.
pub fn delete_company(store: &mut EntityStore, id: CompanyId) -> Result<usize, OrganizationError> {
    if !store.contains(id) {
        return Err(OrganizationError::CompanyNotFound(id));
    }
    let squads: Vec<_> = store
        .squads()
        .iter()
        .filter(|squad| squad.references_company(id))
        .map(Squad::id)
        .collect();
    for squad in &squads {
        store.update(*squad, |target: &mut Squad| target.forget_company(id));
    }
    store.remove::<Company>(id);
    Ok(squads.len())
}
