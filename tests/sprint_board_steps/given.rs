//! Given steps for sprint board BDD scenarios.

use super::world::BoardWorld;
use chrono::Utc;
use eyre::eyre;
use rstest_bdd_macros::given;
use sprintboard::board::domain::{IssueType, ProjectDraft, SprintDraft, issues::IssueFields};
use sprintboard::board::services::BoardCommand;
use sprintboard::organization::domain::{Contract, MemberDraft, SquadDraft};

#[given(r#"a project "{key}" with the default pipeline"#)]
fn project_with_default_pipeline(world: &mut BoardWorld, key: String) -> Result<(), eyre::Report> {
    let squad = world
        .expect_applied(BoardCommand::SaveSquad(SquadDraft {
            id: None,
            name: "Core".to_owned(),
            members: vec![MemberDraft {
                id: None,
                name: "Ana".to_owned(),
                role: "Developer".to_owned(),
                email: "ana@example.com".to_owned(),
                contract: Contract::Unspecified,
            }],
        }))?
        .subject_id()
        .ok_or_else(|| eyre!("squad creation reported no subject"))?;
    let project = world
        .expect_applied(BoardCommand::CreateProject(ProjectDraft {
            name: format!("Project {key}"),
            key,
            description: String::new(),
            squad_id: squad,
        }))?
        .subject_id()
        .ok_or_else(|| eyre!("project creation reported no subject"))?;
    world.project = Some(project);
    Ok(())
}

fn create_issue(
    world: &mut BoardWorld,
    fields: IssueFields,
) -> Result<(), eyre::Report> {
    let project = world.project()?;
    let title = fields.title.clone();
    let issue = world
        .expect_applied(BoardCommand::CreateIssue { project, fields })?
        .subject_id()
        .ok_or_else(|| eyre!("issue creation reported no subject"))?;
    world.issues.insert(title, issue);
    Ok(())
}

#[given(r#"a task "{title}" in the backlog"#)]
fn task_in_backlog(world: &mut BoardWorld, title: String) -> Result<(), eyre::Report> {
    create_issue(world, IssueFields::new(title, IssueType::Task))
}

#[given(r#"an epic "{title}""#)]
fn epic(world: &mut BoardWorld, title: String) -> Result<(), eyre::Report> {
    create_issue(world, IssueFields::new(title, IssueType::Epic))
}

#[given(r#"a story "{title}" under "{parent}""#)]
fn story_under(world: &mut BoardWorld, title: String, parent: String) -> Result<(), eyre::Report> {
    let parent_id = world.issue_id(&parent)?;
    create_issue(
        world,
        IssueFields::new(title, IssueType::Story)
            .with_parent(parent_id)
            .with_story_points(3),
    )
}

#[given(r#"a sprint "{name}" being refined"#)]
fn sprint_being_refined(world: &mut BoardWorld, name: String) -> Result<(), eyre::Report> {
    let project = world.project()?;
    let sprint = world
        .expect_applied(BoardCommand::CreateSprint(SprintDraft {
            project_id: project,
            name,
            weeks: 2,
            goal: String::new(),
            start_date: Utc::now().date_naive(),
        }))?
        .subject_id()
        .ok_or_else(|| eyre!("sprint creation reported no subject"))?;
    world.sprint = Some(sprint);
    Ok(())
}
