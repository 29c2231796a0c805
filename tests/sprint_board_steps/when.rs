//! When steps for sprint board BDD scenarios.

use super::world::BoardWorld;
use eyre::eyre;
use rstest_bdd_macros::when;
use sprintboard::board::domain::{StageKey, issues::IssueFields};
use sprintboard::board::services::BoardCommand;
use sprintboard::shared::BoardRecord;

#[when(r#"the issue "{title}" is added to the sprint"#)]
fn issue_added_to_sprint(world: &mut BoardWorld, title: String) -> Result<(), eyre::Report> {
    let sprint = world.sprint()?;
    let issue = world.issue_id(&title)?;
    world.record(BoardCommand::AddToSprint {
        sprint,
        issues: vec![issue],
    });
    Ok(())
}

#[when(r#"the issue "{title}" is moved to "{stage}""#)]
fn issue_moved(world: &mut BoardWorld, title: String, stage: String) -> Result<(), eyre::Report> {
    let issue = world.issue_id(&title)?;
    let to = StageKey::new(stage)?;
    world.record(BoardCommand::MoveIssue { issue, to });
    Ok(())
}

#[when("the sprint is activated")]
fn sprint_activated(world: &mut BoardWorld) -> Result<(), eyre::Report> {
    let sprint = world.sprint()?;
    world.record(BoardCommand::ActivateSprint(sprint));
    Ok(())
}

#[when("the sprint is closed")]
fn sprint_closed(world: &mut BoardWorld) -> Result<(), eyre::Report> {
    let sprint = world.sprint()?;
    world.record(BoardCommand::CloseSprint(sprint));
    Ok(())
}

#[when(r#"the stage "{key}" is deleted"#)]
fn stage_deleted(world: &mut BoardWorld, key: String) -> Result<(), eyre::Report> {
    let project = world.project()?;
    let stage_key = StageKey::new(key.as_str())?;
    let stage = world
        .service
        .read(|store| {
            store
                .pipeline(project)
                .stage_with_key(&stage_key)
                .map(BoardRecord::id)
        })?
        .ok_or_else(|| eyre!("project has no stage {key:?}"))?;
    world.record(BoardCommand::DeleteStage(stage));
    Ok(())
}

#[when(r#"the parent of "{child}" is set to "{parent}""#)]
fn parent_set(world: &mut BoardWorld, child: String, parent: String) -> Result<(), eyre::Report> {
    let current = world.issue(&child)?;
    let parent_id = world.issue_id(&parent)?;
    let fields = IssueFields {
        story_points: current.story_points(),
        ..IssueFields::new(current.title(), current.issue_type()).with_parent(parent_id)
    };
    world.record(BoardCommand::UpdateIssue {
        issue: current.id(),
        fields,
    });
    Ok(())
}
