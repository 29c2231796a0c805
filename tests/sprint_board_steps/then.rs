//! Then steps for sprint board BDD scenarios.

use super::world::BoardWorld;
use eyre::eyre;
use rstest_bdd_macros::then;
use sprintboard::board::domain::{HierarchyError, IssueError, MoveError, SprintError};
use sprintboard::board::services::BoardServiceError;

#[then(r#"the issue "{title}" has status "{key}""#)]
fn issue_has_status(world: &BoardWorld, title: String, key: String) -> Result<(), eyre::Report> {
    let issue = world.issue(&title)?;
    if issue.status().as_str() != key {
        return Err(eyre!(
            "expected {title:?} at {key:?}, found {:?}",
            issue.status().as_str()
        ));
    }
    Ok(())
}

#[then("the last command succeeds")]
fn last_command_succeeds(world: &BoardWorld) -> Result<(), eyre::Report> {
    match world.last_result()? {
        Ok(_) => Ok(()),
        Err(err) => Err(eyre!("expected success, got {err}")),
    }
}

#[then("the move is rejected because the sprint has not started")]
fn move_rejected_sprint_not_started(world: &BoardWorld) -> Result<(), eyre::Report> {
    let result = world.last_result()?;
    if !matches!(
        result,
        Err(BoardServiceError::Move(MoveError::SprintNotStarted))
    ) {
        return Err(eyre!("expected SprintNotStarted, got {result:?}"));
    }
    Ok(())
}

#[then("the update is rejected as a circular reference")]
fn update_rejected_as_cycle(world: &BoardWorld) -> Result<(), eyre::Report> {
    let result = world.last_result()?;
    if !matches!(
        result,
        Err(BoardServiceError::Issue(IssueError::Hierarchy(
            HierarchyError::CircularReference(_)
        )))
    ) {
        return Err(eyre!("expected CircularReference, got {result:?}"));
    }
    Ok(())
}

#[then("activation is rejected because {count:usize} issue is in the backlog stage")]
fn activation_blocked(world: &BoardWorld, count: usize) -> Result<(), eyre::Report> {
    let result = world.last_result()?;
    match result {
        Err(BoardServiceError::Sprint(SprintError::BacklogItemsBlockActivation {
            count: blocked,
        })) if *blocked == count => Ok(()),
        other => Err(eyre!(
            "expected {count} backlog item(s) to block activation, got {other:?}"
        )),
    }
}

#[then(r#"the sprint is "{status}""#)]
fn sprint_status_is(world: &BoardWorld, status: String) -> Result<(), eyre::Report> {
    let sprint = world.sprint()?;
    let actual = world
        .service
        .read(|store| store.sprint(sprint).map(|found| found.status()))?
        .ok_or_else(|| eyre!("sprint is not stored"))?;
    if actual.as_str() != status {
        return Err(eyre!("expected sprint {status:?}, found {actual}"));
    }
    Ok(())
}

#[then("the project has {count:usize} stages")]
fn project_stage_count(world: &BoardWorld, count: usize) -> Result<(), eyre::Report> {
    let project = world.project()?;
    let actual = world.service.read(|store| store.pipeline(project).len())?;
    if actual != count {
        return Err(eyre!("expected {count} stages, found {actual}"));
    }
    Ok(())
}

#[then(r#"the issue "{title}" has no parent"#)]
fn issue_has_no_parent(world: &BoardWorld, title: String) -> Result<(), eyre::Report> {
    let issue = world.issue(&title)?;
    match issue.parent_id() {
        None => Ok(()),
        Some(parent) => Err(eyre!("expected {title:?} without parent, found {parent}")),
    }
}

#[then(r#"the issue "{title}" stays in the sprint"#)]
fn issue_stays_in_sprint(world: &BoardWorld, title: String) -> Result<(), eyre::Report> {
    let sprint = world.sprint()?;
    let issue = world.issue(&title)?;
    if issue.sprint_id() != Some(sprint) {
        return Err(eyre!("expected {title:?} to keep its sprint link"));
    }
    Ok(())
}

#[then(r#"the issue "{title}" is back in the backlog"#)]
fn issue_back_in_backlog(world: &BoardWorld, title: String) -> Result<(), eyre::Report> {
    let issue = world.issue(&title)?;
    if !issue.is_in_backlog() || issue.sprint_order().is_some() {
        return Err(eyre!("expected {title:?} back in the backlog"));
    }
    Ok(())
}
