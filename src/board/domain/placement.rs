//! Board placement: moving issues between stages.
//!
//! Only members of the project's current sprint move on the board. While
//! that sprint is still being refined, work may gather on the second stage
//! but may not leave it until the sprint is activated.

use super::{EntityStore, Issue, IssueId, MoveError, Sprint, SprintStatus, StageKey, StagePipeline};
use crate::shared::BoardRecord;
use mockable::Clock;

/// Result of a board move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The issue changed stage.
    Moved {
        /// Stage the issue left.
        from: StageKey,
        /// Stage the issue entered.
        to: StageKey,
    },
    /// The issue already sat at the target stage.
    Unchanged,
}

/// Checks whether `issue` may move from `from` to `to`.
///
/// # Errors
///
/// Returns [`MoveError::UnknownStage`] when `to` is not in the pipeline,
/// [`MoveError::NotInActiveSprint`] unless the issue belongs to
/// `current_sprint`, and [`MoveError::SprintNotStarted`] when a refining
/// sprint's issue would leave the second stage.
pub fn can_move(
    issue: &Issue,
    from: &StageKey,
    to: &StageKey,
    current_sprint: Option<&Sprint>,
    pipeline: &StagePipeline<'_>,
) -> Result<(), MoveError> {
    if !pipeline.contains_key(to) {
        return Err(MoveError::UnknownStage(to.clone()));
    }
    let Some(sprint) = current_sprint.filter(|sprint| issue.sprint_id() == Some(sprint.id()))
    else {
        return Err(MoveError::NotInActiveSprint(issue.id()));
    };
    if sprint.status() == SprintStatus::Refinement {
        let leaves_second_stage = pipeline
            .second_stage()
            .is_some_and(|second| second.key() == from && second.key() != to);
        if leaves_second_stage {
            return Err(MoveError::SprintNotStarted);
        }
    }
    Ok(())
}

/// Moves an issue to the stage with key `to`.
///
/// Moving an issue to the stage it already occupies changes nothing.
///
/// # Errors
///
/// Returns [`MoveError::IssueNotFound`] for an unknown issue and the errors
/// of [`can_move`].
pub fn move_issue(
    store: &mut EntityStore,
    issue_id: IssueId,
    to: &StageKey,
    clock: &impl Clock,
) -> Result<MoveOutcome, MoveError> {
    let issue = store
        .issue(issue_id)
        .ok_or(MoveError::IssueNotFound(issue_id))?;
    let project = issue.project_id();
    let pipeline = store.pipeline(project);
    if !pipeline.contains_key(to) {
        return Err(MoveError::UnknownStage(to.clone()));
    }
    let from = issue.status().clone();
    if from == *to {
        return Ok(MoveOutcome::Unchanged);
    }
    can_move(issue, &from, to, store.current_sprint(project), &pipeline)?;

    let timestamp = clock.utc();
    let target = to.clone();
    store.update(issue_id, |moved: &mut Issue| moved.set_status(target, timestamp));
    tracing::debug!(issue = %issue_id, %from, %to, "issue moved");
    Ok(MoveOutcome::Moved {
        from,
        to: to.clone(),
    })
}
