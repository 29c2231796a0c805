//! Sprint lifecycle: `refinamento` → `active` → `closed`.
//!
//! A project has at most one sprint that is not closed. Issues join a
//! sprint from the backlog and land on the second stage of the pipeline.
//! Activation requires every member to have left the backlog stage. Closing
//! returns unfinished members to the backlog while finished ones keep their
//! sprint link as history.

use super::{
    EntityStore, Issue, IssueId, Sprint, SprintDraft, SprintError, SprintId, SprintStatus,
    StageKey, sprint_end,
};
use crate::shared::BoardRecord;
use mockable::Clock;

/// Result of adding issues to a sprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddOutcome {
    /// Number of issues added.
    pub added: usize,
    /// `true` when the sprint was already active, which callers confirm with
    /// the user as an exceptional action.
    pub requires_confirmation: bool,
}

/// Result of closing a sprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloseOutcome {
    /// Status the sprint was closed from.
    pub closed_from: SprintStatus,
    /// Members returned to the backlog.
    pub returned_to_backlog: usize,
    /// Finished members keeping the sprint link.
    pub completed: usize,
}

/// Creates a sprint in refinement.
///
/// # Errors
///
/// Returns [`SprintError::ProjectNotFound`] for an unknown project,
/// [`SprintError::SprintAlreadyActive`] when the project already has an
/// open sprint, and the validation errors of [`Sprint::new`].
pub fn create_sprint(
    store: &mut EntityStore,
    draft: SprintDraft,
    clock: &impl Clock,
) -> Result<SprintId, SprintError> {
    if !store.contains(draft.project_id) {
        return Err(SprintError::ProjectNotFound(draft.project_id));
    }
    if let Some(open) = store.current_sprint(draft.project_id) {
        return Err(SprintError::SprintAlreadyActive(open.id()));
    }
    let sprint = Sprint::new(draft, clock.utc())?;
    Ok(store.insert(sprint))
}

/// Adds backlog issues to a sprint, moving them to the second stage.
///
/// New members are numbered after the highest existing sprint position, in
/// selection order. Repeated identifiers in the selection are added once.
///
/// # Errors
///
/// Returns [`SprintError`] when the sprint is unknown or closed, the
/// selection is empty, the pipeline has fewer than two stages, or a
/// selected issue is not in the sprint project's backlog.
pub fn add_issues_to_sprint(
    store: &mut EntityStore,
    sprint_id: SprintId,
    selection: &[IssueId],
    clock: &impl Clock,
) -> Result<AddOutcome, SprintError> {
    let sprint = store
        .sprint(sprint_id)
        .ok_or(SprintError::SprintNotFound(sprint_id))?;
    if !sprint.is_open() {
        return Err(SprintError::SprintClosed(sprint_id));
    }
    let status = sprint.status();
    let project = sprint.project_id();

    let mut issues: Vec<IssueId> = Vec::with_capacity(selection.len());
    for id in selection {
        if !issues.contains(id) {
            issues.push(*id);
        }
    }
    if issues.is_empty() {
        return Err(SprintError::EmptySelection);
    }
    let target = store
        .pipeline(project)
        .second_stage()
        .map(|stage| stage.key().clone())
        .ok_or(SprintError::InsufficientStages)?;
    if let Some(outsider) = issues.iter().find(|id| {
        store
            .issue(**id)
            .is_none_or(|issue| issue.project_id() != project || !issue.is_in_backlog())
    }) {
        return Err(SprintError::IssueNotInBacklog(*outsider));
    }

    let first_order = store
        .sprint_members(sprint_id)
        .iter()
        .filter_map(|issue| issue.sprint_order())
        .max()
        .map_or(0, |highest| highest.saturating_add(1));
    let timestamp = clock.utc();
    for (order, id) in (first_order..).zip(&issues) {
        let stage = target.clone();
        store.update(*id, |issue: &mut Issue| {
            issue.join_sprint(sprint_id, order, stage, timestamp);
        });
    }

    let requires_confirmation = status == SprintStatus::Active;
    if requires_confirmation {
        tracing::info!(sprint = %sprint_id, added = issues.len(), "issues added to an active sprint");
    }
    Ok(AddOutcome {
        added: issues.len(),
        requires_confirmation,
    })
}

/// Starts a sprint in refinement.
///
/// The sprint never starts in the past: its start date becomes the later of
/// the planned date and today, and its end date follows from its duration.
///
/// # Errors
///
/// Returns [`SprintError::InvalidSprintTransition`] unless the sprint is in
/// refinement, [`SprintError::InsufficientStages`] for a pipeline of fewer
/// than two stages, [`SprintError::EmptySprintCannotActivate`] for a sprint
/// without members, and [`SprintError::BacklogItemsBlockActivation`] while
/// any member sits at the first stage.
pub fn activate_sprint(
    store: &mut EntityStore,
    sprint_id: SprintId,
    clock: &impl Clock,
) -> Result<(), SprintError> {
    let sprint = store
        .sprint(sprint_id)
        .ok_or(SprintError::SprintNotFound(sprint_id))?;
    if sprint.status() != SprintStatus::Refinement {
        return Err(SprintError::InvalidSprintTransition {
            from: sprint.status(),
            to: SprintStatus::Active,
        });
    }
    let pipeline = store.pipeline(sprint.project_id());
    let backlog_key = match (pipeline.first_stage(), pipeline.second_stage()) {
        (Some(first), Some(_)) => first.key(),
        _ => return Err(SprintError::InsufficientStages),
    };
    let members = store.sprint_members(sprint_id);
    if members.is_empty() {
        return Err(SprintError::EmptySprintCannotActivate);
    }
    let blocked = members
        .iter()
        .filter(|issue| issue.status() == backlog_key)
        .count();
    if blocked > 0 {
        return Err(SprintError::BacklogItemsBlockActivation { count: blocked });
    }

    let now = clock.utc();
    let start_date = sprint.start_date().max(now.date_naive());
    let end_date = sprint_end(start_date, sprint.weeks())?;
    store.update(sprint_id, |target: &mut Sprint| {
        target.activate(start_date, end_date, now);
    });
    tracing::info!(sprint = %sprint_id, %start_date, %end_date, "sprint activated");
    Ok(())
}

/// Closes a sprint, returning unfinished members to the backlog.
///
/// Members at the `done_key` stage keep their sprint link. Closing is
/// accepted from refinement as well as from the active state.
///
/// # Errors
///
/// Returns [`SprintError::SprintNotFound`] for an unknown sprint and
/// [`SprintError::InvalidSprintTransition`] for a sprint already closed.
pub fn close_sprint(
    store: &mut EntityStore,
    sprint_id: SprintId,
    done_key: &StageKey,
    clock: &impl Clock,
) -> Result<CloseOutcome, SprintError> {
    let sprint = store
        .sprint(sprint_id)
        .ok_or(SprintError::SprintNotFound(sprint_id))?;
    let closed_from = sprint.status();
    if closed_from == SprintStatus::Closed {
        return Err(SprintError::InvalidSprintTransition {
            from: closed_from,
            to: SprintStatus::Closed,
        });
    }
    let (finished, pending): (Vec<&Issue>, Vec<&Issue>) = store
        .sprint_members(sprint_id)
        .into_iter()
        .partition(|issue| issue.status() == done_key);
    let completed_count = finished.len();
    let unfinished: Vec<IssueId> = pending.into_iter().map(Issue::id).collect();

    let now = clock.utc();
    store.update(sprint_id, |target: &mut Sprint| target.close(now));
    for id in &unfinished {
        store.update(*id, |issue: &mut Issue| issue.leave_sprint(now));
    }
    tracing::info!(
        sprint = %sprint_id,
        from = %closed_from,
        returned = unfinished.len(),
        completed = completed_count,
        "sprint closed"
    );
    Ok(CloseOutcome {
        closed_from,
        returned_to_backlog: unfinished.len(),
        completed: completed_count,
    })
}

/// Deletes a sprint in refinement, returning its members to the backlog.
///
/// # Errors
///
/// Returns [`SprintError::SprintNotFound`] for an unknown sprint and
/// [`SprintError::SprintNotInRefinement`] once it has been activated.
pub fn delete_sprint(
    store: &mut EntityStore,
    sprint_id: SprintId,
    clock: &impl Clock,
) -> Result<usize, SprintError> {
    let sprint = store
        .sprint(sprint_id)
        .ok_or(SprintError::SprintNotFound(sprint_id))?;
    if sprint.status() != SprintStatus::Refinement {
        return Err(SprintError::SprintNotInRefinement(sprint.status()));
    }
    let members: Vec<IssueId> = store
        .sprint_members(sprint_id)
        .into_iter()
        .map(Issue::id)
        .collect();
    let now = clock.utc();
    for id in &members {
        store.update(*id, |issue: &mut Issue| issue.leave_sprint(now));
    }
    store.remove::<Sprint>(sprint_id);
    Ok(members.len())
}

/// Removes one issue from a sprint that is not active and renumbers the
/// remaining members densely from zero, keeping their order.
///
/// # Errors
///
/// Returns [`SprintError::SprintNotFound`] for an unknown sprint,
/// [`SprintError::SprintLockedForMemberChanges`] for an active sprint and
/// [`SprintError::IssueNotInSprint`] when the issue is not a member.
pub fn remove_from_sprint(
    store: &mut EntityStore,
    sprint_id: SprintId,
    issue_id: IssueId,
    clock: &impl Clock,
) -> Result<(), SprintError> {
    let sprint = store
        .sprint(sprint_id)
        .ok_or(SprintError::SprintNotFound(sprint_id))?;
    if sprint.status() == SprintStatus::Active {
        return Err(SprintError::SprintLockedForMemberChanges);
    }
    let is_member = store
        .issue(issue_id)
        .is_some_and(|issue| issue.sprint_id() == Some(sprint_id));
    if !is_member {
        return Err(SprintError::IssueNotInSprint(issue_id));
    }

    let now = clock.utc();
    store.update(issue_id, |issue: &mut Issue| issue.leave_sprint(now));
    let remaining: Vec<IssueId> = store
        .sprint_members(sprint_id)
        .into_iter()
        .map(Issue::id)
        .collect();
    for (order, id) in (0_u32..).zip(&remaining) {
        store.update(*id, |issue: &mut Issue| issue.set_sprint_order(order));
    }
    Ok(())
}
