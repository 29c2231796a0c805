//! Sprint lifecycle tests.

use super::fixtures::{Board, FixedClock, board, date, key};
use crate::board::domain::{
    Issue, IssueId, SprintDraft, SprintError, SprintStatus,
    lifecycle::{
        activate_sprint, add_issues_to_sprint, close_sprint, create_sprint, delete_sprint,
        remove_from_sprint,
    },
    placement::move_issue,
};
use crate::shared::BoardRecord;
use rstest::rstest;

fn orders(board: &Board, sprint: crate::board::domain::SprintId) -> Vec<(IssueId, Option<u32>)> {
    board
        .store
        .sprint_members(sprint)
        .into_iter()
        .map(|issue| (issue.id(), issue.sprint_order()))
        .collect()
}

#[rstest]
fn new_sprints_start_in_refinement(mut board: Board) {
    let sprint = board.sprint("Sprint 1");
    let stored = board.store.sprint(sprint).expect("sprint stored");

    assert_eq!(stored.status(), SprintStatus::Refinement);
    assert_eq!(stored.end_date(), date(2026, 3, 16));
    assert_eq!(board.store.current_sprint(board.project).map(BoardRecord::id), Some(sprint));
}

#[rstest]
fn only_one_open_sprint_per_project(mut board: Board) {
    let open = board.sprint("Sprint 1");
    let draft = SprintDraft {
        project_id: board.project,
        name: "Sprint 2".to_owned(),
        weeks: 1,
        goal: String::new(),
        start_date: date(2026, 3, 16),
    };

    let result = create_sprint(&mut board.store, draft, &board.clock);

    assert_eq!(result, Err(SprintError::SprintAlreadyActive(open)));
}

#[rstest]
fn zero_week_sprints_are_rejected(mut board: Board) {
    let draft = SprintDraft {
        project_id: board.project,
        name: "Sprint 0".to_owned(),
        weeks: 0,
        goal: String::new(),
        start_date: date(2026, 3, 2),
    };

    let result = create_sprint(&mut board.store, draft, &board.clock);

    assert_eq!(result, Err(SprintError::InvalidSprintDuration));
}

#[rstest]
fn added_issues_move_to_the_second_stage_in_selection_order(mut board: Board) {
    let first = board.task("First");
    let second = board.task("Second");
    let third = board.task("Third");
    let sprint = board.sprint_with("Sprint 1", &[second, first]);

    let outcome = add_issues_to_sprint(&mut board.store, sprint, &[third, third], &board.clock)
        .expect("backlog issue joins");

    assert_eq!(outcome.added, 1);
    assert!(!outcome.requires_confirmation);
    assert_eq!(
        orders(&board, sprint),
        [(second, Some(0)), (first, Some(1)), (third, Some(2))]
    );
    for id in [first, second, third] {
        let issue = board.store.issue(id).expect("issue kept");
        assert_eq!(issue.status(), &key("refinamento"));
    }
}

#[rstest]
fn only_backlog_issues_join(mut board: Board) {
    let member = board.task("Member");
    let sprint = board.sprint_with("Sprint 1", &[member]);

    let repeated = add_issues_to_sprint(&mut board.store, sprint, &[member], &board.clock);
    let empty = add_issues_to_sprint(&mut board.store, sprint, &[], &board.clock);

    assert_eq!(repeated, Err(SprintError::IssueNotInBacklog(member)));
    assert_eq!(empty, Err(SprintError::EmptySelection));
}

#[rstest]
fn adding_to_an_active_sprint_needs_confirmation(mut board: Board) {
    let member = board.task("Member");
    let late = board.task("Late");
    let sprint = board.sprint_with("Sprint 1", &[member]);
    activate_sprint(&mut board.store, sprint, &board.clock).expect("sprint activates");

    let outcome = add_issues_to_sprint(&mut board.store, sprint, &[late], &board.clock)
        .expect("active sprints accept issues");

    assert!(outcome.requires_confirmation);
    assert_eq!(outcome.added, 1);
}

#[rstest]
fn empty_sprints_cannot_activate(mut board: Board) {
    let sprint = board.sprint("Sprint 1");

    let result = activate_sprint(&mut board.store, sprint, &board.clock);

    assert_eq!(result, Err(SprintError::EmptySprintCannotActivate));
}

#[rstest]
fn members_left_in_the_backlog_stage_block_activation(mut board: Board) {
    let first = board.task("First");
    let second = board.task("Second");
    let sprint = board.sprint_with("Sprint 1", &[first, second]);
    let timestamp = board.clock.0;
    for id in [first, second] {
        board
            .store
            .update(id, |issue: &mut Issue| issue.set_status(key("backlog"), timestamp));
    }

    let result = activate_sprint(&mut board.store, sprint, &board.clock);

    assert_eq!(result, Err(SprintError::BacklogItemsBlockActivation { count: 2 }));
}

#[rstest]
fn activation_never_starts_in_the_past(mut board: Board) {
    let member = board.task("Member");
    let sprint = board.sprint_with("Sprint 1", &[member]);
    let later = FixedClock::at(2026, 3, 10);

    activate_sprint(&mut board.store, sprint, &later).expect("sprint activates");

    let stored = board.store.sprint(sprint).expect("sprint stored");
    assert_eq!(stored.status(), SprintStatus::Active);
    assert_eq!(stored.start_date(), date(2026, 3, 10));
    assert_eq!(stored.end_date(), date(2026, 3, 24));
    assert_eq!(stored.activated_at(), Some(later.0));
}

#[rstest]
fn active_sprints_cannot_activate_again(mut board: Board) {
    let member = board.task("Member");
    let sprint = board.sprint_with("Sprint 1", &[member]);
    activate_sprint(&mut board.store, sprint, &board.clock).expect("sprint activates");

    let result = activate_sprint(&mut board.store, sprint, &board.clock);

    assert_eq!(
        result,
        Err(SprintError::InvalidSprintTransition {
            from: SprintStatus::Active,
            to: SprintStatus::Active,
        })
    );
}

#[rstest]
fn closing_keeps_finished_members_and_returns_the_rest(mut board: Board) {
    let finished = board.task("Finished");
    let pending = board.task("Pending");
    let sprint = board.sprint_with("Sprint 1", &[finished, pending]);
    activate_sprint(&mut board.store, sprint, &board.clock).expect("sprint activates");
    move_issue(&mut board.store, finished, &key("done"), &board.clock).expect("move allowed");

    let outcome = close_sprint(&mut board.store, sprint, &key("done"), &board.clock)
        .expect("sprint closes");

    assert_eq!(outcome.closed_from, SprintStatus::Active);
    assert_eq!(outcome.completed, 1);
    assert_eq!(outcome.returned_to_backlog, 1);
    let kept = board.store.issue(finished).expect("issue kept");
    let returned = board.store.issue(pending).expect("issue kept");
    assert_eq!(kept.sprint_id(), Some(sprint));
    assert!(returned.is_in_backlog());
    assert_eq!(returned.sprint_order(), None);
    assert_eq!(board.store.current_sprint(board.project), None);
}

#[rstest]
fn refining_sprints_may_be_closed(mut board: Board) {
    let member = board.task("Member");
    let sprint = board.sprint_with("Sprint 1", &[member]);

    let outcome = close_sprint(&mut board.store, sprint, &key("done"), &board.clock)
        .expect("refining sprint closes");

    assert_eq!(outcome.closed_from, SprintStatus::Refinement);
    assert_eq!(outcome.returned_to_backlog, 1);
}

#[rstest]
fn closed_sprints_stay_closed(mut board: Board) {
    let sprint = board.sprint("Sprint 1");
    close_sprint(&mut board.store, sprint, &key("done"), &board.clock).expect("sprint closes");

    let result = close_sprint(&mut board.store, sprint, &key("done"), &board.clock);
    let late = board.task("Late");
    let added = add_issues_to_sprint(&mut board.store, sprint, &[late], &board.clock);

    assert_eq!(
        result,
        Err(SprintError::InvalidSprintTransition {
            from: SprintStatus::Closed,
            to: SprintStatus::Closed,
        })
    );
    assert_eq!(added, Err(SprintError::SprintClosed(sprint)));
}

#[rstest]
fn deleting_a_refining_sprint_detaches_its_members(mut board: Board) {
    let member = board.task("Member");
    let sprint = board.sprint_with("Sprint 1", &[member]);

    let returned = delete_sprint(&mut board.store, sprint, &board.clock).expect("sprint deletes");

    assert_eq!(returned, 1);
    assert!(board.store.sprint(sprint).is_none());
    assert!(board.store.issue(member).is_some_and(Issue::is_in_backlog));
}

#[rstest]
fn active_sprints_cannot_be_deleted(mut board: Board) {
    let member = board.task("Member");
    let sprint = board.sprint_with("Sprint 1", &[member]);
    activate_sprint(&mut board.store, sprint, &board.clock).expect("sprint activates");

    let result = delete_sprint(&mut board.store, sprint, &board.clock);

    assert_eq!(
        result,
        Err(SprintError::SprintNotInRefinement(SprintStatus::Active))
    );
}

#[rstest]
fn removing_a_member_renumbers_the_rest(mut board: Board) {
    let first = board.task("First");
    let second = board.task("Second");
    let third = board.task("Third");
    let sprint = board.sprint_with("Sprint 1", &[first, second, third]);

    remove_from_sprint(&mut board.store, sprint, second, &board.clock).expect("member leaves");

    assert_eq!(orders(&board, sprint), [(first, Some(0)), (third, Some(1))]);
    assert!(board.store.issue(second).is_some_and(Issue::is_in_backlog));
}

#[rstest]
fn active_sprints_lock_their_members(mut board: Board) {
    let member = board.task("Member");
    let sprint = board.sprint_with("Sprint 1", &[member]);
    activate_sprint(&mut board.store, sprint, &board.clock).expect("sprint activates");

    let result = remove_from_sprint(&mut board.store, sprint, member, &board.clock);

    assert_eq!(result, Err(SprintError::SprintLockedForMemberChanges));
}
