//! Issue hierarchy validation.
//!
//! Issues form an epic → story → task/bug tree. A proposed parent is checked
//! for existence, project membership, cycles and type compatibility. An
//! issue that already has children must keep a type they accept, and stories
//! carry story points. Checks are pure and never touch the store.

use super::{EntityStore, HierarchyError, Issue, IssueId, IssueType, ProjectId};
use crate::shared::BoardRecord;
use std::collections::HashSet;

/// The issue attributes the hierarchy rules look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HierarchyCandidate {
    /// Identifier of the issue, or `None` for an issue not created yet.
    pub id: Option<IssueId>,
    /// Project the issue belongs to.
    pub project: ProjectId,
    /// Type the issue will have.
    pub issue_type: IssueType,
    /// Story points the issue will have.
    pub story_points: Option<u32>,
}

/// Validates placing `candidate` under `proposed_parent`.
///
/// Rules are evaluated in this order:
///
/// 1. the parent must exist ([`HierarchyError::ParentNotFound`]);
/// 2. the parent must belong to the same project
///    ([`HierarchyError::ParentInOtherProject`]);
/// 3. the parent chain must not lead back to the candidate
///    ([`HierarchyError::CircularReference`]);
/// 4. epics take no parent ([`HierarchyError::EpicCannotHaveParent`]);
/// 5. stories sit under epics, tasks and bugs under epics or stories
///    ([`HierarchyError::InvalidParentType`]);
/// 6. existing children must accept the candidate's type
///    ([`HierarchyError::IncompatibleChild`]);
/// 7. stories carry story points ([`HierarchyError::StoryPointsRequired`]).
///
/// # Errors
///
/// Returns the [`HierarchyError`] of the first rule that fails.
pub fn validate_parent(
    store: &EntityStore,
    candidate: &HierarchyCandidate,
    proposed_parent: Option<IssueId>,
) -> Result<(), HierarchyError> {
    if let Some(parent_id) = proposed_parent {
        let parent = store
            .issue(parent_id)
            .ok_or(HierarchyError::ParentNotFound(parent_id))?;
        if parent.project_id() != candidate.project {
            return Err(HierarchyError::ParentInOtherProject(parent_id));
        }
        if let Some(id) = candidate
            .id
            .filter(|id| ancestry_contains(store, parent_id, *id))
        {
            return Err(HierarchyError::CircularReference(id));
        }
        if candidate.issue_type == IssueType::Epic {
            return Err(HierarchyError::EpicCannotHaveParent);
        }
        if !candidate.issue_type.accepts_parent(parent.issue_type()) {
            return Err(HierarchyError::InvalidParentType {
                child: candidate.issue_type,
                parent: parent.issue_type(),
            });
        }
    }
    if let Some(child) = candidate.id.and_then(|id| {
        store
            .children_of(id)
            .find(|child| !child.issue_type().accepts_parent(candidate.issue_type))
    }) {
        return Err(HierarchyError::IncompatibleChild {
            child: child.id(),
            child_type: child.issue_type(),
            parent_type: candidate.issue_type,
        });
    }
    if candidate.issue_type == IssueType::Story && candidate.story_points.is_none() {
        return Err(HierarchyError::StoryPointsRequired);
    }
    Ok(())
}

/// Returns `true` when walking `parent_id` links from `start` reaches
/// `target`.
///
/// The walk stops at the first repeated issue, so corrupt chains that
/// already loop terminate within the number of stored issues.
#[must_use]
pub fn ancestry_contains(store: &EntityStore, start: IssueId, target: IssueId) -> bool {
    let mut visited = HashSet::new();
    let mut cursor = Some(start);
    while let Some(current) = cursor {
        if current == target {
            return true;
        }
        if !visited.insert(current) {
            return false;
        }
        cursor = store.issue(current).and_then(Issue::parent_id);
    }
    false
}

/// Counts the `parent_id` links followed from `start` until the chain ends
/// or repeats.
#[must_use]
pub fn ancestry_depth(store: &EntityStore, start: IssueId) -> usize {
    let mut visited = HashSet::new();
    let mut cursor = store.issue(start).and_then(Issue::parent_id);
    visited.insert(start);
    while let Some(current) = cursor {
        if !visited.insert(current) {
            break;
        }
        cursor = store.issue(current).and_then(Issue::parent_id);
    }
    visited.len().saturating_sub(1)
}
