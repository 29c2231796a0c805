//! Stage pipeline: ordered workflow columns of a project.
//!
//! The first stage (lowest order) is the backlog and the second one is the
//! first actionable stage. Stage keys are referenced by issue statuses, so
//! deleting or re-keying a stage rewrites the statuses of affected issues in
//! the same operation.

use super::{EntityStore, Issue, ProjectId, Stage, StageDraft, StageError, StageId, StageKey};
use crate::shared::BoardRecord;
use chrono::{DateTime, Utc};
use mockable::Clock;

/// Stages of one project sorted by `order`; ties keep insertion order.
#[derive(Debug, Clone)]
pub struct StagePipeline<'a> {
    stages: Vec<&'a Stage>,
}

impl<'a> StagePipeline<'a> {
    /// Builds a pipeline from the stages of one project.
    pub fn new(stages: impl IntoIterator<Item = &'a Stage>) -> Self {
        let mut sorted: Vec<&'a Stage> = stages.into_iter().collect();
        sorted.sort_by_key(|stage| stage.order());
        Self { stages: sorted }
    }

    /// Returns the stages in pipeline order.
    #[must_use]
    pub fn stages(&self) -> &[&'a Stage] {
        &self.stages
    }

    /// Returns the number of stages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Returns `true` when the project has no stages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Returns the backlog stage.
    #[must_use]
    pub fn first_stage(&self) -> Option<&'a Stage> {
        self.stages.first().copied()
    }

    /// Returns the first actionable stage.
    #[must_use]
    pub fn second_stage(&self) -> Option<&'a Stage> {
        self.stages.get(1).copied()
    }

    /// Looks up a stage by key.
    #[must_use]
    pub fn stage_with_key(&self, key: &StageKey) -> Option<&'a Stage> {
        self.stages.iter().copied().find(|stage| stage.key() == key)
    }

    /// Returns `true` when a stage uses `key`.
    #[must_use]
    pub fn contains_key(&self, key: &StageKey) -> bool {
        self.stage_with_key(key).is_some()
    }
}

/// Result of deleting a stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageDeletion {
    /// Key issues of the deleted stage were moved to.
    pub fallback_key: StageKey,
    /// Number of issues moved.
    pub reassigned: usize,
}

/// Creates a stage or edits an existing one.
///
/// Changing the key of an existing stage rewrites the status of every issue
/// of the project that referenced the old key.
///
/// # Errors
///
/// Returns [`StageError`] when the project or stage does not exist, the
/// stage fails validation, or the key is already used in the project.
pub fn save_stage(
    store: &mut EntityStore,
    draft: StageDraft,
    clock: &impl Clock,
) -> Result<StageId, StageError> {
    if !store.contains(draft.project_id) {
        return Err(StageError::ProjectNotFound(draft.project_id));
    }
    let previous_key = draft
        .id
        .map(|id| {
            store
                .stage(id)
                .map(|stage| stage.key().clone())
                .ok_or(StageError::StageNotFound(id))
        })
        .transpose()?;
    let stage = Stage::new(draft)?;
    let key_taken = store
        .pipeline(stage.project_id())
        .stages()
        .iter()
        .any(|other| other.id() != stage.id() && other.key() == stage.key());
    if key_taken {
        return Err(StageError::DuplicateStageKey(stage.key().clone()));
    }

    let project = stage.project_id();
    let new_key = stage.key().clone();
    let id = store.upsert(stage);
    if let Some(old_key) = previous_key.filter(|old| *old != new_key) {
        let renamed = restatus(store, project, &old_key, &new_key, clock.utc());
        tracing::debug!(stage = %id, from = %old_key, to = %new_key, renamed, "stage key renamed");
    }
    Ok(id)
}

/// Deletes a stage, moving its issues to the first remaining stage.
///
/// # Errors
///
/// Returns [`StageError::StageNotFound`] for an unknown stage and
/// [`StageError::CannotDeleteLastStage`] when it is the project's only
/// stage.
pub fn delete_stage(
    store: &mut EntityStore,
    id: StageId,
    clock: &impl Clock,
) -> Result<StageDeletion, StageError> {
    let stage = store.stage(id).ok_or(StageError::StageNotFound(id))?;
    let project = stage.project_id();
    let removed_key = stage.key().clone();
    let fallback_key = store
        .pipeline(project)
        .stages()
        .iter()
        .find(|candidate| candidate.id() != id)
        .map(|candidate| candidate.key().clone())
        .ok_or(StageError::CannotDeleteLastStage)?;

    store.remove::<Stage>(id);
    let reassigned = restatus(store, project, &removed_key, &fallback_key, clock.utc());
    Ok(StageDeletion {
        fallback_key,
        reassigned,
    })
}

/// Rewrites the status of every project issue at `from` to `to`.
fn restatus(
    store: &mut EntityStore,
    project: ProjectId,
    from: &StageKey,
    to: &StageKey,
    timestamp: DateTime<Utc>,
) -> usize {
    let affected: Vec<_> = store
        .issues_of(project)
        .filter(|issue| issue.status() == from)
        .map(Issue::id)
        .collect();
    for issue in &affected {
        store.update(*issue, |target: &mut Issue| {
            target.set_status(to.clone(), timestamp);
        });
    }
    affected.len()
}
