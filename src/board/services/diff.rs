//! State diffs produced by applied commands.

use crate::board::domain::{Change, IssueId, RecordRef, SprintId, StageKey, StoredRecord};
use crate::shared::{Collection, Id};

/// Condition a renderer should surface alongside a diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Issues were added to a sprint that had already started.
    ExceptionalSprintAddition {
        /// Sprint that received the issues.
        sprint: SprintId,
        /// Number of issues added.
        added: usize,
    },
    /// A sprint was closed without ever being activated.
    ClosedFromRefinement(SprintId),
    /// Sprint members went back to the backlog.
    IssuesReturnedToBacklog {
        /// Sprint the issues left.
        sprint: SprintId,
        /// Number of issues returned.
        count: usize,
    },
    /// Children of a deleted issue lost their parent.
    ChildrenOrphaned {
        /// Deleted issue.
        issue: IssueId,
        /// Number of children affected.
        count: usize,
    },
    /// Issues of a deleted stage moved to another stage.
    StatusesReassigned {
        /// Stage the issues now sit in.
        fallback: StageKey,
        /// Number of issues moved.
        count: usize,
    },
    /// Records owned by a deleted project were removed with it.
    ProjectContentsRemoved {
        /// Issues removed.
        issues: usize,
        /// Sprints removed.
        sprints: usize,
        /// Stages removed.
        stages: usize,
    },
    /// Projects lost the squad that was deleted.
    ProjectsWithoutSquad(usize),
    /// Squads had member contracts pointing at a deleted company.
    ContractsDetached(usize),
}

/// Records changed by one command, plus the notices it raised.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateDiff {
    subject: Option<RecordRef>,
    changes: Vec<Change>,
    notices: Vec<Notice>,
}

impl StateDiff {
    pub(crate) const fn new(
        subject: Option<RecordRef>,
        changes: Vec<Change>,
        notices: Vec<Notice>,
    ) -> Self {
        Self {
            subject,
            changes,
            notices,
        }
    }

    /// Returns the record the command created or acted on, if any.
    #[must_use]
    pub const fn subject(&self) -> Option<RecordRef> {
        self.subject
    }

    /// Returns the subject as an identifier of kind `T`.
    #[must_use]
    pub fn subject_id<T: StoredRecord>(&self) -> Option<Id<T>> {
        self.subject.and_then(T::from_record_ref)
    }

    /// Returns the changed records, one entry per record.
    #[must_use]
    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    /// Returns the notices raised by the command.
    #[must_use]
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Returns `true` when the command changed nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Returns `true` when a record of `collection` changed.
    #[must_use]
    pub fn touches(&self, collection: Collection) -> bool {
        self.changes
            .iter()
            .any(|change| change.record().collection() == collection)
    }

    /// Returns the collections with changed records, in load order.
    #[must_use]
    pub fn touched_collections(&self) -> Vec<Collection> {
        Collection::ALL
            .into_iter()
            .filter(|collection| self.touches(*collection))
            .collect()
    }

    /// Returns `true` when the record was inserted or modified.
    #[must_use]
    pub fn upserted(&self, record: RecordRef) -> bool {
        self.changes.contains(&Change::Upserted(record))
    }

    /// Returns `true` when the record was removed.
    #[must_use]
    pub fn removed(&self, record: RecordRef) -> bool {
        self.changes.contains(&Change::Removed(record))
    }

    pub(crate) fn rewrite(&mut self, from: RecordRef, to: RecordRef) {
        if self.subject == Some(from) {
            self.subject = Some(to);
        }
        for change in &mut self.changes {
            *change = match *change {
                Change::Upserted(record) if record == from => Change::Upserted(to),
                Change::Removed(record) if record == from => Change::Removed(to),
                other => other,
            };
        }
    }
}
