//! Error types for board validation and parsing.

use super::{IssueId, IssueType, ProjectId, SprintId, SprintStatus, StageId, StageKey};
use crate::organization::domain::SquadId;
use thiserror::Error;

/// Errors returned while constructing board values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardDomainError {
    /// The issue number is invalid.
    #[error("invalid issue number {0}, expected a positive integer")]
    InvalidIssueNumber(u32),

    /// The issue title is empty after trimming.
    #[error("issue title must not be empty")]
    EmptyIssueTitle,

    /// The project name is empty after trimming.
    #[error("project name must not be empty")]
    EmptyProjectName,

    /// The project key is empty or contains characters other than letters
    /// and digits.
    #[error("invalid project key '{0}', expected letters and digits")]
    InvalidProjectKey(String),

    /// Another project already uses the key.
    #[error("a project with key '{0}' already exists")]
    DuplicateProjectKey(String),

    /// An activity logged no time.
    #[error("activity must log a positive amount of time")]
    NonPositiveActivityTime,

    /// An attachment exceeds the configured size limit.
    #[error("attachment '{name}' is {size} bytes, above the {limit} byte limit")]
    AttachmentTooLarge {
        /// Attachment file name.
        name: String,
        /// Attachment size in bytes.
        size: u64,
        /// Configured limit in bytes.
        limit: u64,
    },

    /// The referenced project does not exist.
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),

    /// The referenced issue does not exist.
    #[error("issue not found: {0}")]
    IssueNotFound(IssueId),

    /// The referenced squad does not exist.
    #[error("squad not found: {0}")]
    SquadNotFound(SquadId),

    /// The project has no stages to place issues in.
    #[error("project {0} has no stages")]
    MissingPipeline(ProjectId),
}

/// Errors returned by issue operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IssueError {
    /// Scalar validation failed.
    #[error(transparent)]
    Domain(#[from] BoardDomainError),

    /// The hierarchy rules rejected the issue.
    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),
}

/// Violations of the issue hierarchy.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HierarchyError {
    /// Epics sit at the top of the hierarchy.
    #[error("an epic cannot have a parent")]
    EpicCannotHaveParent,

    /// The parent type cannot contain the child type.
    #[error("a {child} cannot have a {parent} as parent")]
    InvalidParentType {
        /// Type of the issue being validated.
        child: IssueType,
        /// Type of the proposed parent.
        parent: IssueType,
    },

    /// The proposed parent chain leads back to the issue.
    #[error("setting this parent would make issue {0} its own ancestor")]
    CircularReference(IssueId),

    /// Stories must be estimated.
    #[error("a story requires story points")]
    StoryPointsRequired,

    /// The proposed parent does not exist.
    #[error("parent issue not found: {0}")]
    ParentNotFound(IssueId),

    /// The proposed parent belongs to another project.
    #[error("parent issue {0} belongs to another project")]
    ParentInOtherProject(IssueId),

    /// An existing child cannot sit under the issue's new type.
    #[error("child issue {child} ({child_type}) cannot have a {parent_type} as parent")]
    IncompatibleChild {
        /// The child that would be left under an invalid parent.
        child: IssueId,
        /// Type of that child.
        child_type: IssueType,
        /// Type the edited issue would take.
        parent_type: IssueType,
    },
}

/// Violations of the stage pipeline rules.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StageError {
    /// A project keeps at least one stage.
    #[error("the last remaining stage cannot be deleted")]
    CannotDeleteLastStage,

    /// The key is already used by another stage of the project.
    #[error("stage key '{0}' is already used in this project")]
    DuplicateStageKey(StageKey),

    /// The key is empty or not made of lowercase letters, digits and hyphens.
    #[error("invalid stage key '{0}', expected lowercase letters, digits and hyphens")]
    InvalidStageKey(String),

    /// The stage name is empty after trimming.
    #[error("stage name must not be empty")]
    EmptyStageName,

    /// The referenced stage does not exist.
    #[error("stage not found: {0}")]
    StageNotFound(StageId),

    /// The stage belongs to a project that does not exist.
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),
}

/// Violations of the sprint lifecycle.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SprintError {
    /// The project already has a sprint that is not closed.
    #[error("sprint {0} is still open; close it before creating another")]
    SprintAlreadyActive(SprintId),

    /// A sprint with no issues cannot start.
    #[error("a sprint without issues cannot be activated")]
    EmptySprintCannotActivate,

    /// Sprint members still sit in the backlog stage.
    #[error("{count} sprint issue(s) are still in the backlog stage")]
    BacklogItemsBlockActivation {
        /// Number of members still at the first stage.
        count: usize,
    },

    /// The project pipeline has fewer than two stages.
    #[error("the project needs at least two stages")]
    InsufficientStages,

    /// Members of an active sprint cannot be removed.
    #[error("issues cannot be removed from an active sprint")]
    SprintLockedForMemberChanges,

    /// Only refining sprints can be deleted.
    #[error("only sprints in refinement can be deleted, this one is {0}")]
    SprintNotInRefinement(SprintStatus),

    /// The lifecycle does not allow this transition.
    #[error("invalid sprint transition from {from} to {to}")]
    InvalidSprintTransition {
        /// Current status.
        from: SprintStatus,
        /// Requested status.
        to: SprintStatus,
    },

    /// Closed sprints accept no further changes.
    #[error("sprint {0} is closed")]
    SprintClosed(SprintId),

    /// Sprints last at least one week.
    #[error("sprint duration must be at least one week")]
    InvalidSprintDuration,

    /// The sprint name is empty after trimming.
    #[error("sprint name must not be empty")]
    EmptySprintName,

    /// The issue is not in the project's backlog.
    #[error("issue {0} is not in the project backlog")]
    IssueNotInBacklog(IssueId),

    /// The issue is not a member of the sprint.
    #[error("issue {0} is not in this sprint")]
    IssueNotInSprint(IssueId),

    /// No issue was selected.
    #[error("no issues selected")]
    EmptySelection,

    /// The referenced sprint does not exist.
    #[error("sprint not found: {0}")]
    SprintNotFound(SprintId),

    /// The referenced project does not exist.
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),
}

/// Rejected board moves.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MoveError {
    /// Only members of the project's current sprint move on the board.
    #[error("issue {0} is not in the current sprint")]
    NotInActiveSprint(IssueId),

    /// While refining, work may not leave the second stage.
    #[error("the sprint has not started; issues cannot leave refinement")]
    SprintNotStarted,

    /// The target stage is not part of the project pipeline.
    #[error("unknown stage '{0}'")]
    UnknownStage(StageKey),

    /// The referenced issue does not exist.
    #[error("issue not found: {0}")]
    IssueNotFound(IssueId),
}

/// Error returned while parsing board enumerations from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct ParseBoardValueError {
    /// Name of the enumeration being parsed.
    pub kind: &'static str,
    /// Rejected value.
    pub value: String,
}
