//! Identifier aliases for board records.

use super::{Activity, Attachment, Issue, Project, Sprint, Stage};
use crate::shared::Id;

/// Identifier of a project.
pub type ProjectId = Id<Project>;

/// Identifier of an issue.
pub type IssueId = Id<Issue>;

/// Identifier of a workflow stage.
pub type StageId = Id<Stage>;

/// Identifier of a sprint.
pub type SprintId = Id<Sprint>;

/// Identifier of an activity logged on an issue.
pub type ActivityId = Id<Activity>;

/// Identifier of an issue attachment.
pub type AttachmentId = Id<Attachment>;
