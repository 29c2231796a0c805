//! Domain model for the project board.
//!
//! Records are plain aggregates with private fields. The controller modules
//! ([`hierarchy`], [`pipeline`], [`lifecycle`], [`placement`], [`issues`],
//! [`registry`] and [`billing`]) are the only code that writes to the
//! [`EntityStore`].

mod activity;
mod error;
mod ids;
mod issue;
mod project;
mod sprint;
mod stage;
mod store;

pub mod billing;
pub mod hierarchy;
pub mod issues;
pub mod lifecycle;
pub mod pipeline;
pub mod placement;
pub mod registry;

pub use activity::{Activity, ActivityDraft, Attachment, AttachmentDraft};
pub use error::{
    BoardDomainError, HierarchyError, IssueError, MoveError, ParseBoardValueError, SprintError,
    StageError,
};
pub use ids::{ActivityId, AttachmentId, IssueId, ProjectId, SprintId, StageId};
pub(crate) use issue::IssueContent;
pub use issue::{Issue, IssueNumber, IssueType, PersistedIssueData, Priority};
pub use pipeline::StagePipeline;
pub use project::{PersistedProjectData, Project, ProjectDraft, ProjectKey};
pub use sprint::{PersistedSprintData, Sprint, SprintDraft, SprintStatus, sprint_end};
pub use stage::{PersistedStageData, Stage, StageDraft, StageKey};
pub use store::{Change, EntityStore, RecordRef, StoredRecord};
