//! Issue aggregate and its scalar types.

use super::{
    Activity, Attachment, BoardDomainError, IssueId, ParseBoardValueError, ProjectId, SprintId,
    StageKey,
};
use crate::shared::{BoardRecord, Collection};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of an issue in the epic → story → task/bug hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    /// Large body of work grouping stories.
    Epic,
    /// User-facing increment; requires story points.
    Story,
    /// Unit of technical work.
    Task,
    /// Defect.
    Bug,
}

impl IssueType {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Epic => "epic",
            Self::Story => "story",
            Self::Task => "task",
            Self::Bug => "bug",
        }
    }

    /// Returns `true` when an issue of this type may sit under `parent`.
    #[must_use]
    pub const fn accepts_parent(self, parent: Self) -> bool {
        match self {
            Self::Epic => false,
            Self::Story => matches!(parent, Self::Epic),
            Self::Task | Self::Bug => matches!(parent, Self::Epic | Self::Story),
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for IssueType {
    type Error = ParseBoardValueError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "epic" => Ok(Self::Epic),
            "story" => Ok(Self::Story),
            "task" => Ok(Self::Task),
            "bug" => Ok(Self::Bug),
            _ => Err(ParseBoardValueError {
                kind: "issue type",
                value: value.to_owned(),
            }),
        }
    }
}

/// Issue priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Low priority.
    Low,
    /// Medium priority.
    #[default]
    Medium,
    /// High priority.
    High,
    /// Critical priority.
    Critical,
}

impl Priority {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl TryFrom<&str> for Priority {
    type Error = ParseBoardValueError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            _ => Err(ParseBoardValueError {
                kind: "priority",
                value: value.to_owned(),
            }),
        }
    }
}

/// Sequential issue number within a project, starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct IssueNumber(u32);

impl IssueNumber {
    /// Number given to the first issue of a project.
    pub const FIRST: Self = Self(1);

    /// Creates a validated issue number.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::InvalidIssueNumber`] for zero.
    pub const fn new(value: u32) -> Result<Self, BoardDomainError> {
        if value == 0 {
            return Err(BoardDomainError::InvalidIssueNumber(value));
        }
        Ok(Self(value))
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Returns the number following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl TryFrom<u32> for IssueNumber {
    type Error = BoardDomainError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<IssueNumber> for u32 {
    fn from(number: IssueNumber) -> Self {
        number.0
    }
}

impl fmt::Display for IssueNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Issue aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    id: IssueId,
    project_id: ProjectId,
    number: IssueNumber,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(rename = "type")]
    issue_type: IssueType,
    #[serde(default)]
    priority: Priority,
    status: StageKey,
    assignee: Option<String>,
    parent_id: Option<IssueId>,
    story_points: Option<u32>,
    sprint_id: Option<SprintId>,
    sprint_order: Option<u32>,
    #[serde(default)]
    activities: Vec<Activity>,
    #[serde(default)]
    attachments: Vec<Attachment>,
    start_date: Option<NaiveDate>,
    completed_date: Option<NaiveDate>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedIssueData {
    /// Persisted identifier.
    pub id: IssueId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Sequential number within the project.
    pub number: IssueNumber,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Hierarchy type.
    pub issue_type: IssueType,
    /// Priority.
    pub priority: Priority,
    /// Key of the stage the issue sits in.
    pub status: StageKey,
    /// Assignee name.
    pub assignee: Option<String>,
    /// Parent issue.
    pub parent_id: Option<IssueId>,
    /// Estimate.
    pub story_points: Option<u32>,
    /// Sprint membership.
    pub sprint_id: Option<SprintId>,
    /// Position within the sprint.
    pub sprint_order: Option<u32>,
    /// Logged work.
    pub activities: Vec<Activity>,
    /// Attached files.
    pub attachments: Vec<Attachment>,
    /// Planned start date.
    pub start_date: Option<NaiveDate>,
    /// Completion date.
    pub completed_date: Option<NaiveDate>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Validated editable content of an issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct IssueContent {
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) issue_type: IssueType,
    pub(crate) priority: Priority,
    pub(crate) assignee: Option<String>,
    pub(crate) parent_id: Option<IssueId>,
    pub(crate) story_points: Option<u32>,
    pub(crate) start_date: Option<NaiveDate>,
    pub(crate) completed_date: Option<NaiveDate>,
    pub(crate) activities: Vec<Activity>,
    pub(crate) attachments: Vec<Attachment>,
}

impl Issue {
    /// Creates a new issue with a temporary identifier, outside any sprint.
    pub(crate) fn create(
        project_id: ProjectId,
        number: IssueNumber,
        status: StageKey,
        content: IssueContent,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: IssueId::temporary(),
            project_id,
            number,
            title: content.title,
            description: content.description,
            issue_type: content.issue_type,
            priority: content.priority,
            status,
            assignee: content.assignee,
            parent_id: content.parent_id,
            story_points: content.story_points,
            sprint_id: None,
            sprint_order: None,
            activities: content.activities,
            attachments: content.attachments,
            start_date: content.start_date,
            completed_date: content.completed_date,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs an issue from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedIssueData) -> Self {
        Self {
            id: data.id,
            project_id: data.project_id,
            number: data.number,
            title: data.title,
            description: data.description,
            issue_type: data.issue_type,
            priority: data.priority,
            status: data.status,
            assignee: data.assignee,
            parent_id: data.parent_id,
            story_points: data.story_points,
            sprint_id: data.sprint_id,
            sprint_order: data.sprint_order,
            activities: data.activities,
            attachments: data.attachments,
            start_date: data.start_date,
            completed_date: data.completed_date,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the sequential number within the project.
    #[must_use]
    pub const fn number(&self) -> IssueNumber {
        self.number
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the hierarchy type.
    #[must_use]
    pub const fn issue_type(&self) -> IssueType {
        self.issue_type
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the key of the stage the issue sits in.
    #[must_use]
    pub const fn status(&self) -> &StageKey {
        &self.status
    }

    /// Returns the assignee name.
    #[must_use]
    pub fn assignee(&self) -> Option<&str> {
        self.assignee.as_deref()
    }

    /// Returns the parent issue.
    #[must_use]
    pub const fn parent_id(&self) -> Option<IssueId> {
        self.parent_id
    }

    /// Returns the estimate.
    #[must_use]
    pub const fn story_points(&self) -> Option<u32> {
        self.story_points
    }

    /// Returns the sprint the issue belongs to.
    #[must_use]
    pub const fn sprint_id(&self) -> Option<SprintId> {
        self.sprint_id
    }

    /// Returns the position within the sprint.
    #[must_use]
    pub const fn sprint_order(&self) -> Option<u32> {
        self.sprint_order
    }

    /// Returns `true` while the issue belongs to no sprint.
    #[must_use]
    pub const fn is_in_backlog(&self) -> bool {
        self.sprint_id.is_none()
    }

    /// Returns the logged work.
    #[must_use]
    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    /// Returns the attached files.
    #[must_use]
    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Returns the planned start date.
    #[must_use]
    pub const fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    /// Returns the completion date.
    #[must_use]
    pub const fn completed_date(&self) -> Option<NaiveDate> {
        self.completed_date
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub(crate) fn apply_content(&mut self, content: IssueContent, timestamp: DateTime<Utc>) {
        self.title = content.title;
        self.description = content.description;
        self.issue_type = content.issue_type;
        self.priority = content.priority;
        self.assignee = content.assignee;
        self.parent_id = content.parent_id;
        self.story_points = content.story_points;
        self.start_date = content.start_date;
        self.completed_date = content.completed_date;
        self.activities = content.activities;
        self.attachments = content.attachments;
        self.updated_at = timestamp;
    }

    pub(crate) fn set_status(&mut self, status: StageKey, timestamp: DateTime<Utc>) {
        self.status = status;
        self.updated_at = timestamp;
    }

    pub(crate) fn join_sprint(
        &mut self,
        sprint_id: SprintId,
        order: u32,
        status: StageKey,
        timestamp: DateTime<Utc>,
    ) {
        self.sprint_id = Some(sprint_id);
        self.sprint_order = Some(order);
        self.status = status;
        self.updated_at = timestamp;
    }

    pub(crate) fn leave_sprint(&mut self, timestamp: DateTime<Utc>) {
        self.sprint_id = None;
        self.sprint_order = None;
        self.updated_at = timestamp;
    }

    pub(crate) const fn set_sprint_order(&mut self, order: u32) {
        self.sprint_order = Some(order);
    }

    pub(crate) fn clear_parent(&mut self, timestamp: DateTime<Utc>) {
        self.parent_id = None;
        self.updated_at = timestamp;
    }

    pub(crate) fn replace_project(&mut self, from: ProjectId, to: ProjectId) {
        if self.project_id == from {
            self.project_id = to;
        }
    }

    pub(crate) fn replace_parent(&mut self, from: IssueId, to: IssueId) {
        if self.parent_id == Some(from) {
            self.parent_id = Some(to);
        }
    }

    pub(crate) fn replace_sprint(&mut self, from: SprintId, to: SprintId) {
        if self.sprint_id == Some(from) {
            self.sprint_id = Some(to);
        }
    }
}

impl BoardRecord for Issue {
    const COLLECTION: Collection = Collection::Issues;

    fn id(&self) -> IssueId {
        self.id
    }

    fn with_id(mut self, id: IssueId) -> Self {
        self.id = id;
        self
    }
}
