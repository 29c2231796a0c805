//! Sprint aggregate.

use super::{ParseBoardValueError, ProjectId, SprintError, SprintId};
use crate::shared::{BoardRecord, Collection};
use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

const DAYS_PER_WEEK: u64 = 7;

/// Sprint lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SprintStatus {
    /// Planning: issues are being added and refined.
    #[serde(rename = "refinamento")]
    Refinement,
    /// Running.
    #[serde(rename = "active")]
    Active,
    /// Finished; terminal.
    #[serde(rename = "closed")]
    Closed,
}

impl SprintStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Refinement => "refinamento",
            Self::Active => "active",
            Self::Closed => "closed",
        }
    }

    /// Returns `true` for every status except [`Self::Closed`].
    #[must_use]
    pub const fn is_open(self) -> bool {
        !matches!(self, Self::Closed)
    }
}

impl fmt::Display for SprintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for SprintStatus {
    type Error = ParseBoardValueError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "refinamento" => Ok(Self::Refinement),
            "active" => Ok(Self::Active),
            "closed" => Ok(Self::Closed),
            _ => Err(ParseBoardValueError {
                kind: "sprint status",
                value: value.to_owned(),
            }),
        }
    }
}

/// Time-boxed container of issues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sprint {
    id: SprintId,
    project_id: ProjectId,
    name: String,
    weeks: u32,
    #[serde(default)]
    goal: String,
    status: SprintStatus,
    start_date: NaiveDate,
    end_date: NaiveDate,
    activated_at: Option<DateTime<Utc>>,
    closed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

/// Input for creating a sprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SprintDraft {
    /// Owning project.
    pub project_id: ProjectId,
    /// Sprint name.
    pub name: String,
    /// Duration in weeks.
    pub weeks: u32,
    /// Sprint goal.
    pub goal: String,
    /// Planned start date.
    pub start_date: NaiveDate,
}

/// Parameter object for reconstructing a persisted sprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedSprintData {
    /// Persisted identifier.
    pub id: SprintId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Sprint name.
    pub name: String,
    /// Duration in weeks.
    pub weeks: u32,
    /// Sprint goal.
    pub goal: String,
    /// Lifecycle status.
    pub status: SprintStatus,
    /// Start date.
    pub start_date: NaiveDate,
    /// End date.
    pub end_date: NaiveDate,
    /// Activation timestamp.
    pub activated_at: Option<DateTime<Utc>>,
    /// Closing timestamp.
    pub closed_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Returns the end date of a sprint of `weeks` starting at `start`.
///
/// # Errors
///
/// Returns [`SprintError::InvalidSprintDuration`] for zero weeks or a date
/// outside the calendar range.
pub fn sprint_end(start: NaiveDate, weeks: u32) -> Result<NaiveDate, SprintError> {
    if weeks == 0 {
        return Err(SprintError::InvalidSprintDuration);
    }
    start
        .checked_add_days(Days::new(u64::from(weeks).saturating_mul(DAYS_PER_WEEK)))
        .ok_or(SprintError::InvalidSprintDuration)
}

impl Sprint {
    /// Creates a sprint in refinement with a temporary identifier.
    ///
    /// # Errors
    ///
    /// Returns [`SprintError::EmptySprintName`] for a blank name and
    /// [`SprintError::InvalidSprintDuration`] for a zero duration.
    pub fn new(draft: SprintDraft, created_at: DateTime<Utc>) -> Result<Self, SprintError> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(SprintError::EmptySprintName);
        }
        let end_date = sprint_end(draft.start_date, draft.weeks)?;
        Ok(Self {
            id: SprintId::temporary(),
            project_id: draft.project_id,
            name: name.to_owned(),
            weeks: draft.weeks,
            goal: draft.goal.trim().to_owned(),
            status: SprintStatus::Refinement,
            start_date: draft.start_date,
            end_date,
            activated_at: None,
            closed_at: None,
            created_at,
        })
    }

    /// Reconstructs a sprint from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedSprintData) -> Self {
        Self {
            id: data.id,
            project_id: data.project_id,
            name: data.name,
            weeks: data.weeks,
            goal: data.goal,
            status: data.status,
            start_date: data.start_date,
            end_date: data.end_date,
            activated_at: data.activated_at,
            closed_at: data.closed_at,
            created_at: data.created_at,
        }
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the sprint name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the duration in weeks.
    #[must_use]
    pub const fn weeks(&self) -> u32 {
        self.weeks
    }

    /// Returns the sprint goal.
    #[must_use]
    pub fn goal(&self) -> &str {
        &self.goal
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> SprintStatus {
        self.status
    }

    /// Returns `true` until the sprint is closed.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.status.is_open()
    }

    /// Returns the start date.
    #[must_use]
    pub const fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// Returns the end date.
    #[must_use]
    pub const fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// Returns when the sprint was activated.
    #[must_use]
    pub const fn activated_at(&self) -> Option<DateTime<Utc>> {
        self.activated_at
    }

    /// Returns when the sprint was closed.
    #[must_use]
    pub const fn closed_at(&self) -> Option<DateTime<Utc>> {
        self.closed_at
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub(crate) const fn activate(
        &mut self,
        start_date: NaiveDate,
        end_date: NaiveDate,
        timestamp: DateTime<Utc>,
    ) {
        self.status = SprintStatus::Active;
        self.start_date = start_date;
        self.end_date = end_date;
        self.activated_at = Some(timestamp);
    }

    pub(crate) const fn close(&mut self, timestamp: DateTime<Utc>) {
        self.status = SprintStatus::Closed;
        self.closed_at = Some(timestamp);
    }

    pub(crate) fn replace_project(&mut self, from: ProjectId, to: ProjectId) {
        if self.project_id == from {
            self.project_id = to;
        }
    }
}

impl BoardRecord for Sprint {
    const COLLECTION: Collection = Collection::Sprints;

    fn id(&self) -> SprintId {
        self.id
    }

    fn with_id(mut self, id: SprintId) -> Self {
        self.id = id;
        self
    }
}
