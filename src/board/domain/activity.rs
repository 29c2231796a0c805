//! Time entries and attachments carried by issues.

use super::{ActivityId, AttachmentId, BoardDomainError};
use crate::organization::domain::{Cents, WorkedMinutes};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Work logged against an issue, valued at the assignee's hourly rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    id: ActivityId,
    date: NaiveDate,
    minutes: WorkedMinutes,
    #[serde(default)]
    description: String,
    #[serde(default)]
    value: Cents,
}

/// Input for logging an activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityDraft {
    /// Existing identifier when the activity is being edited.
    pub id: Option<ActivityId>,
    /// Day the work happened.
    pub date: NaiveDate,
    /// Time spent.
    pub minutes: WorkedMinutes,
    /// Free-form description.
    pub description: String,
}

impl Activity {
    /// Creates an activity valued at `hourly_rate`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::NonPositiveActivityTime`] when no time is
    /// logged.
    pub fn new(draft: ActivityDraft, hourly_rate: Cents) -> Result<Self, BoardDomainError> {
        if draft.minutes.is_zero() {
            return Err(BoardDomainError::NonPositiveActivityTime);
        }
        Ok(Self {
            id: draft.id.unwrap_or_default(),
            date: draft.date,
            minutes: draft.minutes,
            description: draft.description.trim().to_owned(),
            value: hourly_rate.for_minutes(draft.minutes),
        })
    }

    /// Returns the identifier.
    #[must_use]
    pub const fn id(&self) -> ActivityId {
        self.id
    }

    /// Returns the day the work happened.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// Returns the time spent.
    #[must_use]
    pub const fn minutes(&self) -> WorkedMinutes {
        self.minutes
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the value computed when the activity was saved.
    #[must_use]
    pub const fn value(&self) -> Cents {
        self.value
    }
}

/// File attached to an issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    id: AttachmentId,
    name: String,
    media_type: String,
    size: u64,
    data_url: String,
    added_at: DateTime<Utc>,
}

/// Input for attaching a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentDraft {
    /// Existing identifier when the attachment is kept on update.
    pub id: Option<AttachmentId>,
    /// File name.
    pub name: String,
    /// Media type.
    pub media_type: String,
    /// Size in bytes.
    pub size: u64,
    /// Encoded file content.
    pub data_url: String,
}

impl Attachment {
    /// Creates an attachment no larger than `max_bytes`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::AttachmentTooLarge`] when the file exceeds
    /// the limit.
    pub fn new(
        draft: AttachmentDraft,
        max_bytes: u64,
        added_at: DateTime<Utc>,
    ) -> Result<Self, BoardDomainError> {
        if draft.size > max_bytes {
            return Err(BoardDomainError::AttachmentTooLarge {
                name: draft.name,
                size: draft.size,
                limit: max_bytes,
            });
        }
        Ok(Self {
            id: draft.id.unwrap_or_default(),
            name: draft.name,
            media_type: draft.media_type,
            size: draft.size,
            data_url: draft.data_url,
            added_at,
        })
    }

    /// Returns the identifier.
    #[must_use]
    pub const fn id(&self) -> AttachmentId {
        self.id
    }

    /// Returns the file name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the media type.
    #[must_use]
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// Returns the size in bytes.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Returns the encoded file content.
    #[must_use]
    pub fn data_url(&self) -> &str {
        &self.data_url
    }

    /// Returns when the file was attached.
    #[must_use]
    pub const fn added_at(&self) -> DateTime<Utc> {
        self.added_at
    }
}
