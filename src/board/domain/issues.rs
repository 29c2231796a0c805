//! Issue creation, editing and deletion.

use super::billing::hourly_rate;
use super::hierarchy::{HierarchyCandidate, validate_parent};
use super::{
    Activity, ActivityDraft, Attachment, AttachmentDraft, BoardDomainError, EntityStore, Issue,
    IssueContent, IssueError, IssueId, IssueNumber, IssueType, Priority, ProjectId,
};
use crate::shared::BoardRecord;
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;

/// Editable issue content supplied by callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueFields {
    /// Title; must not be blank.
    pub title: String,
    /// Description.
    pub description: String,
    /// Hierarchy type.
    pub issue_type: IssueType,
    /// Priority.
    pub priority: Priority,
    /// Assignee name, matched against the project squad's members.
    pub assignee: Option<String>,
    /// Parent issue.
    pub parent_id: Option<IssueId>,
    /// Estimate; required for stories.
    pub story_points: Option<u32>,
    /// Planned start date.
    pub start_date: Option<NaiveDate>,
    /// Completion date.
    pub completed_date: Option<NaiveDate>,
    /// Logged work.
    pub activities: Vec<ActivityDraft>,
    /// Attached files.
    pub attachments: Vec<AttachmentDraft>,
}

impl IssueFields {
    /// Creates fields with only a title and type set.
    #[must_use]
    pub fn new(title: impl Into<String>, issue_type: IssueType) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            issue_type,
            priority: Priority::default(),
            assignee: None,
            parent_id: None,
            story_points: None,
            start_date: None,
            completed_date: None,
            activities: Vec::new(),
            attachments: Vec::new(),
        }
    }

    /// Sets the parent issue.
    #[must_use]
    pub const fn with_parent(mut self, parent: IssueId) -> Self {
        self.parent_id = Some(parent);
        self
    }

    /// Sets the story points.
    #[must_use]
    pub const fn with_story_points(mut self, points: u32) -> Self {
        self.story_points = Some(points);
        self
    }

    /// Sets the assignee.
    #[must_use]
    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    /// Adds a logged activity.
    #[must_use]
    pub fn with_activity(mut self, activity: ActivityDraft) -> Self {
        self.activities.push(activity);
        self
    }
}

/// Result of deleting an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IssueDeletion {
    /// Number of children whose parent link was cleared.
    pub orphaned: usize,
}

/// Creates an issue at the first stage of its project, outside any sprint.
///
/// The issue receives the next sequential number of the project and its
/// activities are valued at the assignee's hourly rate.
///
/// # Errors
///
/// Returns [`IssueError`] when the project is unknown or has no stages, or
/// when the content fails validation or the hierarchy rules.
pub fn create_issue(
    store: &mut EntityStore,
    project_id: ProjectId,
    fields: IssueFields,
    max_attachment_bytes: u64,
    clock: &impl Clock,
) -> Result<IssueId, IssueError> {
    if !store.contains(project_id) {
        return Err(BoardDomainError::ProjectNotFound(project_id).into());
    }
    let status = store
        .pipeline(project_id)
        .first_stage()
        .map(|stage| stage.key().clone())
        .ok_or(BoardDomainError::MissingPipeline(project_id))?;
    let timestamp = clock.utc();
    let content = build_content(
        store,
        project_id,
        None,
        fields,
        &[],
        max_attachment_bytes,
        timestamp,
    )?;
    let number = next_issue_number(store, project_id);
    let issue = Issue::create(project_id, number, status, content, timestamp);
    Ok(store.insert(issue))
}

/// Edits an issue's content, re-validating the hierarchy.
///
/// Status and sprint membership are not changed here; they move through
/// board placement and the sprint lifecycle.
///
/// # Errors
///
/// Returns [`IssueError`] when the issue is unknown or the new content
/// fails validation or the hierarchy rules.
pub fn update_issue(
    store: &mut EntityStore,
    id: IssueId,
    fields: IssueFields,
    max_attachment_bytes: u64,
    clock: &impl Clock,
) -> Result<(), IssueError> {
    let existing = store
        .issue(id)
        .ok_or(BoardDomainError::IssueNotFound(id))?;
    let timestamp = clock.utc();
    let content = build_content(
        store,
        existing.project_id(),
        Some(id),
        fields,
        existing.attachments(),
        max_attachment_bytes,
        timestamp,
    )?;
    store.update(id, |issue: &mut Issue| issue.apply_content(content, timestamp));
    Ok(())
}

/// Deletes an issue, clearing the parent link of its children.
///
/// # Errors
///
/// Returns [`BoardDomainError::IssueNotFound`] for an unknown issue.
pub fn delete_issue(
    store: &mut EntityStore,
    id: IssueId,
    clock: &impl Clock,
) -> Result<IssueDeletion, BoardDomainError> {
    if !store.contains(id) {
        return Err(BoardDomainError::IssueNotFound(id));
    }
    let timestamp = clock.utc();
    let children: Vec<IssueId> = store.children_of(id).map(Issue::id).collect();
    for child in &children {
        store.update(*child, |issue: &mut Issue| issue.clear_parent(timestamp));
    }
    store.remove::<Issue>(id);
    Ok(IssueDeletion {
        orphaned: children.len(),
    })
}

/// Returns the number the next issue of `project` receives.
#[must_use]
pub fn next_issue_number(store: &EntityStore, project: ProjectId) -> IssueNumber {
    store
        .issues_of(project)
        .map(Issue::number)
        .max()
        .map_or(IssueNumber::FIRST, IssueNumber::next)
}

fn build_content(
    store: &EntityStore,
    project: ProjectId,
    id: Option<IssueId>,
    fields: IssueFields,
    current_attachments: &[Attachment],
    max_attachment_bytes: u64,
    timestamp: DateTime<Utc>,
) -> Result<IssueContent, IssueError> {
    let title = fields.title.trim();
    if title.is_empty() {
        return Err(BoardDomainError::EmptyIssueTitle.into());
    }
    let candidate = HierarchyCandidate {
        id,
        project,
        issue_type: fields.issue_type,
        story_points: fields.story_points,
    };
    validate_parent(store, &candidate, fields.parent_id)?;

    let assignee = fields
        .assignee
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_owned);
    let rate = assignee
        .as_deref()
        .map(|name| hourly_rate(store, project, name))
        .unwrap_or_default();
    let activities = fields
        .activities
        .into_iter()
        .map(|draft| Activity::new(draft, rate))
        .collect::<Result<Vec<_>, _>>()?;
    let attachments = fields
        .attachments
        .into_iter()
        .map(|draft| {
            let added_at = draft
                .id
                .and_then(|kept| current_attachments.iter().find(|file| file.id() == kept))
                .map_or(timestamp, Attachment::added_at);
            Attachment::new(draft, max_attachment_bytes, added_at)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(IssueContent {
        title: title.to_owned(),
        description: fields.description.trim().to_owned(),
        issue_type: fields.issue_type,
        priority: fields.priority,
        assignee,
        parent_id: fields.parent_id,
        story_points: fields.story_points,
        start_date: fields.start_date,
        completed_date: fields.completed_date,
        activities,
        attachments,
    })
}
