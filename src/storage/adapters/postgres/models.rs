//! Diesel row models for board persistence.
//!
//! Rows use the snake_case column names of the remote tables. Each row type
//! converts to and from its domain record; nested collections travel as
//! JSON columns.

use super::schema::{companies, issues, projects, sprints, squads, stages};
use crate::board::domain::{
    Issue, IssueNumber, IssueType, PersistedIssueData, PersistedProjectData, PersistedSprintData,
    PersistedStageData, Priority, Project, ProjectKey, Sprint, SprintStatus, Stage, StageKey,
};
use crate::organization::domain::{
    Cents, Company, MEMBER_SCHEMA_VERSION, PersistedCompanyData, PersistedSquadData, Squad,
    migrate_members,
};
use crate::shared::{BoardRecord, Collection, Id};
use crate::storage::ports::{RepositoryError, RepositoryResult};
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

/// Row of the `projects` table.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct ProjectRow {
    /// Project identifier.
    pub id: Uuid,
    /// Project name.
    pub name: String,
    /// Upper-case project key.
    pub key: String,
    /// Description.
    pub description: String,
    /// Squad working on the project.
    pub squad_id: Option<Uuid>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl ProjectRow {
    /// Maps a project to its row.
    #[must_use]
    pub fn from_record(project: &Project) -> Self {
        Self {
            id: project.id().uuid(),
            name: project.name().to_owned(),
            key: project.key().as_str().to_owned(),
            description: project.description().to_owned(),
            squad_id: project.squad_id().map(|squad| squad.uuid()),
            created_at: project.created_at(),
        }
    }

    /// Rebuilds the project held by the row.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Corrupt`] when the stored key is invalid.
    pub fn into_record(self) -> RepositoryResult<Project> {
        let key =
            ProjectKey::try_from(self.key).map_err(|err| corrupt(Collection::Projects, err))?;
        Ok(Project::from_persisted(PersistedProjectData {
            id: Id::canonical(self.id),
            name: self.name,
            key,
            description: self.description,
            squad_id: self.squad_id.map(Id::canonical),
            created_at: self.created_at,
        }))
    }
}

/// Row of the `issues` table.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = issues)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct IssueRow {
    /// Issue identifier.
    pub id: Uuid,
    /// Owning project.
    pub project_id: Uuid,
    /// Sequential number within the project.
    pub number: i32,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Hierarchy type.
    pub issue_type: String,
    /// Priority.
    pub priority: String,
    /// Key of the stage the issue sits in.
    pub status: String,
    /// Assignee name.
    pub assignee: Option<String>,
    /// Parent issue.
    pub parent_id: Option<Uuid>,
    /// Estimate.
    pub story_points: Option<i32>,
    /// Sprint membership.
    pub sprint_id: Option<Uuid>,
    /// Position within the sprint.
    pub sprint_order: Option<i32>,
    /// Logged work as JSON.
    pub activities: Value,
    /// Attached files as JSON.
    pub attachments: Value,
    /// Planned start date.
    pub start_date: Option<NaiveDate>,
    /// Completion date.
    pub completed_date: Option<NaiveDate>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl IssueRow {
    /// Maps an issue to its row.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] when a number overflows its column or the
    /// nested collections cannot be encoded.
    pub fn from_record(issue: &Issue) -> RepositoryResult<Self> {
        Ok(Self {
            id: issue.id().uuid(),
            project_id: issue.project_id().uuid(),
            number: to_column(u32::from(issue.number()))?,
            title: issue.title().to_owned(),
            description: issue.description().to_owned(),
            issue_type: issue.issue_type().as_str().to_owned(),
            priority: issue.priority().as_str().to_owned(),
            status: issue.status().as_str().to_owned(),
            assignee: issue.assignee().map(str::to_owned),
            parent_id: issue.parent_id().map(|parent| parent.uuid()),
            story_points: issue.story_points().map(to_column).transpose()?,
            sprint_id: issue.sprint_id().map(|sprint| sprint.uuid()),
            sprint_order: issue.sprint_order().map(to_column).transpose()?,
            activities: to_json(issue.activities())?,
            attachments: to_json(issue.attachments())?,
            start_date: issue.start_date(),
            completed_date: issue.completed_date(),
            created_at: issue.created_at(),
            updated_at: issue.updated_at(),
        })
    }

    /// Rebuilds the issue held by the row.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Corrupt`] when a stored value is invalid.
    pub fn into_record(self) -> RepositoryResult<Issue> {
        let number = IssueNumber::try_from(from_column(self.number)?)
            .map_err(|err| corrupt(Collection::Issues, err))?;
        let issue_type = IssueType::try_from(self.issue_type.as_str())
            .map_err(|err| corrupt(Collection::Issues, err))?;
        let priority = Priority::try_from(self.priority.as_str())
            .map_err(|err| corrupt(Collection::Issues, err))?;
        let status =
            StageKey::try_from(self.status).map_err(|err| corrupt(Collection::Issues, err))?;
        Ok(Issue::from_persisted(PersistedIssueData {
            id: Id::canonical(self.id),
            project_id: Id::canonical(self.project_id),
            number,
            title: self.title,
            description: self.description,
            issue_type,
            priority,
            status,
            assignee: self.assignee,
            parent_id: self.parent_id.map(Id::canonical),
            story_points: self.story_points.map(from_column).transpose()?,
            sprint_id: self.sprint_id.map(Id::canonical),
            sprint_order: self.sprint_order.map(from_column).transpose()?,
            activities: from_json(Collection::Issues, self.activities)?,
            attachments: from_json(Collection::Issues, self.attachments)?,
            start_date: self.start_date,
            completed_date: self.completed_date,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }))
    }
}

/// Row of the `stages` table.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = stages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct StageRow {
    /// Stage identifier.
    pub id: Uuid,
    /// Owning project.
    pub project_id: Uuid,
    /// Display name.
    pub name: String,
    /// Key referenced by issue statuses.
    pub key: String,
    /// Display colour.
    pub color: String,
    /// Pipeline position.
    pub position: i32,
}

impl StageRow {
    /// Maps a stage to its row.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] when the position overflows its column.
    pub fn from_record(stage: &Stage) -> RepositoryResult<Self> {
        Ok(Self {
            id: stage.id().uuid(),
            project_id: stage.project_id().uuid(),
            name: stage.name().to_owned(),
            key: stage.key().as_str().to_owned(),
            color: stage.color().to_owned(),
            position: to_column(stage.order())?,
        })
    }

    /// Rebuilds the stage held by the row.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Corrupt`] when a stored value is invalid.
    pub fn into_record(self) -> RepositoryResult<Stage> {
        let key = StageKey::try_from(self.key).map_err(|err| corrupt(Collection::Stages, err))?;
        Ok(Stage::from_persisted(PersistedStageData {
            id: Id::canonical(self.id),
            project_id: Id::canonical(self.project_id),
            name: self.name,
            key,
            color: self.color,
            order: from_column(self.position)?,
        }))
    }
}

/// Row of the `sprints` table.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = sprints)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct SprintRow {
    /// Sprint identifier.
    pub id: Uuid,
    /// Owning project.
    pub project_id: Uuid,
    /// Sprint name.
    pub name: String,
    /// Duration in weeks.
    pub weeks: i32,
    /// Sprint goal.
    pub goal: String,
    /// Lifecycle status.
    pub status: String,
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

impl SprintRow {
    /// Maps a sprint to its row.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] when the duration overflows its column.
    pub fn from_record(sprint: &Sprint) -> RepositoryResult<Self> {
        Ok(Self {
            id: sprint.id().uuid(),
            project_id: sprint.project_id().uuid(),
            name: sprint.name().to_owned(),
            weeks: to_column(sprint.weeks())?,
            goal: sprint.goal().to_owned(),
            status: sprint.status().as_str().to_owned(),
            start_date: sprint.start_date(),
            end_date: sprint.end_date(),
            activated_at: sprint.activated_at(),
            closed_at: sprint.closed_at(),
            created_at: sprint.created_at(),
        })
    }

    /// Rebuilds the sprint held by the row.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Corrupt`] when a stored value is invalid.
    pub fn into_record(self) -> RepositoryResult<Sprint> {
        let status = SprintStatus::try_from(self.status.as_str())
            .map_err(|err| corrupt(Collection::Sprints, err))?;
        Ok(Sprint::from_persisted(PersistedSprintData {
            id: Id::canonical(self.id),
            project_id: Id::canonical(self.project_id),
            name: self.name,
            weeks: from_column(self.weeks)?,
            goal: self.goal,
            status,
            start_date: self.start_date,
            end_date: self.end_date,
            activated_at: self.activated_at,
            closed_at: self.closed_at,
            created_at: self.created_at,
        }))
    }
}

/// Row of the `squads` table.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = squads)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SquadRow {
    /// Squad identifier.
    pub id: Uuid,
    /// Squad name.
    pub name: String,
    /// Member records as JSON.
    pub members: Value,
    /// Version of the member record layout.
    pub schema_version: i32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl SquadRow {
    /// Maps a squad to its row at the current member schema version.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] when the members cannot be encoded.
    pub fn from_record(squad: &Squad) -> RepositoryResult<Self> {
        Ok(Self {
            id: squad.id().uuid(),
            name: squad.name().to_owned(),
            members: to_json(squad.members())?,
            schema_version: to_column(MEMBER_SCHEMA_VERSION)?,
            created_at: squad.created_at(),
        })
    }

    /// Rebuilds the squad held by the row, migrating legacy members.
    #[must_use]
    pub fn into_record(self) -> Squad {
        if self.schema_version < 2 {
            tracing::debug!(
                squad = %self.id,
                version = self.schema_version,
                "migrating squad members"
            );
        }
        Squad::from_persisted(PersistedSquadData {
            id: Id::canonical(self.id),
            name: self.name,
            members: migrate_members(self.members),
            created_at: self.created_at,
        })
    }
}

/// Row of the `companies` table.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = companies)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CompanyRow {
    /// Company identifier.
    pub id: Uuid,
    /// Company name.
    pub name: String,
    /// Contract code.
    pub contract_code: String,
    /// Contract value in cents.
    pub contract_value: i64,
    /// Contract start date.
    pub contract_start: NaiveDate,
    /// Contract end date.
    pub contract_end: NaiveDate,
    /// Provider or internal area details as JSON.
    pub kind: Value,
    /// Professional types as JSON.
    pub professional_types: Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl CompanyRow {
    /// Maps a company to its row.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] when the contract value overflows its
    /// column or the nested values cannot be encoded.
    pub fn from_record(company: &Company) -> RepositoryResult<Self> {
        let contract_value = i64::try_from(company.contract_value().value())
            .map_err(RepositoryError::persistence)?;
        Ok(Self {
            id: company.id().uuid(),
            name: company.name().to_owned(),
            contract_code: company.contract_code().to_owned(),
            contract_value,
            contract_start: company.contract_start(),
            contract_end: company.contract_end(),
            kind: to_json(company.kind())?,
            professional_types: to_json(company.professional_types())?,
            created_at: company.created_at(),
        })
    }

    /// Rebuilds the company held by the row.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Corrupt`] when a stored value is invalid.
    pub fn into_record(self) -> RepositoryResult<Company> {
        let contract_value = u64::try_from(self.contract_value)
            .map(Cents::new)
            .map_err(|err| corrupt(Collection::Companies, err))?;
        Ok(Company::from_persisted(PersistedCompanyData {
            id: Id::canonical(self.id),
            name: self.name,
            contract_code: self.contract_code,
            contract_value,
            contract_start: self.contract_start,
            contract_end: self.contract_end,
            kind: from_json(Collection::Companies, self.kind)?,
            professional_types: from_json(Collection::Companies, self.professional_types)?,
            created_at: self.created_at,
        }))
    }
}

fn corrupt(collection: Collection, err: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::corrupt(collection.as_str(), err.to_string())
}

fn to_column(value: u32) -> RepositoryResult<i32> {
    i32::try_from(value).map_err(RepositoryError::persistence)
}

fn from_column(value: i32) -> RepositoryResult<u32> {
    u32::try_from(value).map_err(RepositoryError::persistence)
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> RepositoryResult<Value> {
    serde_json::to_value(value).map_err(RepositoryError::persistence)
}

fn from_json<T: DeserializeOwned>(collection: Collection, value: Value) -> RepositoryResult<T> {
    serde_json::from_value(value).map_err(|err| corrupt(collection, err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::organization::domain::Contract;
    use chrono::TimeZone;
    use rstest::rstest;
    use serde_json::json;

    fn timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn stored_issue() -> IssueRow {
        IssueRow {
            id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            number: 7,
            title: "Export report".to_owned(),
            description: String::new(),
            issue_type: "story".to_owned(),
            priority: "high".to_owned(),
            status: "in-progress".to_owned(),
            assignee: Some("Ana".to_owned()),
            parent_id: None,
            story_points: Some(5),
            sprint_id: Some(Uuid::new_v4()),
            sprint_order: Some(0),
            activities: json!([]),
            attachments: json!([]),
            start_date: None,
            completed_date: None,
            created_at: timestamp(),
            updated_at: timestamp(),
        }
    }

    #[rstest]
    fn issue_row_maps_snake_case_columns_to_fields() {
        let row = stored_issue();
        let sprint = row.sprint_id;
        let issue = row.clone().into_record().expect("valid row");

        assert_eq!(u32::from(issue.number()), 7);
        assert_eq!(issue.issue_type(), IssueType::Story);
        assert_eq!(issue.priority(), Priority::High);
        assert_eq!(issue.story_points(), Some(5));
        assert_eq!(issue.sprint_id().map(|id| id.uuid()), sprint);
        assert!(!issue.id().is_temporary());
        assert_eq!(IssueRow::from_record(&issue).expect("encodable"), row);
    }

    #[rstest]
    #[case::unknown_type("issue_type", "feature")]
    #[case::zero_number("number", "0")]
    #[case::bad_status("status", "In Progress")]
    fn issue_row_rejects_invalid_values(#[case] column: &str, #[case] value: &str) {
        let mut row = stored_issue();
        match column {
            "issue_type" => value.clone_into(&mut row.issue_type),
            "number" => row.number = value.parse().expect("numeric case"),
            _ => value.clone_into(&mut row.status),
        }

        let err = row.into_record().expect_err("invalid row");

        assert!(matches!(err, RepositoryError::Corrupt { collection: "issues", .. }));
    }

    #[rstest]
    fn squad_row_migrates_legacy_member_names() {
        let row = SquadRow {
            id: Uuid::new_v4(),
            name: "Core".to_owned(),
            members: json!(["Ana", "Bruno"]),
            schema_version: 1,
            created_at: timestamp(),
        };

        let squad = row.into_record();

        let names: Vec<_> = squad.members().iter().map(|member| member.name()).collect();
        assert_eq!(names, ["Ana", "Bruno"]);
        assert!(
            squad
                .members()
                .iter()
                .all(|member| *member.contract() == Contract::Unspecified)
        );
        let rewritten = SquadRow::from_record(&squad).expect("encodable");
        assert_eq!(rewritten.schema_version, 2);
        assert!(rewritten.members.get(0).and_then(|member| member.get("name")).is_some());
    }

    #[rstest]
    fn project_row_keeps_optional_squad() {
        let row = ProjectRow {
            id: Uuid::new_v4(),
            name: "Portal".to_owned(),
            key: "PRT".to_owned(),
            description: String::new(),
            squad_id: None,
            created_at: timestamp(),
        };

        let project = row.clone().into_record().expect("valid row");

        assert_eq!(project.squad_id(), None);
        assert_eq!(ProjectRow::from_record(&project), row);
    }
}
