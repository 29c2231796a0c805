//! Diesel schema for board persistence.

diesel::table! {
    /// Projects.
    projects (id) {
        /// Project identifier.
        id -> Uuid,
        /// Project name.
        #[max_length = 255]
        name -> Varchar,
        /// Upper-case project key.
        #[max_length = 32]
        key -> Varchar,
        /// Free-form description.
        description -> Text,
        /// Squad working on the project.
        squad_id -> Nullable<Uuid>,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Epics, stories, tasks and bugs.
    issues (id) {
        /// Issue identifier.
        id -> Uuid,
        /// Owning project.
        project_id -> Uuid,
        /// Sequential number within the project.
        number -> Int4,
        /// Title.
        title -> Text,
        /// Description.
        description -> Text,
        /// Hierarchy type.
        #[max_length = 16]
        issue_type -> Varchar,
        /// Priority.
        #[max_length = 16]
        priority -> Varchar,
        /// Key of the stage the issue sits in.
        #[max_length = 64]
        status -> Varchar,
        /// Assignee name.
        #[max_length = 255]
        assignee -> Nullable<Varchar>,
        /// Parent issue.
        parent_id -> Nullable<Uuid>,
        /// Estimate.
        story_points -> Nullable<Int4>,
        /// Sprint membership.
        sprint_id -> Nullable<Uuid>,
        /// Position within the sprint.
        sprint_order -> Nullable<Int4>,
        /// Logged work.
        activities -> Jsonb,
        /// Attached files.
        attachments -> Jsonb,
        /// Planned start date.
        start_date -> Nullable<Date>,
        /// Completion date.
        completed_date -> Nullable<Date>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Workflow stages of each project.
    stages (id) {
        /// Stage identifier.
        id -> Uuid,
        /// Owning project.
        project_id -> Uuid,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
        /// Key referenced by issue statuses.
        #[max_length = 64]
        key -> Varchar,
        /// Display colour.
        #[max_length = 32]
        color -> Varchar,
        /// Pipeline position.
        position -> Int4,
    }
}

diesel::table! {
    /// Sprints.
    sprints (id) {
        /// Sprint identifier.
        id -> Uuid,
        /// Owning project.
        project_id -> Uuid,
        /// Sprint name.
        #[max_length = 255]
        name -> Varchar,
        /// Duration in weeks.
        weeks -> Int4,
        /// Sprint goal.
        goal -> Text,
        /// Lifecycle status.
        #[max_length = 16]
        status -> Varchar,
        /// Start date.
        start_date -> Date,
        /// End date.
        end_date -> Date,
        /// Activation timestamp.
        activated_at -> Nullable<Timestamptz>,
        /// Closing timestamp.
        closed_at -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Squads and their members.
    squads (id) {
        /// Squad identifier.
        id -> Uuid,
        /// Squad name.
        #[max_length = 255]
        name -> Varchar,
        /// Member records.
        members -> Jsonb,
        /// Version of the member record layout.
        schema_version -> Int4,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Provider companies and internal areas.
    companies (id) {
        /// Company identifier.
        id -> Uuid,
        /// Company name.
        #[max_length = 255]
        name -> Varchar,
        /// Contract code.
        #[max_length = 64]
        contract_code -> Varchar,
        /// Contract value in cents.
        contract_value -> Int8,
        /// Contract start date.
        contract_start -> Date,
        /// Contract end date.
        contract_end -> Date,
        /// Provider or internal area details.
        kind -> Jsonb,
        /// Professional types with hourly rates.
        professional_types -> Jsonb,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}
