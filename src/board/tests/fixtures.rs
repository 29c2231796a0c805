//! Shared fixtures for board unit tests.

use crate::board::domain::{
    EntityStore, IssueId, IssueType, ProjectDraft, ProjectId, SprintDraft, SprintId, StageKey,
    issues::{IssueFields, create_issue},
    lifecycle::{add_issues_to_sprint, create_sprint},
    registry::{create_project, save_squad},
};
use crate::organization::domain::{Contract, MemberDraft, SquadDraft, SquadId};
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use mockable::Clock;
use rstest::fixture;

pub const MAX_ATTACHMENT_BYTES: u64 = 2 * 1024 * 1024;

/// Clock frozen at a known instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    pub fn at(year: i32, month: u32, day: u32) -> Self {
        let instant = Utc
            .with_ymd_and_hms(year, month, day, 9, 0, 0)
            .single()
            .expect("valid fixed instant");
        Self(instant)
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

#[fixture]
pub fn clock() -> FixedClock {
    FixedClock::at(2026, 3, 2)
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}

pub fn key(value: &str) -> StageKey {
    StageKey::new(value).expect("valid stage key")
}

pub fn member(name: &str, role: &str, contract: Contract) -> MemberDraft {
    MemberDraft {
        id: None,
        name: name.to_owned(),
        role: role.to_owned(),
        email: format!("{}@example.com", name.to_lowercase()),
        contract,
    }
}

pub fn squad_draft(name: &str) -> SquadDraft {
    SquadDraft {
        id: None,
        name: name.to_owned(),
        members: vec![member(
            "Ana",
            "Developer",
            Contract::Intern {
                area_name: "Engineering".to_owned(),
            },
        )],
    }
}

/// A store holding one squad and one project with the default pipeline.
pub struct Board {
    pub store: EntityStore,
    pub squad: SquadId,
    pub project: ProjectId,
    pub clock: FixedClock,
}

impl Board {
    pub fn issue(&mut self, fields: IssueFields) -> IssueId {
        create_issue(
            &mut self.store,
            self.project,
            fields,
            MAX_ATTACHMENT_BYTES,
            &self.clock,
        )
        .expect("issue creation should succeed")
    }

    pub fn other_project(&mut self, key: &str) -> ProjectId {
        create_project(
            &mut self.store,
            ProjectDraft {
                name: format!("Project {key}"),
                key: key.to_owned(),
                description: String::new(),
                squad_id: self.squad,
            },
            &self.clock,
        )
        .expect("project creation should succeed")
    }

    pub fn task(&mut self, title: &str) -> IssueId {
        self.issue(IssueFields::new(title, IssueType::Task))
    }

    pub fn sprint(&mut self, name: &str) -> SprintId {
        let draft = SprintDraft {
            project_id: self.project,
            name: name.to_owned(),
            weeks: 2,
            goal: String::new(),
            start_date: date(2026, 3, 2),
        };
        create_sprint(&mut self.store, draft, &self.clock).expect("sprint creation should succeed")
    }

    pub fn sprint_with(&mut self, name: &str, issues: &[IssueId]) -> SprintId {
        let sprint = self.sprint(name);
        add_issues_to_sprint(&mut self.store, sprint, issues, &self.clock)
            .expect("adding backlog issues should succeed");
        sprint
    }
}

#[fixture]
pub fn board(clock: FixedClock) -> Board {
    let mut store = EntityStore::new();
    let squad = save_squad(&mut store, squad_draft("Core"), &clock).expect("valid squad");
    let project = create_project(
        &mut store,
        ProjectDraft {
            name: "Sprintboard".to_owned(),
            key: "sb".to_owned(),
            description: String::new(),
            squad_id: squad,
        },
        &clock,
    )
    .expect("valid project");
    store.take_changes();
    Board {
        store,
        squad,
        project,
        clock,
    }
}
