//! Rate lookup and financial totals.

use super::fixtures::{Board, MAX_ATTACHMENT_BYTES, board, date, member};
use crate::board::domain::{
    ActivityDraft, IssueType, ProjectDraft, ProjectId,
    billing::{financial_summary, hourly_rate, project_ledger},
    issues::{IssueFields, create_issue},
    registry::{create_project, delete_company, save_company, save_squad},
};
use crate::organization::domain::{
    Cents, CompanyDraft, CompanyId, CompanyKind, Contract, ProfessionalTypeDraft, SquadDraft,
    WorkedMinutes,
};
use rstest::{fixture, rstest};

struct Billed {
    board: Board,
    project: ProjectId,
    provider: CompanyId,
    area: CompanyId,
}

fn company(name: &str, kind: CompanyKind, rate: u64) -> CompanyDraft {
    CompanyDraft {
        id: None,
        name: name.to_owned(),
        contract_code: "CT-1".to_owned(),
        contract_value: Cents::new(1_000_000),
        contract_start: date(2026, 1, 1),
        contract_end: date(2026, 12, 31),
        kind,
        professional_types: vec![ProfessionalTypeDraft {
            id: None,
            name: "Developer".to_owned(),
            value_per_hour: Cents::new(rate),
        }],
    }
}

fn logged(minutes: u32) -> ActivityDraft {
    ActivityDraft {
        id: None,
        date: date(2026, 3, 2),
        minutes: WorkedMinutes::new(minutes),
        description: "pairing".to_owned(),
    }
}

#[fixture]
fn billed(mut board: Board) -> Billed {
    let clock = board.clock;
    let provider = save_company(
        &mut board.store,
        company("Acme", CompanyKind::Provider, 12_000),
        &clock,
    )
    .expect("valid provider");
    let area = save_company(
        &mut board.store,
        company(
            "Platform",
            CompanyKind::InternalArea {
                area_name: "Platform".to_owned(),
                service: "Infrastructure".to_owned(),
            },
            9_000,
        ),
        &clock,
    )
    .expect("valid area");
    let squad = save_squad(
        &mut board.store,
        SquadDraft {
            id: None,
            name: "Billing".to_owned(),
            members: vec![
                member(
                    "Bruno",
                    "Developer",
                    Contract::Outsourced {
                        company_provider_id: Some(provider),
                    },
                ),
                member(
                    "Carla",
                    "Developer",
                    Contract::Employee {
                        area_id: Some(area),
                        area_name: "Platform".to_owned(),
                    },
                ),
                member(
                    "Davi",
                    "Developer",
                    Contract::Employee {
                        area_id: Some(provider),
                        area_name: "Acme".to_owned(),
                    },
                ),
                member(
                    "Eva",
                    "Developer",
                    Contract::Intern {
                        area_name: "Platform".to_owned(),
                    },
                ),
            ],
        },
        &clock,
    )
    .expect("valid squad");
    let project = create_project(
        &mut board.store,
        ProjectDraft {
            name: "Payments".to_owned(),
            key: "pay".to_owned(),
            description: String::new(),
            squad_id: squad,
        },
        &clock,
    )
    .expect("valid project");
    Billed {
        board,
        project,
        provider,
        area,
    }
}

fn log_work(billed: &mut Billed, assignee: Option<&str>, minutes: u32) {
    let fields = IssueFields {
        assignee: assignee.map(str::to_owned),
        ..IssueFields::new("Work", IssueType::Task).with_activity(logged(minutes))
    };
    create_issue(
        &mut billed.board.store,
        billed.project,
        fields,
        MAX_ATTACHMENT_BYTES,
        &billed.board.clock,
    )
    .expect("issue creation should succeed");
}

#[rstest]
#[case("Bruno", 12_000)]
#[case("Carla", 9_000)]
#[case("Davi", 0)]
#[case("Eva", 0)]
#[case("Nobody", 0)]
fn rates_follow_the_member_contract(billed: Billed, #[case] name: &str, #[case] cents: u64) {
    assert_eq!(
        hourly_rate(&billed.board.store, billed.project, name),
        Cents::new(cents)
    );
}

#[rstest]
fn activities_are_valued_at_the_assignee_rate(mut billed: Billed) {
    log_work(&mut billed, Some("Bruno"), 90);

    let value = billed
        .board
        .store
        .issues_of(billed.project)
        .flat_map(|issue| issue.activities())
        .map(|activity| activity.value())
        .next();

    assert_eq!(value, Some(Cents::new(18_000)));
}

#[rstest]
fn deleted_companies_stop_billing(mut billed: Billed) {
    let updated =
        delete_company(&mut billed.board.store, billed.provider).expect("company deletes");

    assert_eq!(updated, 1);
    assert_eq!(
        hourly_rate(&billed.board.store, billed.project, "Bruno"),
        Cents::ZERO
    );
}

#[rstest]
fn summary_groups_billed_work_by_company(mut billed: Billed) {
    log_work(&mut billed, Some("Bruno"), 60);
    log_work(&mut billed, Some("Bruno"), 30);
    log_work(&mut billed, Some("Carla"), 120);
    log_work(&mut billed, Some("Eva"), 45);
    log_work(&mut billed, None, 15);

    let summary = financial_summary(&billed.board.store);

    assert_eq!(summary.total_minutes, WorkedMinutes::new(210));
    assert_eq!(summary.total_value, Cents::new(18_000 + 18_000));
    let acme = summary
        .companies
        .iter()
        .find(|totals| totals.company_id == billed.provider)
        .expect("provider totals");
    let platform = summary
        .companies
        .iter()
        .find(|totals| totals.company_id == billed.area)
        .expect("area totals");
    assert_eq!(acme.minutes, WorkedMinutes::new(90));
    assert_eq!(acme.value, Cents::new(18_000));
    assert_eq!(platform.minutes, WorkedMinutes::new(120));
    assert_eq!(platform.value, Cents::new(18_000));
}

#[rstest]
fn ledger_lists_unassigned_work_last(mut billed: Billed) {
    log_work(&mut billed, None, 15);
    log_work(&mut billed, Some("Eva"), 45);
    log_work(&mut billed, Some("Bruno"), 60);
    log_work(&mut billed, Some("Bruno"), 60);

    let ledger = project_ledger(&billed.board.store, billed.project);
    let rows: Vec<(Option<&str>, Option<&str>, u32)> = ledger
        .iter()
        .map(|entry| {
            (
                entry.assignee.as_deref(),
                entry.company.as_deref(),
                entry.minutes.value(),
            )
        })
        .collect();

    assert_eq!(
        rows,
        [
            (Some("Bruno"), Some("Acme"), 120),
            (Some("Eva"), None, 45),
            (None, None, 15),
        ]
    );
}
