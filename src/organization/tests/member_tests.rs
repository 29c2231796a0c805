//! Member validation and legacy member migration.

use crate::organization::domain::{
    CompanyId, Contract, MEMBER_SCHEMA_VERSION, Member, MemberDraft, OrganizationError, Squad, SquadDraft,
    SquadId, migrate_members,
};
use chrono::{TimeZone, Utc};
use rstest::rstest;
use serde_json::json;

fn draft(name: &str, contract: Contract) -> MemberDraft {
    MemberDraft {
        id: None,
        name: name.to_owned(),
        role: " Developer ".to_owned(),
        email: "dev@example.com".to_owned(),
        contract,
    }
}

#[rstest]
#[case(Contract::Outsourced { company_provider_id: None }, "company_provider_id")]
#[case(Contract::Employee { area_id: None, area_name: "Platform".to_owned() }, "area_id")]
#[case(
    Contract::Employee { area_id: Some(CompanyId::new()), area_name: " ".to_owned() },
    "area_name"
)]
#[case(Contract::Intern { area_name: String::new() }, "area_name")]
#[case(Contract::Contractor { company: "  ".to_owned() }, "company")]
fn contracts_require_their_fields(#[case] contract: Contract, #[case] field: &'static str) {
    let label = contract.label();

    let result = Member::new(draft("Ana", contract));

    assert_eq!(
        result,
        Err(OrganizationError::MissingContractField {
            member: "Ana".to_owned(),
            contract: label,
            field,
        })
    );
}

#[rstest]
fn members_are_trimmed() {
    let member = Member::new(draft(
        "  Ana ",
        Contract::Contractor {
            company: "Ana Consulting".to_owned(),
        },
    ))
    .expect("valid member");

    assert_eq!(member.name(), "Ana");
    assert_eq!(member.role(), "Developer");
    assert_eq!(member.contract().billing_company(), None);
}

#[rstest]
fn blank_member_names_are_rejected() {
    let result = Member::new(draft("   ", Contract::Unspecified));

    assert_eq!(result, Err(OrganizationError::EmptyMemberName));
}

#[rstest]
fn legacy_member_names_become_unspecified_members() {
    let members = migrate_members(json!([
        "Ana",
        {
            "id": "6f1c1a5e-0000-4000-8000-000000000001",
            "name": "Bruno",
            "role": "Tester",
            "email": "bruno@example.com",
            "contract": { "kind": "intern", "areaName": "QA" }
        },
        42
    ]));

    let names: Vec<&str> = members.iter().map(Member::name).collect();
    assert_eq!(names, ["Ana", "Bruno"]);
    assert_eq!(
        members.first().map(Member::contract),
        Some(&Contract::Unspecified)
    );
    assert_eq!(
        members.get(1).map(Member::contract),
        Some(&Contract::Intern {
            area_name: "QA".to_owned()
        })
    );
}

#[rstest]
fn non_list_member_values_migrate_to_nothing() {
    assert!(migrate_members(json!({ "name": "Ana" })).is_empty());
}

#[rstest]
fn legacy_squads_deserialize_with_migrated_members() {
    let raw = json!({
        "id": "6f1c1a5e-0000-4000-8000-0000000000aa",
        "name": "Core",
        "members": ["Ana", "Bruno"],
        "createdAt": "2025-11-03T10:00:00Z"
    });

    let squad: Squad = serde_json::from_value(raw).expect("legacy squad parses");

    assert_eq!(squad.members().len(), 2);
    assert!(squad.member_named("Bruno").is_some());
    assert!(
        squad
            .members()
            .iter()
            .all(|member| *member.contract() == Contract::Unspecified)
    );
}

#[rstest]
fn stored_squads_carry_the_current_schema_version() {
    let created = Utc
        .with_ymd_and_hms(2026, 1, 5, 8, 0, 0)
        .single()
        .expect("valid instant");
    let squad = Squad::new(
        SquadDraft {
            id: Some(SquadId::new()),
            name: "Core".to_owned(),
            members: vec![draft("Ana", Contract::Unspecified)],
        },
        created,
    )
    .expect("valid squad");

    let value = serde_json::to_value(&squad).expect("squad serializes");
    let restored: Squad = serde_json::from_value(value.clone()).expect("squad parses");

    assert_eq!(
        value.get("schemaVersion").and_then(serde_json::Value::as_u64),
        Some(u64::from(MEMBER_SCHEMA_VERSION))
    );
    assert_eq!(restored, squad);
}
