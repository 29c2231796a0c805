//! Unit tests for the storage adapters.

mod local_tests;

use crate::organization::domain::{Contract, MemberDraft, Squad, SquadDraft};
use chrono::{TimeZone, Utc};

/// Builds a valid squad with a temporary identifier.
fn squad(name: &str) -> Squad {
    let created = Utc
        .with_ymd_and_hms(2026, 2, 2, 9, 0, 0)
        .single()
        .expect("valid instant");
    Squad::new(
        SquadDraft {
            id: None,
            name: name.to_owned(),
            members: vec![MemberDraft {
                id: None,
                name: "Ana".to_owned(),
                role: "Developer".to_owned(),
                email: "ana@example.com".to_owned(),
                contract: Contract::Unspecified,
            }],
        },
        created,
    )
    .expect("valid squad")
}
