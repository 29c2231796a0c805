//! Squad aggregate.

use super::{CompanyId, MEMBER_SCHEMA_VERSION, Member, MemberDraft, MemberRecord, OrganizationError};
use crate::shared::{BoardRecord, Collection, Id};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a squad.
pub type SquadId = Id<Squad>;

/// Team of members assigned to projects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SquadRecord", into = "SquadRecord")]
pub struct Squad {
    id: SquadId,
    name: String,
    members: Vec<Member>,
    created_at: DateTime<Utc>,
}

/// Input for creating or replacing a squad.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SquadDraft {
    /// Existing squad identifier when the squad is being edited.
    pub id: Option<SquadId>,
    /// Squad name.
    pub name: String,
    /// Squad members.
    pub members: Vec<MemberDraft>,
}

/// Parameter object for reconstructing a persisted squad.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedSquadData {
    /// Persisted squad identifier.
    pub id: SquadId,
    /// Persisted squad name.
    pub name: String,
    /// Persisted members, already migrated.
    pub members: Vec<Member>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Squad {
    /// Creates a validated squad.
    ///
    /// A draft without an identifier receives a temporary one.
    ///
    /// # Errors
    ///
    /// Returns [`OrganizationError`] when the name is blank, no member is
    /// given, or a member fails validation.
    pub fn new(draft: SquadDraft, created_at: DateTime<Utc>) -> Result<Self, OrganizationError> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(OrganizationError::EmptySquadName);
        }
        if draft.members.is_empty() {
            return Err(OrganizationError::SquadWithoutMembers);
        }
        let members = draft
            .members
            .into_iter()
            .map(Member::new)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            id: draft.id.unwrap_or_else(SquadId::temporary),
            name: name.to_owned(),
            members,
            created_at,
        })
    }

    /// Reconstructs a squad from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedSquadData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            members: data.members,
            created_at: data.created_at,
        }
    }

    /// Returns the squad name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the squad members.
    #[must_use]
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Finds a member by display name.
    #[must_use]
    pub fn member_named(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|member| member.name() == name)
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns `true` when any member contract references `company`.
    #[must_use]
    pub fn references_company(&self, company: CompanyId) -> bool {
        self.members
            .iter()
            .any(|member| member.contract().billing_company() == Some(company))
    }

    /// Clears every member contract reference to `company`.
    pub(crate) fn forget_company(&mut self, company: CompanyId) {
        for member in &mut self.members {
            member.contract_mut().forget_company(company);
        }
    }

    /// Rewrites member contract references from `from` to `to`.
    pub(crate) fn replace_company(&mut self, from: CompanyId, to: CompanyId) {
        for member in &mut self.members {
            member.contract_mut().replace_company(from, to);
        }
    }
}

impl BoardRecord for Squad {
    const COLLECTION: Collection = Collection::Squads;

    fn id(&self) -> SquadId {
        self.id
    }

    fn with_id(mut self, id: SquadId) -> Self {
        self.id = id;
        self
    }
}

/// Stored squad shape; members may be in any schema version.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SquadRecord {
    #[serde(default = "legacy_schema_version")]
    schema_version: u32,
    id: SquadId,
    name: String,
    members: Vec<MemberRecord>,
    #[serde(default = "Utc::now")]
    created_at: DateTime<Utc>,
}

const fn legacy_schema_version() -> u32 {
    1
}

impl From<SquadRecord> for Squad {
    fn from(record: SquadRecord) -> Self {
        if record.schema_version < MEMBER_SCHEMA_VERSION {
            tracing::debug!(
                squad = %record.id,
                from = record.schema_version,
                to = MEMBER_SCHEMA_VERSION,
                "migrating squad members"
            );
        }
        Self {
            id: record.id,
            name: record.name,
            members: record.members.into_iter().map(Member::from).collect(),
            created_at: record.created_at,
        }
    }
}

impl From<Squad> for SquadRecord {
    fn from(squad: Squad) -> Self {
        Self {
            schema_version: MEMBER_SCHEMA_VERSION,
            id: squad.id,
            name: squad.name,
            members: squad.members.into_iter().map(MemberRecord::Current).collect(),
            created_at: squad.created_at,
        }
    }
}
