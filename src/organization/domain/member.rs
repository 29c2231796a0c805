//! Squad members and their contracts.
//!
//! Member records were first stored as bare name strings. Those legacy
//! records are migrated once, when a squad is deserialized, into [`Member`]
//! values with an [`Contract::Unspecified`] contract. Nothing after load
//! needs to know which shape a member was stored in.

use super::{CompanyId, OrganizationError};
use crate::shared::Id;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Schema version written alongside every stored squad.
///
/// Version 1 stored members as bare name strings; version 2 stores full
/// member records.
pub const MEMBER_SCHEMA_VERSION: u32 = 2;

/// Identifier of a squad member.
pub type MemberId = Id<Member>;

/// Employment contract of a squad member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum Contract {
    /// Professional supplied by a provider company.
    Outsourced {
        /// Provider company billing the member's hours.
        company_provider_id: Option<CompanyId>,
    },
    /// Salaried employee attached to an internal area.
    Employee {
        /// Internal area billing the member's hours.
        area_id: Option<CompanyId>,
        /// Display name of the internal area.
        area_name: String,
    },
    /// Intern attached to an internal area by name.
    Intern {
        /// Name of the internal area.
        area_name: String,
    },
    /// Independent contractor invoicing through their own company.
    Contractor {
        /// Contractor company name.
        company: String,
    },
    /// Contract not recorded; produced by the legacy member migration.
    #[default]
    Unspecified,
}

impl Contract {
    /// Returns the contract label used in messages and storage.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Outsourced { .. } => "outsourced",
            Self::Employee { .. } => "employee",
            Self::Intern { .. } => "intern",
            Self::Contractor { .. } => "contractor",
            Self::Unspecified => "unspecified",
        }
    }

    /// Returns the company or internal area billing the member's hours.
    ///
    /// Only outsourced and employee contracts are billed.
    #[must_use]
    pub const fn billing_company(&self) -> Option<CompanyId> {
        match self {
            Self::Outsourced {
                company_provider_id,
            } => *company_provider_id,
            Self::Employee { area_id, .. } => *area_id,
            Self::Intern { .. } | Self::Contractor { .. } | Self::Unspecified => None,
        }
    }

    /// Drops any reference to `company`, keeping the contract kind.
    pub(crate) fn forget_company(&mut self, company: CompanyId) {
        match self {
            Self::Outsourced {
                company_provider_id,
            } if *company_provider_id == Some(company) => *company_provider_id = None,
            Self::Employee { area_id, .. } if *area_id == Some(company) => *area_id = None,
            _ => {}
        }
    }

    /// Replaces references to `from` with `to`.
    pub(crate) fn replace_company(&mut self, from: CompanyId, to: CompanyId) {
        match self {
            Self::Outsourced {
                company_provider_id,
            } if *company_provider_id == Some(from) => *company_provider_id = Some(to),
            Self::Employee { area_id, .. } if *area_id == Some(from) => *area_id = Some(to),
            _ => {}
        }
    }

    fn validate(&self, member: &str) -> Result<(), OrganizationError> {
        let missing = match self {
            Self::Outsourced {
                company_provider_id: None,
            } => Some("company_provider_id"),
            Self::Employee { area_id: None, .. } => Some("area_id"),
            Self::Employee { area_name, .. } | Self::Intern { area_name }
                if area_name.trim().is_empty() =>
            {
                Some("area_name")
            }
            Self::Contractor { company } if company.trim().is_empty() => Some("company"),
            _ => None,
        };
        missing.map_or(Ok(()), |field| {
            Err(OrganizationError::MissingContractField {
                member: member.to_owned(),
                contract: self.label(),
                field,
            })
        })
    }
}

/// Squad member with a contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    id: MemberId,
    name: String,
    #[serde(default)]
    role: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    contract: Contract,
}

/// Input for creating or replacing a squad member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberDraft {
    /// Existing member identifier, when the member is being edited.
    pub id: Option<MemberId>,
    /// Member display name; issues are assigned by this name.
    pub name: String,
    /// Role, matched against company professional types.
    pub role: String,
    /// Contact e-mail.
    pub email: String,
    /// Employment contract.
    pub contract: Contract,
}

impl Member {
    /// Creates a validated member.
    ///
    /// # Errors
    ///
    /// Returns [`OrganizationError::EmptyMemberName`] for a blank name and
    /// [`OrganizationError::MissingContractField`] when the contract lacks a
    /// field it requires.
    pub fn new(draft: MemberDraft) -> Result<Self, OrganizationError> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(OrganizationError::EmptyMemberName);
        }
        draft.contract.validate(name)?;
        Ok(Self {
            id: draft.id.unwrap_or_default(),
            name: name.to_owned(),
            role: draft.role.trim().to_owned(),
            email: draft.email.trim().to_owned(),
            contract: draft.contract,
        })
    }

    /// Migrates a version 1 member stored as a bare name.
    #[must_use]
    pub fn from_legacy_name(name: &str) -> Self {
        Self {
            id: MemberId::new(),
            name: name.trim().to_owned(),
            role: String::new(),
            email: String::new(),
            contract: Contract::Unspecified,
        }
    }

    /// Returns the member identifier.
    #[must_use]
    pub const fn id(&self) -> MemberId {
        self.id
    }

    /// Returns the member name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the member role.
    #[must_use]
    pub fn role(&self) -> &str {
        &self.role
    }

    /// Returns the member e-mail.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the member contract.
    #[must_use]
    pub const fn contract(&self) -> &Contract {
        &self.contract
    }

    pub(crate) fn contract_mut(&mut self) -> &mut Contract {
        &mut self.contract
    }
}

/// Member entry as found in storage, in any schema version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MemberRecord {
    /// Version 2 member record.
    Current(Member),
    /// Version 1 member stored as its name.
    Legacy(String),
}

impl From<MemberRecord> for Member {
    fn from(record: MemberRecord) -> Self {
        match record {
            MemberRecord::Current(member) => member,
            MemberRecord::Legacy(name) => Self::from_legacy_name(&name),
        }
    }
}

/// Migrates a JSON member list of any schema version.
///
/// Entries that are neither a name nor a member record are skipped.
#[must_use]
pub fn migrate_members(value: Value) -> Vec<Member> {
    let Value::Array(entries) = value else {
        return Vec::new();
    };
    entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value::<MemberRecord>(entry).ok())
        .map(Member::from)
        .collect()
}
