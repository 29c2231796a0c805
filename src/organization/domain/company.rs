//! Provider companies and internal areas.

use super::{Cents, OrganizationError};
use crate::shared::{BoardRecord, Collection, Id};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a company or internal area.
pub type CompanyId = Id<Company>;

/// Identifier of a professional type within a company.
pub type ProfessionalTypeId = Id<ProfessionalType>;

/// Billable role offered by a company, with its hourly value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfessionalType {
    id: ProfessionalTypeId,
    name: String,
    value_per_hour: Cents,
}

/// Input for a professional type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfessionalTypeDraft {
    /// Existing identifier when the type is being edited.
    pub id: Option<ProfessionalTypeId>,
    /// Role name matched against member roles.
    pub name: String,
    /// Hourly value.
    pub value_per_hour: Cents,
}

impl ProfessionalType {
    /// Creates a validated professional type.
    ///
    /// # Errors
    ///
    /// Returns [`OrganizationError::EmptyProfessionalTypeName`] for a blank
    /// name and [`OrganizationError::NonPositiveRate`] for a zero value.
    pub fn new(draft: ProfessionalTypeDraft) -> Result<Self, OrganizationError> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(OrganizationError::EmptyProfessionalTypeName);
        }
        if draft.value_per_hour.is_zero() {
            return Err(OrganizationError::NonPositiveRate(name.to_owned()));
        }
        Ok(Self {
            id: draft.id.unwrap_or_default(),
            name: name.to_owned(),
            value_per_hour: draft.value_per_hour,
        })
    }

    /// Returns the identifier.
    #[must_use]
    pub const fn id(&self) -> ProfessionalTypeId {
        self.id
    }

    /// Returns the role name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the hourly value.
    #[must_use]
    pub const fn value_per_hour(&self) -> Cents {
        self.value_per_hour
    }
}

/// Whether a company is an external provider or an internal area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum CompanyKind {
    /// External provider billed under a contract.
    Provider,
    /// Internal area; carries no contract value.
    InternalArea {
        /// Area name.
        area_name: String,
        /// Service the area provides.
        service: String,
    },
}

/// Company or internal area that bills members' hours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    id: CompanyId,
    name: String,
    contract_code: String,
    contract_value: Cents,
    contract_start: NaiveDate,
    contract_end: NaiveDate,
    kind: CompanyKind,
    professional_types: Vec<ProfessionalType>,
    created_at: DateTime<Utc>,
}

/// Input for creating or replacing a company.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyDraft {
    /// Existing identifier when the company is being edited.
    pub id: Option<CompanyId>,
    /// Company name.
    pub name: String,
    /// Contract code.
    pub contract_code: String,
    /// Total contract value; ignored for internal areas.
    pub contract_value: Cents,
    /// Contract start date.
    pub contract_start: NaiveDate,
    /// Contract end date.
    pub contract_end: NaiveDate,
    /// Provider or internal area.
    pub kind: CompanyKind,
    /// Billable roles.
    pub professional_types: Vec<ProfessionalTypeDraft>,
}

/// Parameter object for reconstructing a persisted company.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedCompanyData {
    /// Persisted identifier.
    pub id: CompanyId,
    /// Persisted name.
    pub name: String,
    /// Persisted contract code.
    pub contract_code: String,
    /// Persisted contract value.
    pub contract_value: Cents,
    /// Persisted contract start date.
    pub contract_start: NaiveDate,
    /// Persisted contract end date.
    pub contract_end: NaiveDate,
    /// Persisted kind.
    pub kind: CompanyKind,
    /// Persisted professional types.
    pub professional_types: Vec<ProfessionalType>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Company {
    /// Creates a validated company.
    ///
    /// Internal areas always carry a zero contract value.
    ///
    /// # Errors
    ///
    /// Returns [`OrganizationError`] when the name or area name is blank, a
    /// provider has no contract value, the contract period is empty, or the
    /// professional types are missing or invalid.
    pub fn new(draft: CompanyDraft, created_at: DateTime<Utc>) -> Result<Self, OrganizationError> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(OrganizationError::EmptyCompanyName);
        }
        let contract_value = match &draft.kind {
            CompanyKind::Provider if draft.contract_value.is_zero() => {
                return Err(OrganizationError::MissingContractValue);
            }
            CompanyKind::Provider => draft.contract_value,
            CompanyKind::InternalArea { area_name, .. } if area_name.trim().is_empty() => {
                return Err(OrganizationError::MissingAreaName);
            }
            CompanyKind::InternalArea { .. } => Cents::ZERO,
        };
        if draft.contract_end <= draft.contract_start {
            return Err(OrganizationError::InvalidContractPeriod {
                start: draft.contract_start,
                end: draft.contract_end,
            });
        }
        if draft.professional_types.is_empty() {
            return Err(OrganizationError::MissingProfessionalTypes);
        }
        let professional_types = draft
            .professional_types
            .into_iter()
            .map(ProfessionalType::new)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            id: draft.id.unwrap_or_else(CompanyId::temporary),
            name: name.to_owned(),
            contract_code: draft.contract_code.trim().to_owned(),
            contract_value,
            contract_start: draft.contract_start,
            contract_end: draft.contract_end,
            kind: draft.kind,
            professional_types,
            created_at,
        })
    }

    /// Reconstructs a company from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedCompanyData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            contract_code: data.contract_code,
            contract_value: data.contract_value,
            contract_start: data.contract_start,
            contract_end: data.contract_end,
            kind: data.kind,
            professional_types: data.professional_types,
            created_at: data.created_at,
        }
    }

    /// Returns the company name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the contract code.
    #[must_use]
    pub fn contract_code(&self) -> &str {
        &self.contract_code
    }

    /// Returns the contract value.
    #[must_use]
    pub const fn contract_value(&self) -> Cents {
        self.contract_value
    }

    /// Returns the contract start date.
    #[must_use]
    pub const fn contract_start(&self) -> NaiveDate {
        self.contract_start
    }

    /// Returns the contract end date.
    #[must_use]
    pub const fn contract_end(&self) -> NaiveDate {
        self.contract_end
    }

    /// Returns the company kind.
    #[must_use]
    pub const fn kind(&self) -> &CompanyKind {
        &self.kind
    }

    /// Returns `true` for internal areas.
    #[must_use]
    pub const fn is_internal_area(&self) -> bool {
        matches!(self.kind, CompanyKind::InternalArea { .. })
    }

    /// Returns the professional types.
    #[must_use]
    pub fn professional_types(&self) -> &[ProfessionalType] {
        &self.professional_types
    }

    /// Returns the hourly value for `role`, if the company offers it.
    #[must_use]
    pub fn rate_for_role(&self, role: &str) -> Option<Cents> {
        self.professional_types
            .iter()
            .find(|professional| professional.name() == role)
            .map(ProfessionalType::value_per_hour)
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl BoardRecord for Company {
    const COLLECTION: Collection = Collection::Companies;

    fn id(&self) -> CompanyId {
        self.id
    }

    fn with_id(mut self, id: CompanyId) -> Self {
        self.id = id;
        self
    }
}
