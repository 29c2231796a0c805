//! Error types for organisation validation.

use super::{CompanyId, SquadId};
use chrono::NaiveDate;
use thiserror::Error;

/// Errors returned while validating squads, members and companies.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OrganizationError {
    /// The squad name is empty after trimming.
    #[error("squad name must not be empty")]
    EmptySquadName,

    /// A squad must keep at least one member.
    #[error("squad must have at least one member")]
    SquadWithoutMembers,

    /// A member name is empty after trimming.
    #[error("member name must not be empty")]
    EmptyMemberName,

    /// A field required by the member's contract is missing.
    #[error("member '{member}' is missing '{field}' required by the {contract} contract")]
    MissingContractField {
        /// Member name.
        member: String,
        /// Contract label.
        contract: &'static str,
        /// Missing field name.
        field: &'static str,
    },

    /// The company name is empty after trimming.
    #[error("company name must not be empty")]
    EmptyCompanyName,

    /// An internal area was saved without its area name.
    #[error("internal area must name the area it belongs to")]
    MissingAreaName,

    /// A provider company was saved without a positive contract value.
    #[error("provider company must have a positive contract value")]
    MissingContractValue,

    /// The contract end date does not come after its start date.
    #[error("contract end {end} must be after contract start {start}")]
    InvalidContractPeriod {
        /// Contract start date.
        start: NaiveDate,
        /// Contract end date.
        end: NaiveDate,
    },

    /// A company must define at least one professional type.
    #[error("company must define at least one professional type")]
    MissingProfessionalTypes,

    /// A professional type name is empty after trimming.
    #[error("professional type name must not be empty")]
    EmptyProfessionalTypeName,

    /// A professional type has no positive hourly value.
    #[error("professional type '{0}' must have a positive hourly value")]
    NonPositiveRate(String),

    /// The referenced squad does not exist.
    #[error("squad not found: {0}")]
    SquadNotFound(SquadId),

    /// The referenced company does not exist.
    #[error("company not found: {0}")]
    CompanyNotFound(CompanyId),
}
