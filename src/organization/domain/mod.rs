//! Domain model for squads, members and companies.

mod company;
mod error;
mod member;
mod money;
mod squad;

pub use company::{
    Company, CompanyDraft, CompanyId, CompanyKind, PersistedCompanyData, ProfessionalType,
    ProfessionalTypeDraft, ProfessionalTypeId,
};
pub use error::OrganizationError;
pub use member::{
    Contract, MEMBER_SCHEMA_VERSION, Member, MemberDraft, MemberId, MemberRecord, migrate_members,
};
pub use money::{Cents, WorkedMinutes};
pub use squad::{PersistedSquadData, Squad, SquadDraft, SquadId};
