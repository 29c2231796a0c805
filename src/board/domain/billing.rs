//! Hourly rates and financial totals for logged work.
//!
//! An assignee's rate is resolved through project → squad → member (by name)
//! → contract → company or internal area → professional type matching the
//! member's role. Any missing link yields a zero rate rather than an error.

use super::{EntityStore, ProjectId};
use crate::organization::domain::{Cents, Company, CompanyId, Contract, Member, WorkedMinutes};
use crate::shared::BoardRecord;

/// Totals of logged work billed by one company or internal area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyTotals {
    /// Company or internal area.
    pub company_id: CompanyId,
    /// Company name.
    pub name: String,
    /// Time logged.
    pub minutes: WorkedMinutes,
    /// Value of the time logged.
    pub value: Cents,
}

/// Totals of billed work across every project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinancialSummary {
    /// Time logged by billed members.
    pub total_minutes: WorkedMinutes,
    /// Value of that time.
    pub total_value: Cents,
    /// Per-company totals, one entry per stored company.
    pub companies: Vec<CompanyTotals>,
}

/// Work logged on one project by one assignee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    /// Assignee name, `None` for unassigned issues.
    pub assignee: Option<String>,
    /// Name of the company or area billing the assignee, if any.
    pub company: Option<String>,
    /// Time logged.
    pub minutes: WorkedMinutes,
    /// Value recorded on the activities.
    pub value: Cents,
}

/// Resolves the squad member a project assignee refers to.
#[must_use]
pub fn assignee_member<'a>(
    store: &'a EntityStore,
    project: ProjectId,
    assignee: &str,
) -> Option<&'a Member> {
    let squad_id = store.project(project)?.squad_id()?;
    store.squad(squad_id)?.member_named(assignee)
}

/// Resolves the company or internal area billing an assignee's hours.
///
/// Outsourced members bill through their provider; employees through their
/// internal area, which must be stored as one.
#[must_use]
pub fn billing_company<'a>(
    store: &'a EntityStore,
    project: ProjectId,
    assignee: &str,
) -> Option<&'a Company> {
    let member = assignee_member(store, project, assignee)?;
    let company = store.company(member.contract().billing_company()?)?;
    match member.contract() {
        Contract::Employee { .. } if !company.is_internal_area() => None,
        _ => Some(company),
    }
}

/// Returns the hourly rate of `assignee` on `project`, or zero when any
/// reference along the way is missing.
#[must_use]
pub fn hourly_rate(store: &EntityStore, project: ProjectId, assignee: &str) -> Cents {
    assignee_member(store, project, assignee)
        .zip(billing_company(store, project, assignee))
        .and_then(|(member, company)| company.rate_for_role(member.role()))
        .unwrap_or(Cents::ZERO)
}

/// Totals the time and value of every activity whose assignee is billed by
/// a company or internal area.
#[must_use]
pub fn financial_summary(store: &EntityStore) -> FinancialSummary {
    let mut companies: Vec<CompanyTotals> = store
        .companies()
        .iter()
        .map(|company| CompanyTotals {
            company_id: company.id(),
            name: company.name().to_owned(),
            minutes: WorkedMinutes::default(),
            value: Cents::ZERO,
        })
        .collect();
    let mut total_minutes = WorkedMinutes::default();
    let mut total_value = Cents::ZERO;

    for issue in store.issues() {
        let Some(company_id) = issue
            .assignee()
            .and_then(|assignee| billing_company(store, issue.project_id(), assignee))
            .map(Company::id)
        else {
            continue;
        };
        let entry = companies
            .iter_mut()
            .find(|totals| totals.company_id == company_id);
        let (minutes, value) = activity_totals(issue.activities());
        total_minutes = total_minutes.saturating_add(minutes);
        total_value = total_value.saturating_add(value);
        if let Some(totals) = entry {
            totals.minutes = totals.minutes.saturating_add(minutes);
            totals.value = totals.value.saturating_add(value);
        }
    }

    FinancialSummary {
        total_minutes,
        total_value,
        companies,
    }
}

/// Groups a project's logged work by assignee and billing company, sorted
/// by assignee name with unassigned work last.
#[must_use]
pub fn project_ledger(store: &EntityStore, project: ProjectId) -> Vec<LedgerEntry> {
    let mut entries: Vec<LedgerEntry> = Vec::new();
    for issue in store.issues_of(project) {
        if issue.activities().is_empty() {
            continue;
        }
        let assignee = issue
            .assignee()
            .map(str::trim)
            .filter(|name| !name.is_empty());
        let company = assignee
            .and_then(|name| billing_company(store, project, name))
            .map(|company| company.name().to_owned());
        let (minutes, value) = activity_totals(issue.activities());
        let position = entries.iter().position(|entry| {
            entry.assignee.as_deref() == assignee && entry.company == company
        });
        if let Some(entry) = position.and_then(|index| entries.get_mut(index)) {
            entry.minutes = entry.minutes.saturating_add(minutes);
            entry.value = entry.value.saturating_add(value);
            continue;
        }
        entries.push(LedgerEntry {
            assignee: assignee.map(str::to_owned),
            company,
            minutes,
            value,
        });
    }
    entries.sort_by(|left, right| match (&left.assignee, &right.assignee) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    entries
}

fn activity_totals(activities: &[super::Activity]) -> (WorkedMinutes, Cents) {
    activities.iter().fold(
        (WorkedMinutes::default(), Cents::ZERO),
        |(minutes, value), activity| {
            (
                minutes.saturating_add(activity.minutes()),
                value.saturating_add(activity.value()),
            )
        },
    )
}
