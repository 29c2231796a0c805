//! Organisation data used to value logged work.
//!
//! Squads group the members assigned to a project. Each member carries a
//! contract that points at the provider company or internal area whose
//! professional types define the hourly rate for the member's role.
//!
//! - Domain types in [`domain`]

pub mod domain;

#[cfg(test)]
mod tests;
