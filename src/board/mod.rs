//! Project board: issues, stages, sprints and board placement.
//!
//! The board owns every record in an [`domain::EntityStore`] and enforces
//! the issue hierarchy, the stage pipeline, the sprint lifecycle and the
//! placement rules on it. Callers mutate the board only by dispatching
//! [`services::BoardCommand`] values through a [`services::BoardService`],
//! which persists the resulting state diff.
//!
//! - Domain types and controllers in [`domain`]
//! - Command dispatch and persistence orchestration in [`services`]

pub mod domain;
pub mod services;

#[cfg(test)]
mod tests;
