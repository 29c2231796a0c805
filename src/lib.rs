//! Sprintboard: issue hierarchy and sprint lifecycle engine.
//!
//! This crate holds the business rules of a project-tracking board: issues
//! arranged in an epic → story → task/bug hierarchy, per-project workflow
//! stages, sprints with a `refinamento` → `active` → `closed` lifecycle, and
//! the billing data (squads, members, companies) used to value logged work.
//!
//! # Architecture
//!
//! Sprintboard follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, local files)
//!
//! # Modules
//!
//! - [`board`]: Entity store, hierarchy validation, stage pipeline, sprint
//!   lifecycle, board placement and command dispatch
//! - [`organization`]: Squads, members and companies used for rate lookup
//! - [`storage`]: Persistence port with remote and local-fallback adapters
//! - [`config`]: Layered configuration loading
//! - [`shared`]: Typed record identifiers shared by every context

pub mod board;
pub mod config;
pub mod organization;
pub mod shared;
pub mod storage;
