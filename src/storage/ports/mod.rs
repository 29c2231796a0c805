//! Port contracts for board persistence.
//!
//! Ports define infrastructure-agnostic interfaces used by the board service.

pub mod repository;

pub use repository::{BoardRepository, RecordRepository, RepositoryError, RepositoryResult};
