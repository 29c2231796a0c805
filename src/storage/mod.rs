//! Persistence of board records.
//!
//! The board service writes through the [`ports::BoardRepository`] port.
//! Two variants implement it: the remote `PostgreSQL` store wrapped in a
//! local fallback, and the local key-value files alone. The variant is
//! chosen once at startup by [`PersistenceBackend::from_config`].
//!
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]

pub mod adapters;
mod backend;
pub mod ports;

pub use backend::{LocalFiles, PersistenceBackend};

#[cfg(test)]
mod tests;
