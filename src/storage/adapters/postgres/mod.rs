//! `PostgreSQL` adapter for board persistence.

pub mod models;
mod repository;
pub mod schema;

pub use repository::{BoardPgPool, PostgresRepository, RemoteRecord};
