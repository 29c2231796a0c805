//! Local key-value persistence.
//!
//! Each collection is kept under a fixed key as one serialized JSON list.
//! The file-backed store is the offline fallback and the session mirror of
//! the remote database; the in-memory store serves tests.

mod kv;
mod repository;

pub use kv::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
pub use repository::LocalRepository;
