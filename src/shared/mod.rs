//! Shared kernel for every bounded context.
//!
//! Holds the typed record identifier and the [`BoardRecord`] contract that
//! names the persisted collection each record kind belongs to.

mod ids;
mod record;

pub use ids::{Id, ParseIdError};
pub use record::{BoardRecord, Collection};
