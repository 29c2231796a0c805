//! Persisted record contract.

use super::Id;
use serde::{Serialize, de::DeserializeOwned};
use std::fmt;

/// Persisted collection a record kind belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// Projects.
    Projects,
    /// Issues (epics, stories, tasks and bugs).
    Issues,
    /// Workflow stages.
    Stages,
    /// Sprints.
    Sprints,
    /// Squads and their members.
    Squads,
    /// Provider companies and internal areas.
    Companies,
}

impl Collection {
    /// Every collection, in the order records are loaded at startup.
    pub const ALL: [Self; 6] = [
        Self::Squads,
        Self::Companies,
        Self::Projects,
        Self::Stages,
        Self::Sprints,
        Self::Issues,
    ];

    /// Returns the collection name used in logs and remote tables.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Projects => "projects",
            Self::Issues => "issues",
            Self::Stages => "stages",
            Self::Sprints => "sprints",
            Self::Squads => "squads",
            Self::Companies => "companies",
        }
    }

    /// Returns the fixed key under which the local store keeps the
    /// collection as a single serialized list.
    #[must_use]
    pub const fn storage_key(self) -> &'static str {
        match self {
            Self::Projects => "sprintboard-projects",
            Self::Issues => "sprintboard-issues",
            Self::Stages => "sprintboard-stages",
            Self::Sprints => "sprintboard-sprints",
            Self::Squads => "sprintboard-squads",
            Self::Companies => "sprintboard-companies",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record kind owned by the entity store and persisted by repositories.
pub trait BoardRecord: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection the record kind is stored in.
    const COLLECTION: Collection;

    /// Returns the record identifier.
    fn id(&self) -> Id<Self>;

    /// Returns the record with its identifier replaced.
    #[must_use]
    fn with_id(self, id: Id<Self>) -> Self;
}
