//! Workflow stages.

use super::{ProjectId, StageError, StageId};
use crate::shared::{BoardRecord, Collection};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stage key referenced by issue statuses: lowercase letters, digits and
/// hyphens.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StageKey(String);

impl StageKey {
    /// Creates a validated stage key.
    ///
    /// # Errors
    ///
    /// Returns [`StageError::InvalidStageKey`] when the trimmed value is empty
    /// or contains other characters than `a-z`, `0-9` and `-`.
    pub fn new(value: impl Into<String>) -> Result<Self, StageError> {
        let raw = value.into();
        let normalized = raw.trim();
        let is_valid = !normalized.is_empty()
            && normalized
                .chars()
                .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-');
        if !is_valid {
            return Err(StageError::InvalidStageKey(raw));
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Key of the default pipeline's final stage.
    #[must_use]
    pub fn done() -> Self {
        Self("done".to_owned())
    }

    /// Returns the key as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StageKey {
    type Error = StageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StageKey> for String {
    fn from(key: StageKey) -> Self {
        key.0
    }
}

impl AsRef<str> for StageKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl PartialEq<str> for StageKey {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl fmt::Display for StageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Column of a project's workflow pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    id: StageId,
    project_id: ProjectId,
    name: String,
    key: StageKey,
    #[serde(default)]
    color: String,
    order: u32,
}

/// Input for creating or editing a stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageDraft {
    /// Existing identifier when the stage is being edited.
    pub id: Option<StageId>,
    /// Owning project.
    pub project_id: ProjectId,
    /// Display name.
    pub name: String,
    /// Key referenced by issue statuses.
    pub key: String,
    /// Display colour.
    pub color: String,
    /// Pipeline position; 0 is the backlog.
    pub order: u32,
}

/// Parameter object for reconstructing a persisted stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedStageData {
    /// Persisted identifier.
    pub id: StageId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Display name.
    pub name: String,
    /// Key referenced by issue statuses.
    pub key: StageKey,
    /// Display colour.
    pub color: String,
    /// Pipeline position.
    pub order: u32,
}

/// Default pipeline seeded into every new project: key, name and colour.
const DEFAULT_PIPELINE: [(&str, &str, &str); 4] = [
    ("backlog", "Backlog", "#42526e"),
    ("refinamento", "Refinamento Técnico", "#ffab00"),
    ("in-progress", "Em Progresso", "#0052cc"),
    ("done", "Concluído", "#36b37e"),
];

impl Stage {
    /// Creates a validated stage with a temporary identifier unless the
    /// draft carries one.
    ///
    /// # Errors
    ///
    /// Returns [`StageError::EmptyStageName`] or
    /// [`StageError::InvalidStageKey`].
    pub fn new(draft: StageDraft) -> Result<Self, StageError> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(StageError::EmptyStageName);
        }
        let key = StageKey::new(draft.key)?;
        Ok(Self {
            id: draft.id.unwrap_or_else(StageId::temporary),
            project_id: draft.project_id,
            name: name.to_owned(),
            key,
            color: draft.color,
            order: draft.order,
        })
    }

    /// Builds the default pipeline for a new project.
    #[must_use]
    pub fn default_pipeline(project_id: ProjectId) -> Vec<Self> {
        DEFAULT_PIPELINE
            .iter()
            .zip(0_u32..)
            .map(|(&(key, name, color), order)| Self {
                id: StageId::temporary(),
                project_id,
                name: name.to_owned(),
                key: StageKey(key.to_owned()),
                color: color.to_owned(),
                order,
            })
            .collect()
    }

    /// Reconstructs a stage from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedStageData) -> Self {
        Self {
            id: data.id,
            project_id: data.project_id,
            name: data.name,
            key: data.key,
            color: data.color,
            order: data.order,
        }
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the key referenced by issue statuses.
    #[must_use]
    pub const fn key(&self) -> &StageKey {
        &self.key
    }

    /// Returns the display colour.
    #[must_use]
    pub fn color(&self) -> &str {
        &self.color
    }

    /// Returns the pipeline position.
    #[must_use]
    pub const fn order(&self) -> u32 {
        self.order
    }

    pub(crate) fn replace_project(&mut self, from: ProjectId, to: ProjectId) {
        if self.project_id == from {
            self.project_id = to;
        }
    }
}

impl BoardRecord for Stage {
    const COLLECTION: Collection = Collection::Stages;

    fn id(&self) -> StageId {
        self.id
    }

    fn with_id(mut self, id: StageId) -> Self {
        self.id = id;
        self
    }
}
