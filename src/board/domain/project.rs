//! Project aggregate.

use super::{BoardDomainError, ProjectId};
use crate::organization::domain::SquadId;
use crate::shared::{BoardRecord, Collection};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper-case project key, unique across projects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProjectKey(String);

impl ProjectKey {
    /// Creates a validated key, upper-casing the input.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::InvalidProjectKey`] when the trimmed value
    /// is empty or contains characters other than ASCII letters and digits.
    pub fn new(value: impl Into<String>) -> Result<Self, BoardDomainError> {
        let raw = value.into();
        let normalized = raw.trim().to_ascii_uppercase();
        if normalized.is_empty() || !normalized.chars().all(|ch| ch.is_ascii_alphanumeric()) {
            return Err(BoardDomainError::InvalidProjectKey(raw));
        }
        Ok(Self(normalized))
    }

    /// Returns the key as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ProjectKey {
    type Error = BoardDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProjectKey> for String {
    fn from(key: ProjectKey) -> Self {
        key.0
    }
}

impl fmt::Display for ProjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Project owning issues, stages and sprints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    id: ProjectId,
    name: String,
    key: ProjectKey,
    #[serde(default)]
    description: String,
    squad_id: Option<SquadId>,
    created_at: DateTime<Utc>,
}

/// Input for creating a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDraft {
    /// Project name.
    pub name: String,
    /// Project key; upper-cased on creation.
    pub key: String,
    /// Description.
    pub description: String,
    /// Squad working on the project.
    pub squad_id: SquadId,
}

/// Parameter object for reconstructing a persisted project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedProjectData {
    /// Persisted identifier.
    pub id: ProjectId,
    /// Project name.
    pub name: String,
    /// Project key.
    pub key: ProjectKey,
    /// Description.
    pub description: String,
    /// Squad working on the project, cleared when the squad is deleted.
    pub squad_id: Option<SquadId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// Creates a validated project with a temporary identifier.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyProjectName`] or
    /// [`BoardDomainError::InvalidProjectKey`].
    pub fn new(draft: ProjectDraft, created_at: DateTime<Utc>) -> Result<Self, BoardDomainError> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(BoardDomainError::EmptyProjectName);
        }
        Ok(Self {
            id: ProjectId::temporary(),
            name: name.to_owned(),
            key: ProjectKey::new(draft.key)?,
            description: draft.description.trim().to_owned(),
            squad_id: Some(draft.squad_id),
            created_at,
        })
    }

    /// Reconstructs a project from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedProjectData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            key: data.key,
            description: data.description,
            squad_id: data.squad_id,
            created_at: data.created_at,
        }
    }

    /// Returns the project name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the project key.
    #[must_use]
    pub const fn key(&self) -> &ProjectKey {
        &self.key
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the squad working on the project.
    #[must_use]
    pub const fn squad_id(&self) -> Option<SquadId> {
        self.squad_id
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub(crate) fn forget_squad(&mut self, squad: SquadId) {
        if self.squad_id == Some(squad) {
            self.squad_id = None;
        }
    }

    pub(crate) fn replace_squad(&mut self, from: SquadId, to: SquadId) {
        if self.squad_id == Some(from) {
            self.squad_id = Some(to);
        }
    }
}

impl BoardRecord for Project {
    const COLLECTION: Collection = Collection::Projects;

    fn id(&self) -> ProjectId {
        self.id
    }

    fn with_id(mut self, id: ProjectId) -> Self {
        self.id = id;
        self
    }
}
