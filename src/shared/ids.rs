//! Typed record identifiers.
//!
//! Every persisted record is addressed by an [`Id`] tagged with the record
//! type it refers to. An identifier is either *temporary* (generated by the
//! client before the record has been stored) or *canonical* (confirmed by a
//! persistence adapter). Temporary identifiers render with a `temp-` prefix.

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use thiserror::Error;
use uuid::Uuid;

const TEMPORARY_PREFIX: &str = "temp-";

/// Error returned when an identifier string cannot be parsed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid record identifier: {0}")]
pub struct ParseIdError(pub String);

/// Identifier of a record of type `T`.
pub struct Id<T> {
    uuid: Uuid,
    temporary: bool,
    marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    /// Creates a new random canonical identifier.
    ///
    /// Used for values embedded in a parent record, which are never inserted
    /// on their own.
    #[must_use]
    pub fn new() -> Self {
        Self::canonical(Uuid::new_v4())
    }

    /// Creates a new client-generated identifier awaiting a canonical id.
    #[must_use]
    pub fn temporary() -> Self {
        Self {
            uuid: Uuid::new_v4(),
            temporary: true,
            marker: PhantomData,
        }
    }

    /// Creates a canonical identifier from a stored UUID.
    #[must_use]
    pub const fn canonical(uuid: Uuid) -> Self {
        Self {
            uuid,
            temporary: false,
            marker: PhantomData,
        }
    }

    /// Returns `true` when the record has not been confirmed by storage yet.
    #[must_use]
    pub const fn is_temporary(&self) -> bool {
        self.temporary
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn uuid(&self) -> Uuid {
        self.uuid
    }

    /// Returns the canonical form of this identifier, keeping the UUID.
    #[must_use]
    pub const fn to_canonical(&self) -> Self {
        Self::canonical(self.uuid)
    }

    /// Parses an identifier in its rendered form.
    ///
    /// # Errors
    ///
    /// Returns [`ParseIdError`] when the value is not a UUID, optionally
    /// prefixed with `temp-`.
    pub fn parse(value: &str) -> Result<Self, ParseIdError> {
        let trimmed = value.trim();
        let (raw, temporary) = trimmed
            .strip_prefix(TEMPORARY_PREFIX)
            .map_or((trimmed, false), |rest| (rest, true));
        let uuid = Uuid::parse_str(raw).map_err(|_| ParseIdError(value.to_owned()))?;
        Ok(Self {
            uuid,
            temporary,
            marker: PhantomData,
        })
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Id<T> {}

impl<T> Default for Id<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.uuid == other.uuid && self.temporary == other.temporary
    }
}

impl<T> Eq for Id<T> {}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.uuid.hash(state);
        self.temporary.hash(state);
    }
}

impl<T> PartialOrd for Id<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Id<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.uuid
            .cmp(&other.uuid)
            .then(self.temporary.cmp(&other.temporary))
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.temporary {
            write!(f, "{TEMPORARY_PREFIX}{}", self.uuid)
        } else {
            write!(f, "{}", self.uuid)
        }
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({self})")
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(de::Error::custom)
    }
}
