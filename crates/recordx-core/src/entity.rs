//! Collaborator contracts: the entity under test and the persistence layer
//!
//! The harness only ever observes entities. It never creates, assigns or
//! destroys them; those are the job of the action under test.

use crate::errors::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Identity key of a persisted record, rendered verbatim in messages
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for EntityId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Handle to a persisted record
///
/// Implementations cache attribute values in memory; `reload` refreshes the
/// cache from the persistence layer. `reload` takes `&self` because the
/// orchestrator and every attribution observer hold the same handle while
/// the action runs, so the cache sits behind interior mutability.
pub trait Entity {
    /// Type name of the record, e.g. `User`
    fn entity_type(&self) -> &str;

    /// Identity key of the record
    fn id(&self) -> EntityId;

    /// Read a named attribute from the in-memory state
    ///
    /// # Errors
    ///
    /// Returns `UnknownAttribute` if the entity does not define `attribute`.
    fn read(&self, attribute: &str) -> Result<Value>;

    /// Refresh the in-memory state from the persistence layer
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the record no longer exists, or a
    /// `Persistence` error from the backing store.
    fn reload(&self) -> Result<()>;
}

/// Lookup capability of the persistence layer
pub trait Persistence {
    /// True if a record of `entity_type` with `id` is currently stored
    ///
    /// # Errors
    ///
    /// Returns a `Persistence` error if the backing store cannot be queried.
    fn exists(&self, entity_type: &str, id: &EntityId) -> Result<bool>;
}
