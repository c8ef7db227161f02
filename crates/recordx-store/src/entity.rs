//! Harness collaborators backed by SQLite

use crate::errors::Result;
use crate::repo::{Attributes, SqliteRepo};
use recordx_core::entity::{Entity, EntityId, Persistence};
use recordx_core::errors::RecordXError;
use rusqlite::Connection;
use serde_json::Value;
use std::cell::RefCell;

/// Entity handle over one `records` row
///
/// Reads come from a cached copy of the row taken at load time; only
/// [`Entity::reload`] refreshes it.
pub struct SqliteRecord<'c> {
    conn: &'c Connection,
    entity_type: String,
    id: EntityId,
    cached: RefCell<Attributes>,
}

impl<'c> SqliteRecord<'c> {
    /// Load an existing record
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the record does not exist.
    pub fn load(conn: &'c Connection, entity_type: &str, id: EntityId) -> Result<Self> {
        let row = fetch(conn, entity_type, &id)?;
        Ok(Self {
            conn,
            entity_type: entity_type.to_string(),
            id,
            cached: RefCell::new(row),
        })
    }

    /// Insert a record and return a handle on it
    ///
    /// # Errors
    ///
    /// See [`SqliteRepo::insert_record`].
    pub fn create<I, K>(conn: &'c Connection, entity_type: &str, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let id = SqliteRepo::insert_record(conn, entity_type, values)?;
        Self::load(conn, entity_type, id)
    }

    /// Change the cached value only; the row is untouched until [`save`](Self::save)
    ///
    /// # Errors
    ///
    /// Returns `UnknownAttribute` if the type does not declare `attribute`.
    pub fn assign(&self, attribute: &str, value: impl Into<Value>) -> Result<()> {
        match self.cached.borrow_mut().get_mut(attribute) {
            Some(slot) => {
                *slot = value.into();
                Ok(())
            }
            None => Err(self.unknown(attribute)),
        }
    }

    /// Write every cached value back to the row
    ///
    /// # Errors
    ///
    /// See [`SqliteRepo::update_attributes`].
    pub fn save(&self) -> Result<()> {
        let values = self.cached.borrow().clone();
        SqliteRepo::update_attributes(self.conn, &self.entity_type, &self.id, values)
    }

    fn unknown(&self, attribute: &str) -> recordx_core::ExError {
        RecordXError::UnknownAttribute {
            entity_type: self.entity_type.clone(),
            attribute: attribute.to_string(),
        }
        .into()
    }
}

fn fetch(conn: &Connection, entity_type: &str, id: &EntityId) -> Result<Attributes> {
    SqliteRepo::load_attributes(conn, entity_type, id)?.ok_or_else(|| {
        RecordXError::EntityNotFound {
            entity_type: entity_type.to_string(),
            entity_id: id.to_string(),
        }
        .into()
    })
}

impl Entity for SqliteRecord<'_> {
    fn entity_type(&self) -> &str {
        &self.entity_type
    }

    fn id(&self) -> EntityId {
        self.id.clone()
    }

    fn read(&self, attribute: &str) -> Result<Value> {
        self.cached
            .borrow()
            .get(attribute)
            .cloned()
            .ok_or_else(|| self.unknown(attribute))
    }

    fn reload(&self) -> Result<()> {
        let row = fetch(self.conn, &self.entity_type, &self.id)?;
        *self.cached.borrow_mut() = row;
        Ok(())
    }
}

/// Existence checks against the `records` table
pub struct SqlitePersistence<'c> {
    conn: &'c Connection,
}

impl<'c> SqlitePersistence<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }
}

impl Persistence for SqlitePersistence<'_> {
    fn exists(&self, entity_type: &str, id: &EntityId) -> Result<bool> {
        SqliteRepo::exists(self.conn, entity_type, id)
    }
}
