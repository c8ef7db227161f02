//! SQLite repository implementation
//!
//! Records live in one `records` table keyed by `(entity_type, id)`. Ids are
//! assigned per entity type from `entity_types.next_id`, starting at 1, and
//! are never reused after a delete. Attribute names are declared per type in
//! `entity_types`; writes naming any other attribute are rejected before
//! anything is written.
//!
//! Multi-statement writes run inside a savepoint, so they nest in a
//! transaction the caller already holds.

use crate::errors::{from_rusqlite, from_serde, invalid_id, undefined_type, Result};
use recordx_core::entity::EntityId;
use recordx_core::errors::RecordXError;
use recordx_core::AttributeSet;
use rusqlite::{Connection, OptionalExtension};
use serde_json::Value;
use std::collections::BTreeMap;

/// Attribute values of one record
pub type Attributes = BTreeMap<String, Value>;

/// SQLite repository for typed records
pub struct SqliteRepo;

impl SqliteRepo {
    /// Declare an entity type and its attribute names
    ///
    /// Redeclaring a type replaces its attribute list; stored rows are kept.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateAttribute` / `InvalidInput` for a bad name list and
    /// `Persistence` on database failure.
    pub fn define_type(conn: &Connection, entity_type: &str, attributes: &[&str]) -> Result<()> {
        let names: Vec<String> = AttributeSet::new(attributes.iter().copied())?
            .iter()
            .map(str::to_string)
            .collect();
        let json = serde_json::to_string(&names).map_err(|e| from_serde("define_type", e))?;

        conn.execute(
            "INSERT INTO entity_types (name, attributes, created_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(name) DO UPDATE SET attributes = excluded.attributes",
            rusqlite::params![entity_type, json, chrono::Utc::now().timestamp()],
        )
        .map_err(from_rusqlite)?;

        Ok(())
    }

    /// Declared attribute names of a type, in declaration order
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the type was never declared.
    pub fn type_attributes(conn: &Connection, entity_type: &str) -> Result<Vec<String>> {
        let json: String = conn
            .query_row(
                "SELECT attributes FROM entity_types WHERE name = ?1",
                [entity_type],
                |row| row.get(0),
            )
            .optional()
            .map_err(from_rusqlite)?
            .ok_or_else(|| undefined_type(entity_type))?;

        serde_json::from_str(&json).map_err(|e| from_serde("type_attributes", e))
    }

    /// Insert a record, filling unspecified attributes with `null`
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an undeclared type, `UnknownAttribute` for
    /// an undeclared attribute and `Persistence` on database failure.
    pub fn insert_record<I, K>(conn: &Connection, entity_type: &str, values: I) -> Result<EntityId>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let declared = Self::type_attributes(conn, entity_type)?;
        let mut row: Attributes = declared.iter().map(|a| (a.clone(), Value::Null)).collect();
        row.extend(checked(entity_type, &declared, values)?);
        let json = serde_json::to_string(&row).map_err(|e| from_serde("insert_record", e))?;

        let id = in_savepoint(conn, |conn| {
            let id: i64 = conn
                .query_row(
                    "SELECT next_id FROM entity_types WHERE name = ?1",
                    [entity_type],
                    |r| r.get(0),
                )
                .map_err(from_rusqlite)?;
            conn.execute(
                "UPDATE entity_types SET next_id = ?1 WHERE name = ?2",
                rusqlite::params![id + 1, entity_type],
            )
            .map_err(from_rusqlite)?;
            let now = chrono::Utc::now().timestamp();
            conn.execute(
                "INSERT INTO records (entity_type, id, attributes, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)",
                rusqlite::params![entity_type, id, json, now],
            )
            .map_err(from_rusqlite)?;
            Ok(id)
        })?;

        tracing::debug!(op = "insert_record", entity_type = entity_type, entity_id = id);
        Ok(EntityId::from(id))
    }

    /// Overwrite some attributes of a stored record
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the record is gone, `UnknownAttribute` for an
    /// undeclared attribute (nothing is written) and `Persistence` on
    /// database failure.
    pub fn update_attributes<I, K>(
        conn: &Connection,
        entity_type: &str,
        id: &EntityId,
        values: I,
    ) -> Result<()>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let declared = Self::type_attributes(conn, entity_type)?;
        let changes = checked(entity_type, &declared, values)?;
        let key = row_key(id)?;

        in_savepoint(conn, |conn| {
            let mut row = Self::load_attributes(conn, entity_type, id)?
                .ok_or_else(|| not_found(entity_type, id))?;
            row.extend(changes);
            let json =
                serde_json::to_string(&row).map_err(|e| from_serde("update_attributes", e))?;
            conn.execute(
                "UPDATE records SET attributes = ?1, updated_at = ?2
                 WHERE entity_type = ?3 AND id = ?4",
                rusqlite::params![json, chrono::Utc::now().timestamp(), entity_type, key],
            )
            .map_err(from_rusqlite)?;
            Ok(())
        })?;

        tracing::debug!(op = "update_attributes", entity_type = entity_type, entity_id = key);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `NotFound` if no such record exists.
    pub fn delete_record(conn: &Connection, entity_type: &str, id: &EntityId) -> Result<()> {
        Self::type_attributes(conn, entity_type)?;
        let key = row_key(id)?;

        let deleted = conn
            .execute(
                "DELETE FROM records WHERE entity_type = ?1 AND id = ?2",
                rusqlite::params![entity_type, key],
            )
            .map_err(from_rusqlite)?;
        if deleted == 0 {
            return Err(not_found(entity_type, id));
        }

        tracing::debug!(op = "delete_record", entity_type = entity_type, entity_id = key);
        Ok(())
    }

    /// Stored attribute values of a record, if it exists
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if the stored JSON is not an object.
    pub fn load_attributes(
        conn: &Connection,
        entity_type: &str,
        id: &EntityId,
    ) -> Result<Option<Attributes>> {
        let key = row_key(id)?;
        let json: Option<String> = conn
            .query_row(
                "SELECT attributes FROM records WHERE entity_type = ?1 AND id = ?2",
                rusqlite::params![entity_type, key],
                |row| row.get(0),
            )
            .optional()
            .map_err(from_rusqlite)?;

        json.map(|text| serde_json::from_str(&text).map_err(|e| from_serde("load_attributes", e)))
            .transpose()
    }

    /// # Errors
    ///
    /// Returns `InvalidInput` for an undeclared type or a non-integer id.
    pub fn exists(conn: &Connection, entity_type: &str, id: &EntityId) -> Result<bool> {
        Self::type_attributes(conn, entity_type)?;
        let key = row_key(id)?;
        let found = conn
            .query_row(
                "SELECT 1 FROM records WHERE entity_type = ?1 AND id = ?2",
                rusqlite::params![entity_type, key],
                |_| Ok(()),
            )
            .optional()
            .map_err(from_rusqlite)?;
        Ok(found.is_some())
    }
}

/// Run `write` inside a savepoint; released on success, rolled back on error
///
/// Outside a transaction the savepoint starts one; inside the caller's
/// transaction it nests.
fn in_savepoint<T>(conn: &Connection, write: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
    conn.execute_batch("SAVEPOINT recordx_write").map_err(from_rusqlite)?;
    match write(conn) {
        Ok(value) => {
            conn.execute_batch("RELEASE recordx_write").map_err(from_rusqlite)?;
            Ok(value)
        }
        Err(err) => {
            // the write error wins over a failed rollback
            let _ = conn.execute_batch("ROLLBACK TO recordx_write; RELEASE recordx_write");
            Err(err)
        }
    }
}

fn row_key(id: &EntityId) -> Result<i64> {
    id.as_str().parse().map_err(|_| invalid_id(id))
}

fn not_found(entity_type: &str, id: &EntityId) -> recordx_core::ExError {
    RecordXError::EntityNotFound {
        entity_type: entity_type.to_string(),
        entity_id: id.to_string(),
    }
    .into()
}

/// Validate every name against the declared list before any write
fn checked<I, K>(entity_type: &str, declared: &[String], values: I) -> Result<Vec<(String, Value)>>
where
    I: IntoIterator<Item = (K, Value)>,
    K: Into<String>,
{
    values
        .into_iter()
        .map(|(name, value)| {
            let name = name.into();
            if declared.contains(&name) {
                Ok((name, value))
            } else {
                Err(RecordXError::UnknownAttribute {
                    entity_type: entity_type.to_string(),
                    attribute: name,
                }
                .into())
            }
        })
        .collect()
}
