//! In-memory reference persistence.
//!
//! [`MemoryStore`] keeps one table per entity type; [`MemoryRecord`] is an
//! entity handle holding a cached copy of its row, refreshed only by
//! [`Entity::reload`]. Writes through the store are therefore invisible to
//! an existing handle until it reloads, like a row fetched from a database.

use crate::entity::{Entity, EntityId, Persistence};
use crate::errors::{ExError, ExErrorKind, RecordXError, Result};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

type Row = BTreeMap<String, Value>;

#[derive(Debug, Default)]
struct Table {
    attributes: Vec<String>,
    rows: BTreeMap<EntityId, Row>,
    next_id: i64,
}

impl Table {
    fn check_attribute(&self, entity_type: &str, attribute: &str) -> Result<()> {
        if self.attributes.iter().any(|a| a == attribute) {
            Ok(())
        } else {
            Err(RecordXError::UnknownAttribute {
                entity_type: entity_type.to_string(),
                attribute: attribute.to_string(),
            }
            .into())
        }
    }

    fn row_mut(&mut self, entity_type: &str, id: &EntityId) -> Result<&mut Row> {
        self.rows.get_mut(id).ok_or_else(|| not_found(entity_type, id))
    }
}

fn not_found(entity_type: &str, id: &EntityId) -> ExError {
    RecordXError::EntityNotFound {
        entity_type: entity_type.to_string(),
        entity_id: id.to_string(),
    }
    .into()
}

/// Shared, single-threaded in-memory tables; clones share the same data
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Rc<RefCell<BTreeMap<String, Table>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an entity type and its attributes, dropping any existing rows
    pub fn define(&self, entity_type: &str, attributes: &[&str]) {
        let table = Table {
            attributes: attributes.iter().map(|a| a.to_string()).collect(),
            rows: BTreeMap::new(),
            next_id: 1,
        };
        self.tables
            .borrow_mut()
            .insert(entity_type.to_string(), table);
    }

    fn with_table<T>(
        &self,
        entity_type: &str,
        f: impl FnOnce(&mut Table) -> Result<T>,
    ) -> Result<T> {
        let mut tables = self.tables.borrow_mut();
        let table = tables.get_mut(entity_type).ok_or_else(|| {
            ExError::new(ExErrorKind::InvalidInput)
                .with_entity_type(entity_type)
                .with_message(format!("entity type {} is not defined", entity_type))
        })?;
        f(table)
    }

    /// Insert a row, filling unspecified attributes with `null`
    ///
    /// Ids are assigned sequentially per entity type, starting at 1.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an undefined type and `UnknownAttribute`
    /// for a value the type does not define.
    pub fn insert<I, K>(&self, entity_type: &str, values: I) -> Result<MemoryRecord>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let (id, row) = self.with_table(entity_type, |table| {
            let mut row: Row = table
                .attributes
                .iter()
                .map(|a| (a.clone(), Value::Null))
                .collect();
            for (name, value) in values {
                let name = name.into();
                table.check_attribute(entity_type, &name)?;
                row.insert(name, value);
            }

            let id = EntityId::from(table.next_id);
            table.next_id += 1;
            table.rows.insert(id.clone(), row.clone());
            Ok((id, row))
        })?;

        tracing::trace!(op = "memory_insert", entity_type = entity_type, entity_id = %id);
        Ok(MemoryRecord {
            store: self.clone(),
            entity_type: entity_type.to_string(),
            id,
            cached: RefCell::new(row),
        })
    }

    /// Overwrite some attributes of a stored row
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the row is gone and `UnknownAttribute` for an
    /// undefined attribute. No value is written when any name is unknown.
    pub fn update<I, K>(&self, entity_type: &str, id: &EntityId, values: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        self.with_table(entity_type, |table| {
            let mut pending = Vec::new();
            for (name, value) in values {
                let name = name.into();
                table.check_attribute(entity_type, &name)?;
                pending.push((name, value));
            }
            let row = table.row_mut(entity_type, id)?;
            row.extend(pending);
            Ok(())
        })?;
        tracing::trace!(op = "memory_update", entity_type = entity_type, entity_id = %id);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `NotFound` if no such row exists.
    pub fn delete(&self, entity_type: &str, id: &EntityId) -> Result<()> {
        self.with_table(entity_type, |table| {
            table
                .rows
                .remove(id)
                .map(|_| ())
                .ok_or_else(|| not_found(entity_type, id))
        })?;
        tracing::trace!(op = "memory_delete", entity_type = entity_type, entity_id = %id);
        Ok(())
    }

    /// Current stored values of a row, if it exists
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an undefined type.
    pub fn get(&self, entity_type: &str, id: &EntityId) -> Result<Option<BTreeMap<String, Value>>> {
        self.with_table(entity_type, |table| Ok(table.rows.get(id).cloned()))
    }

    /// A fresh handle on an existing row
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such row exists.
    pub fn find(&self, entity_type: &str, id: &EntityId) -> Result<MemoryRecord> {
        let row = self
            .get(entity_type, id)?
            .ok_or_else(|| not_found(entity_type, id))?;
        Ok(MemoryRecord {
            store: self.clone(),
            entity_type: entity_type.to_string(),
            id: id.clone(),
            cached: RefCell::new(row),
        })
    }

    /// Number of stored rows of a type
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an undefined type.
    pub fn count(&self, entity_type: &str) -> Result<usize> {
        self.with_table(entity_type, |table| Ok(table.rows.len()))
    }
}

impl Persistence for MemoryStore {
    fn exists(&self, entity_type: &str, id: &EntityId) -> Result<bool> {
        self.with_table(entity_type, |table| Ok(table.rows.contains_key(id)))
    }
}

/// Entity handle over a [`MemoryStore`] row
#[derive(Debug, Clone)]
pub struct MemoryRecord {
    store: MemoryStore,
    entity_type: String,
    id: EntityId,
    cached: RefCell<Row>,
}

impl MemoryRecord {
    /// Change the cached value only; the store is untouched until [`save`](Self::save)
    ///
    /// # Errors
    ///
    /// Returns `UnknownAttribute` if the type does not define `attribute`.
    pub fn assign(&self, attribute: &str, value: impl Into<Value>) -> Result<()> {
        let mut cached = self.cached.borrow_mut();
        match cached.get_mut(attribute) {
            Some(slot) => {
                *slot = value.into();
                Ok(())
            }
            None => Err(RecordXError::UnknownAttribute {
                entity_type: self.entity_type.clone(),
                attribute: attribute.to_string(),
            }
            .into()),
        }
    }

    /// Write every cached value back to the store
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the row was deleted meanwhile.
    pub fn save(&self) -> Result<()> {
        let values: Vec<(String, Value)> = self
            .cached
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        self.store.update(&self.entity_type, &self.id, values)
    }

    pub fn store(&self) -> &MemoryStore {
        &self.store
    }
}

impl Entity for MemoryRecord {
    fn entity_type(&self) -> &str {
        &self.entity_type
    }

    fn id(&self) -> EntityId {
        self.id.clone()
    }

    fn read(&self, attribute: &str) -> Result<Value> {
        self.cached.borrow().get(attribute).cloned().ok_or_else(|| {
            RecordXError::UnknownAttribute {
                entity_type: self.entity_type.clone(),
                attribute: attribute.to_string(),
            }
            .into()
        })
    }

    fn reload(&self) -> Result<()> {
        let row = self
            .store
            .get(&self.entity_type, &self.id)?
            .ok_or_else(|| not_found(&self.entity_type, &self.id))?;
        *self.cached.borrow_mut() = row;
        Ok(())
    }
}
