//! Point-in-time attribute capture

use crate::attributes::AttributeSet;
use crate::entity::Entity;
use crate::errors::Result;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Immutable `name => value` capture of one entity, restricted to an
/// attribute set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    values: BTreeMap<String, Value>,
}

impl Snapshot {
    /// Read every attribute in `attributes` from the entity's in-memory state
    ///
    /// Does not reload; callers reload first when they need fresh values.
    ///
    /// # Errors
    ///
    /// Propagates `UnknownAttribute` from [`Entity::read`].
    pub fn capture(entity: &dyn Entity, attributes: &AttributeSet) -> Result<Self> {
        let values = attributes
            .iter()
            .map(|name| entity.read(name).map(|value| (name.to_string(), value)))
            .collect::<Result<BTreeMap<_, _>>>()?;
        Ok(Self { values })
    }

    /// Build a snapshot directly from values
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Names in `attributes` whose value differs between `self` and `later`,
    /// in attribute-set order. A name missing on one side counts as changed.
    pub fn differing<'a>(&self, later: &Snapshot, attributes: &'a AttributeSet) -> Vec<&'a str> {
        attributes
            .iter()
            .filter(|name| self.get(name) != later.get(name))
            .collect()
    }
}
