//! Attribute sets and expectations
//!
//! An [`Expectation`] is the caller's ordered `name => value` mapping. Its
//! keys, validated once at assertion setup, form the [`AttributeSet`] under
//! test. Order is insertion order; it only drives message order.

use crate::errors::{RecordXError, Result};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;

/// Ordered set of unique, non-empty attribute names
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeSet {
    names: Vec<String>,
}

impl AttributeSet {
    /// Build a set from names in the given order
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an empty name and `DuplicateAttribute` if a
    /// name repeats.
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut ordered = Vec::new();
        for name in names {
            let name = name.into();
            if name.is_empty() {
                return Err(RecordXError::EmptyAttributeName.into());
            }
            if !seen.insert(name.clone()) {
                return Err(RecordXError::DuplicateAttribute { attribute: name }.into());
            }
            ordered.push(name);
        }
        Ok(Self { names: ordered })
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Expected final attribute values, in caller order
///
/// Built without validation so it reads naturally at the call site:
///
/// ```
/// use recordx_core::Expectation;
///
/// let expected = Expectation::new().attr("name", "Emily").attr("age", 30);
/// assert_eq!(expected.len(), 2);
/// ```
///
/// Duplicates are reported by [`Expectation::attribute_set`], which every
/// matcher calls before running the action.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Expectation {
    entries: Vec<(String, Value)>,
}

impl Expectation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an expected attribute value
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.push((name.into(), value.into()));
        self
    }

    /// The validated attribute names under test
    ///
    /// # Errors
    ///
    /// See [`AttributeSet::new`].
    pub fn attribute_set(&self) -> Result<AttributeSet> {
        AttributeSet::new(self.entries.iter().map(|(name, _)| name.as_str()))
    }

    /// Expected value for `name`, if listed
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S, V> FromIterator<(S, V)> for Expectation
where
    S: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (S, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |expected, (name, value)| expected.attr(name, value))
    }
}
