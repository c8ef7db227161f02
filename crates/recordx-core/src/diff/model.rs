//! Diff output types.

use serde::Serialize;
use serde_json::Value;

/// Classification of one expected attribute. Derived, never persisted.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChangeRecord {
    /// Attribute name
    pub attribute: String,
    /// Value before the action ran
    pub initial: Value,
    /// Value after the action ran and the entity was reloaded
    pub final_value: Value,
    /// Value the caller expected
    pub expected: Value,
    /// `initial != final_value` (native equality)
    pub changed: bool,
    /// `final_value == expected` under the equality policy
    pub matches: bool,
}

impl ChangeRecord {
    /// Changed, but not to the expected value
    pub fn changed_unexpectedly(&self) -> bool {
        self.changed && !self.matches
    }
}
