//! Correlation types for assertion tracking
//!
//! Every assertion invocation gets its own [`AssertionId`] so that the log
//! lines emitted by the orchestrator, the attribution observers and the
//! persistence layer for one verdict can be grouped together.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a single assertion invocation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssertionId(String);

impl AssertionId {
    /// Generate a new AssertionId using UUIDv7 (time ordered)
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Create from an existing string
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for AssertionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AssertionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Trace identifier supplied by the host test run, when it has one
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TraceId(String);

impl TraceId {
    /// Generate a new random TraceId
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Create from an existing string (e.g. a test name)
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for TraceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TraceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Correlation context owned by one assertion invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionContext {
    pub assertion_id: AssertionId,
    pub trace_id: Option<TraceId>,
}

impl AssertionContext {
    /// Create a fresh context with a new AssertionId
    pub fn new() -> Self {
        Self {
            assertion_id: AssertionId::new(),
            trace_id: None,
        }
    }

    /// Attach the host run's TraceId
    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }
}

impl Default for AssertionContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assertion_id_generation() {
        let id1 = AssertionId::new();
        let id2 = AssertionId::new();

        assert_ne!(id1, id2);
        assert!(!id1.as_str().is_empty());
    }

    #[test]
    fn test_assertion_id_display() {
        let id = AssertionId::from_string("a-1".to_string());
        assert_eq!(format!("{}", id), "a-1");
    }

    #[test]
    fn test_context_has_fresh_id_and_no_trace() {
        let ctx1 = AssertionContext::new();
        let ctx2 = AssertionContext::new();

        assert_ne!(ctx1.assertion_id, ctx2.assertion_id);
        assert!(ctx1.trace_id.is_none());
    }

    #[test]
    fn test_context_with_trace_id() {
        let trace_id = TraceId::from_string("update_record_suite".to_string());
        let ctx = AssertionContext::new().with_trace_id(trace_id.clone());

        assert_eq!(ctx.trace_id, Some(trace_id));
    }

    #[test]
    fn test_serialization() {
        let id = AssertionId::new();
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: AssertionId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
