//! Canonical schema constants for structured logging
//!
//! These keep the field names emitted by the logging macros and the
//! attribution observers consistent, and let tests look them up by name.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_ASSERTION_ID: &str = "assertion_id";
pub const FIELD_TRACE_ID: &str = "trace_id";

// Entity identifiers
pub const FIELD_ENTITY_TYPE: &str = "entity_type";
pub const FIELD_ENTITY_ID: &str = "entity_id";
pub const FIELD_ATTRIBUTE: &str = "attribute";
pub const FIELD_DELEGATE: &str = "delegate";

// Verdict / phase
pub const FIELD_PHASE: &str = "phase";
pub const FIELD_PASSED: &str = "passed";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
pub const EVENT_ATTRIBUTED: &str = "attributed";
pub const EVENT_PHASE: &str = "phase";
