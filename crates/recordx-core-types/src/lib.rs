//! Core types shared across recordx facilities
//!
//! This crate holds the small vocabulary used by both the error facility
//! and the logging facility of `recordx-core`:
//!
//! - **Correlation types**: AssertionId, TraceId, AssertionContext
//! - **Sensitive data**: Sensitive<T> marker for redacted attribute values
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod schema;
pub mod sensitive;

pub use correlation::{AssertionContext, AssertionId, TraceId};
pub use sensitive::{Sensitive, REDACTED};
