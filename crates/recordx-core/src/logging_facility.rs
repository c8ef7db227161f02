//! Structured logging facility for recordx
//!
//! - Single initialization point via `init(profile)`
//! - Structured logging macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//! - Test capture mode for deterministic assertions on emitted events
//!
//! # Usage
//!
//! ```rust
//! use recordx_core::logging_facility::{init, Profile};
//!
//! // Initialize once, e.g. from a test harness setup function
//! init(Profile::Development);
//! ```
//!
//! Every assertion run emits one `start` and one `end` (or `end_error`)
//! event tagged with its `assertion_id`. Attribution observers emit an
//! `attributed` event per sanctioned call at debug level.

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
