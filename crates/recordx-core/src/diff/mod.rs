//! Attribute diff engine.
//!
//! Compares an initial and a final [`Snapshot`](crate::snapshot::Snapshot)
//! against an [`Expectation`](crate::attributes::Expectation) and classifies
//! every expected attribute as unchanged, changed to the expected value, or
//! changed to something else.
//!
//! ## Entry point
//!
//! ```ignore
//! use recordx_core::diff::{compare, message};
//!
//! let records = compare(&initial, &final_snapshot, &expected)?;
//! let paragraph = message::value_mismatch_paragraph(&subject, &records, &config);
//! ```
//!
//! ## Guarantees
//!
//! - **Determinism**: records come out in expectation order; identical inputs
//!   produce identical records.
//! - **Classification only**: the engine never decides pass/fail. Matchers
//!   apply policy on top of the records.
//! - **No coercion by default**: `changed` always uses native value
//!   equality; `matches` follows the configured equality policy.

pub mod engine;
pub mod message;
pub mod model;

pub use engine::{compare, compare_with, mismatches, unattributed};
pub use model::ChangeRecord;
