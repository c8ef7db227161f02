//! recordx Core - side-effect attribution harness
//!
//! Proves that an action produced an intended, attributable change on a
//! persisted entity:
//! - Attribute snapshots and a deterministic diff engine
//! - An attribution proxy that tags every attribute changed while control is
//!   inside a designated delegate
//! - An existence probe for destroy-style checks
//! - Block matchers (`update_record`, `destroy_record`) and the `be_record`
//!   entity matcher producing a pass/fail verdict plus failure message
//! - An in-memory reference persistence layer for tests
//!
//! ```
//! use recordx_core::prelude::*;
//!
//! let store = MemoryStore::new();
//! store.define("User", &["name", "age"]);
//! let user = store
//!     .insert("User", [("name", Value::from("Sophia")), ("age", Value::from(20))])
//!     .unwrap();
//!
//! let verdict = expect_block(|_scope| {
//!     store.update("User", &user.id(), [("age", Value::from(30))]).unwrap();
//! })
//! .to(update_record(&user, Expectation::new().attr("age", 30)))
//! .unwrap();
//!
//! assert!(verdict.is_success());
//! ```

pub mod attributes;
pub mod attribution;
pub mod config;
pub mod diff;
pub mod entity;
pub mod errors;
pub mod logging_facility;
pub mod matchers;
pub mod memory;
pub mod probe;
pub mod snapshot;

// Re-export commonly used types
pub use attributes::{AttributeSet, Expectation};
pub use attribution::{
    AttributionSet, CallObserver, Delegate, DelegateDescriptor, Intercepted, InterceptionPoint,
};
pub use config::{EqualityPolicy, HarnessConfig};
pub use entity::{Entity, EntityId, Persistence};
pub use errors::{ExError, ExErrorKind, RecordXError, Result};
pub use matchers::{
    be_record, destroy_record, expect_block, expect_entity, update_record, Block, BlockMatcher,
    EntityMatcher, Phase, Verdict,
};
pub use snapshot::Snapshot;

/// Everything a host test needs in scope
pub mod prelude {
    pub use crate::attribution::{Delegate, InterceptionPoint};
    pub use crate::entity::{Entity, EntityId, Persistence};
    pub use crate::matchers::{
        be_record, destroy_record, expect_block, expect_entity, update_record, Verdict,
    };
    pub use crate::memory::{MemoryRecord, MemoryStore};
    pub use crate::{Expectation, HarnessConfig};
    pub use serde_json::Value;
}

#[doc(hidden)]
pub mod __private {
    pub use recordx_core_types::schema;
    pub use tracing;
}
