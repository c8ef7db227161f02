//! Attribution proxy.
//!
//! The code under test builds its delegate (a form or service object) and
//! hands it to the [`InterceptionPoint`] it receives from the matcher. If the
//! delegate's type is the designated one, the returned [`Intercepted`]
//! wrapper runs a [`CallObserver`] around every `execute` call; any other
//! delegate passes through untouched.
//!
//! For update checks the observer is a [`SnapshotObserver`]: it snapshots
//! the subject before the call, reloads and snapshots it after, and records
//! every attribute that moved in the shared [`AttributionSet`]. Attribution
//! accumulates across calls and across delegate instances.

pub mod accumulator;
pub mod delegate;
pub mod observer;

pub use accumulator::AttributionSet;
pub use delegate::{CallObserver, Delegate, DelegateDescriptor, Intercepted, InterceptionPoint};
pub use observer::SnapshotObserver;
