//! Snapshot-based call observer for update checks

use crate::attribution::accumulator::AttributionSet;
use crate::attribution::delegate::CallObserver;
use crate::attributes::AttributeSet;
use crate::entity::Entity;
use crate::errors::{ExError, Result};
use crate::snapshot::Snapshot;
use recordx_core_types::schema::EVENT_ATTRIBUTED;
use std::cell::RefCell;

/// Attributes subject changes to the delegate call they happened in
///
/// Per call: reload and snapshot the subject on `enter`, then on `exit`
/// reload again (the delegate may have written storage without touching the
/// in-memory subject), snapshot, and attribute every attribute that moved.
/// The reload on `enter` keeps changes made outside the delegate just
/// before the call from being credited to it.
pub struct SnapshotObserver<'a> {
    subject: &'a dyn Entity,
    attributes: &'a AttributeSet,
    attribution: &'a AttributionSet,
    delegate: &'a str,
    pending: RefCell<Vec<Option<Snapshot>>>,
}

impl<'a> SnapshotObserver<'a> {
    pub fn new(
        subject: &'a dyn Entity,
        attributes: &'a AttributeSet,
        attribution: &'a AttributionSet,
        delegate: &'a str,
    ) -> Self {
        Self {
            subject,
            attributes,
            attribution,
            delegate,
            pending: RefCell::new(Vec::new()),
        }
    }

    fn fresh_snapshot(&self) -> Result<Snapshot> {
        self.subject.reload()?;
        Snapshot::capture(self.subject, self.attributes)
    }
}

impl CallObserver for SnapshotObserver<'_> {
    fn enter(&self) {
        let before = match self.fresh_snapshot() {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                self.attribution.record_fault(err.with_op("attribution_enter"));
                None
            }
        };
        self.pending.borrow_mut().push(before);
    }

    fn exit(&self) {
        // `None` means enter already faulted; nothing to compare against
        let Some(Some(before)) = self.pending.borrow_mut().pop() else {
            return;
        };

        let after = match self.fresh_snapshot() {
            Ok(snapshot) => snapshot,
            Err(err) => {
                self.attribution.record_fault(err.with_op("attribution_exit"));
                return;
            }
        };

        for name in before.differing(&after, self.attributes) {
            if self.attribution.record(name) {
                tracing::debug!(
                    op = "attribute_call",
                    event = EVENT_ATTRIBUTED,
                    delegate = self.delegate,
                    entity_type = self.subject.entity_type(),
                    entity_id = %self.subject.id(),
                    attribute = name,
                );
            }
        }
    }

    fn fault(&self) -> Option<ExError> {
        self.attribution.fault()
    }
}
