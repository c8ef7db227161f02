//! Existence probe and its call observer for destroy checks

use crate::attribution::CallObserver;
use crate::entity::{Entity, EntityId, Persistence};
use crate::errors::{ExError, Result};
use recordx_core_types::schema::EVENT_ATTRIBUTED;
use std::cell::{Cell, RefCell};

/// Asks the persistence layer whether one record still exists
pub struct ExistenceProbe<'a> {
    persistence: &'a dyn Persistence,
    entity_type: String,
    id: EntityId,
}

impl<'a> ExistenceProbe<'a> {
    pub fn new(persistence: &'a dyn Persistence, entity_type: impl Into<String>, id: EntityId) -> Self {
        Self {
            persistence,
            entity_type: entity_type.into(),
            id,
        }
    }

    /// Probe for the record behind `entity`
    pub fn for_entity(persistence: &'a dyn Persistence, entity: &dyn Entity) -> Self {
        Self::new(persistence, entity.entity_type(), entity.id())
    }

    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    pub fn id(&self) -> &EntityId {
        &self.id
    }

    /// # Errors
    ///
    /// Propagates the persistence layer's lookup failure.
    pub fn exists(&self) -> Result<bool> {
        self.persistence.exists(&self.entity_type, &self.id)
    }
}

/// Records whether the record went from present to absent inside a
/// sanctioned delegate call
pub struct ExistenceObserver<'a> {
    probe: &'a ExistenceProbe<'a>,
    delegate: &'a str,
    pending: RefCell<Vec<Option<bool>>>,
    transitioned: Cell<bool>,
    calls: Cell<usize>,
    fault: RefCell<Option<ExError>>,
}

impl<'a> ExistenceObserver<'a> {
    pub fn new(probe: &'a ExistenceProbe<'a>, delegate: &'a str) -> Self {
        Self {
            probe,
            delegate,
            pending: RefCell::new(Vec::new()),
            transitioned: Cell::new(false),
            calls: Cell::new(0),
            fault: RefCell::new(None),
        }
    }

    /// True once any sanctioned call saw the record disappear
    pub fn transitioned(&self) -> bool {
        self.transitioned.get()
    }

    /// Completed sanctioned calls
    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    fn park(&self, err: ExError) {
        let mut fault = self.fault.borrow_mut();
        if fault.is_none() {
            *fault = Some(err);
        }
    }
}

impl CallObserver for ExistenceObserver<'_> {
    fn enter(&self) {
        let before = match self.probe.exists() {
            Ok(exists) => Some(exists),
            Err(err) => {
                self.park(err.with_op("existence_enter"));
                None
            }
        };
        self.pending.borrow_mut().push(before);
    }

    fn exit(&self) {
        self.calls.set(self.calls.get() + 1);
        let Some(Some(existed)) = self.pending.borrow_mut().pop() else {
            return;
        };

        match self.probe.exists() {
            Ok(exists) => {
                if existed && !exists {
                    self.transitioned.set(true);
                    tracing::debug!(
                        op = "attribute_call",
                        event = EVENT_ATTRIBUTED,
                        delegate = self.delegate,
                        entity_type = self.probe.entity_type(),
                        entity_id = %self.probe.id(),
                        attribute = "existence",
                    );
                }
            }
            Err(err) => self.park(err.with_op("existence_exit")),
        }
    }

    fn fault(&self) -> Option<ExError> {
        self.fault.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ExErrorKind;
    use std::collections::HashSet;

    #[derive(Default)]
    struct Table {
        ids: RefCell<HashSet<String>>,
        broken: Cell<bool>,
    }

    impl Persistence for Table {
        fn exists(&self, _entity_type: &str, id: &EntityId) -> Result<bool> {
            if self.broken.get() {
                return Err(ExError::new(ExErrorKind::Persistence).with_message("offline"));
            }
            Ok(self.ids.borrow().contains(id.as_str()))
        }
    }

    #[test]
    fn test_probe_delegates_to_persistence() {
        let table = Table::default();
        table.ids.borrow_mut().insert("1".to_string());

        assert!(ExistenceProbe::new(&table, "User", EntityId::from(1)).exists().unwrap());
        assert!(!ExistenceProbe::new(&table, "User", EntityId::from(2)).exists().unwrap());
    }

    #[test]
    fn test_observer_sees_transition_inside_call() {
        let table = Table::default();
        table.ids.borrow_mut().insert("1".to_string());
        let probe = ExistenceProbe::new(&table, "User", EntityId::from(1));
        let observer = ExistenceObserver::new(&probe, "DestroyUser");

        observer.enter();
        table.ids.borrow_mut().remove("1");
        observer.exit();

        assert!(observer.transitioned());
        assert_eq!(observer.calls(), 1);
        assert!(observer.fault().is_none());
    }

    #[test]
    fn test_observer_ignores_call_without_transition() {
        let table = Table::default();
        let probe = ExistenceProbe::new(&table, "User", EntityId::from(1));
        let observer = ExistenceObserver::new(&probe, "DestroyUser");

        observer.enter();
        observer.exit();

        assert!(!observer.transitioned());
        assert_eq!(observer.calls(), 1);
    }

    #[test]
    fn test_observer_parks_lookup_failure() {
        let table = Table::default();
        table.broken.set(true);
        let probe = ExistenceProbe::new(&table, "User", EntityId::from(1));
        let observer = ExistenceObserver::new(&probe, "DestroyUser");

        observer.enter();
        observer.exit();

        let fault = observer.fault().unwrap();
        assert_eq!(fault.kind(), ExErrorKind::Persistence);
        assert_eq!(fault.op(), Some("existence_enter"));
    }
}
