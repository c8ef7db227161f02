//! Attribution accumulator shared by every observer of one assertion

use crate::errors::ExError;
use std::cell::RefCell;

/// Names of attributes observed changing inside a sanctioned delegate call
///
/// Owned by the matcher for the duration of one assertion and lent to the
/// observer by reference. Only grows: names are never removed. Keeps the
/// order in which names were first attributed.
///
/// Observers cannot return errors through `Delegate::execute`, so the first
/// persistence failure they hit is parked here and surfaced by the matcher
/// once the action returns.
#[derive(Debug, Default)]
pub struct AttributionSet {
    names: RefCell<Vec<String>>,
    fault: RefCell<Option<ExError>>,
}

impl AttributionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attribute `name`; returns true if it was not attributed before
    pub fn record(&self, name: &str) -> bool {
        let mut names = self.names.borrow_mut();
        if names.iter().any(|n| n == name) {
            return false;
        }
        names.push(name.to_string());
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.borrow().iter().any(|n| n == name)
    }

    /// Attributed names in first-seen order
    pub fn names(&self) -> Vec<String> {
        self.names.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.names.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.borrow().is_empty()
    }

    /// Park an observer failure; the first one wins
    pub fn record_fault(&self, err: ExError) {
        let mut fault = self.fault.borrow_mut();
        if fault.is_none() {
            *fault = Some(err);
        }
    }

    pub fn fault(&self) -> Option<ExError> {
        self.fault.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ExErrorKind;

    #[test]
    fn test_record_is_idempotent_and_ordered() {
        let set = AttributionSet::new();
        assert!(set.record("name"));
        assert!(set.record("age"));
        assert!(!set.record("name"));

        assert_eq!(set.names(), vec!["name".to_string(), "age".to_string()]);
        assert_eq!(set.len(), 2);
        assert!(set.contains("age"));
        assert!(!set.contains("email"));
    }

    #[test]
    fn test_first_fault_wins() {
        let set = AttributionSet::new();
        assert!(set.fault().is_none());

        set.record_fault(ExError::new(ExErrorKind::Persistence).with_message("first"));
        set.record_fault(ExError::new(ExErrorKind::NotFound).with_message("second"));

        let fault = set.fault().unwrap();
        assert_eq!(fault.kind(), ExErrorKind::Persistence);
        assert_eq!(fault.message(), "first");
    }
}
