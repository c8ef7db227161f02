//! `be_record` entity matcher

use crate::diff::message;
use crate::entity::Entity;
use crate::errors::Result;
use crate::matchers::verdict::Verdict;
use crate::matchers::EntityMatcher;

/// Passes when the actual entity has the expected entity's type and id
pub struct BeRecord<'e> {
    expected: &'e dyn Entity,
}

pub fn be_record(expected: &dyn Entity) -> BeRecord<'_> {
    BeRecord { expected }
}

impl EntityMatcher for BeRecord<'_> {
    fn matches(&mut self, actual: &dyn Entity) -> Result<Verdict> {
        let (expected_type, actual_type) = (self.expected.entity_type(), actual.entity_type());
        if expected_type != actual_type {
            return Ok(Verdict::failure(message::wrong_kind(
                expected_type,
                actual_type,
            )));
        }

        let (expected_id, actual_id) = (self.expected.id(), actual.id());
        if expected_id != actual_id {
            return Ok(Verdict::failure(message::wrong_id(&expected_id, &actual_id)));
        }

        tracing::trace!(
            op = "be_record",
            entity_type = actual_type,
            entity_id = %actual_id,
            "record identity matched"
        );
        Ok(Verdict::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matchers::expect_entity;
    use crate::memory::MemoryStore;
    use serde_json::Value;

    fn store() -> MemoryStore {
        let store = MemoryStore::new();
        store.define("User", &["name"]);
        store.define("Post", &["title"]);
        store
    }

    #[test]
    fn test_same_record_through_two_handles() {
        let store = store();
        let user = store.insert("User", [("name", Value::from("Ann"))]).unwrap();
        let found = store.find("User", &user.id()).unwrap();

        let verdict = expect_entity(&found).to(be_record(&user)).unwrap();
        assert!(verdict.is_success());
    }

    #[test]
    fn test_kind_mismatch() {
        let store = store();
        let user = store.insert("User", [("name", Value::from("Ann"))]).unwrap();
        let post = store.insert("Post", [("title", Value::from("Hi"))]).unwrap();

        let verdict = expect_entity(&post).to(be_record(&user)).unwrap();
        assert_eq!(
            verdict.failure_message(),
            Some("Expected the record to be kind of User but was Post instead.")
        );
    }

    #[test]
    fn test_id_mismatch() {
        let store = store();
        let first = store.insert("User", [("name", Value::from("Ann"))]).unwrap();
        let second = store.insert("User", [("name", Value::from("Bob"))]).unwrap();

        let verdict = expect_entity(&second).to(be_record(&first)).unwrap();
        assert_eq!(
            verdict.failure_message(),
            Some("Expected id of the record to eql 1 but was 2")
        );
    }
}
