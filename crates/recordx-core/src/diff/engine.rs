//! Diff computation engine.
//!
//! The core entry point is [`compare`], which classifies every expected
//! attribute into a [`ChangeRecord`].

use crate::attribution::AttributionSet;
use crate::attributes::Expectation;
use crate::config::EqualityPolicy;
use crate::diff::model::ChangeRecord;
use crate::errors::{RecordXError, Result};
use crate::snapshot::Snapshot;
use serde_json::Value;

/// Classify each expected attribute using strict equality
///
/// # Errors
///
/// Returns `MissingAttribute` if either snapshot lacks an expected name.
pub fn compare(
    initial: &Snapshot,
    final_snapshot: &Snapshot,
    expected: &Expectation,
) -> Result<Vec<ChangeRecord>> {
    compare_with(initial, final_snapshot, expected, EqualityPolicy::Strict)
}

/// Classify each expected attribute, matching final against expected values
/// under `policy`
///
/// Records are emitted in the expectation's key order.
///
/// # Errors
///
/// Returns `MissingAttribute` if either snapshot lacks an expected name.
pub fn compare_with(
    initial: &Snapshot,
    final_snapshot: &Snapshot,
    expected: &Expectation,
    policy: EqualityPolicy,
) -> Result<Vec<ChangeRecord>> {
    expected
        .iter()
        .map(|(name, expected_value)| {
            let initial_value = lookup(initial, name)?;
            let final_value = lookup(final_snapshot, name)?;
            Ok(ChangeRecord {
                attribute: name.to_string(),
                changed: initial_value != final_value,
                matches: policy.values_equal(final_value, expected_value),
                initial: initial_value.clone(),
                final_value: final_value.clone(),
                expected: expected_value.clone(),
            })
        })
        .collect()
}

fn lookup<'s>(snapshot: &'s Snapshot, name: &str) -> Result<&'s Value> {
    snapshot.get(name).ok_or_else(|| {
        RecordXError::MissingSnapshotValue {
            attribute: name.to_string(),
        }
        .into()
    })
}

/// Records whose final value does not match the expectation
pub fn mismatches(records: &[ChangeRecord]) -> impl Iterator<Item = &ChangeRecord> {
    records.iter().filter(|r| !r.matches)
}

/// Changed attributes that were never observed changing inside a sanctioned
/// delegate call, in expectation order
pub fn unattributed<'r>(records: &'r [ChangeRecord], attribution: &AttributionSet) -> Vec<&'r str> {
    records
        .iter()
        .filter(|r| r.changed && !attribution.contains(&r.attribute))
        .map(|r| r.attribute.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ExErrorKind;
    use serde_json::json;

    fn snapshot(name: &str, age: i64) -> Snapshot {
        Snapshot::from_values([("name", json!(name)), ("age", json!(age))])
    }

    #[test]
    fn test_classifies_each_expected_attribute() {
        let initial = snapshot("Sophia", 20);
        let final_snapshot = snapshot("Emily", 20);
        let expected = Expectation::new().attr("name", "Emily").attr("age", 30);

        let records = compare(&initial, &final_snapshot, &expected).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].attribute, "name");
        assert!(records[0].changed);
        assert!(records[0].matches);
        assert_eq!(records[1].attribute, "age");
        assert!(!records[1].changed);
        assert!(!records[1].matches);
        assert_eq!(records[1].initial, json!(20));
        assert_eq!(records[1].expected, json!(30));
    }

    #[test]
    fn test_changed_to_unexpected_value() {
        let records = compare(
            &snapshot("Sophia", 20),
            &snapshot("Emily", 20),
            &Expectation::new().attr("name", "Diana"),
        )
        .unwrap();

        assert!(records[0].changed_unexpectedly());
        assert_eq!(records[0].final_value, json!("Emily"));
    }

    #[test]
    fn test_records_follow_expectation_order_not_snapshot_order() {
        let records = compare(
            &snapshot("a", 1),
            &snapshot("b", 2),
            &Expectation::new().attr("age", 2).attr("name", "b"),
        )
        .unwrap();
        let names: Vec<_> = records.iter().map(|r| r.attribute.as_str()).collect();
        assert_eq!(names, vec!["age", "name"]);
    }

    #[test]
    fn test_no_type_coercion_under_strict() {
        let records = compare(
            &snapshot("Sophia", 20),
            &snapshot("Sophia", 30),
            &Expectation::new().attr("age", "30"),
        )
        .unwrap();
        assert!(records[0].changed);
        assert!(!records[0].matches);
    }

    #[test]
    fn test_lenient_policy_matches_numeric_string() {
        let records = compare_with(
            &snapshot("Sophia", 20),
            &snapshot("Sophia", 30),
            &Expectation::new().attr("age", "30"),
            EqualityPolicy::Lenient,
        )
        .unwrap();
        assert!(records[0].matches);
    }

    #[test]
    fn test_missing_snapshot_value_is_error() {
        let err = compare(
            &snapshot("Sophia", 20),
            &snapshot("Sophia", 20),
            &Expectation::new().attr("email", "x@y.z"),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::MissingAttribute);
        assert_eq!(err.attribute(), Some("email"));
    }

    #[test]
    fn test_unattributed_excludes_attributed_and_unchanged() {
        let records = compare(
            &snapshot("Emily", 20),
            &snapshot("Sophie", 30),
            &Expectation::new().attr("name", "Sophie").attr("age", 30),
        )
        .unwrap();
        let attribution = AttributionSet::new();
        attribution.record("name");

        assert_eq!(unattributed(&records, &attribution), vec!["age"]);
        assert_eq!(mismatches(&records).count(), 0);
    }
}
