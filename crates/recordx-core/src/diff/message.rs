//! Failure message rendering.
//!
//! Each function renders one paragraph of a verdict's failure message.
//! Paragraphs are joined with a blank line by the matchers, value mismatches
//! first.

use crate::config::HarnessConfig;
use crate::diff::model::ChangeRecord;
use crate::entity::EntityId;
use recordx_core_types::Sensitive;
use serde_json::Value;

/// The entity a message talks about
#[derive(Debug, Clone, Copy)]
pub struct Subject<'a> {
    pub entity_type: &'a str,
    pub id: &'a EntityId,
}

/// `"age"` style quoting for attribute names
pub fn quote(name: &str) -> String {
    format!("{:?}", name)
}

/// Render a value, honouring redaction for `attribute`
pub fn render_value(attribute: &str, value: &Value, config: &HarnessConfig) -> String {
    Sensitive::render_if(config.is_redacted(attribute), value)
}

fn attribute_header(count: usize) -> &'static str {
    if count == 1 {
        "attribute was"
    } else {
        "attributes were"
    }
}

/// One line per mismatching attribute:
/// `"age" from 20 to 30`, plus `(it was changed to 25)` when it changed to
/// something else.
pub fn mismatch_line(record: &ChangeRecord, config: &HarnessConfig) -> String {
    let name = &record.attribute;
    let mut line = format!(
        "{} from {} to {}",
        quote(name),
        render_value(name, &record.initial, config),
        render_value(name, &record.expected, config)
    );
    if record.changed {
        line.push_str(&format!(
            " (it was changed to {})",
            render_value(name, &record.final_value, config)
        ));
    }
    line
}

/// Paragraph listing every record whose final value misses the expectation,
/// or `None` if all match
pub fn value_mismatch_paragraph(
    subject: &Subject<'_>,
    records: &[ChangeRecord],
    config: &HarnessConfig,
) -> Option<String> {
    let lines: Vec<String> = records
        .iter()
        .filter(|r| !r.matches)
        .map(|r| mismatch_line(r, config))
        .collect();
    if lines.is_empty() {
        return None;
    }

    Some(format!(
        "Expected a record of a {} class with id = {} to be updated, but the following {} not properly changed:\n{}",
        subject.entity_type,
        subject.id,
        attribute_header(lines.len()),
        lines.join("\n")
    ))
}

/// Paragraph naming the delegate and the attributes changed outside it, or
/// `None` if every change was attributed
pub fn attribution_paragraph(
    subject: &Subject<'_>,
    delegate: &str,
    unattributed: &[&str],
) -> Option<String> {
    if unattributed.is_empty() {
        return None;
    }

    let lines: Vec<String> = unattributed.iter().map(|name| quote(name)).collect();
    Some(format!(
        "Expected a record of a {} class with id = {} to be updated using {}, but the following {} changed by some other means:\n{}",
        subject.entity_type,
        subject.id,
        delegate,
        attribute_header(lines.len()),
        lines.join("\n")
    ))
}

pub fn not_destroyed(entity_type: &str) -> String {
    format!(
        "Expected a record of {} class to be destroyed, but was not",
        entity_type
    )
}

pub fn not_destroyed_with_service(entity_type: &str, service: &str) -> String {
    format!(
        "Expected a record of {} class to be destroyed with service object {}, but was not",
        entity_type, service
    )
}

pub fn wrong_kind(expected_type: &str, actual_type: &str) -> String {
    format!(
        "Expected the record to be kind of {} but was {} instead.",
        expected_type, actual_type
    )
}

pub fn wrong_id(expected: &EntityId, actual: &EntityId) -> String {
    format!(
        "Expected id of the record to eql {} but was {}",
        expected, actual
    )
}
