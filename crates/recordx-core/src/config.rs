//! Harness configuration
//!
//! Loaded from TOML or built in code. Everything is optional; the default
//! is strict equality, no redaction, and no logging changes.
//!
//! ```toml
//! equality = "lenient"
//! redacted_attributes = ["password_digest"]
//! log_profile = "development"
//! ```

use crate::errors::{ExError, ExErrorKind, RecordXError, Result};
use crate::logging_facility::{self, Profile};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::Path;

/// How a final attribute value is compared with its expected value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EqualityPolicy {
    /// Native value equality, no coercion: `"30"` and `30` differ, and so do
    /// `30` and `30.0`
    #[default]
    Strict,
    /// Numbers and numeric strings compare by numeric value; everything else
    /// falls back to strict equality
    Lenient,
}

impl EqualityPolicy {
    /// Compare two attribute values under this policy
    pub fn values_equal(&self, a: &Value, b: &Value) -> bool {
        if a == b {
            return true;
        }
        match self {
            EqualityPolicy::Strict => false,
            EqualityPolicy::Lenient => match (Numeric::of(a), Numeric::of(b)) {
                (Some(x), Some(y)) => x.same_value(y),
                _ => false,
            },
        }
    }
}

/// Numeric reading of a JSON value; integers stay exact
#[derive(Debug, Clone, Copy)]
enum Numeric {
    Int(i128),
    Float(f64),
}

impl Numeric {
    fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n
                .as_i64()
                .map(i128::from)
                .or_else(|| n.as_u64().map(i128::from))
                .map(Numeric::Int)
                .or_else(|| n.as_f64().map(Numeric::Float)),
            Value::String(s) => {
                let s = s.trim();
                s.parse::<i128>()
                    .ok()
                    .map(Numeric::Int)
                    .or_else(|| s.parse::<f64>().ok().map(Numeric::Float))
            }
            _ => None,
        }
    }

    fn same_value(self, other: Self) -> bool {
        match (self, other) {
            (Numeric::Int(x), Numeric::Int(y)) => x == y,
            (Numeric::Float(x), Numeric::Float(y)) => x == y,
            (Numeric::Int(i), Numeric::Float(f)) | (Numeric::Float(f), Numeric::Int(i)) => {
                // `as` saturates, and no saturated value equals an i64/u64
                f.fract() == 0.0 && f as i128 == i
            }
        }
    }
}

/// Per-assertion configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    /// Policy for `final == expected`; `changed` is always strict
    pub equality: EqualityPolicy,
    /// Attributes whose values never appear in failure messages or logs
    pub redacted_attributes: BTreeSet<String>,
    /// Logging profile installed by [`HarnessConfig::apply_logging`]
    pub log_profile: Option<Profile>,
}

impl HarnessConfig {
    /// Parse a configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns `Config` if the text is not valid TOML or names unknown keys.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| {
            RecordXError::InvalidConfig {
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Read and parse a TOML configuration file
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read, `Config` if it cannot be parsed.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            ExError::new(ExErrorKind::Io)
                .with_op("load_config")
                .with_message(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    /// Use the given equality policy
    pub fn with_equality(mut self, equality: EqualityPolicy) -> Self {
        self.equality = equality;
        self
    }

    /// Redact the named attribute in failure messages and logs
    pub fn redact(mut self, attribute: impl Into<String>) -> Self {
        self.redacted_attributes.insert(attribute.into());
        self
    }

    /// True if the attribute's values must not be rendered
    pub fn is_redacted(&self, attribute: &str) -> bool {
        self.redacted_attributes.contains(attribute)
    }

    /// Install the configured logging profile, if any
    pub fn apply_logging(&self) {
        if let Some(profile) = self.log_profile {
            logging_facility::init(profile);
        }
    }
}
