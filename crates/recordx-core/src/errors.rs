use recordx_core_types::{AssertionId, TraceId};
use thiserror::Error;

/// Result type alias using the structured error
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every error the harness returns is a *configuration* error: a misuse of
/// the harness or a broken collaborator. Behaviour violations of the system
/// under test are never errors; they come back as a failed `Verdict`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Setup / validation
    InvalidInput,
    DuplicateAttribute,
    UnknownAttribute,
    MissingAttribute,
    MissingAction,

    // Persistence collaborator
    NotFound,
    Persistence,
    Serialization,
    Io,

    // Configuration loading
    Config,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::DuplicateAttribute => "ERR_DUPLICATE_ATTRIBUTE",
            ExErrorKind::UnknownAttribute => "ERR_UNKNOWN_ATTRIBUTE",
            ExErrorKind::MissingAttribute => "ERR_MISSING_ATTRIBUTE",
            ExErrorKind::MissingAction => "ERR_MISSING_ACTION",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Config => "ERR_CONFIG",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// True for kinds caused by how the harness was set up, as opposed to
    /// a failing collaborator
    pub fn is_misuse(&self) -> bool {
        matches!(
            self,
            ExErrorKind::InvalidInput
                | ExErrorKind::DuplicateAttribute
                | ExErrorKind::UnknownAttribute
                | ExErrorKind::MissingAttribute
                | ExErrorKind::MissingAction
                | ExErrorKind::Config
        )
    }
}

/// Canonical structured error type
///
/// Carries a stable kind plus optional context (operation, entity,
/// attribute, correlation ids) for programmatic handling in host tests.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_type: Option<String>,
    entity_id: Option<String>,
    attribute: Option<String>,
    assertion_id: Option<AssertionId>,
    trace_id: Option<TraceId>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_type: None,
            entity_id: None,
            attribute: None,
            assertion_id: None,
            trace_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity type context
    pub fn with_entity_type(mut self, entity_type: impl Into<String>) -> Self {
        self.entity_type = Some(entity_type.into());
        self
    }

    /// Add entity ID context
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add attribute name context
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }

    /// Add assertion ID context
    pub fn with_assertion_id(mut self, assertion_id: AssertionId) -> Self {
        self.assertion_id = Some(assertion_id);
        self
    }

    /// Add trace ID context
    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the entity type context, if any
    pub fn entity_type(&self) -> Option<&str> {
        self.entity_type.as_deref()
    }

    /// Get the entity ID context, if any
    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    /// Get the attribute context, if any
    pub fn attribute(&self) -> Option<&str> {
        self.attribute.as_deref()
    }

    /// Get the assertion ID context, if any
    pub fn assertion_id(&self) -> Option<&AssertionId> {
        self.assertion_id.as_ref()
    }

    /// Get the trace ID context, if any
    pub fn trace_id(&self) -> Option<&TraceId> {
        self.trace_id.as_ref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_type) = &self.entity_type {
            write!(f, " (entity_type: {})", entity_type)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        if let Some(attribute) = &self.attribute {
            write!(f, " (attribute: {})", attribute)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Domain errors raised while setting up or running an assertion
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordXError {
    /// Attribute name is empty
    #[error("Attribute name must not be empty")]
    EmptyAttributeName,

    /// Same attribute listed twice in one expectation
    #[error("Attribute listed more than once: {attribute}")]
    DuplicateAttribute { attribute: String },

    /// The entity does not define the attribute
    #[error("{entity_type} does not define attribute {attribute}")]
    UnknownAttribute {
        entity_type: String,
        attribute: String,
    },

    /// A snapshot handed to the diff engine lacks an expected attribute
    #[error("Snapshot has no value for attribute {attribute}")]
    MissingSnapshotValue { attribute: String },

    /// No action block was supplied to a block matcher
    #[error("No action block supplied to {matcher}")]
    MissingAction { matcher: String },

    /// Entity could not be found while reloading
    #[error("{entity_type} with id = {entity_id} not found")]
    EntityNotFound {
        entity_type: String,
        entity_id: String,
    },

    /// Harness configuration could not be parsed
    #[error("Invalid harness configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl From<RecordXError> for ExError {
    fn from(err: RecordXError) -> Self {
        let message = err.to_string();
        match err {
            RecordXError::EmptyAttributeName => {
                ExError::new(ExErrorKind::InvalidInput).with_message(message)
            }
            RecordXError::DuplicateAttribute { attribute } => {
                ExError::new(ExErrorKind::DuplicateAttribute)
                    .with_attribute(attribute)
                    .with_message(message)
            }
            RecordXError::UnknownAttribute {
                entity_type,
                attribute,
            } => ExError::new(ExErrorKind::UnknownAttribute)
                .with_entity_type(entity_type)
                .with_attribute(attribute)
                .with_message(message),
            RecordXError::MissingSnapshotValue { attribute } => {
                ExError::new(ExErrorKind::MissingAttribute)
                    .with_attribute(attribute)
                    .with_message(message)
            }
            RecordXError::MissingAction { matcher } => ExError::new(ExErrorKind::MissingAction)
                .with_op(matcher)
                .with_message(message),
            RecordXError::EntityNotFound {
                entity_type,
                entity_id,
            } => ExError::new(ExErrorKind::NotFound)
                .with_entity_type(entity_type)
                .with_entity_id(entity_id)
                .with_message(message),
            RecordXError::InvalidConfig { .. } => {
                ExError::new(ExErrorKind::Config).with_message(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_attribute_conversion() {
        let err = RecordXError::UnknownAttribute {
            entity_type: "User".to_string(),
            attribute: "nickname".to_string(),
        };

        let ex_err: ExError = err.into();

        assert_eq!(ex_err.kind(), ExErrorKind::UnknownAttribute);
        assert_eq!(ex_err.code(), "ERR_UNKNOWN_ATTRIBUTE");
        assert_eq!(ex_err.entity_type(), Some("User"));
        assert_eq!(ex_err.attribute(), Some("nickname"));
        assert!(ex_err.message().contains("does not define attribute"));
    }

    #[test]
    fn test_display_includes_code_op_and_context() {
        let ex_err = ExError::new(ExErrorKind::Persistence)
            .with_op("reload")
            .with_entity_id("7")
            .with_message("disk I/O error");

        let rendered = ex_err.to_string();
        assert!(rendered.starts_with("[ERR_PERSISTENCE] in operation 'reload'"));
        assert!(rendered.contains("disk I/O error"));
        assert!(rendered.contains("(entity_id: 7)"));
    }

    #[test]
    fn test_misuse_classification() {
        assert!(ExErrorKind::MissingAction.is_misuse());
        assert!(ExErrorKind::UnknownAttribute.is_misuse());
        assert!(!ExErrorKind::Persistence.is_misuse());
        assert!(!ExErrorKind::NotFound.is_misuse());
    }
}
