//! Verdicts and failure message accumulation

use recordx_core_types::AssertionId;
use thiserror::Error;

/// Pass/fail outcome of one assertion plus its failure message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    passed: bool,
    message: Option<String>,
    assertion_id: Option<AssertionId>,
}

impl Verdict {
    pub fn success() -> Self {
        Self {
            passed: true,
            message: None,
            assertion_id: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: Some(message.into()),
            assertion_id: None,
        }
    }

    pub(crate) fn for_assertion(mut self, assertion_id: AssertionId) -> Self {
        self.assertion_id = Some(assertion_id);
        self
    }

    pub fn is_success(&self) -> bool {
        self.passed
    }

    /// The composed failure message; `None` on success
    pub fn failure_message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Id of the assertion run that produced this verdict
    pub fn assertion_id(&self) -> Option<&AssertionId> {
        self.assertion_id.as_ref()
    }

    /// Hand the verdict to a host test: `Err` carries the failure message
    ///
    /// # Errors
    ///
    /// Returns [`VerdictFailure`] when the assertion failed.
    pub fn into_result(self) -> std::result::Result<(), VerdictFailure> {
        if self.passed {
            Ok(())
        } else {
            Err(VerdictFailure {
                message: self.message.unwrap_or_default(),
            })
        }
    }
}

/// A failed verdict as an error; displays as the failure message
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct VerdictFailure {
    pub message: String,
}

/// Failure paragraphs collected over one assertion, in report order
#[derive(Debug, Default)]
pub(crate) struct FailureReport {
    paragraphs: Vec<String>,
}

impl FailureReport {
    pub(crate) fn push(&mut self, paragraph: Option<String>) {
        if let Some(paragraph) = paragraph {
            self.paragraphs.push(paragraph);
        }
    }

    pub(crate) fn into_verdict(self) -> Verdict {
        if self.paragraphs.is_empty() {
            Verdict::success()
        } else {
            Verdict::failure(self.paragraphs.join("\n\n"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report_is_success() {
        let verdict = FailureReport::default().into_verdict();
        assert!(verdict.is_success());
        assert_eq!(verdict.failure_message(), None);
        assert!(verdict.into_result().is_ok());
    }

    #[test]
    fn test_paragraphs_joined_by_blank_line() {
        let mut report = FailureReport::default();
        report.push(Some("values".to_string()));
        report.push(None);
        report.push(Some("attribution".to_string()));

        let verdict = report.into_verdict();
        assert!(!verdict.is_success());
        assert_eq!(verdict.failure_message(), Some("values\n\nattribution"));
    }

    #[test]
    fn test_into_result_carries_message() {
        let err = Verdict::failure("not destroyed").into_result().unwrap_err();
        assert_eq!(err.to_string(), "not destroyed");
    }
}
