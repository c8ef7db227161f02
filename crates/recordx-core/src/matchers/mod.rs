//! Assertion orchestration.
//!
//! Block matchers (`update_record`, `destroy_record`) drive the full
//! protocol around an action: arm the interception point, capture state,
//! run the action exactly once, re-capture, classify, and compose a
//! [`Verdict`]. `be_record` compares two entity handles.
//!
//! ```ignore
//! let verdict = expect_block(|scope| controller.update(scope, params))
//!     .to(update_record(&user, Expectation::new().attr("age", 30)).using_delegate::<UserForm>())?;
//! ```
//!
//! Misuse of the harness comes back as `Err`; a misbehaving system under
//! test comes back as `Ok` with a failed verdict.

pub mod be_record;
pub mod destroy_record;
pub mod update_record;
pub mod verdict;

pub use be_record::{be_record, BeRecord};
pub use destroy_record::{destroy_record, DestroyRecord};
pub use update_record::{update_record, UpdateRecord};
pub use verdict::{Verdict, VerdictFailure};

use crate::attribution::InterceptionPoint;
use crate::entity::Entity;
use crate::errors::Result;
use crate::{log_op_end, log_op_error, log_op_start};
use recordx_core_types::schema::EVENT_PHASE;
use recordx_core_types::AssertionContext;
use std::time::Instant;

/// The action under test, invoked exactly once
pub type Action<'f> = Box<dyn FnOnce(&InterceptionPoint<'_>) + 'f>;

/// A matcher over an action block
pub trait BlockMatcher {
    /// Run the protocol; `None` means the host supplied no block
    ///
    /// # Errors
    ///
    /// Returns configuration errors (`MissingAction`, `UnknownAttribute`,
    /// ...) and persistence failures. Behaviour violations are `Ok` verdicts.
    fn matches(&mut self, action: Option<Action<'_>>) -> Result<Verdict>;
}

/// A matcher over an entity handle
pub trait EntityMatcher {
    /// # Errors
    ///
    /// Implementations return errors only for harness misuse.
    fn matches(&mut self, actual: &dyn Entity) -> Result<Verdict>;
}

/// Block expectation, as produced by [`expect_block`]
pub struct Block<'f> {
    action: Option<Action<'f>>,
}

/// Capture an action for a block matcher
pub fn expect_block<'f, F>(action: F) -> Block<'f>
where
    F: FnOnce(&InterceptionPoint<'_>) + 'f,
{
    Block {
        action: Some(Box::new(action)),
    }
}

impl<'f> Block<'f> {
    /// A block expectation with no action, as a host library may hand over
    pub fn missing() -> Self {
        Self { action: None }
    }

    /// # Errors
    ///
    /// See [`BlockMatcher::matches`].
    pub fn to<M: BlockMatcher>(self, mut matcher: M) -> Result<Verdict> {
        matcher.matches(self.action)
    }
}

/// Value expectation over an entity, as produced by [`expect_entity`]
pub struct EntityExpectation<'e> {
    actual: &'e dyn Entity,
}

pub fn expect_entity(actual: &dyn Entity) -> EntityExpectation<'_> {
    EntityExpectation { actual }
}

impl EntityExpectation<'_> {
    /// # Errors
    ///
    /// See [`EntityMatcher::matches`].
    pub fn to<M: EntityMatcher>(self, mut matcher: M) -> Result<Verdict> {
        matcher.matches(self.actual)
    }
}

/// Orchestrator state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// Attribute set resolved, interception point installed
    Armed,
    /// Action running between the before and after captures
    Executing,
    /// Update flavor: classifying change records
    Diffing,
    /// Destroy flavor: checking existence and service attribution
    Verifying,
    Verdict,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Armed => "armed",
            Phase::Executing => "executing",
            Phase::Diffing => "diffing",
            Phase::Verifying => "verifying",
            Phase::Verdict => "verdict",
        }
    }
}

pub(crate) fn log_phase(op: &'static str, context: &AssertionContext, phase: Phase) {
    tracing::trace!(
        op = op,
        event = EVENT_PHASE,
        assertion_id = %context.assertion_id,
        phase = phase.as_str(),
    );
}

/// Wrap one assertion run with start/end logging and correlation
pub(crate) fn run_logged<F>(
    op: &'static str,
    context: &AssertionContext,
    subject: &dyn Entity,
    run: F,
) -> Result<Verdict>
where
    F: FnOnce() -> Result<Verdict>,
{
    let start = Instant::now();
    log_op_start!(
        op,
        assertion_id = %context.assertion_id,
        entity_type = subject.entity_type(),
        entity_id = %subject.id(),
    );

    let result = run();
    let duration_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(verdict) => {
            log_op_end!(
                op,
                duration_ms = duration_ms,
                assertion_id = %context.assertion_id,
                passed = verdict.is_success(),
            );
            Ok(verdict.for_assertion(context.assertion_id.clone()))
        }
        Err(err) => {
            log_op_error!(
                op,
                err.clone(),
                duration_ms = duration_ms,
                assertion_id = %context.assertion_id,
            );
            let err = err.with_assertion_id(context.assertion_id.clone());
            Err(match &context.trace_id {
                Some(trace_id) => err.with_trace_id(trace_id.clone()),
                None => err,
            })
        }
    }
}
