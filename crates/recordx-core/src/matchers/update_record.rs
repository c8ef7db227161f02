//! `update_record` block matcher

use crate::attributes::Expectation;
use crate::attribution::{
    AttributionSet, Delegate, DelegateDescriptor, InterceptionPoint, SnapshotObserver,
};
use crate::config::HarnessConfig;
use crate::diff::{self, message, message::Subject};
use crate::entity::Entity;
use crate::errors::{ExError, RecordXError, Result};
use crate::matchers::verdict::{FailureReport, Verdict};
use crate::matchers::{log_phase, run_logged, Action, BlockMatcher, Phase};
use crate::snapshot::Snapshot;
use recordx_core_types::{AssertionContext, AssertionId, TraceId};

const OP: &str = "update_record";

/// Passes when every expected attribute ends at its expected value and,
/// with a designated delegate, every changed attribute changed inside a
/// call of that delegate.
pub struct UpdateRecord<'s> {
    subject: &'s dyn Entity,
    expectation: Expectation,
    delegate: Option<DelegateDescriptor>,
    config: HarnessConfig,
    context: AssertionContext,
    phase: Phase,
}

pub fn update_record(subject: &dyn Entity, expectation: Expectation) -> UpdateRecord<'_> {
    UpdateRecord {
        subject,
        expectation,
        delegate: None,
        config: HarnessConfig::default(),
        context: AssertionContext::new(),
        phase: Phase::Idle,
    }
}

impl<'s> UpdateRecord<'s> {
    /// Require every change to happen inside a call of `D`
    pub fn using_delegate<D: Delegate + 'static>(self) -> Self {
        self.using_delegate_descriptor(DelegateDescriptor::of::<D>())
    }

    pub fn using_delegate_descriptor(mut self, descriptor: DelegateDescriptor) -> Self {
        self.delegate = Some(descriptor);
        self
    }

    pub fn with_config(mut self, config: HarnessConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.context = self.context.with_trace_id(trace_id);
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn assertion_id(&self) -> &AssertionId {
        &self.context.assertion_id
    }

    fn transition(&mut self, phase: Phase) {
        self.phase = phase;
        log_phase(OP, &self.context, phase);
    }

    fn run(&mut self, action: Option<Action<'_>>) -> Result<Verdict> {
        self.phase = Phase::Idle;
        let action = action.ok_or_else(|| {
            ExError::from(RecordXError::MissingAction {
                matcher: OP.to_string(),
            })
        })?;

        let subject = self.subject;
        let attributes = self.expectation.attribute_set()?;
        let attribution = AttributionSet::new();
        let delegate = self.delegate.clone();
        let observer = delegate
            .as_ref()
            .map(|d| SnapshotObserver::new(subject, &attributes, &attribution, d.label()));
        let scope = match (&delegate, &observer) {
            (Some(descriptor), Some(observer)) => InterceptionPoint::new(descriptor, observer),
            _ => InterceptionPoint::passthrough(),
        };
        self.transition(Phase::Armed);

        let initial = Snapshot::capture(subject, &attributes)?;
        self.transition(Phase::Executing);
        action(&scope);
        if let Some(fault) = attribution.fault() {
            return Err(fault);
        }
        if let Some(descriptor) = &delegate {
            if scope.instrumented_count() == 0 {
                tracing::debug!(
                    op = OP,
                    delegate = descriptor.label(),
                    "no designated delegate was constructed through the interception point"
                );
            }
        }
        subject.reload()?;
        let final_snapshot = Snapshot::capture(subject, &attributes)?;

        self.transition(Phase::Diffing);
        let records = diff::compare_with(
            &initial,
            &final_snapshot,
            &self.expectation,
            self.config.equality,
        )?;

        let id = subject.id();
        let described = Subject {
            entity_type: subject.entity_type(),
            id: &id,
        };
        let mut report = FailureReport::default();
        report.push(message::value_mismatch_paragraph(
            &described,
            &records,
            &self.config,
        ));
        if let Some(descriptor) = &delegate {
            let outside = diff::unattributed(&records, &attribution);
            report.push(message::attribution_paragraph(
                &described,
                descriptor.label(),
                &outside,
            ));
        }

        self.transition(Phase::Verdict);
        Ok(report.into_verdict())
    }
}

impl BlockMatcher for UpdateRecord<'_> {
    fn matches(&mut self, action: Option<Action<'_>>) -> Result<Verdict> {
        let context = self.context.clone();
        let subject = self.subject;
        run_logged(OP, &context, subject, || self.run(action))
    }
}
