//! `destroy_record` block matcher

use crate::attribution::{CallObserver, Delegate, DelegateDescriptor, InterceptionPoint};
use crate::diff::message;
use crate::entity::{Entity, Persistence};
use crate::errors::{ExError, RecordXError, Result};
use crate::matchers::verdict::Verdict;
use crate::matchers::{log_phase, run_logged, Action, BlockMatcher, Phase};
use crate::probe::{ExistenceObserver, ExistenceProbe};
use recordx_core_types::{AssertionContext, AssertionId, TraceId};

const OP: &str = "destroy_record";

/// Passes when the record existed before the action and is gone after it.
///
/// With a designated service the record must also disappear inside a call
/// of that service; that check is reported alone when it fails.
pub struct DestroyRecord<'s> {
    subject: &'s dyn Entity,
    persistence: &'s dyn Persistence,
    service: Option<DelegateDescriptor>,
    context: AssertionContext,
    phase: Phase,
}

pub fn destroy_record<'s>(
    subject: &'s dyn Entity,
    persistence: &'s dyn Persistence,
) -> DestroyRecord<'s> {
    DestroyRecord {
        subject,
        persistence,
        service: None,
        context: AssertionContext::new(),
        phase: Phase::Idle,
    }
}

impl<'s> DestroyRecord<'s> {
    /// Require the record to be destroyed by a call of service `S`
    pub fn using_service<S: Delegate + 'static>(self) -> Self {
        self.using_service_descriptor(DelegateDescriptor::of::<S>())
    }

    pub fn using_service_descriptor(mut self, descriptor: DelegateDescriptor) -> Self {
        self.service = Some(descriptor);
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

        let probe = ExistenceProbe::for_entity(self.persistence, self.subject);
        let service = self.service.clone();
        let observer = service
            .as_ref()
            .map(|descriptor| ExistenceObserver::new(&probe, descriptor.label()));
        let scope = match (&service, &observer) {
            (Some(descriptor), Some(observer)) => InterceptionPoint::new(descriptor, observer),
            _ => InterceptionPoint::passthrough(),
        };
        self.transition(Phase::Armed);

        let existed = probe.exists()?;
        self.transition(Phase::Executing);
        action(&scope);
        if let Some(fault) = observer.as_ref().and_then(|o| o.fault()) {
            return Err(fault);
        }
        let exists = probe.exists()?;

        self.transition(Phase::Verifying);
        let entity_type = probe.entity_type();
        let verdict = match (&service, &observer) {
            (Some(descriptor), Some(observer)) if !observer.transitioned() => Verdict::failure(
                message::not_destroyed_with_service(entity_type, descriptor.label()),
            ),
            _ if !(existed && !exists) => Verdict::failure(message::not_destroyed(entity_type)),
            _ => Verdict::success(),
        };

        self.transition(Phase::Verdict);
        Ok(verdict)
    }
}

impl BlockMatcher for DestroyRecord<'_> {
    fn matches(&mut self, action: Option<Action<'_>>) -> Result<Verdict> {
        let context = self.context.clone();
        let subject = self.subject;
        run_logged(OP, &context, subject, || self.run(action))
    }
}
