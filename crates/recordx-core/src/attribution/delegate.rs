//! Delegate contract, descriptor and the intercepting decorator

use std::any::{type_name, TypeId};
use std::cell::Cell;

/// A sanctioned mutation path: a form or service object with one entry point
pub trait Delegate {
    type Output;

    /// Perform the delegate's work
    fn execute(&mut self) -> Self::Output;
}

/// Hooks run around every forwarded call of an instrumented delegate
///
/// `enter` and `exit` are always paired, and calls may nest. Observers park
/// failures instead of returning them; see [`CallObserver::fault`].
pub trait CallObserver {
    fn enter(&self);
    fn exit(&self);

    /// First failure hit while observing, if any
    fn fault(&self) -> Option<crate::errors::ExError>;
}

/// Which delegate type is the sanctioned mutation path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegateDescriptor {
    type_id: TypeId,
    label: String,
}

impl DelegateDescriptor {
    /// Designate `D`, labelled with its bare type name
    pub fn of<D: Delegate + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<D>(),
            label: short_type_name(type_name::<D>()).to_string(),
        }
    }

    /// Override the label used in failure messages
    pub fn labelled(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn designates<D: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<D>()
    }
}

/// `my_app::forms::UserForm<'a>` -> `UserForm`
fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// A delegate as returned by [`InterceptionPoint::intercept`]
///
/// Implements [`Delegate`] with the inner delegate's output, forwarding
/// every call unchanged. Only instrumented wrappers notify an observer.
pub struct Intercepted<'a, D> {
    inner: D,
    observer: Option<&'a dyn CallObserver>,
}

impl<'a, D> Intercepted<'a, D> {
    /// Wrap without instrumentation
    pub fn passthrough(inner: D) -> Self {
        Self {
            inner,
            observer: None,
        }
    }

    pub fn is_instrumented(&self) -> bool {
        self.observer.is_some()
    }

    pub fn inner(&self) -> &D {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut D {
        &mut self.inner
    }

    pub fn into_inner(self) -> D {
        self.inner
    }
}

impl<D: Delegate> Delegate for Intercepted<'_, D> {
    type Output = D::Output;

    fn execute(&mut self) -> D::Output {
        match self.observer {
            Some(observer) => {
                observer.enter();
                let output = self.inner.execute();
                observer.exit();
                output
            }
            None => self.inner.execute(),
        }
    }
}

/// Factory interception point handed to the action under test
///
/// The action routes every delegate it constructs through
/// [`intercept`](InterceptionPoint::intercept). With nothing designated,
/// every delegate passes through.
pub struct InterceptionPoint<'a> {
    designated: Option<(&'a DelegateDescriptor, &'a dyn CallObserver)>,
    instrumented: Cell<usize>,
}

impl<'a> InterceptionPoint<'a> {
    /// Instrument delegates matching `descriptor` with `observer`
    pub fn new(descriptor: &'a DelegateDescriptor, observer: &'a dyn CallObserver) -> Self {
        Self {
            designated: Some((descriptor, observer)),
            instrumented: Cell::new(0),
        }
    }

    /// An interception point that instruments nothing
    pub fn passthrough() -> Self {
        Self {
            designated: None,
            instrumented: Cell::new(0),
        }
    }

    pub fn designated(&self) -> Option<&'a DelegateDescriptor> {
        self.designated.map(|(descriptor, _)| descriptor)
    }

    /// Wrap a freshly constructed delegate
    pub fn intercept<D: Delegate + 'static>(&self, delegate: D) -> Intercepted<'a, D> {
        match self.designated {
            Some((descriptor, observer)) if descriptor.designates::<D>() => {
                self.instrumented.set(self.instrumented.get() + 1);
                tracing::trace!(delegate = descriptor.label(), "delegate instance intercepted");
                Intercepted {
                    inner: delegate,
                    observer: Some(observer),
                }
            }
            _ => Intercepted::passthrough(delegate),
        }
    }

    /// Number of delegate instances instrumented so far
    pub fn instrumented_count(&self) -> usize {
        self.instrumented.get()
    }
}
