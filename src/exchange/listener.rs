//! Exchange lifecycle events, listeners and failure propagation.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use crate::request::ApiRequest;
use crate::response::ApiResponse;

use super::{AssertionFailure, ErrorKind, ExchangeError};

/// Identity of one exchange, unique per [`Bastion`](super::Bastion) instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExchangeId(u64);

impl ExchangeId {
    /// Wraps a raw identifier.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// The raw identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ExchangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a listener wants done with a captured failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Disposition {
    /// Return the failure to the caller as `Err`.
    Propagate,
    /// Report the failure as a suppressed outcome instead.
    Swallow,
}

/// The exchange is about to be executed.
#[derive(Debug, Clone, Copy)]
pub struct Started<'a> {
    /// Exchange identity
    pub id: ExchangeId,
    /// The request being executed
    pub request: &'a ApiRequest,
}

/// The exchange executed, decoded and passed every assertion.
#[derive(Debug, Clone, Copy)]
pub struct Finished<'a> {
    /// Exchange identity
    pub id: ExchangeId,
    /// The executed request
    pub request: &'a ApiRequest,
    /// The response received
    pub response: &'a ApiResponse,
}

/// A caller assertion rejected the exchange.
#[derive(Debug, Clone, Copy)]
pub struct Failed<'a> {
    /// Exchange identity
    pub id: ExchangeId,
    /// The executed request
    pub request: &'a ApiRequest,
    /// The response the assertion rejected
    pub response: &'a ApiResponse,
    /// The captured failure
    pub failure: &'a AssertionFailure,
}

/// Execution or decoding failed.
#[derive(Debug, Clone, Copy)]
pub struct Errored<'a> {
    /// Exchange identity
    pub id: ExchangeId,
    /// The request that was attempted
    pub request: &'a ApiRequest,
    /// The captured error
    pub error: &'a ExchangeError,
}

/// A lifecycle milestone of one exchange.
///
/// For a single exchange the order is always `Started`, then exactly one
/// of `Finished`, `Failed` or `Error`.
#[derive(Debug, Clone, Copy)]
pub enum ExchangeEvent<'a> {
    /// See [`Started`].
    Started(Started<'a>),
    /// See [`Finished`].
    Finished(Finished<'a>),
    /// See [`Failed`].
    Failed(Failed<'a>),
    /// See [`Errored`].
    Error(Errored<'a>),
}

impl ExchangeEvent<'_> {
    /// The exchange this event belongs to.
    #[must_use]
    pub const fn id(&self) -> ExchangeId {
        match self {
            Self::Started(e) => e.id,
            Self::Finished(e) => e.id,
            Self::Failed(e) => e.id,
            Self::Error(e) => e.id,
        }
    }

    /// Delivers this event to the matching notification point of `listener`.
    ///
    /// Returns the listener's disposition for `Failed` and `Error`, and
    /// `None` for the other milestones.
    pub fn deliver(&self, listener: &dyn ExchangeListener) -> Option<Disposition> {
        match self {
            Self::Started(event) => {
                listener.on_started(event);
                None
            }
            Self::Finished(event) => {
                listener.on_finished(event);
                None
            }
            Self::Failed(event) => Some(listener.on_failed(event)),
            Self::Error(event) => Some(listener.on_error(event)),
        }
    }
}

/// Receives exchange lifecycle notifications.
///
/// Listeners are shared by every exchange run with the same set-up, so
/// they must be `Send + Sync`; notifications for one exchange arrive on the
/// task running it, in lifecycle order.
pub trait ExchangeListener: Send + Sync {
    /// Called before execution begins.
    fn on_started(&self, _event: &Started<'_>) {}

    /// Called after a successful exchange.
    fn on_finished(&self, _event: &Finished<'_>) {}

    /// Called when a caller assertion fails.
    fn on_failed(&self, event: &Failed<'_>) -> Disposition;

    /// Called when execution or decoding fails.
    fn on_error(&self, event: &Errored<'_>) -> Disposition;
}

/// Ordered set of listeners notified for every exchange.
#[derive(Default)]
pub struct EventDispatcher {
    listeners: Vec<Arc<dyn ExchangeListener>>,
}

impl EventDispatcher {
    /// Creates a dispatcher with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a listener.
    pub fn register(&mut self, listener: Arc<dyn ExchangeListener>) {
        self.listeners.push(listener);
    }

    /// Returns the number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Returns `true` if no listener is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Notifies every listener, in registration order.
    ///
    /// For `Failed` and `Error` events the combined disposition is
    /// `Propagate` when no listener is registered or any listener asks to
    /// propagate, and `Swallow` otherwise. Other events yield `None`.
    pub fn dispatch(&self, event: &ExchangeEvent<'_>) -> Option<Disposition> {
        let mut combined: Option<Disposition> = None;

        for listener in &self.listeners {
            let Some(disposition) = event.deliver(listener.as_ref()) else {
                continue;
            };
            if combined != Some(Disposition::Propagate) {
                combined = Some(disposition);
            }
        }

        match event {
            ExchangeEvent::Failed(_) | ExchangeEvent::Error(_) => {
                Some(combined.unwrap_or(Disposition::Propagate))
            }
            ExchangeEvent::Started(_) | ExchangeEvent::Finished(_) => None,
        }
    }
}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("listener_count", &self.listeners.len())
            .finish()
    }
}

/// The default listener: maps each [`ErrorKind`] to a disposition.
///
/// Out of the box every kind propagates, so an exchange fails loudly.
/// Individual kinds can be swallowed instead.
///
/// # Example
///
/// ```
/// use bastion_core::exchange::{Disposition, ErrorKind, PropagationPolicy};
///
/// let policy = PropagationPolicy::fail_loud().swallowing(ErrorKind::Assertion);
///
/// assert_eq!(policy.disposition_for(ErrorKind::Assertion), Disposition::Swallow);
/// assert_eq!(policy.disposition_for(ErrorKind::Execution), Disposition::Propagate);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PropagationPolicy {
    swallowed: HashSet<ErrorKind>,
}

impl PropagationPolicy {
    /// A policy that propagates every kind.
    #[must_use]
    pub fn fail_loud() -> Self {
        Self::default()
    }

    /// Swallows `kind` instead of propagating it.
    #[must_use]
    pub fn swallowing(mut self, kind: ErrorKind) -> Self {
        self.swallowed.insert(kind);
        self
    }

    /// The disposition for errors of `kind`.
    #[must_use]
    pub fn disposition_for(&self, kind: ErrorKind) -> Disposition {
        if self.swallowed.contains(&kind) {
            Disposition::Swallow
        } else {
            Disposition::Propagate
        }
    }
}

impl ExchangeListener for PropagationPolicy {
    fn on_failed(&self, _event: &Failed<'_>) -> Disposition {
        self.disposition_for(ErrorKind::Assertion)
    }

    fn on_error(&self, event: &Errored<'_>) -> Disposition {
        self.disposition_for(event.error.kind())
    }
}

/// One failure recorded by a [`CollectingListener`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedFailure {
    /// Exchange identity
    pub id: ExchangeId,
    /// Classification of the failure
    pub kind: ErrorKind,
    /// Rendered failure message
    pub message: String,
}

/// Soft-fail listener: records every failure and swallows it.
#[derive(Debug, Default)]
pub struct CollectingListener {
    collected: Mutex<Vec<CollectedFailure>>,
}

impl CollectingListener {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A snapshot of the failures recorded so far.
    #[must_use]
    pub fn failures(&self) -> Vec<CollectedFailure> {
        self.lock().clone()
    }

    /// Removes and returns the failures recorded so far.
    #[must_use]
    pub fn take(&self) -> Vec<CollectedFailure> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<CollectedFailure>> {
        self.collected.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, id: ExchangeId, kind: ErrorKind, message: String) {
        self.lock().push(CollectedFailure { id, kind, message });
    }
}

impl ExchangeListener for CollectingListener {
    fn on_failed(&self, event: &Failed<'_>) -> Disposition {
        self.record(event.id, ErrorKind::Assertion, event.failure.to_string());
        Disposition::Swallow
    }

    fn on_error(&self, event: &Errored<'_>) -> Disposition {
        self.record(event.id, event.error.kind(), event.error.to_string());
        Disposition::Swallow
    }
}
