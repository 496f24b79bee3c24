//! Observer trait and the non-owning handles a subject keeps.

use std::fmt;
use std::rc::{Rc, Weak};

/// Error returned by an observer callback.
pub type ObserverError = Box<dyn std::error::Error + Send + Sync>;

/// Result returned by an observer callback.
pub type ObserverResult = std::result::Result<(), ObserverError>;

/// Receives messages published on the topics it is registered for.
///
/// Closures of the shape `Fn(&str, &P) -> ObserverResult` implement this
/// trait, so small observers don't need a dedicated type.
pub trait Observer<P = serde_json::Value> {
    /// Handle one message. `payload` is passed through exactly as published.
    fn handle_message(&self, topic: &str, payload: &P) -> ObserverResult;
}

impl<P, F> Observer<P> for F
where
    F: Fn(&str, &P) -> ObserverResult,
{
    fn handle_message(&self, topic: &str, payload: &P) -> ObserverResult {
        self(topic, payload)
    }
}

/// Non-owning handle to an observer.
///
/// The subject stores these instead of the observers themselves: the caller
/// keeps the `Rc` and decides how long the observer lives. Two handles are
/// the same observer when they point at the same allocation.
pub struct ObserverRef<P = serde_json::Value> {
    inner: Option<Weak<dyn Observer<P>>>,
}

impl<P> ObserverRef<P> {
    /// Create a handle to `observer` without taking ownership of it.
    pub fn new<O>(observer: &Rc<O>) -> Self
    where
        O: Observer<P> + 'static,
    {
        let strong: Rc<dyn Observer<P>> = observer.clone();
        Self {
            inner: Some(Rc::downgrade(&strong)),
        }
    }

    /// A handle that points at nothing. Registering it is rejected.
    pub fn detached() -> Self {
        Self { inner: None }
    }

    /// Whether this handle never pointed at an observer.
    pub fn is_detached(&self) -> bool {
        self.inner.is_none()
    }

    /// Whether the observer is still owned by someone.
    pub fn is_alive(&self) -> bool {
        self.inner
            .as_ref()
            .map_or(false, |weak| weak.strong_count() > 0)
    }

    /// Identity comparison. Detached handles are never the same observer.
    pub fn same_as(&self, other: &Self) -> bool {
        match (&self.inner, &other.inner) {
            (Some(a), Some(b)) => Weak::ptr_eq(a, b),
            _ => false,
        }
    }

    pub(crate) fn upgrade(&self) -> Option<Rc<dyn Observer<P>>> {
        self.inner.as_ref().and_then(Weak::upgrade)
    }
}

impl<P, O> From<&Rc<O>> for ObserverRef<P>
where
    O: Observer<P> + 'static,
{
    fn from(observer: &Rc<O>) -> Self {
        Self::new(observer)
    }
}

impl<P> Clone for ObserverRef<P> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<P> Default for ObserverRef<P> {
    fn default() -> Self {
        Self::detached()
    }
}

impl<P> fmt::Debug for ObserverRef<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            Some(weak) => write!(f, "ObserverRef(alive: {})", weak.strong_count() > 0),
            None => write!(f, "ObserverRef(detached)"),
        }
    }
}
