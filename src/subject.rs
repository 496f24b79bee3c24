//! The subject: topic registration and synchronous broadcast.

use crate::error::{Result, SubjectError};
use crate::observer::ObserverRef;
use crate::registry::TopicRegistry;
use crate::types::{validate_topic, DeliveryPolicy, SubjectStats};
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::fmt;
use tracing::{debug, trace, warn};

/// Subject configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SubjectConfig {
    /// What to do when an observer callback fails.
    pub on_observer_error: DeliveryPolicy,

    /// Drop handles of observers that no longer exist after a broadcast
    /// runs into them.
    pub prune_expired: bool,
}

impl Default for SubjectConfig {
    fn default() -> Self {
        Self {
            on_observer_error: DeliveryPolicy::Abort,
            prune_expired: true,
        }
    }
}

/// Maps topics to observers and delivers published payloads to them.
///
/// All methods take `&self` so observers can call back into the subject
/// while a broadcast is running (typically through an `Rc<Subject>` they
/// captured). The registry is never borrowed across an observer call.
///
/// Within one [`notify`](Subject::notify) call:
/// - observers are invoked in registration order
/// - observers registered during the call are not invoked by it
/// - observers unregistered during the call are still invoked by it
///
/// A subject is single-threaded: it is neither `Send` nor `Sync`.
pub struct Subject<P = serde_json::Value> {
    config: SubjectConfig,
    registry: RefCell<TopicRegistry<P>>,
    destroyed: Cell<bool>,
}

impl<P> Subject<P> {
    /// Create an empty subject with the default configuration.
    pub fn new() -> Self {
        Self::with_config(SubjectConfig::default())
    }

    /// Create an empty subject with a custom configuration.
    pub fn with_config(config: SubjectConfig) -> Self {
        Self {
            config,
            registry: RefCell::new(TopicRegistry::new()),
            destroyed: Cell::new(false),
        }
    }

    pub fn config(&self) -> &SubjectConfig {
        &self.config
    }

    // --- Registration ---

    /// Register `observer` for `topic`.
    ///
    /// Returns `Ok(false)` if the observer is already registered for the
    /// topic; the registry is left as it was.
    pub fn register(&self, topic: &str, observer: &ObserverRef<P>) -> Result<bool> {
        validate_topic(topic)?;
        if observer.is_detached() {
            return Err(SubjectError::invalid("observer reference is detached"));
        }
        if !observer.is_alive() {
            return Err(SubjectError::invalid("observer has already been dropped"));
        }
        self.ensure_active()?;

        let added = self.registry.borrow_mut().insert(topic, observer.clone());
        trace!(topic, added, "register");
        Ok(added)
    }

    /// Unregister `observer` from `topic`.
    ///
    /// Unknown topics and observers that aren't registered are a no-op
    /// returning `Ok(false)`. Observers already dropped by their owner can
    /// still be unregistered through a handle that was kept.
    pub fn unregister(&self, topic: &str, observer: &ObserverRef<P>) -> Result<bool> {
        validate_topic(topic)?;
        if observer.is_detached() {
            return Err(SubjectError::invalid("observer reference is detached"));
        }
        self.ensure_active()?;

        let removed = self.registry.borrow_mut().remove(topic, observer);
        trace!(topic, removed, "unregister");
        Ok(removed)
    }

    /// Unregister every observer of `topic`. Returns how many were removed.
    ///
    /// A broadcast already running for the topic finishes its snapshot.
    pub fn remove_topic(&self, topic: &str) -> Result<usize> {
        validate_topic(topic)?;
        self.ensure_active()?;

        let removed = self.registry.borrow_mut().remove_topic(topic);
        debug!(topic, removed, "topic removed");
        Ok(removed)
    }

    // --- Broadcasting ---

    /// Deliver `payload` to every observer registered for `topic`.
    ///
    /// Returns how many observers handled the message without error. With
    /// [`DeliveryPolicy::Abort`] the first failing observer ends the
    /// broadcast and its error is returned.
    pub fn notify(&self, topic: &str, payload: &P) -> Result<usize> {
        validate_topic(topic)?;
        if self.destroyed.get() {
            trace!(topic, "notify on destroyed subject");
            return Ok(0);
        }

        let snapshot = self.registry.borrow().snapshot(topic);
        let Some(snapshot) = snapshot else {
            trace!(topic, "notify without observers");
            return Ok(0);
        };

        let mut delivered = 0;
        let mut expired = 0;

        for observer in snapshot.iter() {
            if self.destroyed.get() {
                debug!(topic, delivered, "subject destroyed during broadcast");
                return Ok(delivered);
            }

            let Some(live) = observer.upgrade() else {
                expired += 1;
                continue;
            };

            match live.handle_message(topic, payload) {
                Ok(()) => delivered += 1,
                Err(source) => match self.config.on_observer_error {
                    DeliveryPolicy::Abort => {
                        return Err(SubjectError::Observer {
                            topic: topic.to_owned(),
                            source,
                        });
                    }
                    DeliveryPolicy::Isolate => {
                        warn!(topic, error = %source, "observer failed, continuing broadcast");
                    }
                },
            }
        }

        if expired > 0 && self.config.prune_expired && !self.destroyed.get() {
            let pruned = self.registry.borrow_mut().prune_expired(topic);
            debug!(topic, pruned, "pruned expired observers");
        }

        trace!(topic, delivered, snapshot = snapshot.len(), "notify");
        Ok(delivered)
    }

    // --- Lifecycle ---

    /// Release every observer handle and refuse further use.
    ///
    /// Observers are not called. Registration afterwards fails with
    /// [`SubjectError::UseAfterDestroy`] and notify delivers nothing.
    /// Calling it again is a no-op.
    pub fn destroy(&self) {
        if self.destroyed.replace(true) {
            return;
        }
        let released = self.registry.borrow_mut().clear();
        debug!(released, "subject destroyed");
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed.get()
    }

    fn ensure_active(&self) -> Result<()> {
        if self.destroyed.get() {
            return Err(SubjectError::UseAfterDestroy);
        }
        Ok(())
    }

    // --- Introspection ---

    /// Number of observers registered for `topic`.
    pub fn observer_count(&self, topic: &str) -> usize {
        self.registry.borrow().observer_count(topic)
    }

    pub fn has_topic(&self, topic: &str) -> bool {
        self.registry.borrow().has_topic(topic)
    }

    pub fn is_registered(&self, topic: &str, observer: &ObserverRef<P>) -> bool {
        self.registry.borrow().contains(topic, observer)
    }

    pub fn topic_count(&self) -> usize {
        self.registry.borrow().topic_count()
    }

    /// Topics with at least one observer, sorted.
    pub fn topics(&self) -> Vec<String> {
        self.registry.borrow().topics()
    }

    pub fn stats(&self) -> SubjectStats {
        let registry = self.registry.borrow();
        SubjectStats {
            topic_count: registry.topic_count(),
            observer_count: registry.total_observers(),
            destroyed: self.destroyed.get(),
        }
    }
}

impl<P> Default for Subject<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> fmt::Debug for Subject<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subject")
            .field("config", &self.config)
            .field("stats", &self.stats())
            .finish()
    }
}
