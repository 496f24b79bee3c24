//! Copy-on-write topic table.
//!
//! Each topic maps to an `Rc` of its observer list. A broadcast clones the
//! `Rc` and iterates that clone, so the list it walks can never change
//! underneath it:
//! - removal always builds a new list and swaps it in
//! - appends go through `Rc::make_mut`, which copies first whenever a
//!   broadcast still holds the current list
//!
//! Topics whose list becomes empty are removed from the map immediately.

use crate::observer::ObserverRef;
use std::collections::HashMap;
use std::rc::Rc;

/// Immutable view of a topic's observers, in delivery order.
pub(crate) type Snapshot<P> = Rc<Vec<ObserverRef<P>>>;

pub(crate) struct TopicRegistry<P> {
    topics: HashMap<String, Snapshot<P>>,
}

impl<P> TopicRegistry<P> {
    pub(crate) fn new() -> Self {
        Self {
            topics: HashMap::new(),
        }
    }

    /// Append `observer` to `topic`. Returns false if it was already there.
    pub(crate) fn insert(&mut self, topic: &str, observer: ObserverRef<P>) -> bool {
        if let Some(list) = self.topics.get_mut(topic) {
            if list.iter().any(|o| o.same_as(&observer)) {
                return false;
            }
            Rc::make_mut(list).push(observer);
        } else {
            self.topics.insert(topic.to_owned(), Rc::new(vec![observer]));
        }
        true
    }

    /// Remove one occurrence of `observer` from `topic`.
    pub(crate) fn remove(&mut self, topic: &str, observer: &ObserverRef<P>) -> bool {
        let Some(list) = self.topics.get_mut(topic) else {
            return false;
        };
        let Some(index) = list.iter().position(|o| o.same_as(observer)) else {
            return false;
        };

        if list.len() == 1 {
            self.topics.remove(topic);
            return true;
        }

        let mut next = Vec::with_capacity(list.len() - 1);
        next.extend_from_slice(&list[..index]);
        next.extend_from_slice(&list[index + 1..]);
        *list = Rc::new(next);
        true
    }

    /// Drop the whole topic. Returns how many handles were released.
    pub(crate) fn remove_topic(&mut self, topic: &str) -> usize {
        self.topics.remove(topic).map_or(0, |list| list.len())
    }

    /// Drop handles whose observer no longer exists.
    pub(crate) fn prune_expired(&mut self, topic: &str) -> usize {
        let Some(list) = self.topics.get_mut(topic) else {
            return 0;
        };
        let live: Vec<_> = list.iter().filter(|o| o.is_alive()).cloned().collect();
        let pruned = list.len() - live.len();

        if live.is_empty() {
            self.topics.remove(topic);
        } else if pruned > 0 {
            *list = Rc::new(live);
        }
        pruned
    }

    /// Remove every topic. Returns how many handles were released.
    pub(crate) fn clear(&mut self) -> usize {
        self.topics.drain().map(|(_, list)| list.len()).sum()
    }

    pub(crate) fn snapshot(&self, topic: &str) -> Option<Snapshot<P>> {
        self.topics.get(topic).cloned()
    }

    pub(crate) fn contains(&self, topic: &str, observer: &ObserverRef<P>) -> bool {
        self.topics
            .get(topic)
            .map_or(false, |list| list.iter().any(|o| o.same_as(observer)))
    }

    pub(crate) fn observer_count(&self, topic: &str) -> usize {
        self.topics.get(topic).map_or(0, |list| list.len())
    }

    pub(crate) fn has_topic(&self, topic: &str) -> bool {
        self.topics.contains_key(topic)
    }

    pub(crate) fn topic_count(&self) -> usize {
        self.topics.len()
    }

    pub(crate) fn total_observers(&self) -> usize {
        self.topics.values().map(|list| list.len()).sum()
    }

    pub(crate) fn topics(&self) -> Vec<String> {
        let mut names: Vec<String> = self.topics.keys().cloned().collect();
        names.sort();
        names
    }
}

impl<P> Default for TopicRegistry<P> {
    fn default() -> Self {
        Self::new()
    }
}
