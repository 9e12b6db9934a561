use std::collections::HashMap;

use crate::capability::{Behavior, Capability};
use crate::event::EventType;

/// Maps each event type to the capabilities bound to it, in binding order.
///
/// Keys are [`EventType`]s, so nothing outside the catalog can ever be a
/// key. Callers are expected to have resolved the capability against the
/// behavior's table before inserting.
pub(crate) struct HandlerRegistry<B: Behavior> {
    handlers: HashMap<EventType, Vec<Capability<B>>>,
}

impl<B: Behavior> Default for HandlerRegistry<B> {
    fn default() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }
}

impl<B: Behavior> HandlerRegistry<B> {
    /// Append `capability` to the list for `event_type` unless a capability
    /// of the same name is already there. Returns whether it was added.
    pub(crate) fn insert(&mut self, event_type: EventType, capability: Capability<B>) -> bool {
        let bound = self.handlers.entry(event_type).or_default();
        if bound.iter().any(|c| c.name() == capability.name()) {
            return false;
        }
        bound.push(capability);
        true
    }

    pub(crate) fn get(&self, event_type: EventType) -> &[Capability<B>] {
        self.handlers
            .get(&event_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub(crate) fn names(&self, event_type: EventType) -> Vec<&'static str> {
        self.get(event_type).iter().map(Capability::name).collect()
    }
}
