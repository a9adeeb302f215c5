// SPDX-License-Identifier: MIT OR Apache-2.0
//! Typed outbound signals.
//!
//! Each component owns one `Signal` per event type. Handlers observe events
//! synchronously, in subscription order, while the emitting call is still
//! running.

use std::fmt;

/// Handle returned by [`Signal::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// A list of typed event handlers
pub struct Signal<E> {
    handlers: Vec<(SubscriptionId, Box<dyn FnMut(&E)>)>,
    next_id: u64,
}

impl<E> Signal<E> {
    /// Create a signal with no handlers
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
            next_id: 1,
        }
    }

    /// Register a handler
    pub fn subscribe(&mut self, handler: impl FnMut(&E) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, Box::new(handler)));
        id
    }

    /// Remove a handler; returns false if it was already gone
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(h, _)| *h != id);
        self.handlers.len() != before
    }

    /// Deliver an event to every handler
    pub fn emit(&mut self, event: &E) {
        for (_, handler) in &mut self.handlers {
            handler(event);
        }
    }

    /// Number of registered handlers
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

impl<E> Default for Signal<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Signal<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
