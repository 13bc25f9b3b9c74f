//! Update channel registry: per-key dispatch of inbound stream events.
//!
//! The registry is the single shared routing table between the transport and
//! per-message consumers. It is an explicit, caller-owned object rather than
//! a process global, so embedders construct one wherever they compose the UI
//! tree and thread it to whoever needs it.
//!
//! Delivery policy is fire-and-forget, last-registrant-wins: at most one
//! handler per key, a later registration silently replaces the earlier one,
//! and events for unregistered keys are dropped. There is no buffering and
//! no replay; the transport re-sends the full accumulated text on each
//! event, so a late registrant catches up as soon as the next event arrives.

use crate::types::StreamEvent;
use std::collections::HashMap;

/// Receiver for stream events routed to one message key.
pub trait UpdateHandler: Send {
    /// Process one event. Invoked synchronously from [`UpdateRegistry::dispatch`].
    fn handle(&mut self, event: &StreamEvent);
}

impl<F> UpdateHandler for F
where
    F: FnMut(&StreamEvent) + Send,
{
    fn handle(&mut self, event: &StreamEvent) {
        self(event)
    }
}

/// Callback observing events dropped for want of a registered handler.
pub type DropHook = Box<dyn Fn(&StreamEvent) + Send>;

/// Per-key dispatch table for inbound stream events.
#[derive(Default)]
pub struct UpdateRegistry {
    handlers: HashMap<String, Box<dyn UpdateHandler>>,
    drop_hook: Option<DropHook>,
}

impl UpdateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for `key`, replacing any existing handler.
    ///
    /// Replacement is silent: the open/close lifecycle of UI components means
    /// a remount for the same message legitimately supersedes the old handler.
    pub fn register(&mut self, key: impl Into<String>, handler: Box<dyn UpdateHandler>) {
        self.handlers.insert(key.into(), handler);
    }

    /// Remove the handler for `key` if present. Idempotent.
    pub fn unregister(&mut self, key: &str) {
        self.handlers.remove(key);
    }

    /// True when a handler is registered for `key`.
    pub fn is_registered(&self, key: &str) -> bool {
        self.handlers.contains_key(key)
    }

    /// Route one event to the handler registered for its key.
    ///
    /// Events for unregistered keys are discarded; that is best-effort
    /// delivery, not an error. The optional drop hook observes discards
    /// without changing the contract.
    pub fn dispatch(&mut self, event: &StreamEvent) {
        match self.handlers.get_mut(&event.post_id) {
            Some(handler) => handler.handle(event),
            None => {
                tracing::trace!(post_id = %event.post_id, "dropping event for unregistered key");
                if let Some(hook) = &self.drop_hook {
                    hook(event);
                }
            }
        }
    }

    /// Install a diagnostic callback for dropped events.
    pub fn set_drop_hook(&mut self, hook: DropHook) {
        self.drop_hook = Some(hook);
    }
}
