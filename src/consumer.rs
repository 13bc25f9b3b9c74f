//! Streaming consumer: per-message view state fed by the registry.
//!
//! A consumer owns the mutable text/tool state for one message. It registers
//! a handler with the [`UpdateRegistry`] on attach and removes it on detach;
//! while attached, every routed event is folded into a shared view that the
//! embedding UI reads for rendering.
//!
//! Text events carry the full accumulated text, so applying one is a
//! replace, never an append. That makes text self-healing under reordering:
//! a later event always supersedes. Tool-status events have no such
//! property and go through the status transition table instead; reports
//! that would move a call backwards are dropped.

use crate::registry::UpdateRegistry;
use crate::types::{StreamEvent, StreamPayload, ToolCall, ToolStatus};
use std::sync::{Arc, Mutex};

/// Snapshot state for one message, shared between the registry-owned handler
/// and the embedding UI.
#[derive(Debug, Clone)]
pub struct MessageView {
    /// Current full message text.
    pub text: String,
    /// Set once an end-of-stream control marker arrives.
    pub stream_ended: bool,
    /// Tool calls attached to the message, in proposal order.
    pub tool_calls: Vec<ToolCall>,
}

/// Streaming consumer for one message key.
pub struct StreamingConsumer {
    key: String,
    view: Arc<Mutex<MessageView>>,
}

impl StreamingConsumer {
    /// Create a consumer with its initial (pre-stream) text and tool calls.
    ///
    /// If no events ever arrive the consumer keeps showing this initial
    /// state indefinitely; callers that need a liveness affordance must
    /// layer it on top.
    pub fn new(
        key: impl Into<String>,
        initial_text: impl Into<String>,
        tool_calls: Vec<ToolCall>,
    ) -> Self {
        Self {
            key: key.into(),
            view: Arc::new(Mutex::new(MessageView {
                text: initial_text.into(),
                stream_ended: false,
                tool_calls,
            })),
        }
    }

    /// Message key this consumer listens on.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Register this consumer's handler, replacing any prior handler for
    /// the key. Events dispatched before attach are never replayed.
    pub fn attach(&self, registry: &mut UpdateRegistry) {
        let view = self.view.clone();
        registry.register(
            self.key.clone(),
            Box::new(move |event: &StreamEvent| {
                apply_event(&mut view.lock().unwrap(), event);
            }),
        );
    }

    /// Unregister from the registry (unmount). Stops future updates; does
    /// not cancel any in-flight request tied to this message.
    pub fn detach(&self, registry: &mut UpdateRegistry) {
        registry.unregister(&self.key);
    }

    /// Snapshot of the current view state.
    pub fn view(&self) -> MessageView {
        self.view.lock().unwrap().clone()
    }

    /// Current full text.
    pub fn text(&self) -> String {
        self.view.lock().unwrap().text.clone()
    }

    /// True once the end-of-stream marker has been seen.
    pub fn stream_ended(&self) -> bool {
        self.view.lock().unwrap().stream_ended
    }

    /// Optimistically mark the given pending tool calls `Rejected`.
    ///
    /// Used when an approval batch enters submission: rejected ids are never
    /// sent to the executor, so no status report will ever arrive for them.
    /// Calls not in `Pending` are left untouched.
    pub fn mark_rejected(&self, tool_ids: &[String]) {
        let mut view = self.view.lock().unwrap();
        for call in view.tool_calls.iter_mut() {
            if tool_ids.contains(&call.id) {
                if let Ok(next) = call.status.transition(ToolStatus::Rejected) {
                    call.status = next;
                }
            }
        }
    }
}

/// Fold one routed event into the view state.
fn apply_event(view: &mut MessageView, event: &StreamEvent) {
    match &event.payload {
        StreamPayload::Text { next } => {
            // Server text is authoritative; replace wholesale.
            view.text = next.clone();
        }
        StreamPayload::Control(_) => {
            view.stream_ended = true;
        }
        StreamPayload::ToolStatus {
            tool_id,
            status,
            result,
        } => {
            let Some(call) = view.tool_calls.iter_mut().find(|c| &c.id == tool_id) else {
                tracing::warn!(post_id = %event.post_id, tool_id = %tool_id,
                    "status report for unknown tool call; dropped");
                return;
            };
            match call.status.transition(*status) {
                Ok(next) => {
                    call.status = next;
                    if result.is_some() {
                        call.result = result.clone();
                    }
                }
                Err(e) => {
                    tracing::warn!(post_id = %event.post_id, tool_id = %tool_id,
                        "dropping status report: {e}");
                }
            }
        }
    }
}
