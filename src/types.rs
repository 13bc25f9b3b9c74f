//! Data model for the push-event wire protocol and tool-call state.
//!
//! Inbound events deserialize from the transport JSON as [`PushEvent`] and
//! are classified into typed [`StreamEvent`]s before dispatch. Tool-call
//! status is a closed enum with an explicit transition table.

use crate::error::{EventError, TransitionError};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Inbound wire shape
// ---------------------------------------------------------------------------

/// Raw inbound push event as sent by the server.
///
/// One wire shape carries three event classes: incremental text updates
/// (`next` set), control markers (`control` set), and tool-call status
/// reports (`tool_id` + `status` set). Classification happens in
/// [`StreamEvent::from_wire`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushEvent {
    /// Message this event belongs to; the registry routes on this key.
    pub post_id: String,

    /// Full accumulated response text so far. Not a delta: each event
    /// supersedes the previous one entirely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,

    /// Control marker; currently only `"end"` is defined.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control: Option<String>,

    /// Tool call this event reports on, for status events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_id: Option<String>,

    /// New status for `tool_id`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ToolStatus>,

    /// Optional result text attached to a status report.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
}

// ---------------------------------------------------------------------------
// Typed stream events
// ---------------------------------------------------------------------------

/// Control marker in a push event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMarker {
    /// The stream for this message has ended; no further text is expected.
    End,
}

/// Classified payload of a stream event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamPayload {
    /// Replace the message text with `next` (authoritative full text).
    Text { next: String },
    /// Stream control marker.
    Control(ControlMarker),
    /// Status report for one tool call attached to the message.
    ToolStatus {
        tool_id: String,
        status: ToolStatus,
        result: Option<String>,
    },
}

/// A typed push event ready for registry dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamEvent {
    /// Routing key; one registered handler per key at most.
    pub post_id: String,
    pub payload: StreamPayload,
}

impl StreamEvent {
    /// Classify a raw wire event.
    ///
    /// Precedence when multiple fields are set: control beats text beats
    /// tool status, matching how the server terminates a stream with a
    /// final combined event.
    pub fn from_wire(raw: PushEvent) -> Result<Self, EventError> {
        let payload = if let Some(marker) = raw.control {
            match marker.as_str() {
                "end" => StreamPayload::Control(ControlMarker::End),
                _ => return Err(EventError::UnknownControl(marker)),
            }
        } else if let Some(next) = raw.next {
            StreamPayload::Text { next }
        } else if let (Some(tool_id), Some(status)) = (raw.tool_id, raw.status) {
            StreamPayload::ToolStatus {
                tool_id,
                status,
                result: raw.result,
            }
        } else {
            return Err(EventError::Unclassifiable);
        };
        Ok(Self {
            post_id: raw.post_id,
            payload,
        })
    }

    /// Build a text update event.
    pub fn text(post_id: impl Into<String>, next: impl Into<String>) -> Self {
        Self {
            post_id: post_id.into(),
            payload: StreamPayload::Text { next: next.into() },
        }
    }

    /// Build an end-of-stream event.
    pub fn end(post_id: impl Into<String>) -> Self {
        Self {
            post_id: post_id.into(),
            payload: StreamPayload::Control(ControlMarker::End),
        }
    }

    /// Build a tool status event.
    pub fn tool_status(
        post_id: impl Into<String>,
        tool_id: impl Into<String>,
        status: ToolStatus,
        result: Option<String>,
    ) -> Self {
        Self {
            post_id: post_id.into(),
            payload: StreamPayload::ToolStatus {
                tool_id: tool_id.into(),
                status,
                result,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Tool calls
// ---------------------------------------------------------------------------

/// Lifecycle status of a proposed tool call.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ToolStatus {
    /// Proposed, awaiting a human decision.
    Pending,
    /// Approved and handed to the executor.
    Accepted,
    /// Executor reported success.
    Success,
    /// Executor reported failure.
    Error,
    /// Declined by the user; never sent to the executor.
    Rejected,
}

impl ToolStatus {
    /// Whether this status admits no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Error | Self::Rejected)
    }

    /// Validate a transition against the status table.
    ///
    /// Legal moves: `Pending -> Accepted | Rejected` and
    /// `Accepted -> Success | Error`. Everything else is rejected,
    /// including self-transitions.
    pub fn transition(self, to: ToolStatus) -> Result<ToolStatus, TransitionError> {
        let ok = matches!(
            (self, to),
            (Self::Pending, Self::Accepted)
                | (Self::Pending, Self::Rejected)
                | (Self::Accepted, Self::Success)
                | (Self::Accepted, Self::Error)
        );
        if ok {
            Ok(to)
        } else {
            Err(TransitionError { from: self, to })
        }
    }
}

/// A tool invocation proposed by the assistant, pending human approval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique id used to correlate decisions and status reports.
    pub id: String,
    /// Tool name to execute.
    pub name: String,
    /// Natural-language description shown to the approving user.
    pub description: String,
    /// JSON-encoded arguments object.
    pub arguments: String,
    pub status: ToolStatus,
    /// Result text, present once the executor reports an outcome.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
}

impl ToolCall {
    /// Create a pending proposal with no result.
    pub fn pending(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            arguments: arguments.into(),
            status: ToolStatus::Pending,
            result: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Outbound submission body
// ---------------------------------------------------------------------------

/// Request body for the bulk tool-execution POST.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitToolsRequest {
    /// Ids of the approved tool calls, in proposal order.
    pub actions: Vec<String>,
}
