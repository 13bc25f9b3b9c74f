//! Tool decision aggregator: per-message approval batch state machine.
//!
//! A batch tracks the pending tool calls attached to one message plus the
//! in-progress approve/reject decisions. Decisions are revocable until the
//! last pending tool is decided; at that instant the batch computes the
//! approved subset exactly once and advances to `Submitting`. Everything
//! after that point ignores further decisions, which guards the computed
//! set against replayed UI events and double submission regardless of
//! frontend discipline.
//!
//! All transitions run through [`ApprovalBatch::decide`] and the explicit
//! `mark_*`/`reopen` methods; callers never mutate the decision map or
//! derive completeness themselves.

use crate::types::{ToolCall, ToolStatus};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Batch state
// ---------------------------------------------------------------------------

/// A recorded approve/reject choice for one tool call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approved,
    Rejected,
}

/// Submission lifecycle of an approval batch.
///
/// Advances to `Submitting` at most once; `Submitted` and `Failed` are
/// terminal for the batch's request. `Failed` permits no automatic retry —
/// restarting is only possible through the explicit [`ApprovalBatch::reopen`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Collecting,
    Submitting,
    Submitted,
    Failed,
}

/// Result of recording one decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecideOutcome {
    /// Decision recorded; the batch is still collecting.
    Recorded,
    /// This decision completed the batch. The approved subset is frozen at
    /// this instant and the state is now `Submitting`.
    Complete {
        /// Approved tool ids, in proposal order.
        approved: Vec<String>,
        /// Rejected tool ids, in proposal order. Never sent to the
        /// executor; callers apply the local `Rejected` marking.
        rejected: Vec<String>,
    },
    /// Decision ignored: unknown/non-pending tool, or the batch has already
    /// left `Collecting`.
    Ignored,
}

/// Per-message set of outstanding tool-call proposals and their decisions.
pub struct ApprovalBatch {
    post_id: String,
    /// Ids of the calls that entered the batch as `Pending`, in proposal
    /// order. Already-resolved calls are inert and never appear here.
    pending: Vec<String>,
    decisions: HashMap<String, Decision>,
    state: SubmissionState,
    /// Approved subset, frozen the instant completeness first became true.
    approved: Vec<String>,
    rejected: Vec<String>,
}

impl ApprovalBatch {
    /// Build a batch from the tool calls attached to a message.
    ///
    /// Only `Pending` calls participate; calls already resolved (from a
    /// previous session or replay) are rendered by the consumer but never
    /// enter the decision map or the completeness check. A batch with no
    /// pending calls stays in `Collecting` forever and ignores all
    /// decisions.
    pub fn from_tool_calls(post_id: impl Into<String>, calls: &[ToolCall]) -> Self {
        let pending = calls
            .iter()
            .filter(|c| c.status == ToolStatus::Pending)
            .map(|c| c.id.clone())
            .collect();
        Self {
            post_id: post_id.into(),
            pending,
            decisions: HashMap::new(),
            state: SubmissionState::Collecting,
            approved: Vec::new(),
            rejected: Vec::new(),
        }
    }

    /// Message this batch belongs to.
    pub fn post_id(&self) -> &str {
        &self.post_id
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    /// Recorded decision for one tool, if any.
    pub fn decision(&self, tool_id: &str) -> Option<Decision> {
        self.decisions.get(tool_id).copied()
    }

    /// Ids still awaiting a decision.
    pub fn undecided(&self) -> Vec<String> {
        self.pending
            .iter()
            .filter(|id| !self.decisions.contains_key(*id))
            .cloned()
            .collect()
    }

    /// Approved subset; empty until the batch reaches `Submitting`.
    pub fn approved(&self) -> &[String] {
        &self.approved
    }

    /// Rejected subset; empty until the batch reaches `Submitting`.
    pub fn rejected(&self) -> &[String] {
        &self.rejected
    }

    /// Record one approve/reject choice.
    ///
    /// While `Collecting`, the last decision for a tool wins; recording
    /// recomputes completeness and fires `Complete` the first time every
    /// pending tool holds a decision. In any other state, or for a tool id
    /// outside the pending set, the call is ignored without error.
    pub fn decide(&mut self, tool_id: &str, approved: bool) -> DecideOutcome {
        if self.state != SubmissionState::Collecting {
            tracing::debug!(post_id = %self.post_id, tool_id,
                "decision after submission started; ignored");
            return DecideOutcome::Ignored;
        }
        if self.pending.is_empty() || !self.pending.iter().any(|id| id == tool_id) {
            return DecideOutcome::Ignored;
        }

        let decision = if approved {
            Decision::Approved
        } else {
            Decision::Rejected
        };
        self.decisions.insert(tool_id.to_string(), decision);

        if self.decisions.len() < self.pending.len() {
            return DecideOutcome::Recorded;
        }

        // Completeness just became true: freeze the approved/rejected split
        // from the decision map as it stands right now.
        self.state = SubmissionState::Submitting;
        for id in &self.pending {
            if self.decisions.get(id) == Some(&Decision::Approved) {
                self.approved.push(id.clone());
            } else {
                self.rejected.push(id.clone());
            }
        }
        DecideOutcome::Complete {
            approved: self.approved.clone(),
            rejected: self.rejected.clone(),
        }
    }

    /// Terminal transition after a successful submission. Only valid from
    /// `Submitting`; returns whether the transition applied.
    pub fn mark_submitted(&mut self) -> bool {
        if self.state == SubmissionState::Submitting {
            self.state = SubmissionState::Submitted;
            true
        } else {
            false
        }
    }

    /// Terminal transition after a failed submission. Only valid from
    /// `Submitting`; returns whether the transition applied.
    pub fn mark_failed(&mut self) -> bool {
        if self.state == SubmissionState::Submitting {
            self.state = SubmissionState::Failed;
            true
        } else {
            false
        }
    }

    /// Explicit restart after a failed submission: clears the decision map
    /// and the frozen subsets, returning to `Collecting` for a fresh
    /// decide/submit cycle. Only valid from `Failed`.
    ///
    /// Retry is a conscious caller action; `decide` in `Failed` stays a
    /// no-op so replayed UI events can never restart a batch by accident.
    pub fn reopen(&mut self) -> bool {
        if self.state != SubmissionState::Failed {
            return false;
        }
        self.decisions.clear();
        self.approved.clear();
        self.rejected.clear();
        self.state = SubmissionState::Collecting;
        true
    }
}
