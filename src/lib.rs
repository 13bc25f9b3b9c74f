//! Streamgate — streaming-update routing and tool-call approval coordination.
//!
//! This crate demultiplexes a shared real-time event stream into
//! per-message incremental text updates, and gates execution of sensitive
//! tool calls proposed by an assistant behind an all-or-nothing
//! human-approval protocol: N independent approve/reject choices collapse
//! into exactly one atomic bulk submission.
//!
//! # Quick start
//!
//! ```no_run
//! use streamgate::approval::{ApprovalBatch, DecideOutcome};
//! use streamgate::config::load_config;
//! use streamgate::consumer::StreamingConsumer;
//! use streamgate::gate::{submit_batch, HttpToolExecutor};
//! use streamgate::registry::UpdateRegistry;
//!
//! # async fn example(calls: Vec<streamgate::types::ToolCall>) {
//! let mut registry = UpdateRegistry::new();
//! let consumer = StreamingConsumer::new("post-1", "", calls);
//! consumer.attach(&mut registry);
//!
//! let mut batch = ApprovalBatch::from_tool_calls("post-1", &consumer.view().tool_calls);
//! if let DecideOutcome::Complete { rejected, .. } = batch.decide("tool-1", true) {
//!     consumer.mark_rejected(&rejected);
//!     let config = load_config(None).unwrap();
//!     let executor = HttpToolExecutor::from_config(&config).unwrap();
//!     submit_batch(&mut batch, &executor).await.unwrap();
//! }
//! # }
//! ```

pub mod approval;
pub mod config;
pub mod consumer;
pub mod error;
pub mod gate;
pub mod registry;
#[cfg(test)]
pub mod testsupport;
pub mod types;
