//! End-to-end flow over the public API: wire events through the registry
//! into consumers, decisions through a batch, and one bulk submission with
//! status reconciliation afterwards.

use async_trait::async_trait;
use std::sync::Mutex;
use streamgate::approval::{ApprovalBatch, DecideOutcome, SubmissionState};
use streamgate::consumer::StreamingConsumer;
use streamgate::error::SubmissionError;
use streamgate::gate::{submit_batch, ToolExecutor};
use streamgate::registry::UpdateRegistry;
use streamgate::types::{PushEvent, StreamEvent, ToolCall, ToolStatus};

/// Install the test subscriber once so dropped-event traces are visible
/// under `RUST_LOG` when debugging.
fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Parse a transport JSON payload and route it through the registry.
fn push(registry: &mut UpdateRegistry, raw: &str) {
    let wire: PushEvent = serde_json::from_str(raw).expect("wire event should parse");
    let event = StreamEvent::from_wire(wire).expect("wire event should classify");
    registry.dispatch(&event);
}

struct RecordingExecutor {
    calls: Mutex<Vec<(String, Vec<String>)>>,
    fail_first: Mutex<bool>,
}

impl RecordingExecutor {
    fn new(fail_first: bool) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_first: Mutex::new(fail_first),
        }
    }

    fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ToolExecutor for RecordingExecutor {
    async fn execute_tools(
        &self,
        post_id: &str,
        actions: &[String],
    ) -> Result<(), SubmissionError> {
        self.calls
            .lock()
            .unwrap()
            .push((post_id.to_string(), actions.to_vec()));
        let mut fail = self.fail_first.lock().unwrap();
        if *fail {
            *fail = false;
            return Err(SubmissionError::Status(503, "backend unavailable".into()));
        }
        Ok(())
    }
}

fn proposals(ids: &[&str]) -> Vec<ToolCall> {
    ids.iter()
        .map(|id| ToolCall::pending(*id, "run_query", "Run a read-only query", "{}"))
        .collect()
}

#[test]
fn early_registrant_streams_late_registrant_sees_nothing() {
    init_tracing();
    let mut registry = UpdateRegistry::new();
    let early = StreamingConsumer::new("p1", "", Vec::new());
    early.attach(&mut registry);

    for raw in [
        r#"{"post_id":"p1","next":"H"}"#,
        r#"{"post_id":"p1","next":"He"}"#,
        r#"{"post_id":"p1","next":"Hel"}"#,
        r#"{"post_id":"p1","control":"end"}"#,
    ] {
        push(&mut registry, raw);
    }

    assert_eq!(early.text(), "Hel");
    assert!(early.stream_ended());

    // A consumer registering only after the end marker never sees any of
    // the earlier events; the registry does not buffer or replay.
    let late = StreamingConsumer::new("p1", "initial placeholder", Vec::new());
    late.attach(&mut registry);
    assert_eq!(late.text(), "initial placeholder");
    assert!(!late.stream_ended());
}

#[tokio::test]
async fn approval_to_submission_to_status_reconciliation() {
    init_tracing();
    let mut registry = UpdateRegistry::new();
    let consumer = StreamingConsumer::new("p1", "", proposals(&["a", "b", "c"]));
    consumer.attach(&mut registry);

    let mut batch = ApprovalBatch::from_tool_calls("p1", &consumer.view().tool_calls);
    assert_eq!(batch.decide("a", true), DecideOutcome::Recorded);
    assert_eq!(batch.decide("b", false), DecideOutcome::Recorded);
    assert_eq!(batch.state(), SubmissionState::Collecting);

    let outcome = batch.decide("c", true);
    let DecideOutcome::Complete { approved, rejected } = outcome else {
        panic!("expected completion, got {outcome:?}");
    };
    assert_eq!(approved, vec!["a".to_string(), "c".to_string()]);
    assert_eq!(rejected, vec!["b".to_string()]);

    // Rejected ids never reach the executor; mark them locally.
    consumer.mark_rejected(&rejected);
    assert_eq!(consumer.view().tool_calls[1].status, ToolStatus::Rejected);

    let executor = RecordingExecutor::new(false);
    submit_batch(&mut batch, &executor).await.unwrap();
    assert_eq!(batch.state(), SubmissionState::Submitted);
    assert_eq!(
        executor.calls(),
        vec![("p1".to_string(), vec!["a".to_string(), "c".to_string()])]
    );

    // Execution results come back through the same push channel,
    // independent of the submission acknowledgement.
    for raw in [
        r#"{"post_id":"p1","tool_id":"a","status":"accepted"}"#,
        r#"{"post_id":"p1","tool_id":"c","status":"accepted"}"#,
        r#"{"post_id":"p1","tool_id":"a","status":"success","result":"3 rows"}"#,
        r#"{"post_id":"p1","tool_id":"c","status":"error","result":"query timed out"}"#,
    ] {
        push(&mut registry, raw);
    }

    let view = consumer.view();
    assert_eq!(view.tool_calls[0].status, ToolStatus::Success);
    assert_eq!(view.tool_calls[0].result.as_deref(), Some("3 rows"));
    assert_eq!(view.tool_calls[2].status, ToolStatus::Error);
    assert_eq!(view.tool_calls[2].result.as_deref(), Some("query timed out"));
}

#[tokio::test]
async fn failed_submission_requires_explicit_reopen() {
    init_tracing();
    let mut batch = ApprovalBatch::from_tool_calls("p1", &proposals(&["a", "b"]));
    batch.decide("a", true);
    batch.decide("b", true);

    let executor = RecordingExecutor::new(true);
    let err = submit_batch(&mut batch, &executor).await.unwrap_err();
    assert!(err.to_string().contains("503"), "got: {err}");
    assert_eq!(batch.state(), SubmissionState::Failed);

    // Decisions in Failed are no-ops; only reopen restarts the cycle.
    assert_eq!(batch.decide("a", false), DecideOutcome::Ignored);
    assert!(batch.reopen());
    batch.decide("a", false);
    let outcome = batch.decide("b", true);
    assert!(matches!(outcome, DecideOutcome::Complete { .. }));

    submit_batch(&mut batch, &executor).await.unwrap();
    assert_eq!(batch.state(), SubmissionState::Submitted);
    let calls = executor.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].1, vec!["b".to_string()]);
}

#[test]
fn streaming_survives_reordered_text_events() {
    // "next" carries the full text, so even a stale event is simply
    // superseded by whatever arrives after it.
    init_tracing();
    let mut registry = UpdateRegistry::new();
    let consumer = StreamingConsumer::new("p1", "", Vec::new());
    consumer.attach(&mut registry);

    push(&mut registry, r#"{"post_id":"p1","next":"Hello! How"}"#);
    push(&mut registry, r#"{"post_id":"p1","next":"Hello"}"#);
    push(&mut registry, r#"{"post_id":"p1","next":"Hello! How are you?"}"#);
    assert_eq!(consumer.text(), "Hello! How are you?");
}
