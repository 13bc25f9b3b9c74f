//! Shared test fixtures for the routing/approval test modules.
//!
//! Tiny reusable helpers so individual test modules don't rebuild ad-hoc
//! temp-dir and wire-event fixture code.

use crate::types::ToolCall;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static TEST_DIR_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Temporary directory fixture with best-effort cleanup.
#[derive(Debug)]
pub struct TestTempDir {
    path: PathBuf,
}

impl TestTempDir {
    /// Create a unique temporary directory with a readable prefix.
    pub fn new(prefix: &str) -> Self {
        let suffix = TEST_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let dir = std::env::temp_dir().join(format!("streamgate-{prefix}-{millis}-{suffix}"));
        fs::create_dir_all(&dir).expect("failed to create temporary fixture directory");
        Self { path: dir }
    }

    /// Root directory path for this fixture.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Build a child path under the fixture root.
    pub fn child(&self, relative: &str) -> PathBuf {
        self.path.join(relative)
    }

    /// Write UTF-8 text to a child path, creating parent directories as needed.
    pub fn write_text(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.child(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent directories for fixture");
        }
        fs::write(&path, content).expect("failed to write fixture file");
        path
    }
}

impl Drop for TestTempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

/// Serialized text-update push event as the transport would send it.
pub fn text_event_json(post_id: &str, next: &str) -> String {
    json!({ "post_id": post_id, "next": next }).to_string()
}

/// Serialized end-of-stream push event.
pub fn end_event_json(post_id: &str) -> String {
    json!({ "post_id": post_id, "control": "end" }).to_string()
}

/// Serialized tool status push event.
pub fn tool_status_event_json(post_id: &str, tool_id: &str, status: &str) -> String {
    json!({ "post_id": post_id, "tool_id": tool_id, "status": status }).to_string()
}

/// A batch of pending tool-call proposals with sequential ids.
pub fn pending_proposals(ids: &[&str]) -> Vec<ToolCall> {
    ids.iter()
        .map(|id| ToolCall::pending(*id, "run_query", "Run a read-only query", "{}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_dir_fixture_writes_and_resolves_paths() {
        let fixture = TestTempDir::new("fixture");
        let file = fixture.write_text("nested/file.txt", "hello");
        assert_eq!(fs::read_to_string(file).unwrap(), "hello");
    }

    #[test]
    fn event_fixtures_round_trip_through_wire_types() {
        let raw: crate::types::PushEvent =
            serde_json::from_str(&text_event_json("p1", "Hi")).unwrap();
        assert_eq!(raw.next.as_deref(), Some("Hi"));

        let raw: crate::types::PushEvent =
            serde_json::from_str(&end_event_json("p1")).unwrap();
        assert_eq!(raw.control.as_deref(), Some("end"));

        let raw: crate::types::PushEvent =
            serde_json::from_str(&tool_status_event_json("p1", "t1", "accepted")).unwrap();
        assert_eq!(raw.tool_id.as_deref(), Some("t1"));
    }

    #[test]
    fn pending_proposals_are_all_pending() {
        let calls = pending_proposals(&["a", "b"]);
        assert_eq!(calls.len(), 2);
        assert!(calls
            .iter()
            .all(|c| c.status == crate::types::ToolStatus::Pending));
    }
}
