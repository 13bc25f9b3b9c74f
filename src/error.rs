//! Unified error types for the streaming/approval core.

use crate::types::ToolStatus;
use std::fmt;

// ---------------------------------------------------------------------------
// TransitionError
// ---------------------------------------------------------------------------

/// A tool-call status transition not permitted by the status table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionError {
    /// Status the tool call currently holds.
    pub from: ToolStatus,
    /// Status the event attempted to move it to.
    pub to: ToolStatus,
}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid tool status transition: {:?} -> {:?}",
            self.from, self.to
        )
    }
}

impl std::error::Error for TransitionError {}

// ---------------------------------------------------------------------------
// EventError
// ---------------------------------------------------------------------------

/// Errors classifying a raw push event into a typed stream event.
#[derive(Debug)]
pub enum EventError {
    /// The `control` field carried a marker this client does not know.
    UnknownControl(String),
    /// The event fit no payload class (no text, no control, no tool status).
    Unclassifiable,
}

impl fmt::Display for EventError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownControl(marker) => write!(f, "unknown control marker: {marker}"),
            Self::Unclassifiable => write!(f, "push event carries no recognizable payload"),
        }
    }
}

impl std::error::Error for EventError {}

// ---------------------------------------------------------------------------
// SubmissionError
// ---------------------------------------------------------------------------

/// Errors from the bulk tool-execution submission.
#[derive(Debug)]
pub enum SubmissionError {
    /// Network / reqwest-level error.
    Http(reqwest::Error),
    /// Non-2xx status from the backend.
    Status(u16, String),
    /// The batch was not in a submittable state when `submit_batch` ran.
    NotReady,
}

impl fmt::Display for SubmissionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(e) => write!(f, "http: {e}"),
            Self::Status(code, body) => write!(f, "status {code}: {body}"),
            Self::NotReady => write!(f, "batch is not ready for submission"),
        }
    }
}

impl std::error::Error for SubmissionError {}

impl From<reqwest::Error> for SubmissionError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e)
    }
}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Errors when loading or parsing configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Toml(toml::de::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Toml(e) => write!(f, "toml: {e}"),
            Self::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml(e)
    }
}
