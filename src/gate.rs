//! Submission gate: the single bulk "execute approved tool calls" request.
//!
//! The gate sits between a completed [`ApprovalBatch`] and the backend tool
//! executor. Submission acknowledgement and tool execution results are two
//! decoupled signals: a 2xx here only means the backend accepted the batch;
//! per-tool outcomes arrive later as status events through the update
//! registry.

use crate::approval::{ApprovalBatch, SubmissionState};
use crate::config::Config;
use crate::error::SubmissionError;
use crate::types::SubmitToolsRequest;
use async_trait::async_trait;
use std::time::Duration;

/// Backend collaborator that executes an approved batch of tool calls.
///
/// The trait seam keeps the aggregator/gate logic testable without a live
/// backend; tests supply a recording mock.
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    /// Submit the approved tool ids for `post_id` as one bulk request.
    async fn execute_tools(
        &self,
        post_id: &str,
        actions: &[String],
    ) -> Result<(), SubmissionError>;
}

/// HTTP implementation of [`ToolExecutor`] against the plugin REST API.
pub struct HttpToolExecutor {
    client: reqwest::Client,
    api_base: String,
    auth_token: Option<String>,
}

impl HttpToolExecutor {
    /// Build an executor from configuration.
    pub fn from_config(config: &Config) -> Result<Self, SubmissionError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            auth_token: config.auth_token.clone(),
        })
    }
}

#[async_trait]
impl ToolExecutor for HttpToolExecutor {
    async fn execute_tools(
        &self,
        post_id: &str,
        actions: &[String],
    ) -> Result<(), SubmissionError> {
        let url = format!("{}/posts/{post_id}/tools", self.api_base);
        let body = SubmitToolsRequest {
            actions: actions.to_vec(),
        };
        let mut request = self.client.post(&url).json(&body);
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(SubmissionError::Status(status.as_u16(), body))
        }
    }
}

/// Perform the one submission a completed batch is entitled to.
///
/// Requires the batch to be in `Submitting` (the state `decide` leaves it in
/// when completeness fires); any other state yields `NotReady`, which also
/// blocks a second submission of an already-submitted batch. On success the
/// batch becomes `Submitted`; on failure it becomes `Failed` and the error
/// propagates to the caller for display. No automatic retry.
pub async fn submit_batch(
    batch: &mut ApprovalBatch,
    executor: &dyn ToolExecutor,
) -> Result<(), SubmissionError> {
    if batch.state() != SubmissionState::Submitting {
        return Err(SubmissionError::NotReady);
    }
    match executor.execute_tools(batch.post_id(), batch.approved()).await {
        Ok(()) => {
            batch.mark_submitted();
            Ok(())
        }
        Err(e) => {
            tracing::debug!(post_id = %batch.post_id(), "tool submission failed: {e}");
            batch.mark_failed();
            Err(e)
        }
    }
}
