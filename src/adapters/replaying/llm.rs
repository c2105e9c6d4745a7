//! Replaying adapter for the `LlmClient` port.

use super::{next_output, replay_result, SharedReplayer};
use crate::ports::{CompletionFuture, CompletionRequest, CompletionResponse, LlmClient};

/// Serves recorded LLM completions.
pub struct ReplayingLlmClient {
    replayer: SharedReplayer,
}

impl ReplayingLlmClient {
    /// Creates a client reading from `replayer`.
    #[must_use]
    pub fn new(replayer: SharedReplayer) -> Self {
        Self { replayer }
    }
}

impl LlmClient for ReplayingLlmClient {
    fn complete(&self, _request: &CompletionRequest) -> CompletionFuture<'_> {
        let output = next_output(&self.replayer, "llm", "complete");
        Box::pin(async move { replay_result::<CompletionResponse>(output) })
    }
}
