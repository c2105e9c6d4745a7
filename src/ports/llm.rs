//! LLM port used by the AI analysis path.

use std::error::Error;
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

/// Future returned by [`LlmClient::complete`], boxed so the client can live behind `dyn`.
pub type CompletionFuture<'a> = Pin<
    Box<dyn Future<Output = Result<CompletionResponse, Box<dyn Error + Send + Sync>>> + Send + 'a>,
>;

/// One analysis prompt: system instructions plus the description text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Model identifier, from `GLT_AI_MODEL`.
    pub model: String,
    /// System instructions, sent separately from the user prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    /// User message carrying the description and project context.
    pub prompt: String,
    /// Completion token cap.
    pub max_tokens: u32,
}

/// Raw model reply; `parse_analysis` turns the text into an analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Reply text, ideally a JSON analysis object.
    pub text: String,
    /// Tokens billed for the prompt.
    pub prompt_tokens: u32,
    /// Tokens billed for the reply.
    pub completion_tokens: u32,
}

/// Sends analysis prompts to a language model.
pub trait LlmClient: Send + Sync {
    /// Completes `request`.
    ///
    /// # Errors
    ///
    /// Returns an error if the model cannot be reached or rejects the call.
    fn complete(&self, request: &CompletionRequest) -> CompletionFuture<'_>;
}
