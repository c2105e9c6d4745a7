//! AI-assisted task breakdown.
//!
//! The model is asked for a JSON breakdown of the description; whatever
//! comes back is parsed into an [`AiAnalysis`] and mapped to task specs by
//! [`tasks_from_analysis`]. The pattern pipeline never depends on this path.

mod analysis;
mod mapping;
mod prompt;

use std::error::Error;

use tracing::debug;

pub use analysis::{parse_analysis, AiAnalysis, SuggestedTask, TEXT_FALLBACK_SUMMARY};
pub use mapping::tasks_from_analysis;
pub use prompt::{build_prompt, SYSTEM_PROMPT};

use crate::extract::ProjectContext;
use crate::ports::{CompletionRequest, LlmClient};

/// Token budget for the breakdown reply.
pub const AI_MAX_TOKENS: u32 = 2000;
/// Confidence assigned to every analysis the model returns.
pub const AI_CONFIDENCE: f64 = 0.9;

/// Asks `llm` to break `description` down into tasks.
///
/// # Errors
///
/// Returns the client's error if the completion request fails. An
/// unparseable reply is not an error; it goes through the text fallback.
pub async fn analyze_with_llm(
    llm: &dyn LlmClient,
    model: &str,
    description: &str,
    context: Option<&ProjectContext>,
) -> Result<AiAnalysis, Box<dyn Error + Send + Sync>> {
    let request = CompletionRequest {
        model: model.to_string(),
        system: Some(SYSTEM_PROMPT.to_string()),
        prompt: build_prompt(description, context),
        max_tokens: AI_MAX_TOKENS,
    };
    let response = llm.complete(&request).await?;
    debug!(
        prompt_tokens = response.prompt_tokens,
        completion_tokens = response.completion_tokens,
        "AI analysis received"
    );

    let mut analysis = parse_analysis(&response.text);
    analysis.ai_model = model.to_string();
    analysis.confidence_score = AI_CONFIDENCE;
    Ok(analysis)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::ports::{CompletionFuture, CompletionResponse};

    struct CannedLlm {
        reply: Result<String, String>,
        seen: Mutex<Vec<CompletionRequest>>,
    }

    impl LlmClient for CannedLlm {
        fn complete(&self, request: &CompletionRequest) -> CompletionFuture<'_> {
            self.seen.lock().unwrap().push(request.clone());
            let reply = self.reply.clone();
            Box::pin(async move {
                let text = reply?;
                Ok(CompletionResponse { text, prompt_tokens: 10, completion_tokens: 20 })
            })
        }
    }

    #[tokio::test]
    async fn sets_model_confidence_and_system_prompt() {
        let llm = CannedLlm {
            reply: Ok(r#"{"summary": "s", "suggested_tasks": [{"title": "Do it"}]}"#.into()),
            seen: Mutex::new(Vec::new()),
        };
        let analysis = analyze_with_llm(&llm, "test-model", "Do it", None).await.unwrap();
        assert_eq!(analysis.ai_model, "test-model");
        assert!((analysis.confidence_score - AI_CONFIDENCE).abs() < f64::EPSILON);
        assert_eq!(analysis.suggested_tasks.len(), 1);

        let seen = llm.seen.lock().unwrap();
        assert_eq!(seen[0].max_tokens, AI_MAX_TOKENS);
        assert_eq!(seen[0].system.as_deref(), Some(SYSTEM_PROMPT));
    }

    #[tokio::test]
    async fn client_errors_propagate() {
        let llm = CannedLlm { reply: Err("rate limited".into()), seen: Mutex::new(Vec::new()) };
        let err = analyze_with_llm(&llm, "m", "Do it", None).await.unwrap_err();
        assert_eq!(err.to_string(), "rate limited");
    }
}
