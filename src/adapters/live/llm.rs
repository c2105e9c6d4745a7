//! Live adapter for the `LlmClient` port using the Anthropic messages API.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::ports::llm::{CompletionFuture, CompletionRequest, CompletionResponse, LlmClient};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// LLM client that calls the Anthropic messages API.
pub struct LiveLlmClient {
    client: Client,
    api_key: Option<String>,
}

impl LiveLlmClient {
    /// Creates a client using `api_key`. Without a key every call fails
    /// before reaching the network.
    #[must_use]
    pub fn new(api_key: Option<String>) -> Self {
        Self { client: Client::new(), api_key }
    }
}

/// Request body sent to the Anthropic messages API.
#[derive(Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<AnthropicMessage<'a>>,
}

/// A single message in the Anthropic API request.
#[derive(Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Top-level response from the Anthropic messages API.
#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
    usage: Usage,
}

/// A content block in the Anthropic response.
#[derive(Deserialize)]
struct ContentBlock {
    text: String,
}

/// Token usage reported by the Anthropic API.
#[derive(Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

/// Error response from the Anthropic API.
#[derive(Deserialize)]
struct AnthropicError {
    error: AnthropicErrorDetail,
}

/// Detail inside an Anthropic error response.
#[derive(Deserialize)]
struct AnthropicErrorDetail {
    message: String,
}

impl LlmClient for LiveLlmClient {
    fn complete(&self, request: &CompletionRequest) -> CompletionFuture<'_> {
        let request = request.clone();

        Box::pin(async move {
            let api_key = self.api_key.as_deref().ok_or_else(
                || -> Box<dyn std::error::Error + Send + Sync> { "ANTHROPIC_API_KEY is not set".into() },
            )?;

            let body = AnthropicRequest {
                model: &request.model,
                max_tokens: request.max_tokens,
                system: request.system.as_deref(),
                messages: vec![AnthropicMessage { role: "user", content: &request.prompt }],
            };

            let response = self
                .client
                .post(ANTHROPIC_API_URL)
                .header("x-api-key", api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .json(&body)
                .send()
                .await
                .map_err(|e| -> Box<dyn std::error::Error + Send + Sync> {
                    format!("Anthropic API request failed: {e}").into()
                })?;

            let status = response.status();
            let response_text =
                response.text().await.map_err(|e| -> Box<dyn std::error::Error + Send + Sync> {
                    format!("Failed to read Anthropic API response: {e}").into()
                })?;

            if !status.is_success() {
                let msg = serde_json::from_str::<AnthropicError>(&response_text)
                    .map(|e| e.error.message)
                    .unwrap_or(response_text);
                return Err(format!("Anthropic API error ({}): {msg}", status.as_u16()).into());
            }

            let api_response: AnthropicResponse = serde_json::from_str(&response_text).map_err(
                |e| -> Box<dyn std::error::Error + Send + Sync> {
                    format!("Failed to parse Anthropic API response: {e}").into()
                },
            )?;

            let text = api_response.content.into_iter().map(|block| block.text).collect::<String>();

            Ok(CompletionResponse {
                text,
                prompt_tokens: api_response.usage.input_tokens,
                completion_tokens: api_response.usage.output_tokens,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_carries_system_prompt_only_when_set() {
        let with = AnthropicRequest {
            model: "m",
            max_tokens: 10,
            system: Some("be terse"),
            messages: vec![AnthropicMessage { role: "user", content: "hi" }],
        };
        let json = serde_json::to_value(&with).unwrap();
        assert_eq!(json["system"], "be terse");
        assert_eq!(json["messages"][0]["role"], "user");

        let without = AnthropicRequest { system: None, ..with };
        assert!(serde_json::to_value(&without).unwrap().get("system").is_none());
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_request() {
        let client = LiveLlmClient::new(None);
        let request = CompletionRequest {
            model: "m".into(),
            system: None,
            prompt: "hi".into(),
            max_tokens: 10,
        };
        let err = client.complete(&request).await.unwrap_err();
        assert_eq!(err.to_string(), "ANTHROPIC_API_KEY is not set");
    }
}
