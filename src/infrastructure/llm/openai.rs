use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::http_client::HttpClientTrait;
use crate::domain::llm::pricing_for;
use crate::domain::{
    DomainError, FinishReason, LlmProvider, LlmRequest, LlmResponse, Message, MessageRole, Usage,
};

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";

/// OpenAI API provider
#[derive(Debug)]
pub struct OpenAiProvider<C: HttpClientTrait> {
    client: C,
    auth_header: String,
    base_url: String,
}

impl<C: HttpClientTrait> OpenAiProvider<C> {
    pub fn new(client: C, api_key: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_OPENAI_BASE_URL)
    }

    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let auth_header = format!("Bearer {}", api_key.into());
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            client,
            auth_header,
            base_url,
        }
    }

    fn chat_completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    fn models_url(&self) -> String {
        format!("{}/v1/models", self.base_url)
    }

    fn build_request(&self, model: &str, request: &LlmRequest) -> serde_json::Value {
        let messages: Vec<OpenAiMessage> = request
            .messages
            .iter()
            .map(OpenAiMessage::from_domain)
            .collect();

        let mut body = serde_json::json!({
            "model": model,
            "messages": messages,
        });

        if let Some(temp) = request.temperature {
            body["temperature"] = serde_json::json!(temp);
        }

        if let Some(max_tokens) = request.max_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }

        if let Some(top_p) = request.top_p {
            body["top_p"] = serde_json::json!(top_p);
        }

        if let Some(presence_penalty) = request.presence_penalty {
            body["presence_penalty"] = serde_json::json!(presence_penalty);
        }

        if let Some(frequency_penalty) = request.frequency_penalty {
            body["frequency_penalty"] = serde_json::json!(frequency_penalty);
        }

        body
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("Authorization", self.auth_header.as_str()),
            ("Content-Type", "application/json"),
        ]
    }

    fn parse_response(
        &self,
        model: &str,
        json: serde_json::Value,
        execution_time_ms: u64,
    ) -> Result<LlmResponse, DomainError> {
        let response: OpenAiResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::provider("openai", format!("Failed to parse response: {}", e))
        })?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::provider("openai", "No choices in response"))?;

        let message = Message::assistant(choice.message.content.unwrap_or_default());

        let usage = response
            .usage
            .map(|u| Usage::new(u.prompt_tokens, u.completion_tokens))
            .unwrap_or_default();
        let cost = pricing_for(model)
            .calculate_cost_micros(usage.prompt_tokens, usage.completion_tokens);

        let mut llm_response = LlmResponse::new(response.id, response.model, "openai", message)
            .with_usage(usage)
            .with_cost_micros(cost)
            .with_execution_time_ms(execution_time_ms);

        if let Some(reason) = choice.finish_reason {
            llm_response = llm_response.with_finish_reason(parse_finish_reason(&reason));
        }

        Ok(llm_response)
    }
}

#[async_trait]
impl<C: HttpClientTrait> LlmProvider for OpenAiProvider<C> {
    async fn execute(&self, model: &str, request: LlmRequest) -> Result<LlmResponse, DomainError> {
        let started = Instant::now();

        let url = self.chat_completions_url();
        let body = self.build_request(model, &request);
        let response = self.client.post_json(&url, self.headers(), &body).await?;

        self.parse_response(model, response, started.elapsed().as_millis() as u64)
    }

    async fn validate_api_key(&self) -> bool {
        match self.client.get_json(&self.models_url(), self.headers()).await {
            Ok(_) => true,
            Err(e) => {
                debug!("OpenAI API key validation failed: {}", e);
                false
            }
        }
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }

    fn available_models(&self) -> Vec<&'static str> {
        vec![
            "gpt-4o",
            "gpt-4o-mini",
            "gpt-4-turbo",
            "gpt-3.5-turbo",
        ]
    }
}

fn parse_finish_reason(reason: &str) -> FinishReason {
    match reason {
        "stop" => FinishReason::Stop,
        "length" => FinishReason::Length,
        "content_filter" => FinishReason::ContentFilter,
        _ => FinishReason::Stop,
    }
}

// OpenAI API types

#[derive(Debug, Serialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

impl OpenAiMessage {
    fn from_domain(message: &Message) -> Self {
        let role = match message.role {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        };

        Self {
            role: role.to_string(),
            content: message.content().to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    id: String,
    model: String,
    choices: Vec<OpenAiChoice>,
    usage: Option<OpenAiUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::llm::http_client::mock::MockHttpClient;

    const CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
    const MODELS_URL: &str = "https://api.openai.com/v1/models";

    fn chat_response() -> serde_json::Value {
        serde_json::json!({
            "id": "chatcmpl-123",
            "model": "gpt-4o",
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": "Hello! How can I help you?"
                },
                "finish_reason": "stop"
            }],
            "usage": {
                "prompt_tokens": 10,
                "completion_tokens": 8,
                "total_tokens": 18
            }
        })
    }

    #[tokio::test]
    async fn test_openai_execute() {
        let client = MockHttpClient::new().with_response(CHAT_URL, chat_response());
        let provider = OpenAiProvider::new(client, "test-api-key");

        let request = LlmRequest::builder().user("Hello!").build();
        let response = provider.execute("gpt-4o", request).await.unwrap();

        assert_eq!(response.id, "chatcmpl-123");
        assert_eq!(response.provider, "openai");
        assert_eq!(response.content(), "Hello! How can I help you?");
        assert_eq!(response.finish_reason, Some(FinishReason::Stop));
        assert_eq!(response.usage.prompt_tokens, 10);
        assert_eq!(response.usage.completion_tokens, 8);
        // 10 tokens at 5000 micros/1K + 8 tokens at 15000 micros/1K
        assert_eq!(response.cost_micros, 50 + 120);
    }

    #[tokio::test]
    async fn test_openai_unknown_model_still_costs() {
        let mut body = chat_response();
        body["model"] = serde_json::json!("gpt-99-preview");

        let client = MockHttpClient::new().with_response(CHAT_URL, body);
        let provider = OpenAiProvider::new(client, "test-api-key");

        let request = LlmRequest::builder().user("Hello!").build();
        let response = provider.execute("gpt-99-preview", request).await.unwrap();

        // Fallback pricing applies instead of an error
        assert_eq!(response.cost_micros, 10 + 16);
    }

    #[tokio::test]
    async fn test_openai_error_propagates() {
        let client = MockHttpClient::new().with_error(CHAT_URL, "HTTP 500: upstream down");
        let provider = OpenAiProvider::new(client, "test-api-key");

        let request = LlmRequest::builder().user("Hello!").build();
        let result = provider.execute("gpt-4o", request).await;

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("HTTP 500"));
    }

    #[tokio::test]
    async fn test_openai_validate_api_key_ok() {
        let client = MockHttpClient::new()
            .with_response(MODELS_URL, serde_json::json!({"data": []}));
        let provider = OpenAiProvider::new(client, "test-api-key");

        assert!(provider.validate_api_key().await);
    }

    #[tokio::test]
    async fn test_openai_validate_api_key_invalid() {
        let client = MockHttpClient::new().with_error(MODELS_URL, "HTTP 401: invalid key");
        let provider = OpenAiProvider::new(client, "bad-key");

        assert!(!provider.validate_api_key().await);
    }

    #[tokio::test]
    async fn test_openai_custom_base_url() {
        let custom_url = "http://localhost:8080/v1/chat/completions";
        let client = MockHttpClient::new().with_response(custom_url, chat_response());
        let provider = OpenAiProvider::with_base_url(client, "test-key", "http://localhost:8080");

        let request = LlmRequest::builder().user("Test").build();
        let response = provider.execute("gpt-4o", request).await.unwrap();

        assert_eq!(response.id, "chatcmpl-123");
    }
}
