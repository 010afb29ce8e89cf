use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::http_client::HttpClientTrait;
use crate::domain::llm::pricing_for;
use crate::domain::{
    DomainError, FinishReason, LlmProvider, LlmRequest, LlmResponse, Message, MessageRole, Usage,
};

const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Model used for the minimal key-validation call
const KEY_CHECK_MODEL: &str = "claude-3-5-haiku-20241022";

/// Anthropic API provider
#[derive(Debug)]
pub struct AnthropicProvider<C: HttpClientTrait> {
    client: C,
    api_key: String,
    base_url: String,
}

impl<C: HttpClientTrait> AnthropicProvider<C> {
    pub fn new(client: C, api_key: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_ANTHROPIC_BASE_URL)
    }

    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            client,
            api_key: api_key.into(),
            base_url,
        }
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.base_url)
    }

    fn build_request(&self, model: &str, request: &LlmRequest) -> serde_json::Value {
        let (system, messages) = self.split_system_messages(&request.messages);

        let anthropic_messages: Vec<AnthropicMessage> = messages
            .iter()
            .map(|m| AnthropicMessage::from_domain(m))
            .collect();

        let mut body = serde_json::json!({
            "model": model,
            "messages": anthropic_messages,
            "max_tokens": request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        });

        if let Some(system_content) = system {
            body["system"] = serde_json::json!(system_content);
        }

        if let Some(temp) = request.temperature {
            body["temperature"] = serde_json::json!(temp);
        }

        if let Some(top_p) = request.top_p {
            body["top_p"] = serde_json::json!(top_p);
        }

        body
    }

    fn split_system_messages<'a>(
        &self,
        messages: &'a [Message],
    ) -> (Option<String>, Vec<&'a Message>) {
        let mut system_content = String::new();
        let mut other_messages = Vec::new();

        for msg in messages {
            if msg.role == MessageRole::System {
                if !system_content.is_empty() {
                    system_content.push('\n');
                }
                system_content.push_str(msg.content());
            } else {
                other_messages.push(msg);
            }
        }

        let system = if system_content.is_empty() {
            None
        } else {
            Some(system_content)
        };

        (system, other_messages)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("x-api-key", self.api_key.as_str()),
            ("anthropic-version", ANTHROPIC_VERSION),
            ("Content-Type", "application/json"),
        ]
    }

    fn parse_response(
        &self,
        model: &str,
        json: serde_json::Value,
        execution_time_ms: u64,
    ) -> Result<LlmResponse, DomainError> {
        let response: AnthropicResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::provider("anthropic", format!("Failed to parse response: {}", e))
        })?;

        let content = response
            .content
            .into_iter()
            .filter_map(|block| {
                if block.content_type == "text" {
                    block.text
                } else {
                    None
                }
            })
            .collect::<Vec<_>>()
            .join("");

        let usage = Usage::new(response.usage.input_tokens, response.usage.output_tokens);
        let cost = pricing_for(model)
            .calculate_cost_micros(usage.prompt_tokens, usage.completion_tokens);

        let llm_response = LlmResponse::new(
            response.id,
            response.model,
            "anthropic",
            Message::assistant(content),
        )
        .with_finish_reason(parse_stop_reason(&response.stop_reason))
        .with_usage(usage)
        .with_cost_micros(cost)
        .with_execution_time_ms(execution_time_ms);

        Ok(llm_response)
    }
}

#[async_trait]
impl<C: HttpClientTrait> LlmProvider for AnthropicProvider<C> {
    async fn execute(&self, model: &str, request: LlmRequest) -> Result<LlmResponse, DomainError> {
        let started = Instant::now();

        let url = self.messages_url();
        let body = self.build_request(model, &request);
        let response = self.client.post_json(&url, self.headers(), &body).await?;

        self.parse_response(model, response, started.elapsed().as_millis() as u64)
    }

    async fn validate_api_key(&self) -> bool {
        let body = serde_json::json!({
            "model": KEY_CHECK_MODEL,
            "max_tokens": 1,
            "messages": [{"role": "user", "content": "ping"}],
        });

        match self
            .client
            .post_json(&self.messages_url(), self.headers(), &body)
            .await
        {
            Ok(_) => true,
            Err(e) => {
                debug!("Anthropic API key validation failed: {}", e);
                false
            }
        }
    }

    fn provider_name(&self) -> &'static str {
        "anthropic"
    }

    fn available_models(&self) -> Vec<&'static str> {
        vec![
            "claude-3-5-sonnet-20241022",
            "claude-3-5-haiku-20241022",
            "claude-3-opus-20240229",
        ]
    }
}

fn parse_stop_reason(reason: &Option<String>) -> FinishReason {
    match reason.as_deref() {
        Some("end_turn") | Some("stop_sequence") => FinishReason::Stop,
        Some("max_tokens") => FinishReason::Length,
        _ => FinishReason::Stop,
    }
}

// Anthropic API types

#[derive(Debug, Serialize)]
struct AnthropicMessage {
    role: String,
    content: String,
}

impl AnthropicMessage {
    fn from_domain(message: &Message) -> Self {
        let role = match message.role {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
            MessageRole::System => "user", // System handled separately
        };

        Self {
            role: role.to_string(),
            content: message.content().to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    id: String,
    model: String,
    content: Vec<ContentBlock>,
    stop_reason: Option<String>,
    usage: AnthropicUsage,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    input_tokens: u32,
    output_tokens: u32,
}
