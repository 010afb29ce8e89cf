use serde::{Deserialize, Serialize};

use super::Message;

/// Reason why the generation finished
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ContentFilter,
}

/// Token usage statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl Usage {
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Response from an LLM provider, including locally computed cost and timing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    pub id: String,
    pub model: String,
    pub provider: String,
    pub message: Message,
    pub finish_reason: Option<FinishReason>,
    pub usage: Usage,
    /// Cost in micro-dollars, from the static pricing table
    pub cost_micros: i64,
    pub execution_time_ms: u64,
}

impl LlmResponse {
    pub fn new(
        id: impl Into<String>,
        model: impl Into<String>,
        provider: impl Into<String>,
        message: Message,
    ) -> Self {
        Self {
            id: id.into(),
            model: model.into(),
            provider: provider.into(),
            message,
            finish_reason: None,
            usage: Usage::default(),
            cost_micros: 0,
            execution_time_ms: 0,
        }
    }

    pub fn with_finish_reason(mut self, reason: FinishReason) -> Self {
        self.finish_reason = Some(reason);
        self
    }

    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = usage;
        self
    }

    pub fn with_cost_micros(mut self, cost_micros: i64) -> Self {
        self.cost_micros = cost_micros;
        self
    }

    pub fn with_execution_time_ms(mut self, execution_time_ms: u64) -> Self {
        self.execution_time_ms = execution_time_ms;
        self
    }

    pub fn content(&self) -> &str {
        self.message.content()
    }

    pub fn cost_usd(&self) -> f64 {
        self.cost_micros as f64 / 1_000_000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_calculation() {
        let usage = Usage::new(10, 20);
        assert_eq!(usage.total_tokens, 30);
    }

    #[test]
    fn test_response_content() {
        let response = LlmResponse::new(
            "id-123",
            "gpt-4o",
            "openai",
            Message::assistant("Hello!"),
        );

        assert_eq!(response.content(), "Hello!");
        assert_eq!(response.provider, "openai");
    }

    #[test]
    fn test_cost_conversion() {
        let response = LlmResponse::new("id", "m", "p", Message::assistant(""))
            .with_cost_micros(6000);

        assert_eq!(response.cost_usd(), 0.006);
    }
}
