use async_trait::async_trait;
use std::fmt::Debug;

use super::{LlmRequest, LlmResponse};
use crate::domain::DomainError;

/// Trait for LLM providers (OpenAI, Anthropic, etc.)
#[async_trait]
pub trait LlmProvider: Send + Sync + Debug {
    /// Execute one generation request against the vendor API
    async fn execute(&self, model: &str, request: LlmRequest) -> Result<LlmResponse, DomainError>;

    /// Check whether the configured API key is accepted by the vendor.
    /// Never errors; any failure reports as `false`.
    async fn validate_api_key(&self) -> bool;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;

    /// List available models for this provider
    fn available_models(&self) -> Vec<&'static str>;
}
