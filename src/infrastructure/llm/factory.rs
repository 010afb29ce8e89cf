use std::fmt::Debug;
use std::sync::Arc;

use serde::Deserialize;

use super::http_client::HttpClient;
use super::{AnthropicProvider, OpenAiProvider};
use crate::domain::{DomainError, LlmProvider};

/// Caller-supplied configuration for one provider
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    pub api_key: String,
    #[serde(default)]
    pub base_url: Option<String>,
}

impl ProviderConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}

/// Maps a provider id to a configured provider instance
pub trait ProviderFactory: Send + Sync + Debug {
    fn create(
        &self,
        provider_id: &str,
        config: &ProviderConfig,
    ) -> Result<Arc<dyn LlmProvider>, DomainError>;
}

/// Factory for the real vendor providers
#[derive(Debug, Default)]
pub struct LlmProviderFactory;

impl LlmProviderFactory {
    pub fn new() -> Self {
        Self
    }
}

impl ProviderFactory for LlmProviderFactory {
    fn create(
        &self,
        provider_id: &str,
        config: &ProviderConfig,
    ) -> Result<Arc<dyn LlmProvider>, DomainError> {
        let client = HttpClient::new();

        match provider_id {
            "openai" => Ok(match &config.base_url {
                Some(base_url) => Arc::new(OpenAiProvider::with_base_url(
                    client,
                    &config.api_key,
                    base_url,
                )),
                None => Arc::new(OpenAiProvider::new(client, &config.api_key)),
            }),

            "anthropic" => Ok(match &config.base_url {
                Some(base_url) => Arc::new(AnthropicProvider::with_base_url(
                    client,
                    &config.api_key,
                    base_url,
                )),
                None => Arc::new(AnthropicProvider::new(client, &config.api_key)),
            }),

            other => Err(DomainError::configuration(format!(
                "Unsupported provider '{}'",
                other
            ))),
        }
    }
}
