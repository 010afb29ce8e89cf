//! LLM provider implementations and per-execution registry

pub mod anthropic;
pub mod factory;
pub mod http_client;
pub mod openai;
pub mod registry;

pub use anthropic::AnthropicProvider;
pub use factory::{LlmProviderFactory, ProviderConfig, ProviderFactory};
pub use http_client::{HttpClient, HttpClientTrait};
pub use openai::OpenAiProvider;
pub use registry::ProviderRegistry;
