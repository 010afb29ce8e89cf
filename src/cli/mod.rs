//! Command-line interface

pub mod check_keys;
pub mod run;
pub mod validate;

use std::collections::HashMap;
use std::env;

use clap::{Parser, Subcommand};

use crate::infrastructure::llm::ProviderConfig;

#[derive(Debug, Parser)]
#[command(name = "chaincanvas", about = "Execute visually composed LLM chains")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Execute a workflow against the configured providers
    Run(run::RunArgs),

    /// Check a workflow's graph shape without executing it
    Validate(validate::ValidateArgs),

    /// Verify the configured provider API keys
    CheckKeys,
}

/// Provider configurations from the environment: one entry per vendor
/// whose API key is set.
pub(crate) fn provider_configs_from_env() -> HashMap<String, ProviderConfig> {
    let mut configs = HashMap::new();

    if let Ok(api_key) = env::var("OPENAI_API_KEY") {
        let mut config = ProviderConfig::new(api_key);
        if let Ok(base_url) = env::var("OPENAI_BASE_URL") {
            config = config.with_base_url(base_url);
        }
        configs.insert("openai".to_string(), config);
    }

    if let Ok(api_key) = env::var("ANTHROPIC_API_KEY") {
        let mut config = ProviderConfig::new(api_key);
        if let Ok(base_url) = env::var("ANTHROPIC_BASE_URL") {
            config = config.with_base_url(base_url);
        }
        configs.insert("anthropic".to_string(), config);
    }

    configs
}
