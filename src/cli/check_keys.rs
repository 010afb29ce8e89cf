use crate::infrastructure::llm::{LlmProviderFactory, ProviderFactory};

pub async fn run() -> anyhow::Result<()> {
    let configs = super::provider_configs_from_env();
    if configs.is_empty() {
        anyhow::bail!(
            "No provider API keys configured; set OPENAI_API_KEY and/or ANTHROPIC_API_KEY"
        );
    }

    let factory = LlmProviderFactory::new();
    let mut any_invalid = false;

    for (provider_id, config) in &configs {
        let provider = factory.create(provider_id, config)?;
        let valid = provider.validate_api_key().await;

        println!(
            "{}: {}",
            provider_id,
            if valid { "valid" } else { "invalid" }
        );
        any_invalid |= !valid;
    }

    if any_invalid {
        anyhow::bail!("One or more provider API keys failed validation");
    }

    Ok(())
}
