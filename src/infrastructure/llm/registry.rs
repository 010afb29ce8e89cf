//! Request-scoped provider registry
//!
//! A fresh registry is built at the top of every execution from the
//! caller-supplied key map and discarded when the call returns, so
//! concurrent executions never observe each other's registrations.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::factory::{ProviderConfig, ProviderFactory};
use crate::domain::{DomainError, LlmProvider};

#[derive(Debug, Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn LlmProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self {
            providers: HashMap::new(),
        }
    }

    /// Build a registry from a provider-id → config map
    pub fn from_configs(
        factory: &dyn ProviderFactory,
        configs: &HashMap<String, ProviderConfig>,
    ) -> Result<Self, DomainError> {
        let mut registry = Self::new();

        for (provider_id, config) in configs {
            let provider = factory.create(provider_id, config)?;
            registry.register(provider_id, provider);
        }

        Ok(registry)
    }

    /// Store a configured provider, replacing any prior registration
    pub fn register(&mut self, provider_id: impl Into<String>, provider: Arc<dyn LlmProvider>) {
        let provider_id = provider_id.into();
        if self.providers.insert(provider_id.clone(), provider).is_some() {
            debug!("Replaced provider registration for '{}'", provider_id);
        }
    }

    /// Look up a provider; fails when the caller supplied no key for it
    pub fn get(&self, provider_id: &str) -> Result<Arc<dyn LlmProvider>, DomainError> {
        self.providers.get(provider_id).cloned().ok_or_else(|| {
            DomainError::configuration(format!(
                "Provider '{}' is not registered for this execution",
                provider_id
            ))
        })
    }

    pub fn provider_ids(&self) -> Vec<&str> {
        self.providers.keys().map(String::as_str).collect()
    }
}
