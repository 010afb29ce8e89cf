//! Static model pricing table

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

static DEFAULT_PRICING: Lazy<HashMap<String, ModelPricing>> = Lazy::new(default_model_pricing);

/// Pricing configuration for a model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelPricing {
    /// Model ID this pricing applies to
    pub model_id: String,
    /// Provider name
    pub provider: String,
    /// Price per 1K input tokens in micro-dollars
    pub input_price_per_1k_micros: i64,
    /// Price per 1K output tokens in micro-dollars
    pub output_price_per_1k_micros: i64,
}

impl ModelPricing {
    /// Create new model pricing from USD prices per 1K tokens
    pub fn new(
        model_id: impl Into<String>,
        provider: impl Into<String>,
        input_per_1k: f64,
        output_per_1k: f64,
    ) -> Self {
        Self {
            model_id: model_id.into(),
            provider: provider.into(),
            input_price_per_1k_micros: (input_per_1k * 1_000_000.0) as i64,
            output_price_per_1k_micros: (output_per_1k * 1_000_000.0) as i64,
        }
    }

    /// Get input price per 1K tokens in USD
    pub fn input_price_per_1k(&self) -> f64 {
        self.input_price_per_1k_micros as f64 / 1_000_000.0
    }

    /// Get output price per 1K tokens in USD
    pub fn output_price_per_1k(&self) -> f64 {
        self.output_price_per_1k_micros as f64 / 1_000_000.0
    }

    /// Calculate cost for given token counts, in micro-dollars
    pub fn calculate_cost_micros(&self, input_tokens: u32, output_tokens: u32) -> i64 {
        let input_cost = (input_tokens as i64 * self.input_price_per_1k_micros) / 1000;
        let output_cost = (output_tokens as i64 * self.output_price_per_1k_micros) / 1000;

        input_cost + output_cost
    }

    /// Calculate cost in USD
    pub fn calculate_cost_usd(&self, input_tokens: u32, output_tokens: u32) -> f64 {
        self.calculate_cost_micros(input_tokens, output_tokens) as f64 / 1_000_000.0
    }
}

/// Pricing for a model, falling back to a default entry for unknown models
pub fn pricing_for(model: &str) -> ModelPricing {
    DEFAULT_PRICING
        .get(model)
        .cloned()
        .unwrap_or_else(|| ModelPricing::new(model, "unknown", 0.001, 0.002))
}

/// Default pricing for common models
pub fn default_model_pricing() -> HashMap<String, ModelPricing> {
    let mut pricing = HashMap::new();

    pricing.insert(
        "gpt-4o".to_string(),
        ModelPricing::new("gpt-4o", "openai", 0.005, 0.015),
    );

    pricing.insert(
        "gpt-4o-mini".to_string(),
        ModelPricing::new("gpt-4o-mini", "openai", 0.00015, 0.0006),
    );

    pricing.insert(
        "gpt-4-turbo".to_string(),
        ModelPricing::new("gpt-4-turbo", "openai", 0.01, 0.03),
    );

    pricing.insert(
        "gpt-3.5-turbo".to_string(),
        ModelPricing::new("gpt-3.5-turbo", "openai", 0.0005, 0.0015),
    );

    pricing.insert(
        "claude-3-5-sonnet-20241022".to_string(),
        ModelPricing::new("claude-3-5-sonnet-20241022", "anthropic", 0.003, 0.015),
    );

    pricing.insert(
        "claude-3-5-haiku-20241022".to_string(),
        ModelPricing::new("claude-3-5-haiku-20241022", "anthropic", 0.0008, 0.004),
    );

    pricing.insert(
        "claude-3-opus-20240229".to_string(),
        ModelPricing::new("claude-3-opus-20240229", "anthropic", 0.015, 0.075),
    );

    pricing
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_pricing_creation() {
        let pricing = ModelPricing::new("gpt-4o", "openai", 0.03, 0.06);

        assert_eq!(pricing.model_id, "gpt-4o");
        assert_eq!(pricing.provider, "openai");
        assert!((pricing.input_price_per_1k() - 0.03).abs() < 0.0001);
        assert!((pricing.output_price_per_1k() - 0.06).abs() < 0.0001);
    }

    #[test]
    fn test_calculate_cost() {
        let pricing = ModelPricing::new("gpt-4o", "openai", 0.03, 0.06);

        // 1000 input + 500 output
        // Cost = (1000 * 0.03 / 1000) + (500 * 0.06 / 1000) = 0.03 + 0.03 = 0.06
        let cost = pricing.calculate_cost_usd(1000, 500);
        assert!((cost - 0.06).abs() < 0.0001);
    }

    #[test]
    fn test_cost_micros_exact() {
        let pricing = ModelPricing::new("gpt-4o", "openai", 0.005, 0.015);

        // 10 input tokens at 5000 micros/1K + 8 output at 15000 micros/1K
        assert_eq!(pricing.calculate_cost_micros(10, 8), 50 + 120);
    }

    #[test]
    fn test_known_model_lookup() {
        let pricing = pricing_for("claude-3-5-sonnet-20241022");
        assert_eq!(pricing.provider, "anthropic");
        assert!((pricing.input_price_per_1k() - 0.003).abs() < 0.0001);
    }

    #[test]
    fn test_unknown_model_fallback() {
        let pricing = pricing_for("some-future-model");

        assert_eq!(pricing.model_id, "some-future-model");
        assert_eq!(pricing.provider, "unknown");
        assert!(pricing.calculate_cost_micros(1000, 1000) > 0);
    }

    #[test]
    fn test_default_pricing() {
        let pricing = default_model_pricing();

        assert!(pricing.contains_key("gpt-4o"));
        assert!(pricing.contains_key("gpt-4o-mini"));
        assert!(pricing.contains_key("claude-3-5-sonnet-20241022"));
    }
}
