use physio_core::models::usage::{ModelPricing, TokenCount, TokenUsage};

/// Extract token counts from a Bedrock Converse response.
pub fn extract_token_usage(usage: &aws_sdk_bedrockruntime::types::TokenUsage) -> TokenCount {
    TokenCount {
        input: usage.input_tokens.max(0) as u64,
        output: usage.output_tokens.max(0) as u64,
    }
}

/// Known model pricing (per million tokens). Approximate; update as AWS
/// pricing changes.
pub fn get_pricing(model_id: &str) -> Option<ModelPricing> {
    match model_id {
        id if id.contains("claude-opus-4") => Some(ModelPricing {
            input_per_million: 15.0,
            output_per_million: 75.0,
        }),
        id if id.contains("claude-sonnet-4") => Some(ModelPricing {
            input_per_million: 3.0,
            output_per_million: 15.0,
        }),
        id if id.contains("claude-3-5-haiku") || id.contains("claude-haiku") => Some(ModelPricing {
            input_per_million: 0.80,
            output_per_million: 4.0,
        }),
        _ => None,
    }
}

/// Price a token count; unknown models cost zero rather than failing the
/// request.
pub fn usage_for(model_id: &str, tokens: TokenCount) -> TokenUsage {
    match get_pricing(model_id) {
        Some(pricing) => pricing.usage(tokens),
        None => TokenUsage {
            tokens,
            cost_usd: 0.0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inference_profiles_resolve_to_family_pricing() {
        let pricing = get_pricing("us.anthropic.claude-sonnet-4-20250514-v1:0").unwrap();
        assert_eq!(pricing.input_per_million, 3.0);
        assert!(get_pricing("amazon.titan-text-express-v1").is_none());
    }

    #[test]
    fn unknown_model_is_free() {
        let usage = usage_for("mystery-model", TokenCount { input: 10, output: 10 });
        assert_eq!(usage.cost_usd, 0.0);
        assert_eq!(usage.tokens.total(), 20);
    }
}
