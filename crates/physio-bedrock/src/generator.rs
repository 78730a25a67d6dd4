//! Text generation seam.
//!
//! Route handlers depend on [`TextGenerator`] so they can be exercised
//! without AWS; [`BedrockGenerator`] is the production implementation on
//! the Converse API.

use async_trait::async_trait;
use aws_sdk_bedrockruntime::Client;
use aws_sdk_bedrockruntime::types::{
    ContentBlock, ConversationRole, InferenceConfiguration, Message, SystemContentBlock,
};
use tracing::info;

use physio_core::models::usage::TokenCount;

use crate::error::BedrockError;
use crate::tokens;

/// Sampling limits for a suggestion call.
#[derive(Debug, Clone, Copy)]
pub struct GenerationParams {
    pub max_tokens: i32,
    pub temperature: f32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_tokens: 600,
            temperature: 0.3,
        }
    }
}

/// Raw model output before it is wrapped into a suggestion.
#[derive(Debug, Clone)]
pub struct Generation {
    pub text: String,
    pub tokens: TokenCount,
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        model_id: &str,
        system_prompt: &str,
        user_message: &str,
        params: GenerationParams,
    ) -> Result<Generation, BedrockError>;
}

pub struct BedrockGenerator {
    client: Client,
}

impl BedrockGenerator {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TextGenerator for BedrockGenerator {
    async fn generate(
        &self,
        model_id: &str,
        system_prompt: &str,
        user_message: &str,
        params: GenerationParams,
    ) -> Result<Generation, BedrockError> {
        let message = Message::builder()
            .role(ConversationRole::User)
            .content(ContentBlock::Text(user_message.to_string()))
            .build()
            .map_err(|e| BedrockError::Invocation(e.to_string()))?;

        info!(model_id, prompt_len = user_message.len(), "invoking converse");

        let response = self
            .client
            .converse()
            .model_id(model_id)
            .system(SystemContentBlock::Text(system_prompt.to_string()))
            .messages(message)
            .inference_config(
                InferenceConfiguration::builder()
                    .max_tokens(params.max_tokens)
                    .temperature(params.temperature)
                    .build(),
            )
            .send()
            .await
            .map_err(|e| BedrockError::Invocation(e.into_service_error().to_string()))?;

        let output_message = response
            .output()
            .and_then(|o| o.as_message().ok())
            .ok_or_else(|| BedrockError::ResponseParse("no message in response".to_string()))?;

        let text = output_message
            .content()
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("");

        let tokens = response
            .usage()
            .map(tokens::extract_token_usage)
            .unwrap_or_default();

        Ok(Generation { text, tokens })
    }
}
