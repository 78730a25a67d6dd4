use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use physio_core::models::transaction::{TransactionKind, TransactionStatus};
use physio_core::models::usage::TokenUsage;
use physio_findings::AnalysisResult;

use crate::error::BedrockError;
use crate::generator::{GenerationParams, TextGenerator};
use crate::prompt::SuggestionPrompt;
use crate::tokens;

/// A generated suggestion, before it is persisted as a transaction.
#[derive(Debug, Clone, Serialize)]
pub struct SuggestionResult {
    pub id: Uuid,
    pub kind: TransactionKind,
    pub model_id: String,
    pub usage: TokenUsage,
    pub status: TransactionStatus,
    pub text: String,
    pub analysis: AnalysisResult,
}

/// Run a prepared prompt through the generator.
///
/// The reply is trimmed; a blank reply is an error rather than an empty
/// suggestion.
pub async fn generate(
    generator: &dyn TextGenerator,
    model_id: &str,
    kind: TransactionKind,
    prompt: SuggestionPrompt,
    params: GenerationParams,
) -> Result<SuggestionResult, BedrockError> {
    let id = Uuid::new_v4();
    info!(
        transaction_id = %id,
        model = model_id,
        kind = ?kind,
        focus = %prompt.analysis.priority_focus,
        "starting suggestion"
    );

    let generation = generator
        .generate(model_id, &prompt.system, &prompt.user, params)
        .await?;

    let text = generation.text.trim().to_string();
    if text.is_empty() {
        warn!(transaction_id = %id, "model returned an empty suggestion");
        return Err(BedrockError::EmptyResponse);
    }

    let usage = tokens::usage_for(model_id, generation.tokens);
    info!(
        transaction_id = %id,
        input_tokens = usage.tokens.input,
        output_tokens = usage.tokens.output,
        cost_usd = usage.cost_usd,
        "suggestion complete"
    );

    Ok(SuggestionResult {
        id,
        kind,
        model_id: model_id.to_string(),
        usage,
        status: TransactionStatus::Complete,
        text,
        analysis: prompt.analysis,
    })
}
