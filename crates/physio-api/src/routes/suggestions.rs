use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use physio_bedrock::prompt::{
    DEFAULT_SYSTEM_PROMPT, FieldTarget, SuggestionPrompt, build_diagnosis_prompt, build_field_prompt,
};
use physio_bedrock::suggest;
use physio_core::keys;
use physio_core::models::assessment::AssessmentStep;
use physio_core::models::transaction::{AiTransaction, TransactionKind, TransactionStatus};
use physio_core::models::usage::TokenUsage;
use physio_findings::AnalysisResult;
use physio_storage::documents;

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::routes::assessments::load_form;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SuggestRequest {
    pub field: String,
    /// Page the field is on. Defaults to the first page declaring the field.
    #[serde(default)]
    pub step: Option<AssessmentStep>,
    /// Unsaved values from the page being edited.
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

#[derive(Serialize)]
pub struct SuggestResponse {
    pub transaction_id: Uuid,
    pub text: String,
    pub priority_focus: String,
    pub usage: TokenUsage,
    pub analysis: AnalysisResult,
}

/// Suggest text for one form field, steered by the findings so far.
pub async fn suggest_field(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((patient_id, id)): Path<(Uuid, Uuid)>,
    Json(req): Json<SuggestRequest>,
) -> Result<Json<SuggestResponse>, ApiError> {
    let field = req.field.trim();
    if field.is_empty() {
        return Err(ApiError::BadRequest("field is required".to_string()));
    }
    let step = match req.step {
        Some(step) => step,
        None => AssessmentStep::ALL
            .into_iter()
            .find(|s| s.field_names().contains(&field))
            .ok_or_else(|| ApiError::BadRequest(format!("step is required for field {field}")))?,
    };

    let (patient, mut form) = load_form(&state, &user, patient_id, id).await?;
    form.overlay_step(step, &req.fields);

    let system = system_prompt(&state).await?;
    let prompt = build_field_prompt(&system, &patient, &form, FieldTarget { step, field });

    let call = AiCall {
        kind: TransactionKind::FieldSuggestion,
        patient_id,
        assessment_id: id,
        field: Some(field.to_string()),
    };
    run(&state, &user, call, prompt).await.map(Json)
}

/// Suggest a provisional diagnosis from the whole saved form.
pub async fn suggest_diagnosis(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((patient_id, id)): Path<(Uuid, Uuid)>,
) -> Result<Json<SuggestResponse>, ApiError> {
    let (patient, form) = load_form(&state, &user, patient_id, id).await?;

    let system = system_prompt(&state).await?;
    let prompt = build_diagnosis_prompt(&system, &patient, &form);

    let call = AiCall {
        kind: TransactionKind::ProvisionalDiagnosis,
        patient_id,
        assessment_id: id,
        field: None,
    };
    run(&state, &user, call, prompt).await.map(Json)
}

/// The operator's stored system prompt, or the built-in one.
async fn system_prompt(state: &AppState) -> Result<String, ApiError> {
    match state.store.get(keys::SYSTEM_PROMPT).await {
        Ok(body) => {
            let text = String::from_utf8_lossy(&body).trim().to_string();
            if text.is_empty() {
                return Ok(DEFAULT_SYSTEM_PROMPT.to_string());
            }
            debug!("using stored system prompt");
            Ok(text)
        }
        Err(physio_storage::error::StorageError::NotFound { .. }) => {
            Ok(DEFAULT_SYSTEM_PROMPT.to_string())
        }
        Err(e) => Err(e.into()),
    }
}

struct AiCall {
    kind: TransactionKind,
    patient_id: Uuid,
    assessment_id: Uuid,
    field: Option<String>,
}

/// Generate, then record the call as a transaction whether or not it
/// succeeded.
async fn run(
    state: &AppState,
    user: &AuthUser,
    call: AiCall,
    prompt: SuggestionPrompt,
) -> Result<SuggestResponse, ApiError> {
    let priority_focus = prompt.analysis.priority_focus.label().to_string();

    let outcome = suggest::generate(
        &*state.generator,
        &state.model_id,
        call.kind,
        prompt,
        state.generation,
    )
    .await;

    let mut transaction = AiTransaction {
        id: Uuid::new_v4(),
        kind: call.kind,
        patient_id: call.patient_id,
        assessment_id: call.assessment_id,
        field: call.field,
        model_id: state.model_id.clone(),
        usage: TokenUsage::default(),
        status: TransactionStatus::Failed,
        priority_focus: priority_focus.clone(),
        requested_by: user.sub.clone(),
        created_at: jiff::Timestamp::now(),
    };

    match outcome {
        Ok(result) => {
            transaction.id = result.id;
            transaction.usage = result.usage;
            transaction.status = result.status;
            documents::save_json(&*state.store, &keys::transaction(transaction.id), &transaction)
                .await?;

            Ok(SuggestResponse {
                transaction_id: result.id,
                text: result.text,
                priority_focus,
                usage: result.usage,
                analysis: result.analysis,
            })
        }
        Err(e) => {
            warn!(transaction_id = %transaction.id, error = %e, "suggestion failed");
            documents::save_json(&*state.store, &keys::transaction(transaction.id), &transaction)
                .await?;
            Err(e.into())
        }
    }
}
