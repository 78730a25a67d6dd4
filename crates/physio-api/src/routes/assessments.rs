use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use tracing::info;
use uuid::Uuid;

use physio_core::keys;
use physio_core::models::assessment::{AssessmentForm, AssessmentStep};
use physio_core::models::patient::Patient;
use physio_storage::documents;

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::routes::patients::load_patient;
use crate::state::AppState;

/// Load a form and its patient, enforcing patient visibility.
pub(crate) async fn load_form(
    state: &AppState,
    user: &AuthUser,
    patient_id: Uuid,
    id: Uuid,
) -> Result<(Patient, AssessmentForm), ApiError> {
    let patient = load_patient(state, user, patient_id).await?;
    let form = documents::load_json(&*state.store, &keys::assessment(patient_id, id)).await?;
    Ok((patient, form))
}

pub async fn list_assessments(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<Vec<AssessmentForm>>, ApiError> {
    load_patient(&state, &user, patient_id).await?;

    let mut forms: Vec<AssessmentForm> = documents::list_json(
        &*state.store,
        &keys::assessments_prefix(patient_id),
        keys::is_assessment_key,
    )
    .await?;
    forms.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(Json(forms))
}

pub async fn create_assessment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(patient_id): Path<Uuid>,
) -> Result<(StatusCode, Json<AssessmentForm>), ApiError> {
    load_patient(&state, &user, patient_id).await?;

    let form = AssessmentForm::new(patient_id, &user.sub, jiff::Timestamp::now());
    documents::save_json(&*state.store, &keys::assessment(patient_id, form.id), &form).await?;

    info!(patient_id = %patient_id, assessment_id = %form.id, "assessment started");
    Ok((StatusCode::CREATED, Json(form)))
}

pub async fn get_assessment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((patient_id, id)): Path<(Uuid, Uuid)>,
) -> Result<Json<AssessmentForm>, ApiError> {
    let (_, form) = load_form(&state, &user, patient_id, id).await?;
    Ok(Json(form))
}

pub async fn delete_assessment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((patient_id, id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    load_form(&state, &user, patient_id, id).await?;
    state.store.delete(&keys::assessment(patient_id, id)).await?;

    info!(patient_id = %patient_id, assessment_id = %id, "assessment deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Save one wizard page and mark it complete.
pub async fn save_step(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((patient_id, id, step)): Path<(Uuid, Uuid, String)>,
    Json(fields): Json<BTreeMap<String, String>>,
) -> Result<Json<AssessmentForm>, ApiError> {
    let step: AssessmentStep = step.parse()?;
    let (_, mut form) = load_form(&state, &user, patient_id, id).await?;

    form.save_step(step, fields, jiff::Timestamp::now());
    documents::save_json(&*state.store, &keys::assessment(patient_id, id), &form).await?;

    info!(assessment_id = %id, step = %step, next = ?form.next_step(), "step saved");
    Ok(Json(form))
}
