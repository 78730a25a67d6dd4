use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use tracing::info;
use uuid::Uuid;

use physio_core::keys;
use physio_core::models::patient::{Patient, PatientIntake};
use physio_storage::documents;

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Load a patient the caller may see. Other therapists' patients read as
/// missing rather than forbidden.
pub(crate) async fn load_patient(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> Result<Patient, ApiError> {
    let patient: Patient = documents::load_json(&*state.store, &keys::patient(id)).await?;
    if patient.created_by != user.sub && !user.is_admin() {
        return Err(ApiError::NotFound(format!("patient not found: {id}")));
    }
    Ok(patient)
}

pub async fn list_patients(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Patient>>, ApiError> {
    let mut patients: Vec<Patient> =
        documents::list_json(&*state.store, keys::PATIENTS_PREFIX, keys::is_patient_key).await?;
    patients.retain(|p| user.is_admin() || p.created_by == user.sub);
    patients.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    Ok(Json(patients))
}

pub async fn create_patient(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(intake): Json<PatientIntake>,
) -> Result<(StatusCode, Json<Patient>), ApiError> {
    let patient = intake.into_patient(&user.sub, jiff::Timestamp::now())?;
    documents::save_json(&*state.store, &keys::patient(patient.id), &patient).await?;

    info!(patient_id = %patient.id, "patient created");
    Ok((StatusCode::CREATED, Json(patient)))
}

pub async fn get_patient(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Patient>, ApiError> {
    load_patient(&state, &user, id).await.map(Json)
}

pub async fn update_patient(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(intake): Json<PatientIntake>,
) -> Result<Json<Patient>, ApiError> {
    let mut patient = load_patient(&state, &user, id).await?;
    patient.apply_intake(intake, jiff::Timestamp::now())?;
    documents::save_json(&*state.store, &keys::patient(id), &patient).await?;
    Ok(Json(patient))
}

/// Delete a patient together with all of their assessments.
pub async fn delete_patient(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    load_patient(&state, &user, id).await?;
    let removed = state.store.delete_prefix(&keys::patient_prefix(id)).await?;

    info!(patient_id = %id, documents = removed, "patient deleted");
    Ok(StatusCode::NO_CONTENT)
}
