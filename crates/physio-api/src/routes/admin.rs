use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use serde::Deserialize;
use tracing::info;

use physio_core::keys;
use physio_core::models::dashboard::DashboardStats;
use physio_core::models::transaction::AiTransaction;
use physio_core::models::user::{ApprovalStatus, UserAccount};
use physio_storage::documents;

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UserFilter {
    pub status: Option<ApprovalStatus>,
}

pub async fn dashboard(State(state): State<AppState>) -> Result<Json<DashboardStats>, ApiError> {
    let patient_keys = state.store.list(keys::PATIENTS_PREFIX).await?;
    let users: Vec<UserAccount> =
        documents::list_json(&*state.store, keys::USERS_PREFIX, |_| true).await?;
    let transactions: Vec<AiTransaction> =
        documents::list_json(&*state.store, keys::TRANSACTIONS_PREFIX, |_| true).await?;

    let mut stats = DashboardStats {
        patients: patient_keys.iter().filter(|k| keys::is_patient_key(k)).count() as u64,
        assessments: patient_keys.iter().filter(|k| keys::is_assessment_key(k)).count() as u64,
        ..DashboardStats::default()
    };
    stats.count_users(&users);
    stats.count_transactions(&transactions);

    Ok(Json(stats))
}

pub async fn list_users(
    State(state): State<AppState>,
    Query(filter): Query<UserFilter>,
) -> Result<Json<Vec<UserAccount>>, ApiError> {
    let mut users: Vec<UserAccount> =
        documents::list_json(&*state.store, keys::USERS_PREFIX, |_| true).await?;
    if let Some(status) = filter.status {
        users.retain(|u| u.approval == status);
    }
    users.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    Ok(Json(users))
}

/// Approve a registration and confirm it with the identity provider.
pub async fn approve_user(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthUser>,
    Path(sub): Path<String>,
) -> Result<Json<UserAccount>, ApiError> {
    let key = keys::user(&sub);
    let mut account: UserAccount = documents::load_json(&*state.store, &key).await?;

    match account.approval {
        ApprovalStatus::Pending => state.identity.confirm_user(&account.email).await?,
        ApprovalStatus::Rejected => state.identity.enable_user(&account.email).await?,
        ApprovalStatus::Approved => {}
    }

    account.approve(&admin.sub, jiff::Timestamp::now());
    documents::save_json(&*state.store, &key, &account).await?;

    info!(sub = %sub, admin = %admin.sub, "user approved");
    Ok(Json(account))
}

/// Reject a registration, or revoke an approved account.
pub async fn reject_user(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthUser>,
    Path(sub): Path<String>,
) -> Result<Json<UserAccount>, ApiError> {
    if sub == admin.sub {
        return Err(ApiError::BadRequest("admins cannot reject themselves".to_string()));
    }

    let key = keys::user(&sub);
    let mut account: UserAccount = documents::load_json(&*state.store, &key).await?;

    state.identity.disable_user(&account.email).await?;
    account.reject(&admin.sub, jiff::Timestamp::now());
    documents::save_json(&*state.store, &key, &account).await?;

    info!(sub = %sub, admin = %admin.sub, "user rejected");
    Ok(Json(account))
}

/// Every AI call, newest first.
pub async fn list_transactions(
    State(state): State<AppState>,
) -> Result<Json<Vec<AiTransaction>>, ApiError> {
    let mut transactions: Vec<AiTransaction> =
        documents::list_json(&*state.store, keys::TRANSACTIONS_PREFIX, |_| true).await?;
    transactions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(Json(transactions))
}
