use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::info;

use physio_auth::AuthTokens;
use physio_core::keys;
use physio_core::models::user::{UserAccount, UserRole};
use physio_storage::documents;

use crate::error::ApiError;
use crate::middleware::auth::{check_approved, load_account};
use crate::state::AppState;

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub tokens: AuthTokens,
    pub user: UserAccount,
}

/// Create a login and a pending account. The account cannot sign in until
/// an admin approves it, unless the address is a configured admin.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserAccount>), ApiError> {
    let email = req.email.trim().to_lowercase();
    let name = req.name.trim();

    if !email.contains('@') {
        return Err(ApiError::BadRequest("a valid email is required".to_string()));
    }
    if name.is_empty() {
        return Err(ApiError::BadRequest("name is required".to_string()));
    }
    if req.password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::BadRequest(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let sub = state.identity.sign_up(&email, &req.password, name).await?;
    let now = jiff::Timestamp::now();
    let mut account = UserAccount::pending(&sub, &email, name, now);

    if state.is_admin_email(&email) {
        state.identity.confirm_user(&email).await?;
        account.role = UserRole::Admin;
        account.approve(&sub, now);
        info!(sub = %sub, "bootstrap admin registered");
    } else {
        info!(sub = %sub, "registration pending approval");
    }

    documents::save_json(&*state.store, &keys::user(&sub), &account).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let email = req.email.trim().to_lowercase();
    let tokens = state.identity.sign_in(&email, &req.password).await?;
    approved_session(&state, tokens).await.map(Json)
}

pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let tokens = state.identity.refresh(&req.refresh_token).await?;
    approved_session(&state, tokens).await.map(Json)
}

/// Hand out tokens only to approved, active accounts.
async fn approved_session(state: &AppState, tokens: AuthTokens) -> Result<SessionResponse, ApiError> {
    let claims = state.verifier.verify(&tokens.id_token)?;
    let user = load_account(state, &claims.sub).await?;
    check_approved(&user)?;

    info!(sub = %user.sub, "session issued");
    Ok(SessionResponse { tokens, user })
}
