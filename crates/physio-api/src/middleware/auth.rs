use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tracing::debug;

use physio_core::keys;
use physio_core::models::user::{ApprovalStatus, UserAccount, UserRole};
use physio_storage::documents;

use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated, approved user, inserted into request extensions.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub sub: String,
    pub email: String,
    pub role: UserRole,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// JWT validation middleware.
///
/// Verifies the `Authorization: Bearer <token>` header, then loads the
/// caller's account: a valid token alone is not enough, the account must
/// also be approved and active.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("missing bearer token".to_string()))?;

    let claims = state.verifier.verify(token)?;
    let account = load_account(&state, &claims.sub).await?;
    check_approved(&account)?;

    debug!(sub = %account.sub, "authenticated");
    let user = AuthUser {
        sub: account.sub,
        email: account.email,
        role: account.role,
    };
    req.extensions_mut().insert(user.clone());

    let mut response = next.run(req).await;
    response.extensions_mut().insert(user);
    Ok(response)
}

/// Admin role guard. Runs inside [`require_auth`].
pub async fn require_admin(req: Request, next: Next) -> Result<Response, ApiError> {
    let is_admin = req
        .extensions()
        .get::<AuthUser>()
        .is_some_and(AuthUser::is_admin);
    if !is_admin {
        return Err(ApiError::Forbidden("admin access required".to_string()));
    }
    Ok(next.run(req).await)
}

pub(crate) async fn load_account(state: &AppState, sub: &str) -> Result<UserAccount, ApiError> {
    documents::load_json_opt(&*state.store, &keys::user(sub))
        .await?
        .ok_or_else(|| ApiError::Forbidden("no account registered for this user".to_string()))
}

pub(crate) fn check_approved(account: &UserAccount) -> Result<(), ApiError> {
    if account.can_sign_in() {
        return Ok(());
    }
    let reason = match account.approval {
        ApprovalStatus::Pending => "account pending approval",
        ApprovalStatus::Rejected => "account rejected",
        ApprovalStatus::Approved => "account disabled",
    };
    Err(ApiError::Forbidden(reason.to_string()))
}
