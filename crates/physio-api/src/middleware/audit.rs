use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::middleware::auth::AuthUser;

/// Audit logging middleware.
///
/// Logs every API request as a structured audit event. The user's subject
/// is included when the request was authenticated; no request or response
/// bodies are logged since they carry PHI.
pub async fn audit_log(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().path().to_string();

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let user = response
        .extensions()
        .get::<AuthUser>()
        .map(|u| u.sub.as_str())
        .unwrap_or("-");
    tracing::info!(
        method = %method,
        path = %uri,
        status = status,
        user = user,
        "api_request"
    );

    response
}
