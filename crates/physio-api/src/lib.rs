//! physio-api
//!
//! HTTP API for PhysioNote: patient records, the assessment wizard, AI
//! field suggestions and the admin approval workflow.

use axum::Router;
use axum::middleware as axum_mw;
use axum::routing::{get, post, put};
use tower_http::cors::{Any, CorsLayer};

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use middleware::{audit, auth, rate_limit};
use state::AppState;

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let public = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/auth/register", post(routes::auth::register))
        .route("/auth/login", post(routes::auth::login))
        .route("/auth/refresh", post(routes::auth::refresh));

    let ai = Router::new()
        .route(
            "/patients/{id}/assessments/{aid}/suggest",
            post(routes::suggestions::suggest_field),
        )
        .route(
            "/patients/{id}/assessments/{aid}/diagnosis",
            post(routes::suggestions::suggest_diagnosis),
        )
        .route_layer(axum_mw::from_fn_with_state(
            state.clone(),
            rate_limit::limit_ai_calls,
        ));

    let admin = Router::new()
        .route("/admin/dashboard", get(routes::admin::dashboard))
        .route("/admin/users", get(routes::admin::list_users))
        .route("/admin/users/{sub}/approve", post(routes::admin::approve_user))
        .route("/admin/users/{sub}/reject", post(routes::admin::reject_user))
        .route("/admin/transactions", get(routes::admin::list_transactions))
        .route_layer(axum_mw::from_fn(auth::require_admin));

    let protected = Router::new()
        .route(
            "/patients",
            get(routes::patients::list_patients).post(routes::patients::create_patient),
        )
        .route(
            "/patients/{id}",
            get(routes::patients::get_patient)
                .put(routes::patients::update_patient)
                .delete(routes::patients::delete_patient),
        )
        .route(
            "/patients/{id}/assessments",
            get(routes::assessments::list_assessments)
                .post(routes::assessments::create_assessment),
        )
        .route(
            "/patients/{id}/assessments/{aid}",
            get(routes::assessments::get_assessment)
                .delete(routes::assessments::delete_assessment),
        )
        .route(
            "/patients/{id}/assessments/{aid}/steps/{step}",
            put(routes::assessments::save_step),
        )
        .route("/findings/analyze", post(routes::findings::analyze_findings))
        .route("/cost/estimate", post(routes::cost::estimate_cost))
        .merge(ai)
        .merge(admin)
        .route_layer(axum_mw::from_fn_with_state(state.clone(), auth::require_auth));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(axum_mw::from_fn(audit::audit_log))
        .layer(cors)
        .with_state(state)
}
