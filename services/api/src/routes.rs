use crate::infra::AppState;
use crate::pages;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;

use mlj_recruit::admin::{admin_router, AdminContext, IdentityProvider};
use mlj_recruit::registration::{registration_router, RegistrationRepository, SubmissionService};
use mlj_recruit::storage::StoragePort;

pub(crate) fn with_service_routes<R, S, P>(
    service: Arc<SubmissionService<R, S>>,
    context: Arc<AdminContext<R, S, P>>,
) -> axum::Router
where
    R: RegistrationRepository + 'static,
    S: StoragePort + 'static,
    P: IdentityProvider + 'static,
{
    registration_router(service)
        .merge(admin_router(context))
        .route("/", axum::routing::get(pages::landing))
        .route("/complete", axum::routing::get(pages::complete))
        .route("/terms", axum::routing::get(pages::terms))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
