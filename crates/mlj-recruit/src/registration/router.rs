use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use chrono::Utc;
use serde_json::json;

use super::domain::RegistrationDraft;
use super::guard::GuardRejection;
use super::repository::RegistrationRepository;
use super::service::{SubmissionError, SubmissionService};
use crate::storage::StoragePort;

/// HTTP surface for the registration pipeline.
pub fn registration_router<R, S>(service: Arc<SubmissionService<R, S>>) -> Router
where
    R: RegistrationRepository + 'static,
    S: StoragePort + 'static,
{
    Router::new()
        .route("/api/v1/registrations", post(submit_handler::<R, S>))
        .with_state(service)
}

pub(crate) async fn submit_handler<R, S>(
    State(service): State<Arc<SubmissionService<R, S>>>,
    axum::Json(draft): axum::Json<RegistrationDraft>,
) -> Response
where
    R: RegistrationRepository + 'static,
    S: StoragePort + 'static,
{
    match service.submit_draft(&draft, Utc::now()) {
        Ok(receipt) => (StatusCode::CREATED, axum::Json(receipt)).into_response(),
        Err(SubmissionError::Validation(error)) => {
            let payload = json!({
                "field": error.field,
                "error": error.message,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(SubmissionError::Guard(rejection)) => {
            let status = match rejection {
                GuardRejection::Honeypot => StatusCode::BAD_REQUEST,
                GuardRejection::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
                GuardRejection::Duplicate => StatusCode::CONFLICT,
            };
            let payload = json!({ "error": rejection.to_string() });
            (status, axum::Json(payload)).into_response()
        }
        Err(error @ SubmissionError::Write(_)) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
