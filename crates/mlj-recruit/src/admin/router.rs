use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Router,
};
use chrono::{Local, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::auth::{AccessDecision, AuthGate, IdentityProvider};
use super::export::{export_csv, export_filename};
use super::review::{ReviewError, ReviewFilter, ReviewService, ReviewSort, ReviewTable, SortField, SortOrder};
use super::sync::SyncEngine;
use crate::registration::domain::{RegistrationId, RegistrationStatus};
use crate::registration::repository::RegistrationRepository;
use crate::storage::StoragePort;

/// Everything the admin handlers need, shared behind one `Arc`.
pub struct AdminContext<R, S, P> {
    pub provider: Arc<P>,
    pub gate: AuthGate<P>,
    pub sync: Arc<SyncEngine<R, S>>,
    pub review: ReviewService<R, S>,
}

impl<R, S, P> AdminContext<R, S, P>
where
    R: RegistrationRepository,
    S: StoragePort,
    P: IdentityProvider,
{
    pub fn new(repository: Arc<R>, storage: Arc<S>, provider: Arc<P>) -> Self {
        let sync = Arc::new(SyncEngine::new(repository.clone(), storage));
        Self {
            gate: AuthGate::new(provider.clone()),
            provider,
            review: ReviewService::new(sync.clone(), repository),
            sync,
        }
    }
}

/// HTTP surface for the password-protected review console.
pub fn admin_router<R, S, P>(context: Arc<AdminContext<R, S, P>>) -> Router
where
    R: RegistrationRepository + 'static,
    S: StoragePort + 'static,
    P: IdentityProvider + 'static,
{
    Router::new()
        .route("/mlj-admin-console/login", post(login_handler::<R, S, P>))
        .route("/mlj-admin-console/logout", post(logout_handler::<R, S, P>))
        .route(
            "/mlj-admin-console/registrations",
            get(list_handler::<R, S, P>),
        )
        .route(
            "/mlj-admin-console/registrations/refresh",
            post(refresh_handler::<R, S, P>),
        )
        .route(
            "/mlj-admin-console/registrations/:id/status",
            patch(status_handler::<R, S, P>),
        )
        .route(
            "/mlj-admin-console/registrations/export",
            get(export_handler::<R, S, P>),
        )
        .with_state(context)
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ReviewQuery {
    search: Option<String>,
    status: Option<RegistrationStatus>,
    age_min: Option<u32>,
    age_max: Option<u32>,
    qualification: Option<String>,
    sort: Option<SortField>,
    order: Option<SortOrder>,
}

impl ReviewQuery {
    fn into_table(self) -> ReviewTable {
        let mut sort = ReviewSort::default();
        if let Some(field) = self.sort {
            sort.field = field;
        }
        if let Some(order) = self.order {
            sort.order = order;
        }
        ReviewTable {
            filter: ReviewFilter {
                search: self.search,
                status: self.status,
                age_min: self.age_min,
                age_max: self.age_max,
                qualification: self.qualification,
            },
            sort,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusRequest {
    status: RegistrationStatus,
}

/// Maps a gate refusal to the response the console expects; `None` means
/// access was granted.
fn deny_response(decision: &AccessDecision) -> Option<Response> {
    match decision {
        AccessDecision::Granted(_) => None,
        AccessDecision::RedirectToLogin => {
            let payload = json!({
                "error": "認証エラーが発生しました",
                "redirect": "/mlj-admin-console/login",
            });
            Some((StatusCode::UNAUTHORIZED, axum::Json(payload)).into_response())
        }
        AccessDecision::RedirectToPublic => {
            let payload = json!({
                "error": "管理者権限がありません",
                "redirect": "/",
            });
            Some((StatusCode::FORBIDDEN, axum::Json(payload)).into_response())
        }
    }
}

pub(crate) async fn login_handler<R, S, P>(
    State(context): State<Arc<AdminContext<R, S, P>>>,
    axum::Json(request): axum::Json<LoginRequest>,
) -> Response
where
    R: RegistrationRepository + 'static,
    S: StoragePort + 'static,
    P: IdentityProvider + 'static,
{
    let identity = match context.provider.sign_in(&request.email, &request.password) {
        Ok(identity) => identity,
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            return (StatusCode::UNAUTHORIZED, axum::Json(payload)).into_response();
        }
    };

    // Credentials alone are not enough; the profile must carry the admin
    // role, and lookup failures deny.
    match context.gate.is_admin(&identity.uid) {
        Ok(true) => {
            let payload = json!({ "status": "ok", "email": identity.email });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Ok(false) => {
            context.provider.sign_out();
            let payload = json!({ "error": "管理者権限がありません" });
            (StatusCode::FORBIDDEN, axum::Json(payload)).into_response()
        }
        Err(_) => {
            context.provider.sign_out();
            let payload = json!({ "error": "認証エラーが発生しました" });
            (StatusCode::UNAUTHORIZED, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn logout_handler<R, S, P>(
    State(context): State<Arc<AdminContext<R, S, P>>>,
) -> Response
where
    R: RegistrationRepository + 'static,
    S: StoragePort + 'static,
    P: IdentityProvider + 'static,
{
    context.provider.sign_out();
    (StatusCode::OK, axum::Json(json!({ "status": "ok" }))).into_response()
}

pub(crate) async fn list_handler<R, S, P>(
    State(context): State<Arc<AdminContext<R, S, P>>>,
    Query(query): Query<ReviewQuery>,
) -> Response
where
    R: RegistrationRepository + 'static,
    S: StoragePort + 'static,
    P: IdentityProvider + 'static,
{
    if let Some(denied) = deny_response(&context.gate.authorize()) {
        return denied;
    }

    let records = match context.sync.fetch_incremental(Utc::now()) {
        Ok(records) => records,
        Err(err) => {
            debug!(%err, "incremental fetch failed");
            let payload = json!({ "error": "登録データの取得に失敗しました。" });
            return (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response();
        }
    };

    let table = query.into_table();
    let view = table.view(&records);
    let shown = view.len();
    let payload = json!({
        "registrations": view,
        "total": records.len(),
        "shown": shown,
        "lastFetch": context.sync.last_fetch(),
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn refresh_handler<R, S, P>(
    State(context): State<Arc<AdminContext<R, S, P>>>,
) -> Response
where
    R: RegistrationRepository + 'static,
    S: StoragePort + 'static,
    P: IdentityProvider + 'static,
{
    if let Some(denied) = deny_response(&context.gate.authorize()) {
        return denied;
    }

    match context.sync.refresh_all(Utc::now()) {
        Ok(records) => {
            let payload = json!({ "status": "ok", "total": records.len() });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => {
            debug!(%err, "full refresh failed");
            let payload = json!({ "error": "データの更新に失敗しました" });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn status_handler<R, S, P>(
    State(context): State<Arc<AdminContext<R, S, P>>>,
    Path(id): Path<String>,
    axum::Json(request): axum::Json<StatusRequest>,
) -> Response
where
    R: RegistrationRepository + 'static,
    S: StoragePort + 'static,
    P: IdentityProvider + 'static,
{
    if let Some(denied) = deny_response(&context.gate.authorize()) {
        return denied;
    }

    let id = RegistrationId(id);
    match context.review.set_status(&id, request.status) {
        Ok(()) => {
            // Background cache refresh; the optimistic echo already holds.
            if let Err(err) = context.sync.fetch_incremental(Utc::now()) {
                debug!(%err, "post-update refresh failed");
            }
            (StatusCode::OK, axum::Json(json!({ "status": "ok" }))).into_response()
        }
        Err(ReviewError::UnknownRecord) => {
            let payload = json!({ "error": "record not found" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(error @ ReviewError::Remote(_)) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn export_handler<R, S, P>(
    State(context): State<Arc<AdminContext<R, S, P>>>,
    Query(query): Query<ReviewQuery>,
) -> Response
where
    R: RegistrationRepository + 'static,
    S: StoragePort + 'static,
    P: IdentityProvider + 'static,
{
    if let Some(denied) = deny_response(&context.gate.authorize()) {
        return denied;
    }

    let records = match context.sync.fetch_incremental(Utc::now()) {
        Ok(records) => records,
        Err(err) => {
            debug!(%err, "fetch before export failed");
            let payload = json!({ "error": "登録データの取得に失敗しました。" });
            return (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response();
        }
    };

    let view = query.into_table().view(&records);
    let body = match export_csv(&view) {
        Ok(body) => body,
        Err(err) => {
            debug!(%err, "csv serialization failed");
            let payload = json!({ "error": "CSVの出力に失敗しました" });
            return (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response();
        }
    };

    let filename = export_filename(Local::now());
    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ),
    ];
    (StatusCode::OK, headers, body).into_response()
}
