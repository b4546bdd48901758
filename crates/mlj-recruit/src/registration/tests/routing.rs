use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use super::common::*;
use crate::registration::domain::RegistrationDraft;
use crate::registration::repository::RegistrationRepository;
use crate::registration::router::registration_router;

async fn post_draft(
    router: axum::Router,
    draft: &RegistrationDraft,
) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::post("/api/v1/registrations")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(draft).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value: Value = serde_json::from_slice(&bytes).unwrap();
    (status, value)
}

#[tokio::test]
async fn submit_route_creates_a_registration() {
    let (repository, _, service) = build_service();
    let router = registration_router(Arc::new(service));

    let (status, body) = post_draft(router, &valid_draft()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["redirect"], "/complete");
    assert_eq!(repository.stored().len(), 1);
}

#[tokio::test]
async fn submit_route_maps_validation_to_unprocessable() {
    let (_, _, service) = build_service();
    let router = registration_router(Arc::new(service));

    let mut draft = valid_draft();
    draft.age = "17".to_string();

    let (status, body) = post_draft(router, &draft).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["field"], "age");
    assert_eq!(body["error"], "18歳以上の方のみ登録できます");
}

#[tokio::test]
async fn submit_route_maps_honeypot_to_generic_bad_request() {
    let (repository, _, service) = build_service();
    let router = registration_router(Arc::new(service));

    let mut draft = valid_draft();
    draft.website = "http://spam.example".to_string();

    let (status, body) = post_draft(router, &draft).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["error"].as_str().unwrap();
    assert!(
        !message.contains("ハニーポット") && !message.to_lowercase().contains("honeypot"),
        "rejection must not reveal the detection mechanism: {message}"
    );
    assert!(repository.stored().is_empty());
}

#[tokio::test]
async fn submit_route_maps_duplicate_to_conflict() {
    let (repository, _, service) = build_service();
    repository.insert(&valid_draft()).expect("seed pending record");
    let router = registration_router(Arc::new(service));

    let (status, _) = post_draft(router, &valid_draft()).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn submit_route_maps_store_outage_to_internal_error() {
    let (repository, _, service) = build_service();
    repository.fail_inserts.store(true, Ordering::Relaxed);
    let router = registration_router(Arc::new(service));

    let (status, body) = post_draft(router, &valid_draft()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "登録に失敗しました。もう一度お試しください。");
}
