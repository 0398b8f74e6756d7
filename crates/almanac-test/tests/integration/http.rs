#![allow(clippy::expect_used, clippy::unwrap_used)]
//! HTTP routes over the in-memory calendar service.

use salvo::http::StatusCode;
use salvo::test::{ResponseExt, TestClient};
use serde_json::{Value, json};
use uuid::Uuid;

use almanac_core::constants::EVENTS_ROUTE_PREFIX;
use almanac_core::event::EventDraft;
use almanac_core::types::EventType;
use almanac_test::{Harness, jan, proxy_settings, router};

const BASE: &str = "http://127.0.0.1:5800";
/// Lower-cased form of the default proxy header.
const USER_HEADER: &str = "x-user-id";

fn url(path: &str) -> String {
    format!("{BASE}{path}")
}

fn events_url(rest: &str) -> String {
    url(&format!("{EVENTS_ROUTE_PREFIX}{rest}"))
}

/// ## Summary
/// Healthcheck needs no identity.
#[test_log::test(tokio::test)]
async fn healthcheck_is_public() {
    let harness = Harness::new();
    let service = router(proxy_settings(), harness.service.clone());

    let mut response = TestClient::get(url("/api/app/healthcheck")).send(&service).await;

    assert_eq!(response.status_code, Some(StatusCode::OK));
    assert_eq!(response.take_string().await.unwrap(), "OK");
}

/// ## Summary
/// Requests without a valid user id header are rejected.
#[test_log::test(tokio::test)]
async fn missing_or_malformed_identity_is_unauthorized() {
    let harness = Harness::new();
    let service = router(proxy_settings(), harness.service.clone());

    let response = TestClient::get(events_url("/calendar?start=2025-01-01T00:00:00Z&end=2025-01-31T00:00:00Z"))
        .send(&service)
        .await;
    assert_eq!(response.status_code, Some(StatusCode::UNAUTHORIZED));

    let response = TestClient::get(events_url("/calendar"))
        .add_header(USER_HEADER, "not-a-uuid", true)
        .send(&service)
        .await;
    assert_eq!(response.status_code, Some(StatusCode::UNAUTHORIZED));

    let response = TestClient::get(events_url("/calendar"))
        .add_header(USER_HEADER, Uuid::nil().to_string(), true)
        .send(&service)
        .await;
    assert_eq!(response.status_code, Some(StatusCode::UNAUTHORIZED));
}

/// ## Summary
/// whoami reports the caller and their organization.
#[test_log::test(tokio::test)]
async fn whoami_reports_organization() {
    let harness = Harness::new();
    let viewer = harness.user();
    let service = router(proxy_settings(), harness.service.clone());

    let mut response = TestClient::get(url("/api/app/whoami"))
        .add_header(USER_HEADER, viewer.to_string(), true)
        .send(&service)
        .await;

    assert_eq!(response.status_code, Some(StatusCode::OK));
    let body: Value = response.take_json().await.unwrap();
    assert_eq!(body["user_id"], json!(viewer));
    assert_eq!(body["organization_id"], json!(harness.organization_id));
}

/// ## Summary
/// Creating an event returns 201 and the event then shows on the calendar.
#[test_log::test(tokio::test)]
async fn create_then_read_calendar() {
    let harness = Harness::new();
    let viewer = harness.user();
    let service = router(proxy_settings(), harness.service.clone());

    let mut created = TestClient::post(events_url(""))
        .add_header(USER_HEADER, viewer.to_string(), true)
        .json(&json!({
            "title": "Dentist",
            "event_type": "vanilla",
            "scope": "personal",
            "user_id": viewer,
            "start_at": "2025-01-06T09:00:00Z"
        }))
        .send(&service)
        .await;
    assert_eq!(created.status_code, Some(StatusCode::CREATED));
    let event: Value = created.take_json().await.unwrap();
    assert_eq!(event["organization_id"], json!(harness.organization_id));
    assert_eq!(event["color"], "#3B82F6");

    let mut calendar = TestClient::get(events_url(
        "/calendar?start=2025-01-01T00:00:00Z&end=2025-01-31T00:00:00Z",
    ))
    .add_header(USER_HEADER, viewer.to_string(), true)
    .send(&service)
    .await;
    assert_eq!(calendar.status_code, Some(StatusCode::OK));
    let events: Vec<Value> = calendar.take_json().await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["id"], event["id"]);
}

/// ## Summary
/// Invalid events are rejected with the validation reason.
#[test_log::test(tokio::test)]
async fn invalid_event_is_bad_request() {
    let harness = Harness::new();
    let viewer = harness.user();
    let service = router(proxy_settings(), harness.service.clone());

    let mut response = TestClient::post(events_url(""))
        .add_header(USER_HEADER, viewer.to_string(), true)
        .json(&json!({
            "title": "Essay due",
            "event_type": "deadline",
            "scope": "cohort",
            "start_at": "2025-01-20T00:00:00Z"
        }))
        .send(&service)
        .await;

    assert_eq!(response.status_code, Some(StatusCode::BAD_REQUEST));
    let body: Value = response.take_json().await.unwrap();
    assert_eq!(
        body["error"],
        "Validation error: cohort scope requires a valid cohort_id"
    );
}

/// ## Summary
/// Callers cannot write into another organization.
#[test_log::test(tokio::test)]
async fn create_for_other_organization_is_forbidden() {
    let harness = Harness::new();
    let viewer = harness.user();
    let service = router(proxy_settings(), harness.service.clone());

    let response = TestClient::post(events_url(""))
        .add_header(USER_HEADER, viewer.to_string(), true)
        .json(&json!({
            "organization_id": Uuid::now_v7(),
            "title": "Intruder",
            "event_type": "holiday",
            "start_at": "2025-01-20T00:00:00Z"
        }))
        .send(&service)
        .await;

    assert_eq!(response.status_code, Some(StatusCode::FORBIDDEN));
}

/// ## Summary
/// Events of another organization are neither readable nor deletable.
#[test_log::test(tokio::test)]
async fn foreign_event_is_forbidden() {
    let harness = Harness::new();
    let outsider = Uuid::now_v7();
    harness.directory.add_user(outsider, Uuid::now_v7());
    let event = harness
        .service
        .create_event(EventDraft {
            start_at: Some(jan(1)),
            ..EventDraft::new(harness.organization_id, "New Year", EventType::Holiday)
        })
        .await
        .unwrap();
    let service = router(proxy_settings(), harness.service.clone());

    let response = TestClient::get(events_url(&format!("/{}", event.id)))
        .add_header(USER_HEADER, outsider.to_string(), true)
        .send(&service)
        .await;
    assert_eq!(response.status_code, Some(StatusCode::FORBIDDEN));

    let response = TestClient::delete(events_url(&format!("/{}", event.id)))
        .add_header(USER_HEADER, outsider.to_string(), true)
        .send(&service)
        .await;
    assert_eq!(response.status_code, Some(StatusCode::FORBIDDEN));
    assert!(harness.service.get_event(event.id).await.is_ok());
}

/// ## Summary
/// Update then delete through the API.
#[test_log::test(tokio::test)]
async fn update_and_delete_event() {
    let harness = Harness::new();
    let viewer = harness.user();
    let event = harness
        .service
        .create_event(EventDraft {
            start_at: Some(jan(1)),
            ..EventDraft::new(harness.organization_id, "New Year", EventType::Holiday)
        })
        .await
        .unwrap();
    let service = router(proxy_settings(), harness.service.clone());
    let path = events_url(&format!("/{}", event.id));

    let mut updated = TestClient::put(&path)
        .add_header(USER_HEADER, viewer.to_string(), true)
        .json(&json!({
            "title": "New Year's Day",
            "event_type": "holiday",
            "start_at": "2025-01-01T00:00:00Z"
        }))
        .send(&service)
        .await;
    assert_eq!(updated.status_code, Some(StatusCode::OK));
    let body: Value = updated.take_json().await.unwrap();
    assert_eq!(body["title"], "New Year's Day");

    let deleted = TestClient::delete(&path)
        .add_header(USER_HEADER, viewer.to_string(), true)
        .send(&service)
        .await;
    assert_eq!(deleted.status_code, Some(StatusCode::NO_CONTENT));

    let missing = TestClient::get(&path)
        .add_header(USER_HEADER, viewer.to_string(), true)
        .send(&service)
        .await;
    assert_eq!(missing.status_code, Some(StatusCode::NOT_FOUND));
}

/// ## Summary
/// Listings need both bounds and an ordered window.
#[test_log::test(tokio::test)]
async fn listing_requires_a_valid_window() {
    let harness = Harness::new();
    let viewer = harness.user();
    let service = router(proxy_settings(), harness.service.clone());

    for query in [
        "?start=2025-01-01T00:00:00Z",
        "?start=2025-02-01T00:00:00Z&end=2025-01-01T00:00:00Z",
        "?start=yesterday&end=2025-01-01T00:00:00Z",
    ] {
        let response = TestClient::get(events_url(query))
            .add_header(USER_HEADER, viewer.to_string(), true)
            .send(&service)
            .await;
        assert_eq!(response.status_code, Some(StatusCode::BAD_REQUEST), "{query}");
    }
}

/// ## Summary
/// Section schedules of another organization are forbidden.
#[test_log::test(tokio::test)]
async fn foreign_section_schedule_is_forbidden() {
    let harness = Harness::new();
    let section = harness.section();
    let outsider = Uuid::now_v7();
    harness.directory.add_user(outsider, Uuid::now_v7());
    let service = router(proxy_settings(), harness.service.clone());

    let response = TestClient::get(events_url(&format!(
        "/sections/{section}/schedule?start=2025-01-01T00:00:00Z&end=2025-01-31T00:00:00Z"
    )))
    .add_header(USER_HEADER, outsider.to_string(), true)
    .send(&service)
    .await;

    assert_eq!(response.status_code, Some(StatusCode::FORBIDDEN));
}
