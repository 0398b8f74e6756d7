#![allow(clippy::expect_used, clippy::unwrap_used)]
//! End-to-end calendar scenarios.

use uuid::Uuid;

use almanac_core::event::EventDraft;
use almanac_core::types::{EventScope, EventType};
use almanac_service::error::ServiceError;
use almanac_test::{Harness, at, jan, window};

// ============================================================================
// Visibility
// ============================================================================

/// ## Summary
/// A viewer sees global events but never another user's personal events.
#[test_log::test(tokio::test)]
async fn calendar_hides_other_users_personal_events() {
    let harness = Harness::new();
    let viewer = harness.user();
    let someone_else = harness.user();
    let org = harness.organization_id;

    let holiday = harness
        .service
        .create_event(EventDraft {
            start_at: Some(jan(1)),
            end_at: Some(jan(2)),
            is_all_day: true,
            ..EventDraft::new(org, "New Year", EventType::Holiday)
        })
        .await
        .expect("holiday is valid");
    harness
        .service
        .create_event(EventDraft {
            scope: EventScope::Personal,
            user_id: Some(someone_else),
            start_at: Some(jan(5)),
            ..EventDraft::new(org, "Dentist", EventType::Vanilla)
        })
        .await
        .expect("personal event is valid");

    let events = harness
        .service
        .get_calendar_for_user(viewer, window(jan(1), jan(31)))
        .await
        .expect("calendar read succeeds");

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].id, holiday.id);
}

/// ## Summary
/// An active enrollment exposes the section's schedule on days it overlaps.
#[test_log::test(tokio::test)]
async fn enrolled_section_schedule_follows_the_window() {
    let harness = Harness::new();
    let viewer = harness.user();
    let section = harness.section();
    harness.directory.enroll(viewer, section);

    let class = harness
        .service
        .create_event(EventDraft {
            scope: EventScope::Section,
            section_id: Some(section),
            start_at: Some(at(12, 8, 0)),
            end_at: Some(at(12, 8, 45)),
            ..EventDraft::new(harness.organization_id, "Algebra I", EventType::Schedule)
        })
        .await
        .expect("schedule event is valid");

    let same_day = harness
        .service
        .get_calendar_for_user(viewer, window(jan(12), at(12, 23, 59)))
        .await
        .expect("calendar read succeeds");
    assert_eq!(same_day.iter().map(|e| e.id).collect::<Vec<_>>(), [class.id]);

    let later = harness
        .service
        .get_calendar_for_user(viewer, window(jan(13), jan(14)))
        .await
        .expect("calendar read succeeds");
    assert!(later.is_empty());
}

/// ## Summary
/// Completed or dropped enrollments grant nothing.
#[test_log::test(tokio::test)]
async fn inactive_enrollment_hides_section_events() {
    let harness = Harness::new();
    let viewer = harness.user();
    let section = harness.section();
    harness.directory.enroll_inactive(viewer, section);

    harness
        .service
        .create_event(EventDraft {
            scope: EventScope::Section,
            section_id: Some(section),
            start_at: Some(jan(10)),
            ..EventDraft::new(harness.organization_id, "Quiz", EventType::Deadline)
        })
        .await
        .expect("deadline is valid");

    let events = harness
        .service
        .get_calendar_for_user(viewer, window(jan(1), jan(31)))
        .await
        .expect("calendar read succeeds");
    assert!(events.is_empty());
}

// ============================================================================
// Writes
// ============================================================================

/// ## Summary
/// A cohort deadline without a cohort is rejected and nothing is stored.
#[test_log::test(tokio::test)]
async fn cohort_deadline_without_cohort_is_rejected() {
    let harness = Harness::new();

    let result = harness
        .service
        .create_event(EventDraft {
            scope: EventScope::Cohort,
            start_at: Some(jan(20)),
            ..EventDraft::new(harness.organization_id, "Essay due", EventType::Deadline)
        })
        .await;

    match result {
        Err(ServiceError::ValidationError(reason)) => {
            assert_eq!(reason, "cohort scope requires a valid cohort_id");
        }
        other => panic!("expected a validation error, got {other:?}"),
    }

    let listed = harness
        .service
        .get_events(harness.organization_id, window(jan(1), jan(31)), 0, 0)
        .await
        .unwrap();
    assert!(listed.is_empty());
}

/// ## Summary
/// Moving an event to another organization fails and leaves it untouched.
#[test_log::test(tokio::test)]
async fn update_cannot_move_event_between_organizations() {
    let harness = Harness::new();
    let original = harness
        .service
        .create_event(EventDraft {
            start_at: Some(jan(3)),
            ..EventDraft::new(harness.organization_id, "Staff day", EventType::Holiday)
        })
        .await
        .unwrap();

    let moved = almanac_core::event::Event {
        organization_id: Uuid::now_v7(),
        title: "Hijacked".to_string(),
        ..original.clone()
    };
    let result = harness.service.update_event(moved).await;

    assert!(matches!(result, Err(ServiceError::InvariantViolation(_))));
    let stored = harness.service.get_event(original.id).await.unwrap();
    assert_eq!(stored, original);
}

/// ## Summary
/// Updates keep the creation time and advance the modification time.
#[test_log::test(tokio::test)]
async fn update_keeps_created_at() {
    let harness = Harness::new();
    let original = harness
        .service
        .create_event(EventDraft {
            start_at: Some(jan(3)),
            ..EventDraft::new(harness.organization_id, "Staff day", EventType::Holiday)
        })
        .await
        .unwrap();

    let updated = harness
        .service
        .update_event(almanac_core::event::Event {
            title: "Staff development day".to_string(),
            created_at: jan(1),
            ..original.clone()
        })
        .await
        .unwrap();

    assert_eq!(updated.title, "Staff development day");
    assert_eq!(updated.created_at, original.created_at);
    assert!(updated.updated_at >= original.updated_at);
}

/// ## Summary
/// Invalid replacements are rejected before the store is touched.
#[test_log::test(tokio::test)]
async fn update_validates_replacement() {
    let harness = Harness::new();
    let original = harness
        .service
        .create_event(EventDraft {
            start_at: Some(jan(3)),
            ..EventDraft::new(harness.organization_id, "Staff day", EventType::Holiday)
        })
        .await
        .unwrap();

    let result = harness
        .service
        .update_event(almanac_core::event::Event {
            title: "  ".to_string(),
            ..original.clone()
        })
        .await;

    assert!(matches!(result, Err(ServiceError::ValidationError(_))));
    assert_eq!(harness.store.raw(original.id), Some(original));
}

/// ## Summary
/// Deleted events disappear from reads but stay stored with a deletion time.
#[test_log::test(tokio::test)]
async fn delete_is_soft() {
    let harness = Harness::new();
    let event = harness
        .service
        .create_event(EventDraft {
            start_at: Some(jan(3)),
            ..EventDraft::new(harness.organization_id, "Staff day", EventType::Holiday)
        })
        .await
        .unwrap();

    harness.service.delete_event(event.id).await.unwrap();

    assert!(matches!(
        harness.service.get_event(event.id).await,
        Err(ServiceError::NotFound(_))
    ));
    assert!(matches!(
        harness.service.delete_event(event.id).await,
        Err(ServiceError::NotFound(_))
    ));
    let raw = harness.store.raw(event.id).expect("row is kept");
    assert!(raw.deleted_at.is_some());

    let listed = harness
        .service
        .get_events(harness.organization_id, window(jan(1), jan(31)), 0, 0)
        .await
        .unwrap();
    assert!(listed.is_empty());
}

/// ## Summary
/// Updating an unknown event is a not-found error.
#[test_log::test(tokio::test)]
async fn update_unknown_event_is_not_found() {
    let harness = Harness::new();
    let ghost = EventDraft {
        start_at: Some(jan(3)),
        ..EventDraft::new(harness.organization_id, "Ghost", EventType::Holiday)
    }
    .into_event(Uuid::now_v7(), chrono::Utc::now());

    assert!(matches!(
        harness.service.update_event(ghost).await,
        Err(ServiceError::NotFound(_))
    ));
}
