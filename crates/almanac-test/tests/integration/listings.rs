#![allow(clippy::expect_used, clippy::unwrap_used)]
//! Organization listings and section schedules.

use uuid::Uuid;

use almanac_core::event::EventDraft;
use almanac_core::types::{EventScope, EventType};
use almanac_service::error::ServiceError;
use almanac_test::{Harness, at, jan, window};

/// ## Summary
/// Announcements default to ten, newest-start order is ascending, and only
/// announcements are returned.
#[test_log::test(tokio::test)]
async fn announcements_default_to_ten() {
    let harness = Harness::new();
    let org = harness.organization_id;

    for day in 1..=12 {
        harness
            .service
            .create_event(EventDraft {
                start_at: Some(jan(day)),
                ..EventDraft::new(org, format!("Bulletin {day:02}"), EventType::Announcement)
            })
            .await
            .unwrap();
    }
    harness
        .service
        .create_event(EventDraft {
            start_at: Some(jan(2)),
            ..EventDraft::new(org, "Closed", EventType::Holiday)
        })
        .await
        .unwrap();

    let january = window(jan(1), jan(31));
    let first_page = harness
        .service
        .get_announcements(org, january, 0, 0)
        .await
        .unwrap();
    assert_eq!(first_page.len(), 10);
    assert!(first_page.iter().all(|e| e.event_type == EventType::Announcement));
    assert_eq!(first_page[0].title, "Bulletin 01");

    let rest = harness
        .service
        .get_announcements(org, january, 10, 10)
        .await
        .unwrap();
    let titles: Vec<_> = rest.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, ["Bulletin 11", "Bulletin 12"]);
}

/// ## Summary
/// Organization listings return global events only, paged.
#[test_log::test(tokio::test)]
async fn organization_listing_excludes_scoped_events() {
    let harness = Harness::new();
    let org = harness.organization_id;
    let section = harness.section();

    harness
        .service
        .create_event(EventDraft {
            start_at: Some(jan(1)),
            ..EventDraft::new(org, "New Year", EventType::Holiday)
        })
        .await
        .unwrap();
    harness
        .service
        .create_event(EventDraft {
            scope: EventScope::Section,
            section_id: Some(section),
            start_at: Some(jan(4)),
            ..EventDraft::new(org, "Quiz", EventType::Deadline)
        })
        .await
        .unwrap();

    let events = harness
        .service
        .get_events(org, window(jan(1), jan(31)), 0, 0)
        .await
        .unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].title, "New Year");

    let beyond = harness
        .service
        .get_events(org, window(jan(1), jan(31)), 5, 1)
        .await
        .unwrap();
    assert!(beyond.is_empty());
}

/// ## Summary
/// A section schedule has the section's events and no global ones.
#[test_log::test(tokio::test)]
async fn section_schedule_excludes_global_events() {
    let harness = Harness::new();
    let org = harness.organization_id;
    let section = harness.section();
    let other_section = harness.section();

    for (target, title) in [(section, "Algebra I"), (other_section, "Biology")] {
        harness
            .service
            .create_event(EventDraft {
                scope: EventScope::Section,
                section_id: Some(target),
                start_at: Some(at(12, 8, 0)),
                end_at: Some(at(12, 8, 45)),
                ..EventDraft::new(org, title, EventType::Schedule)
            })
            .await
            .unwrap();
    }
    harness
        .service
        .create_event(EventDraft {
            start_at: Some(jan(12)),
            ..EventDraft::new(org, "Founders day", EventType::Holiday)
        })
        .await
        .unwrap();

    let schedule = harness
        .service
        .get_section_schedule(section, window(jan(12), jan(13)))
        .await
        .unwrap();

    let titles: Vec<_> = schedule.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, ["Algebra I"]);
    assert_eq!(harness.service.section_organization(section).await.unwrap(), org);
}

/// ## Summary
/// Unknown sections are not found.
#[test_log::test(tokio::test)]
async fn unknown_section_schedule_is_not_found() {
    let harness = Harness::new();
    let result = harness
        .service
        .get_section_schedule(Uuid::now_v7(), window(jan(1), jan(31)))
        .await;
    assert!(matches!(result, Err(ServiceError::NotFound(_))));
}

/// ## Summary
/// Store outages surface as transient errors.
#[test_log::test(tokio::test)]
async fn store_outage_is_transient() {
    let harness = Harness::new();
    harness.store.set_unavailable(true);

    let result = harness
        .service
        .get_events(harness.organization_id, window(jan(1), jan(31)), 0, 0)
        .await;

    let err = result.expect_err("store is offline");
    assert!(err.is_transient());
}
