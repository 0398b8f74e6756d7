#![allow(clippy::expect_used, clippy::unwrap_used)]
//! Viewer scope resolution against the directory.

use uuid::Uuid;

use almanac_core::event::EventDraft;
use almanac_core::types::{EventScope, EventType};
use almanac_service::calendar::resolve_viewer_scopes;
use almanac_service::error::ServiceError;
use almanac_test::{Harness, Lookup, jan, window};

fn section_event(harness: &Harness, section: Uuid, title: &str) -> EventDraft {
    EventDraft {
        scope: EventScope::Section,
        section_id: Some(section),
        start_at: Some(jan(8)),
        ..EventDraft::new(harness.organization_id, title, EventType::Deadline)
    }
}

/// ## Summary
/// Enrolled and staffed sections merge into one set of section ids.
#[test_log::test(tokio::test)]
async fn scopes_union_enrolled_and_staffed_sections() {
    let harness = Harness::new();
    let viewer = harness.user();
    let taking = harness.section();
    let teaching = harness.section();
    let cohort = harness.cohort();
    harness.directory.enroll(viewer, taking);
    harness.directory.staff(viewer, teaching);
    harness.directory.staff(viewer, taking);
    harness.directory.join_cohort(viewer, cohort);

    let scopes = resolve_viewer_scopes(harness.service.lookups(), viewer)
        .await
        .unwrap();

    assert_eq!(scopes.organization_id, harness.organization_id);
    assert_eq!(scopes.section_ids.len(), 2);
    assert!(scopes.section_ids.contains(&taking));
    assert!(scopes.section_ids.contains(&teaching));
    assert_eq!(scopes.cohort_ids.into_iter().collect::<Vec<_>>(), [cohort]);
}

/// ## Summary
/// Events from enrolled and staffed sections come back in one listing,
/// ordered by start time then title.
#[test_log::test(tokio::test)]
async fn calendar_orders_events_across_section_branches() {
    let harness = Harness::new();
    let viewer = harness.user();
    let taking = harness.section();
    let teaching = harness.section();
    harness.directory.enroll(viewer, taking);
    harness.directory.staff(viewer, taking);
    harness.directory.staff(viewer, teaching);

    for (section, title) in [(taking, "Homework 1"), (teaching, "Grading due")] {
        harness
            .service
            .create_event(section_event(&harness, section, title))
            .await
            .unwrap();
    }

    let events = harness
        .service
        .get_calendar_for_user(viewer, window(jan(1), jan(31)))
        .await
        .unwrap();

    let titles: Vec<_> = events.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, ["Grading due", "Homework 1"]);
}

/// ## Summary
/// A failing membership lookup drops its events but not the rest.
#[test_log::test(tokio::test)]
async fn failing_membership_lookup_degrades_to_empty() {
    let harness = Harness::new();
    let viewer = harness.user();
    let taking = harness.section();
    let cohort = harness.cohort();
    harness.directory.enroll(viewer, taking);
    harness.directory.join_cohort(viewer, cohort);
    harness.directory.fail(Lookup::Enrollment);

    harness
        .service
        .create_event(section_event(&harness, taking, "Homework 1"))
        .await
        .unwrap();
    harness
        .service
        .create_event(EventDraft {
            scope: EventScope::Cohort,
            cohort_id: Some(cohort),
            start_at: Some(jan(9)),
            ..EventDraft::new(harness.organization_id, "Cohort mixer", EventType::Vanilla)
        })
        .await
        .unwrap();

    let events = harness
        .service
        .get_calendar_for_user(viewer, window(jan(1), jan(31)))
        .await
        .expect("degraded lookups still answer");

    let titles: Vec<_> = events.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, ["Cohort mixer"]);
}

/// ## Summary
/// The organization lookup is not optional.
#[test_log::test(tokio::test)]
async fn failing_organization_lookup_fails_the_read() {
    let harness = Harness::new();
    let viewer = harness.user();
    harness.directory.fail(Lookup::Organization);

    let result = harness
        .service
        .get_calendar_for_user(viewer, window(jan(1), jan(31)))
        .await;

    assert!(matches!(result, Err(ServiceError::StoreUnavailable(_))));
}

/// ## Summary
/// Unknown and removed viewers are not found.
#[test_log::test(tokio::test)]
async fn unknown_viewer_is_not_found() {
    let harness = Harness::new();
    let viewer = harness.user();
    harness.directory.remove_user(viewer);

    for user in [viewer, Uuid::now_v7()] {
        let result = harness
            .service
            .get_calendar_for_user(user, window(jan(1), jan(31)))
            .await;
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }
}

/// ## Summary
/// A viewer in a different organization sees none of this organization's events.
#[test_log::test(tokio::test)]
async fn organizations_are_isolated() {
    let harness = Harness::new();
    let outsider = Uuid::now_v7();
    harness.directory.add_user(outsider, Uuid::now_v7());

    harness
        .service
        .create_event(EventDraft {
            start_at: Some(jan(1)),
            ..EventDraft::new(harness.organization_id, "New Year", EventType::Holiday)
        })
        .await
        .unwrap();

    let events = harness
        .service
        .get_calendar_for_user(outsider, window(jan(1), jan(31)))
        .await
        .unwrap();
    assert!(events.is_empty());
}
