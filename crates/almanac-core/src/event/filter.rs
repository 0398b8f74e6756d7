//! Query parameters for event lookups and the visibility rules they encode.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::DEFAULT_EVENT_LIMIT;
use crate::event::Event;
use crate::types::{EventScope, EventType};

/// Inclusive time range a caller asks events for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    #[must_use]
    pub const fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// ## Summary
    /// Interval overlap test. An event without an end is open-ended and overlaps
    /// every window that ends at or after its start; an event without a start
    /// never matches.
    #[must_use]
    pub fn overlaps(&self, start_at: Option<DateTime<Utc>>, end_at: Option<DateTime<Utc>>) -> bool {
        let Some(start_at) = start_at else {
            return false;
        };
        start_at <= self.end && end_at.is_none_or(|end_at| end_at >= self.start)
    }
}

/// Filter consumed by `EventStore::find`.
///
/// The result is the union of the visibility branches that have input: global
/// events (when `include_global`), the viewer's personal events, events of the
/// listed sections and events of the listed cohorts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFilter {
    pub organization_id: Uuid,
    pub viewer_id: Option<Uuid>,
    pub section_ids: Vec<Uuid>,
    pub cohort_ids: Vec<Uuid>,
    pub include_global: bool,
    /// Empty means every type.
    pub types: Vec<EventType>,
    pub window: TimeWindow,
    /// Zero or negative selects [`DEFAULT_EVENT_LIMIT`].
    pub limit: i64,
    pub offset: i64,
}

impl EventFilter {
    /// ## Summary
    /// Creates a filter that sees only global events of the organization.
    #[must_use]
    pub const fn new(organization_id: Uuid, window: TimeWindow) -> Self {
        Self {
            organization_id,
            viewer_id: None,
            section_ids: Vec::new(),
            cohort_ids: Vec::new(),
            include_global: true,
            types: Vec::new(),
            window,
            limit: 0,
            offset: 0,
        }
    }

    #[must_use]
    pub const fn effective_limit(&self) -> i64 {
        if self.limit <= 0 {
            DEFAULT_EVENT_LIMIT
        } else {
            self.limit
        }
    }

    #[must_use]
    pub const fn effective_offset(&self) -> i64 {
        if self.offset < 0 { 0 } else { self.offset }
    }

    /// The viewer for the personal branch; a nil id counts as no viewer.
    #[must_use]
    pub fn personal_viewer(&self) -> Option<Uuid> {
        self.viewer_id.filter(|id| !id.is_nil())
    }

    /// ## Summary
    /// Returns `false` when every visibility branch would be omitted, meaning no
    /// event can match and no query needs to run.
    #[must_use]
    pub fn has_visibility(&self) -> bool {
        self.include_global
            || self.personal_viewer().is_some()
            || !self.section_ids.is_empty()
            || !self.cohort_ids.is_empty()
    }

    /// ## Summary
    /// Evaluates the filter against a single event, with the same semantics the
    /// database query applies. Pagination is not considered.
    #[must_use]
    pub fn matches(&self, event: &Event) -> bool {
        event.is_active()
            && event.organization_id == self.organization_id
            && (self.types.is_empty() || self.types.contains(&event.event_type))
            && self.window.overlaps(event.start_at, event.end_at)
            && self.is_visible(event)
    }

    fn is_visible(&self, event: &Event) -> bool {
        match event.scope {
            EventScope::Global => self.include_global,
            EventScope::Personal => self
                .personal_viewer()
                .is_some_and(|viewer| event.user_id == Some(viewer)),
            EventScope::Section => event
                .section_id
                .is_some_and(|id| self.section_ids.contains(&id)),
            EventScope::Cohort => event
                .cohort_id
                .is_some_and(|id| self.cohort_ids.contains(&id)),
        }
    }
}

/// Orders events by start time, then title, the order every listing returns.
pub fn sort_for_listing(events: &mut [Event]) {
    events.sort_by(|a, b| {
        a.start_at
            .cmp(&b.start_at)
            .then_with(|| a.title.cmp(&b.title))
    });
}
