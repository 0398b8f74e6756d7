//! Calendar orchestration: validated writes, scoped reads and cache upkeep.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing_futures::Instrument;
use uuid::Uuid;

use almanac_core::constants::{
    DEFAULT_ANNOUNCEMENT_LIMIT, DEFAULT_CALENDAR_CACHE_TTL, DEFAULT_EVENT_LIMIT,
    DEFAULT_SECTION_SCHEDULE_LIMIT,
};
use almanac_core::event::{Event, EventDraft, EventFilter, TimeWindow};
use almanac_core::types::EventType;

use crate::calendar::cache::{CalendarCache, calendar_key, viewer_pattern};
use crate::calendar::ports::{EventStore, Lookups};
use crate::calendar::scope::resolve_viewer_scopes;
use crate::error::{ServiceError, ServiceResult};

/// Entry point for every calendar operation.
///
/// Writes validate before touching the store. Personal calendars are served
/// cache-aside; the other listings always read through to the store.
#[derive(Clone)]
pub struct CalendarService {
    events: Arc<dyn EventStore>,
    lookups: Lookups,
    cache: Arc<dyn CalendarCache>,
    cache_ttl: Duration,
}

impl CalendarService {
    #[must_use]
    pub fn new(events: Arc<dyn EventStore>, lookups: Lookups, cache: Arc<dyn CalendarCache>) -> Self {
        Self {
            events,
            lookups,
            cache,
            cache_ttl: DEFAULT_CALENDAR_CACHE_TTL,
        }
    }

    #[must_use]
    pub const fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    #[must_use]
    pub const fn lookups(&self) -> &Lookups {
        &self.lookups
    }

    /// ## Summary
    /// Creates an event from a draft, assigning its id and audit timestamps.
    ///
    /// A personal event drops its owner's cached calendars so the owner reads
    /// their own write.
    ///
    /// ## Errors
    /// `ServiceError::ValidationError` when the draft breaks an event invariant;
    /// store errors otherwise. Nothing is written on validation failure.
    #[tracing::instrument(skip(self, draft), fields(
        organization_id = %draft.organization_id,
        event_type = %draft.event_type,
        scope = %draft.scope
    ))]
    pub async fn create_event(&self, draft: EventDraft) -> ServiceResult<Event> {
        let event = draft.into_event(Uuid::now_v7(), Utc::now());
        event.validate()?;

        let stored = self.events.create(&event).await?;
        tracing::debug!(event_id = %stored.id, "Event created");

        if let Some(owner) = stored.personal_owner() {
            self.invalidate_viewer(owner).await;
        }

        Ok(stored)
    }

    /// ## Summary
    /// Replaces a live event with `event`, keeping its creation time.
    ///
    /// When the stored event is personal, the owner's cached calendars are
    /// dropped before returning so the owner reads their own write. Other
    /// scopes leave cached calendars to expire.
    ///
    /// ## Errors
    /// `ServiceError::ValidationError` for an invalid record,
    /// `ServiceError::NotFound` when no live event has the id, and
    /// `ServiceError::InvariantViolation` when the organization would change.
    #[tracing::instrument(skip(self, event), fields(event_id = %event.id, scope = %event.scope))]
    pub async fn update_event(&self, event: Event) -> ServiceResult<Event> {
        event.validate()?;

        let existing = self.events.get_by_id(event.id).await?;
        if existing.organization_id != event.organization_id {
            return Err(ServiceError::InvariantViolation(
                "event organization cannot be changed",
            ));
        }

        let replacement = Event {
            created_at: existing.created_at,
            updated_at: Utc::now(),
            deleted_at: None,
            ..event
        };
        let stored = self.events.update(&replacement).await?;

        if let Some(owner) = stored.personal_owner() {
            self.invalidate_viewer(owner).await;
        }

        Ok(stored)
    }

    /// ## Summary
    /// Soft-deletes an event. Cached calendars are left to expire.
    ///
    /// ## Errors
    /// `ServiceError::NotFound` when no live event has the id.
    #[tracing::instrument(skip(self))]
    pub async fn delete_event(&self, id: Uuid) -> ServiceResult<()> {
        self.events.soft_delete(id, Utc::now()).await
    }

    /// ## Errors
    /// `ServiceError::NotFound` for unknown or deleted events.
    #[tracing::instrument(skip(self))]
    pub async fn get_event(&self, id: Uuid) -> ServiceResult<Event> {
        self.events.get_by_id(id).await
    }

    /// ## Summary
    /// Returns the organization a user belongs to.
    ///
    /// ## Errors
    /// `ServiceError::NotFound` when the user does not exist or is deleted.
    #[tracing::instrument(skip(self))]
    pub async fn organization_for_user(&self, user_id: Uuid) -> ServiceResult<Uuid> {
        self.lookups.organizations.get_id_for_user(user_id).await
    }

    /// ## Summary
    /// Everything `viewer_id` can see in `window`: global events of their
    /// organization, their personal events, and the events of their sections and
    /// cohorts.
    ///
    /// Served from the cache when an entry for exactly this window exists.
    /// Otherwise the result is computed, returned, and written back to the cache
    /// by a detached task. Cache failures only cost a recomputation.
    ///
    /// ## Errors
    /// `ServiceError::NotFound` for an unknown viewer; event store errors.
    #[tracing::instrument(skip(self, window), fields(start = %window.start, end = %window.end))]
    pub async fn get_calendar_for_user(
        &self,
        viewer_id: Uuid,
        window: TimeWindow,
    ) -> ServiceResult<Vec<Event>> {
        let key = calendar_key(viewer_id, &window);

        if let Some(events) = self.read_cached(&key).await {
            return Ok(events);
        }

        let scopes = resolve_viewer_scopes(&self.lookups, viewer_id).await?;
        let filter = EventFilter {
            viewer_id: Some(viewer_id),
            section_ids: scopes.section_ids.into_iter().collect(),
            cohort_ids: scopes.cohort_ids.into_iter().collect(),
            limit: DEFAULT_EVENT_LIMIT,
            ..EventFilter::new(scopes.organization_id, window)
        };
        let events = self.events.find(&filter).await?;

        self.spawn_cache_fill(key, events.clone());
        Ok(events)
    }

    /// ## Summary
    /// The events published to one section, without global events.
    ///
    /// ## Errors
    /// `ServiceError::NotFound` when the section or its cohort is missing.
    #[tracing::instrument(skip(self, window), fields(start = %window.start, end = %window.end))]
    pub async fn get_section_schedule(
        &self,
        section_id: Uuid,
        window: TimeWindow,
    ) -> ServiceResult<Vec<Event>> {
        let organization_id = self.section_organization(section_id).await?;

        let filter = EventFilter {
            section_ids: vec![section_id],
            include_global: false,
            limit: DEFAULT_SECTION_SCHEDULE_LIMIT,
            ..EventFilter::new(organization_id, window)
        };
        self.events.find(&filter).await
    }

    /// ## Summary
    /// Follows section to cohort to organization.
    ///
    /// ## Errors
    /// `ServiceError::NotFound` when the section or its cohort is missing.
    #[tracing::instrument(skip(self))]
    pub async fn section_organization(&self, section_id: Uuid) -> ServiceResult<Uuid> {
        let section = self.lookups.staffing.get_by_id(section_id).await?;
        let cohort = self.lookups.cohorts.get_by_id(section.cohort_id).await?;
        Ok(cohort.organization_id)
    }

    /// ## Summary
    /// Global announcements of an organization. A non-positive `limit` returns
    /// up to 10.
    ///
    /// ## Errors
    /// Event store errors.
    #[tracing::instrument(skip(self, window), fields(start = %window.start, end = %window.end))]
    pub async fn get_announcements(
        &self,
        organization_id: Uuid,
        window: TimeWindow,
        limit: i64,
        offset: i64,
    ) -> ServiceResult<Vec<Event>> {
        let filter = EventFilter {
            types: vec![EventType::Announcement],
            limit: if limit > 0 { limit } else { DEFAULT_ANNOUNCEMENT_LIMIT },
            offset,
            ..EventFilter::new(organization_id, window)
        };
        self.events.find(&filter).await
    }

    /// ## Summary
    /// Global events of an organization, of every type. A non-positive `limit`
    /// returns up to 50.
    ///
    /// ## Errors
    /// Event store errors.
    #[tracing::instrument(skip(self, window), fields(start = %window.start, end = %window.end))]
    pub async fn get_events(
        &self,
        organization_id: Uuid,
        window: TimeWindow,
        limit: i64,
        offset: i64,
    ) -> ServiceResult<Vec<Event>> {
        let filter = EventFilter {
            limit,
            offset,
            ..EventFilter::new(organization_id, window)
        };
        self.events.find(&filter).await
    }

    async fn read_cached(&self, key: &str) -> Option<Vec<Event>> {
        match self.cache.get(key).await {
            Ok(Some(bytes)) => match serde_json::from_slice(&bytes) {
                Ok(events) => {
                    tracing::debug!(%key, "Calendar cache hit");
                    Some(events)
                }
                Err(err) => {
                    tracing::warn!(%key, error = %err, "Discarding undecodable cache entry");
                    None
                }
            },
            Ok(None) => {
                tracing::debug!(%key, "Calendar cache miss");
                None
            }
            Err(err) => {
                tracing::warn!(%key, error = %err, "Calendar cache read failed");
                None
            }
        }
    }

    fn spawn_cache_fill(&self, key: String, events: Vec<Event>) {
        let cache = Arc::clone(&self.cache);
        let ttl = self.cache_ttl;

        tokio::spawn(
            async move {
                let bytes = match serde_json::to_vec(&events) {
                    Ok(bytes) => bytes,
                    Err(err) => {
                        tracing::warn!(%key, error = %err, "Failed to encode calendar for caching");
                        return;
                    }
                };
                if let Err(err) = cache.set(&key, bytes, ttl).await {
                    tracing::warn!(%key, error = %err, "Failed to populate calendar cache");
                }
            }
            .instrument(tracing::Span::current()),
        );
    }

    async fn invalidate_viewer(&self, viewer_id: Uuid) {
        match self.cache.scan_and_delete(&viewer_pattern(viewer_id)).await {
            Ok(removed) => {
                tracing::debug!(%viewer_id, removed, "Invalidated viewer calendars");
            }
            Err(err) => {
                tracing::warn!(%viewer_id, error = %err, "Failed to invalidate viewer calendars");
            }
        }
    }
}

/// ## Summary
/// Builds a time window from request bounds.
///
/// ## Errors
/// `ServiceError::ValidationError` when `start` is after `end`.
pub fn time_window(start: DateTime<Utc>, end: DateTime<Utc>) -> ServiceResult<TimeWindow> {
    if start > end {
        return Err(ServiceError::ValidationError(
            "start must not be after end".to_string(),
        ));
    }
    Ok(TimeWindow::new(start, end))
}
