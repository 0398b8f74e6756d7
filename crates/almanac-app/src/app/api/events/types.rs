use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use almanac_core::constants::DEFAULT_EVENT_COLOR;
use almanac_core::event::{Event, EventDraft, TimeWindow};
use almanac_core::types::{EventScope, EventType};
use almanac_service::calendar::service::time_window;

use crate::error::{AppError, AppResult};

/// Query string of the listing endpoints. Times are RFC 3339.
#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

impl RangeQuery {
    /// ## Errors
    /// `AppError::BadRequest` when a bound is missing; a validation error when
    /// `start` is after `end`.
    pub fn window(&self) -> AppResult<TimeWindow> {
        let (Some(start), Some(end)) = (self.start, self.end) else {
            return Err(AppError::BadRequest(
                "start and end query parameters are required".to_string(),
            ));
        };
        time_window(start, end).map_err(AppError::from)
    }
}

/// Request body for creating or replacing an event.
#[derive(Debug, Clone, Deserialize)]
pub struct EventPayload {
    /// Defaults to the caller's organization.
    pub organization_id: Option<Uuid>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    pub event_type: EventType,
    pub color: Option<String>,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_all_day: bool,
    pub recurrence_rule: Option<String>,
    #[serde(default)]
    pub scope: EventScope,
    pub cohort_id: Option<Uuid>,
    pub section_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub source_id: Option<Uuid>,
    pub source_type: Option<String>,
    pub image_url: Option<String>,
}

impl EventPayload {
    #[must_use]
    pub fn into_draft(self, organization_id: Uuid) -> EventDraft {
        EventDraft {
            organization_id,
            title: self.title,
            description: self.description,
            location: self.location,
            event_type: self.event_type,
            color: self.color.unwrap_or_else(|| DEFAULT_EVENT_COLOR.to_string()),
            start_at: self.start_at,
            end_at: self.end_at,
            is_all_day: self.is_all_day,
            recurrence_rule: self.recurrence_rule,
            scope: self.scope,
            cohort_id: self.cohort_id,
            section_id: self.section_id,
            user_id: self.user_id,
            source_id: self.source_id,
            source_type: self.source_type,
            image_url: self.image_url,
        }
    }

    /// ## Summary
    /// The full replacement of `existing` described by this payload. An
    /// omitted organization keeps the existing one.
    #[must_use]
    pub fn into_replacement(self, existing: &Event) -> Event {
        let organization_id = self.organization_id.unwrap_or(existing.organization_id);
        let mut event = self
            .into_draft(organization_id)
            .into_event(existing.id, existing.updated_at);
        event.created_at = existing.created_at;
        event
    }
}
