//! The calendar event record and its construction.

pub mod filter;
pub mod validate;


use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::DEFAULT_EVENT_COLOR;
use crate::types::{EventScope, EventType};

pub use filter::{EventFilter, TimeWindow};
pub use validate::validate;

/// A single calendar entry, visible to the audience named by `scope`.
///
/// Exactly one of `cohort_id`, `section_id` or `user_id` is meaningful, selected by
/// `scope`; a `global` event ignores all three.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub organization_id: Uuid,

    pub title: String,
    pub description: String,
    pub location: String,
    pub event_type: EventType,
    /// Hex display color.
    pub color: String,

    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub is_all_day: bool,
    /// Stored verbatim; never expanded here.
    pub recurrence_rule: Option<String>,

    pub scope: EventScope,
    pub cohort_id: Option<Uuid>,
    pub section_id: Option<Uuid>,
    pub user_id: Option<Uuid>,

    pub source_id: Option<Uuid>,
    pub source_type: Option<String>,

    pub image_url: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Event {
    /// ## Summary
    /// Checks the structural invariants of this event.
    ///
    /// ## Errors
    /// Returns `CoreError::ValidationError` describing the first violated invariant.
    pub fn validate(&self) -> crate::error::CoreResult<()> {
        validate::validate(self)
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }

    /// ## Summary
    /// Returns the user whose personal calendar this event belongs to, if any.
    #[must_use]
    pub fn personal_owner(&self) -> Option<Uuid> {
        match self.scope {
            EventScope::Personal => self.user_id.filter(|id| !id.is_nil()),
            EventScope::Global | EventScope::Cohort | EventScope::Section => None,
        }
    }
}

/// Everything a caller supplies to create an event.
///
/// Start from [`EventDraft::new`] and override fields with struct update syntax:
///
/// ```
/// use almanac_core::event::EventDraft;
/// use almanac_core::types::{EventScope, EventType};
///
/// let org = uuid::Uuid::now_v7();
/// let section = uuid::Uuid::now_v7();
/// let draft = EventDraft {
///     scope: EventScope::Section,
///     section_id: Some(section),
///     ..EventDraft::new(org, "Algebra I", EventType::Vanilla)
/// };
/// assert_eq!(draft.color, "#3B82F6");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDraft {
    pub organization_id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    pub event_type: EventType,
    pub color: String,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub is_all_day: bool,
    pub recurrence_rule: Option<String>,
    pub scope: EventScope,
    pub cohort_id: Option<Uuid>,
    pub section_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub source_id: Option<Uuid>,
    pub source_type: Option<String>,
    pub image_url: Option<String>,
}

impl EventDraft {
    /// ## Summary
    /// Creates a global draft with the default color and no times set.
    #[must_use]
    pub fn new(organization_id: Uuid, title: impl Into<String>, event_type: EventType) -> Self {
        Self {
            organization_id,
            title: title.into(),
            description: String::new(),
            location: String::new(),
            event_type,
            color: DEFAULT_EVENT_COLOR.to_string(),
            start_at: None,
            end_at: None,
            is_all_day: false,
            recurrence_rule: None,
            scope: EventScope::Global,
            cohort_id: None,
            section_id: None,
            user_id: None,
            source_id: None,
            source_type: None,
            image_url: None,
        }
    }

    /// ## Summary
    /// Materializes the draft as an active event stamped with `now`.
    #[must_use]
    pub fn into_event(self, id: Uuid, now: DateTime<Utc>) -> Event {
        Event {
            id,
            organization_id: self.organization_id,
            title: self.title,
            description: self.description,
            location: self.location,
            event_type: self.event_type,
            color: self.color,
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
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }
}
