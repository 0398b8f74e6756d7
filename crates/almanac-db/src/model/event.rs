use chrono::{DateTime, Utc};
use diesel::{pg::Pg, prelude::*};
use uuid::Uuid;

use almanac_core::event::Event;

use crate::db::enums::{EventScope, EventType};
use crate::db::schema;

/// A row of the `event` table.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = schema::event)]
#[diesel(check_for_backend(Pg))]
pub struct EventRow {
    pub id: Uuid,
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
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Self {
            id: row.id,
            organization_id: row.organization_id,
            title: row.title,
            description: row.description,
            location: row.location,
            event_type: row.event_type.into(),
            color: row.color,
            start_at: row.start_at,
            end_at: row.end_at,
            is_all_day: row.is_all_day,
            recurrence_rule: row.recurrence_rule,
            scope: row.scope.into(),
            cohort_id: row.cohort_id,
            section_id: row.section_id,
            user_id: row.user_id,
            source_id: row.source_id,
            source_type: row.source_type,
            image_url: row.image_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        }
    }
}

/// Insert struct for new events. The id and audit timestamps are assigned by
/// the caller so the returned event matches what was written.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::event)]
pub struct NewEvent<'a> {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub title: &'a str,
    pub description: &'a str,
    pub location: &'a str,
    pub event_type: EventType,
    pub color: &'a str,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub is_all_day: bool,
    pub recurrence_rule: Option<&'a str>,
    pub scope: EventScope,
    pub cohort_id: Option<Uuid>,
    pub section_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub source_id: Option<Uuid>,
    pub source_type: Option<&'a str>,
    pub image_url: Option<&'a str>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> From<&'a Event> for NewEvent<'a> {
    fn from(event: &'a Event) -> Self {
        Self {
            id: event.id,
            organization_id: event.organization_id,
            title: &event.title,
            description: &event.description,
            location: &event.location,
            event_type: event.event_type.into(),
            color: &event.color,
            start_at: event.start_at,
            end_at: event.end_at,
            is_all_day: event.is_all_day,
            recurrence_rule: event.recurrence_rule.as_deref(),
            scope: event.scope.into(),
            cohort_id: event.cohort_id,
            section_id: event.section_id,
            user_id: event.user_id,
            source_id: event.source_id,
            source_type: event.source_type.as_deref(),
            image_url: event.image_url.as_deref(),
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}

/// Full replacement of the mutable columns of an event.
///
/// `organization_id`, `created_at` and `deleted_at` are absent on purpose: an
/// update never moves an event between tenants or revives it. `None` fields are
/// written as `NULL`.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = schema::event)]
#[diesel(treat_none_as_null = true)]
pub struct EventChangeset<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub location: &'a str,
    pub event_type: EventType,
    pub color: &'a str,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub is_all_day: bool,
    pub recurrence_rule: Option<&'a str>,
    pub scope: EventScope,
    pub cohort_id: Option<Uuid>,
    pub section_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub source_id: Option<Uuid>,
    pub source_type: Option<&'a str>,
    pub image_url: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> From<&'a Event> for EventChangeset<'a> {
    fn from(event: &'a Event) -> Self {
        Self {
            title: &event.title,
            description: &event.description,
            location: &event.location,
            event_type: event.event_type.into(),
            color: &event.color,
            start_at: event.start_at,
            end_at: event.end_at,
            is_all_day: event.is_all_day,
            recurrence_rule: event.recurrence_rule.as_deref(),
            scope: event.scope.into(),
            cohort_id: event.cohort_id,
            section_id: event.section_id,
            user_id: event.user_id,
            source_id: event.source_id,
            source_type: event.source_type.as_deref(),
            image_url: event.image_url.as_deref(),
            updated_at: event.updated_at,
        }
    }
}
