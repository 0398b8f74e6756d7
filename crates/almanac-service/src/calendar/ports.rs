//! Storage seams of the calendar service.
//!
//! Every trait is object safe and used behind `Arc<dyn _>`, so the Postgres
//! adapters and in-memory test doubles are interchangeable.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use almanac_core::event::{Event, EventFilter};

use crate::error::ServiceResult;

/// Persistence for events.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Stores a new, already validated event and returns the stored record.
    async fn create(&self, event: &Event) -> ServiceResult<Event>;

    /// Replaces a live event. `ServiceError::NotFound` when no live event has the id.
    async fn update(&self, event: &Event) -> ServiceResult<Event>;

    /// `ServiceError::NotFound` when no live event has the id.
    async fn soft_delete(&self, id: Uuid, now: DateTime<Utc>) -> ServiceResult<()>;

    /// `ServiceError::NotFound` for unknown or deleted events.
    async fn get_by_id(&self, id: Uuid) -> ServiceResult<Event>;

    /// Live events visible under `filter`, ordered by start time then title.
    async fn find(&self, filter: &EventFilter) -> ServiceResult<Vec<Event>>;
}

#[async_trait]
pub trait OrganizationLookup: Send + Sync {
    /// `ServiceError::NotFound` when the user does not exist or is deleted.
    async fn get_id_for_user(&self, user_id: Uuid) -> ServiceResult<Uuid>;
}

#[async_trait]
pub trait EnrollmentLookup: Send + Sync {
    async fn get_active_section_ids(&self, user_id: Uuid) -> ServiceResult<Vec<Uuid>>;
}

/// Section staffing plus the section's place in the cohort hierarchy.
#[async_trait]
pub trait SectionStaffingLookup: Send + Sync {
    async fn get_section_ids(&self, user_id: Uuid) -> ServiceResult<Vec<Uuid>>;

    async fn get_by_id(&self, section_id: Uuid) -> ServiceResult<SectionRef>;
}

#[async_trait]
pub trait CohortLookup: Send + Sync {
    async fn get_ids_for_user(&self, user_id: Uuid) -> ServiceResult<Vec<Uuid>>;

    async fn get_by_id(&self, cohort_id: Uuid) -> ServiceResult<CohortRef>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionRef {
    pub id: Uuid,
    pub cohort_id: Uuid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CohortRef {
    pub id: Uuid,
    pub organization_id: Uuid,
}

/// The membership lookups the scope resolver and the schedule read consult.
#[derive(Clone)]
pub struct Lookups {
    pub organizations: Arc<dyn OrganizationLookup>,
    pub enrollments: Arc<dyn EnrollmentLookup>,
    pub staffing: Arc<dyn SectionStaffingLookup>,
    pub cohorts: Arc<dyn CohortLookup>,
}

impl Lookups {
    /// ## Summary
    /// Uses one directory for every lookup.
    #[must_use]
    pub fn from_directory<D>(directory: Arc<D>) -> Self
    where
        D: OrganizationLookup
            + EnrollmentLookup
            + SectionStaffingLookup
            + CohortLookup
            + 'static,
    {
        Self {
            organizations: directory.clone(),
            enrollments: directory.clone(),
            staffing: directory.clone(),
            cohorts: directory,
        }
    }
}
