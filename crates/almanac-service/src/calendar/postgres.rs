//! Postgres implementations of the calendar storage seams.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use almanac_core::event::{Event, EventFilter};
use almanac_db::db::DbProvider;
use almanac_db::db::query::{event as event_query, membership};
use almanac_db::error::DbError;
use almanac_db::model::event::{EventChangeset, NewEvent};

use crate::calendar::ports::{
    CohortLookup, CohortRef, EnrollmentLookup, EventStore, OrganizationLookup, SectionRef,
    SectionStaffingLookup,
};
use crate::error::{ServiceError, ServiceResult};

#[derive(Clone)]
pub struct PgEventStore {
    db: Arc<dyn DbProvider>,
}

impl PgEventStore {
    #[must_use]
    pub fn new(db: Arc<dyn DbProvider>) -> Self {
        Self { db }
    }
}

fn event_not_found(id: Uuid) -> ServiceError {
    ServiceError::NotFound(format!("event {id}"))
}

#[async_trait]
impl EventStore for PgEventStore {
    #[tracing::instrument(skip(self, event), fields(event_id = %event.id))]
    async fn create(&self, event: &Event) -> ServiceResult<Event> {
        let mut conn = self.db.get_connection().await?;
        let row = event_query::insert(&mut conn, &NewEvent::from(event))
            .await
            .map_err(DbError::from)?;
        Ok(row.into())
    }

    #[tracing::instrument(skip(self, event), fields(event_id = %event.id))]
    async fn update(&self, event: &Event) -> ServiceResult<Event> {
        let mut conn = self.db.get_connection().await?;
        event_query::update(&mut conn, event.id, &EventChangeset::from(event))
            .await
            .map_err(DbError::from)?
            .map(Event::from)
            .ok_or_else(|| event_not_found(event.id))
    }

    #[tracing::instrument(skip(self))]
    async fn soft_delete(&self, id: Uuid, now: DateTime<Utc>) -> ServiceResult<()> {
        let mut conn = self.db.get_connection().await?;
        let deleted = event_query::soft_delete(&mut conn, id, now)
            .await
            .map_err(DbError::from)?;
        if deleted { Ok(()) } else { Err(event_not_found(id)) }
    }

    #[tracing::instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> ServiceResult<Event> {
        let mut conn = self.db.get_connection().await?;
        event_query::find_by_id(&mut conn, id)
            .await
            .map_err(DbError::from)?
            .map(Event::from)
            .ok_or_else(|| event_not_found(id))
    }

    #[tracing::instrument(skip(self, filter), fields(
        organization_id = %filter.organization_id,
        sections = filter.section_ids.len(),
        cohorts = filter.cohort_ids.len(),
        include_global = filter.include_global
    ))]
    async fn find(&self, filter: &EventFilter) -> ServiceResult<Vec<Event>> {
        if !filter.has_visibility() {
            return Ok(Vec::new());
        }

        let mut conn = self.db.get_connection().await?;
        let rows = event_query::find_visible(&mut conn, filter)
            .await
            .map_err(DbError::from)?;

        tracing::debug!(count = rows.len(), "Events loaded");
        Ok(rows.into_iter().map(Event::from).collect())
    }
}

/// Membership and hierarchy lookups over the tenancy tables.
#[derive(Clone)]
pub struct PgDirectory {
    db: Arc<dyn DbProvider>,
}

impl PgDirectory {
    #[must_use]
    pub fn new(db: Arc<dyn DbProvider>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrganizationLookup for PgDirectory {
    #[tracing::instrument(skip(self))]
    async fn get_id_for_user(&self, user_id: Uuid) -> ServiceResult<Uuid> {
        let mut conn = self.db.get_connection().await?;
        membership::organization_of_user(&mut conn, user_id)
            .await
            .map_err(DbError::from)?
            .ok_or_else(|| ServiceError::NotFound(format!("user {user_id}")))
    }
}

#[async_trait]
impl EnrollmentLookup for PgDirectory {
    #[tracing::instrument(skip(self))]
    async fn get_active_section_ids(&self, user_id: Uuid) -> ServiceResult<Vec<Uuid>> {
        let mut conn = self.db.get_connection().await?;
        membership::enrolled_section_ids(&mut conn, user_id)
            .await
            .map_err(|err| DbError::from(err).into())
    }
}

#[async_trait]
impl SectionStaffingLookup for PgDirectory {
    #[tracing::instrument(skip(self))]
    async fn get_section_ids(&self, user_id: Uuid) -> ServiceResult<Vec<Uuid>> {
        let mut conn = self.db.get_connection().await?;
        membership::staffed_section_ids(&mut conn, user_id)
            .await
            .map_err(|err| DbError::from(err).into())
    }

    #[tracing::instrument(skip(self))]
    async fn get_by_id(&self, section_id: Uuid) -> ServiceResult<SectionRef> {
        let mut conn = self.db.get_connection().await?;
        membership::find_section(&mut conn, section_id)
            .await
            .map_err(DbError::from)?
            .map(|section| SectionRef {
                id: section.id,
                cohort_id: section.cohort_id,
            })
            .ok_or_else(|| ServiceError::NotFound(format!("section {section_id}")))
    }
}

#[async_trait]
impl CohortLookup for PgDirectory {
    #[tracing::instrument(skip(self))]
    async fn get_ids_for_user(&self, user_id: Uuid) -> ServiceResult<Vec<Uuid>> {
        let mut conn = self.db.get_connection().await?;
        membership::cohort_ids(&mut conn, user_id)
            .await
            .map_err(|err| DbError::from(err).into())
    }

    #[tracing::instrument(skip(self))]
    async fn get_by_id(&self, cohort_id: Uuid) -> ServiceResult<CohortRef> {
        let mut conn = self.db.get_connection().await?;
        membership::find_cohort(&mut conn, cohort_id)
            .await
            .map_err(DbError::from)?
            .map(|cohort| CohortRef {
                id: cohort.id,
                organization_id: cohort.organization_id,
            })
            .ok_or_else(|| ServiceError::NotFound(format!("cohort {cohort_id}")))
    }
}
