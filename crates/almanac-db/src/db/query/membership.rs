//! Lookups over the tenancy and membership tables.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::db::connection::DbConnection;
use crate::db::enums::EnrollmentStatus;
use crate::db::schema::{app_user, cohort, cohort_member, enrollment, section, section_member};
use crate::model::directory::{Cohort, Section};

/// ## Summary
/// Returns the organization of a live user.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn organization_of_user(
    conn: &mut DbConnection<'_>,
    user_id: Uuid,
) -> QueryResult<Option<Uuid>> {
    app_user::table
        .filter(app_user::id.eq(user_id))
        .filter(app_user::deleted_at.is_null())
        .select(app_user::organization_id)
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Sections the user is actively enrolled in.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn enrolled_section_ids(
    conn: &mut DbConnection<'_>,
    user_id: Uuid,
) -> QueryResult<Vec<Uuid>> {
    enrollment::table
        .filter(enrollment::user_id.eq(user_id))
        .filter(enrollment::status.eq(EnrollmentStatus::Active))
        .select(enrollment::section_id)
        .distinct()
        .load(conn)
        .await
}

/// ## Summary
/// Sections the user is staffed on.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn staffed_section_ids(
    conn: &mut DbConnection<'_>,
    user_id: Uuid,
) -> QueryResult<Vec<Uuid>> {
    section_member::table
        .filter(section_member::user_id.eq(user_id))
        .select(section_member::section_id)
        .load(conn)
        .await
}

/// ## Summary
/// Cohorts the user belongs to.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn cohort_ids(conn: &mut DbConnection<'_>, user_id: Uuid) -> QueryResult<Vec<Uuid>> {
    cohort_member::table
        .filter(cohort_member::user_id.eq(user_id))
        .select(cohort_member::cohort_id)
        .load(conn)
        .await
}

/// ## Summary
/// Loads a live section.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn find_section(
    conn: &mut DbConnection<'_>,
    section_id: Uuid,
) -> QueryResult<Option<Section>> {
    section::table
        .filter(section::id.eq(section_id))
        .filter(section::deleted_at.is_null())
        .select(Section::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Loads a live cohort.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn find_cohort(
    conn: &mut DbConnection<'_>,
    cohort_id: Uuid,
) -> QueryResult<Option<Cohort>> {
    cohort::table
        .filter(cohort::id.eq(cohort_id))
        .filter(cohort::deleted_at.is_null())
        .select(Cohort::as_select())
        .first(conn)
        .await
        .optional()
}
