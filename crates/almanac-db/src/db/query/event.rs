//! Query composition for `event`.

use chrono::{DateTime, Utc};
use diesel::dsl::{Eq, Filter, IntoBoxed, IsNull};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::Bool;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use almanac_core::event::EventFilter;

use crate::db::connection::DbConnection;
use crate::db::enums::{EventScope, EventType};
use crate::db::schema::event;
use crate::model::event::{EventChangeset, EventRow, NewEvent};

type VisibilityBranch = Box<dyn BoxableExpression<event::table, Pg, SqlType = Bool>>;

pub type BoxedEventQuery = IntoBoxed<'static, event::table, Pg>;

type ById = Filter<Filter<event::table, Eq<event::id, Uuid>>, IsNull<event::deleted_at>>;

/// ## Summary
/// Inserts an event and returns the stored row.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn insert(conn: &mut DbConnection<'_>, new_event: &NewEvent<'_>) -> QueryResult<EventRow> {
    diesel::insert_into(event::table)
        .values(new_event)
        .returning(EventRow::as_returning())
        .get_result(conn)
        .await
}

/// ## Summary
/// Replaces the mutable columns of a live event. Returns `None` when no live
/// event has this id.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn update(
    conn: &mut DbConnection<'_>,
    id: Uuid,
    changes: &EventChangeset<'_>,
) -> QueryResult<Option<EventRow>> {
    diesel::update(by_id(id))
        .set(changes)
        .returning(EventRow::as_returning())
        .get_result(conn)
        .await
        .optional()
}

/// ## Summary
/// Marks a live event deleted. Returns `false` when no live event has this id.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn soft_delete(
    conn: &mut DbConnection<'_>,
    id: Uuid,
    now: DateTime<Utc>,
) -> QueryResult<bool> {
    let affected = diesel::update(by_id(id))
        .set((event::deleted_at.eq(Some(now)), event::updated_at.eq(now)))
        .execute(conn)
        .await?;
    Ok(affected > 0)
}

/// ## Summary
/// Loads a live event by id.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn find_by_id(conn: &mut DbConnection<'_>, id: Uuid) -> QueryResult<Option<EventRow>> {
    by_id(id)
        .select(EventRow::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Loads the events visible under `filter`, ordered by start time then title.
/// Issues no query when the filter has no visibility branch.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn find_visible(
    conn: &mut DbConnection<'_>,
    filter: &EventFilter,
) -> QueryResult<Vec<EventRow>> {
    let Some(query) = visible(filter) else {
        return Ok(Vec::new());
    };
    query.select(EventRow::as_select()).load(conn).await
}

/// Live events with the given id.
#[must_use]
pub fn by_id(id: Uuid) -> ById {
    event::table
        .filter(event::id.eq(id))
        .filter(event::deleted_at.is_null())
}

/// ## Summary
/// Builds the listing query for `filter`.
///
/// The visibility branches (global, the viewer's personal events, the listed
/// sections, the listed cohorts) are OR-ed into a single predicate, so an event
/// reachable through several branches is returned once. Branches without input
/// are left out; `None` means no branch remains.
#[must_use]
pub fn visible(filter: &EventFilter) -> Option<BoxedEventQuery> {
    let visibility = visibility_predicate(filter)?;

    let mut query = event::table
        .into_boxed()
        .filter(event::organization_id.eq(filter.organization_id))
        .filter(event::deleted_at.is_null())
        .filter(visibility)
        .filter(event::start_at.le(filter.window.end))
        .filter(
            event::end_at
                .ge(filter.window.start)
                .or(event::end_at.is_null()),
        );

    if !filter.types.is_empty() {
        let types: Vec<EventType> = filter.types.iter().copied().map(EventType::from).collect();
        query = query.filter(event::event_type.eq_any(types));
    }

    Some(
        query
            .order_by((event::start_at.asc(), event::title.asc()))
            .limit(filter.effective_limit())
            .offset(filter.effective_offset()),
    )
}

fn visibility_predicate(filter: &EventFilter) -> Option<VisibilityBranch> {
    let mut branches: Vec<VisibilityBranch> = Vec::with_capacity(4);

    if filter.include_global {
        branches.push(Box::new(event::scope.eq(EventScope::Global)));
    }
    if let Some(viewer) = filter.personal_viewer() {
        branches.push(Box::new(
            event::scope
                .eq(EventScope::Personal)
                .and(event::user_id.assume_not_null().eq(viewer)),
        ));
    }
    if !filter.section_ids.is_empty() {
        branches.push(Box::new(
            event::scope
                .eq(EventScope::Section)
                .and(event::section_id.assume_not_null().eq_any(filter.section_ids.clone())),
        ));
    }
    if !filter.cohort_ids.is_empty() {
        branches.push(Box::new(
            event::scope
                .eq(EventScope::Cohort)
                .and(event::cohort_id.assume_not_null().eq_any(filter.cohort_ids.clone())),
        ));
    }

    branches
        .into_iter()
        .reduce(|acc, branch| Box::new(acc.or(branch)))
}
