use salvo::writing::Json;
use salvo::{Depot, Request, Response, handler};

use almanac_core::event::Event;
use almanac_service::error::ServiceError;

use super::types::RangeQuery;
use super::{RequestContext, uuid_param};
use crate::error::{AppError, AppResult, render_error, with_deadline};

fn range(req: &mut Request) -> AppResult<RangeQuery> {
    req.parse_queries::<RangeQuery>()
        .map_err(|err| AppError::BadRequest(format!("invalid query parameters: {err}")))
}

fn respond(res: &mut Response, result: AppResult<Vec<Event>>) {
    match result {
        Ok(events) => res.render(Json(events)),
        Err(err) => render_error(res, &err),
    }
}

/// ## Summary
/// GET /api/events - global events of the caller's organization.
#[handler]
#[tracing::instrument(skip_all)]
pub async fn list_events(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let result: AppResult<Vec<Event>> = async {
        let ctx = RequestContext::from_depot(depot)?;
        let query = range(req)?;
        let window = query.window()?;
        let organization_id = ctx.organization().await?;

        with_deadline(
            ctx.deadline,
            ctx.calendar
                .get_events(organization_id, window, query.limit, query.offset),
        )
        .await
    }
    .await;

    respond(res, result);
}

/// ## Summary
/// GET /api/events/calendar - everything the caller can see in the window.
#[handler]
#[tracing::instrument(skip_all)]
pub async fn calendar(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let result: AppResult<Vec<Event>> = async {
        let ctx = RequestContext::from_depot(depot)?;
        let window = range(req)?.window()?;

        with_deadline(
            ctx.deadline,
            ctx.calendar.get_calendar_for_user(ctx.viewer, window),
        )
        .await
    }
    .await;

    respond(res, result);
}

/// ## Summary
/// GET /api/events/announcements - announcements of the caller's organization.
#[handler]
#[tracing::instrument(skip_all)]
pub async fn announcements(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let result: AppResult<Vec<Event>> = async {
        let ctx = RequestContext::from_depot(depot)?;
        let query = range(req)?;
        let window = query.window()?;
        let organization_id = ctx.organization().await?;

        with_deadline(
            ctx.deadline,
            ctx.calendar
                .get_announcements(organization_id, window, query.limit, query.offset),
        )
        .await
    }
    .await;

    respond(res, result);
}

/// ## Summary
/// GET /api/events/sections/{section_id}/schedule - a section's published
/// schedule. The section must belong to the caller's organization.
#[handler]
#[tracing::instrument(skip_all)]
pub async fn section_schedule(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let result: AppResult<Vec<Event>> = async {
        let ctx = RequestContext::from_depot(depot)?;
        let section_id = uuid_param(req, "section_id")?;
        let window = range(req)?.window()?;

        let organization_id = ctx.organization().await?;
        let section_organization =
            with_deadline(ctx.deadline, ctx.calendar.section_organization(section_id)).await?;
        if section_organization != organization_id {
            return Err(ServiceError::AuthorizationError(
                "section belongs to another organization".to_string(),
            )
            .into());
        }

        with_deadline(
            ctx.deadline,
            ctx.calendar.get_section_schedule(section_id, window),
        )
        .await
    }
    .await;

    respond(res, result);
}

/// ## Summary
/// GET /api/events/{id}
#[handler]
#[tracing::instrument(skip_all)]
pub async fn get_event(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let result: AppResult<Event> = async {
        let ctx = RequestContext::from_depot(depot)?;
        let id = uuid_param(req, "id")?;
        ctx.owned_event(id).await
    }
    .await;

    match result {
        Ok(event) => res.render(Json(event)),
        Err(err) => render_error(res, &err),
    }
}
