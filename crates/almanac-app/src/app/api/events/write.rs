use salvo::http::StatusCode;
use salvo::writing::Json;
use salvo::{Depot, Request, Response, handler};

use almanac_core::event::Event;
use almanac_service::error::ServiceError;

use super::types::EventPayload;
use super::{RequestContext, uuid_param};
use crate::error::{AppError, AppResult, render_error, with_deadline};

async fn payload(req: &mut Request) -> AppResult<EventPayload> {
    req.parse_json::<EventPayload>().await.map_err(|err| {
        tracing::debug!(error = %err, "Rejecting event payload");
        AppError::BadRequest("invalid event payload".to_string())
    })
}

/// ## Summary
/// POST /api/events - creates an event in the caller's organization.
///
/// ## Errors
/// 400 for an invalid payload or event, 403 when the payload names another
/// organization.
#[handler]
#[tracing::instrument(skip_all)]
pub async fn create_event(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let result: AppResult<Event> = async {
        let ctx = RequestContext::from_depot(depot)?;
        let payload = payload(req).await?;
        let organization_id = ctx.organization().await?;

        if payload
            .organization_id
            .is_some_and(|requested| requested != organization_id)
        {
            return Err(ServiceError::AuthorizationError(
                "events can only be created in your own organization".to_string(),
            )
            .into());
        }

        with_deadline(
            ctx.deadline,
            ctx.calendar.create_event(payload.into_draft(organization_id)),
        )
        .await
    }
    .await;

    match result {
        Ok(event) => {
            res.status_code(StatusCode::CREATED);
            res.render(Json(event));
        }
        Err(err) => render_error(res, &err),
    }
}

/// ## Summary
/// PUT /api/events/{id} - replaces an event of the caller's organization.
///
/// ## Errors
/// 404 for unknown events, 403 for another organization's event or an attempt
/// to move the event to another organization.
#[handler]
#[tracing::instrument(skip_all)]
pub async fn update_event(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let result: AppResult<Event> = async {
        let ctx = RequestContext::from_depot(depot)?;
        let id = uuid_param(req, "id")?;
        let payload = payload(req).await?;
        let existing = ctx.owned_event(id).await?;

        with_deadline(
            ctx.deadline,
            ctx.calendar.update_event(payload.into_replacement(&existing)),
        )
        .await
    }
    .await;

    match result {
        Ok(event) => res.render(Json(event)),
        Err(err) => render_error(res, &err),
    }
}

/// ## Summary
/// DELETE /api/events/{id}
#[handler]
#[tracing::instrument(skip_all)]
pub async fn delete_event(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let result: AppResult<()> = async {
        let ctx = RequestContext::from_depot(depot)?;
        let id = uuid_param(req, "id")?;
        ctx.owned_event(id).await?;

        with_deadline(ctx.deadline, ctx.calendar.delete_event(id)).await
    }
    .await;

    match result {
        Ok(()) => {
            res.status_code(StatusCode::NO_CONTENT);
        }
        Err(err) => render_error(res, &err),
    }
}
