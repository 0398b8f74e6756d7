//! JSON endpoints for calendar events.

mod read;
mod types;
mod write;

use std::sync::Arc;
use std::time::Duration;

use salvo::{Depot, Request, Router};
use uuid::Uuid;

use almanac_core::event::Event;
use almanac_service::calendar::CalendarService;
use almanac_service::error::ServiceError;

use crate::app::api::EVENTS_ROUTE_COMPONENT;
use crate::calendar_handler::get_calendar_from_depot;
use crate::config::get_config_from_depot;
use crate::error::{AppError, AppResult, with_deadline};
use crate::middleware::auth::{AuthMiddleware, get_viewer_from_depot};

#[must_use]
pub fn routes() -> Router {
    Router::with_path(EVENTS_ROUTE_COMPONENT)
        .hoop(AuthMiddleware)
        .get(read::list_events)
        .post(write::create_event)
        .push(Router::with_path("calendar").get(read::calendar))
        .push(Router::with_path("announcements").get(read::announcements))
        .push(Router::with_path("sections/{section_id}/schedule").get(read::section_schedule))
        .push(
            Router::with_path("{id}")
                .get(read::get_event)
                .put(write::update_event)
                .delete(write::delete_event),
        )
}

/// What every event handler needs: the service, the caller and the deadline.
struct RequestContext {
    calendar: Arc<CalendarService>,
    viewer: Uuid,
    deadline: Duration,
}

impl RequestContext {
    fn from_depot(depot: &Depot) -> AppResult<Self> {
        Ok(Self {
            calendar: get_calendar_from_depot(depot)?,
            viewer: get_viewer_from_depot(depot)?,
            deadline: get_config_from_depot(depot)?.server.request_timeout(),
        })
    }

    async fn organization(&self) -> AppResult<Uuid> {
        with_deadline(self.deadline, self.calendar.organization_for_user(self.viewer)).await
    }

    /// Loads an event the caller's organization owns.
    async fn owned_event(&self, id: Uuid) -> AppResult<Event> {
        let organization_id = self.organization().await?;
        let event = with_deadline(self.deadline, self.calendar.get_event(id)).await?;

        if event.organization_id != organization_id {
            tracing::warn!(event_id = %id, viewer = %self.viewer, "Cross-organization event access");
            return Err(ServiceError::AuthorizationError(
                "event belongs to another organization".to_string(),
            )
            .into());
        }
        Ok(event)
    }
}

fn uuid_param(req: &Request, name: &str) -> AppResult<Uuid> {
    let raw = req
        .param::<String>(name)
        .ok_or_else(|| AppError::BadRequest(format!("{name} is required")))?;
    Uuid::parse_str(&raw).map_err(|_err| AppError::BadRequest(format!("{name} is not a valid UUID")))
}
