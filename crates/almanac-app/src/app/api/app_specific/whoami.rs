use salvo::writing::Json;
use salvo::{Depot, Response, Router, handler};
use serde::Serialize;
use uuid::Uuid;

use crate::calendar_handler::get_calendar_from_depot;
use crate::config::get_config_from_depot;
use crate::error::{AppResult, render_error, with_deadline};
use crate::middleware::auth::{AuthMiddleware, get_viewer_from_depot};

#[derive(Debug, Serialize)]
struct WhoAmI {
    user_id: Uuid,
    organization_id: Uuid,
}

/// ## Summary
/// Returns the authenticated viewer and the organization they belong to.
#[handler]
async fn whoami(depot: &mut Depot, res: &mut Response) {
    match resolve(depot).await {
        Ok(body) => res.render(Json(body)),
        Err(err) => render_error(res, &err),
    }
}

async fn resolve(depot: &Depot) -> AppResult<WhoAmI> {
    let user_id = get_viewer_from_depot(depot)?;
    let calendar = get_calendar_from_depot(depot)?;
    let deadline = get_config_from_depot(depot)?.server.request_timeout();

    let organization_id = with_deadline(deadline, calendar.organization_for_user(user_id)).await?;

    Ok(WhoAmI {
        user_id,
        organization_id,
    })
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path("whoami").hoop(AuthMiddleware).get(whoami)
}
