mod app_specific;
mod events;

use salvo::Router;

pub use almanac_core::constants::{
    API_ROUTE_COMPONENT, API_ROUTE_PREFIX, EVENTS_ROUTE_COMPONENT, EVENTS_ROUTE_PREFIX,
};

/// ## Summary
/// Constructs the API router.
#[must_use]
pub fn routes() -> Router {
    Router::with_path(API_ROUTE_COMPONENT)
        .push(app_specific::routes())
        .push(events::routes())
}
