use salvo::Depot;
use uuid::Uuid;

use almanac_core::config::{AuthMethod, Settings};

use crate::config::get_config_from_depot;
use crate::error::{AppError, AppResult, render_error};

/// Depot key holding the authenticated viewer's user id.
pub const VIEWER_ID: &str = "almanac.viewer_id";

/// ## Summary
/// Identifies the caller and stores their user id in the depot under
/// [`VIEWER_ID`]. Use this as a hoop on routes that need a viewer.
///
/// `proxy` mode trusts the user id header set by the upstream gateway;
/// `single_user` mode uses the configured user for every request.
///
/// ## Errors
/// Responds 401 when no valid user id is present and stops the handler chain.
pub struct AuthMiddleware;

#[salvo::async_trait]
impl salvo::Handler for AuthMiddleware {
    #[tracing::instrument(skip(self, req, depot, res, ctrl), fields(
        method = %req.method(),
        path = %req.uri().path()
    ))]
    async fn handle(
        &self,
        req: &mut salvo::Request,
        depot: &mut Depot,
        res: &mut salvo::Response,
        ctrl: &mut salvo::FlowCtrl,
    ) {
        tracing::trace!("Authenticating request");

        let identified = get_config_from_depot(depot).and_then(|config| viewer_id(req, &config));

        match identified {
            Ok(viewer) => {
                tracing::debug!(%viewer, "Viewer identified");
                depot.insert(VIEWER_ID, viewer);
            }
            Err(err) => {
                render_error(res, &err);
                ctrl.skip_rest();
            }
        }
    }
}

fn viewer_id(req: &salvo::Request, config: &Settings) -> AppResult<Uuid> {
    match config.auth.method {
        AuthMethod::SingleUser => config
            .auth
            .single_user
            .as_ref()
            .map(|single_user| single_user.user_id)
            .ok_or_else(|| {
                AppError::CoreError(almanac_core::error::CoreError::ConfigError(
                    "auth.single_user is required for single_user auth".to_string(),
                ))
            }),
        AuthMethod::Proxy => {
            let header = config
                .auth
                .proxy
                .as_ref()
                .map_or(almanac_core::constants::DEFAULT_PROXY_USER_HEADER, |proxy| {
                    proxy.user_header()
                });

            let raw = req
                .headers()
                .get(header)
                .and_then(|value| value.to_str().ok())
                .ok_or(AppError::NotAuthenticated)?;

            match Uuid::parse_str(raw.trim()) {
                Ok(id) if !id.is_nil() => Ok(id),
                _ => {
                    tracing::warn!(header, "Rejecting malformed user id header");
                    Err(AppError::NotAuthenticated)
                }
            }
        }
    }
}

/// ## Summary
/// Retrieves the authenticated viewer from the depot.
///
/// ## Errors
/// Returns `AppError::NotAuthenticated` when the auth middleware did not run
/// or rejected the request.
pub fn get_viewer_from_depot(depot: &Depot) -> AppResult<Uuid> {
    depot
        .get::<Uuid>(VIEWER_ID)
        .copied()
        .map_err(|_err| AppError::NotAuthenticated)
}
