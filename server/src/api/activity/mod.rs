pub mod delete;
pub mod list;
pub mod log;

use crate::AppState;
use axum::routing::{delete as delete_route, get};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /activity endpoints (mounted at /activity)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_activity).post(log::log_cook))
        .route("/{recipe_id}", delete_route(delete::delete_cook))
}

#[derive(OpenApi)]
#[openapi(
    paths(log::log_cook, list::list_activity, delete::delete_cook),
    components(schemas(
        log::LogCookRequest,
        list::Who,
        list::ActivityEntry,
        list::ActivityResponse,
    ))
)]
pub struct ApiDoc;
