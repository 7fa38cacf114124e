pub mod accept;
pub mod delete;
pub mod list;

use crate::models::ShareRequest;
use crate::AppState;
use axum::routing::{delete as delete_route, get, post};
use axum::Router;
use chrono::{DateTime, Utc};
use recipebox_core::ShareStatus;
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ShareRequestResponse {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub recipe_name: String,
    pub from_user_id: Uuid,
    pub from_user_name: String,
    pub to_user_id: Uuid,
    /// Redeem with `POST /sharing/accept`
    pub token: String,
    pub status: ShareStatus,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl ShareRequestResponse {
    pub fn new(request: ShareRequest, recipe_name: String, from_user_name: String) -> Self {
        let status = request.grant().status;
        Self {
            id: request.id,
            recipe_id: request.recipe_id,
            recipe_name,
            from_user_id: request.from_user_id,
            from_user_name,
            to_user_id: request.to_user_id,
            token: request.token,
            status,
            expires_at: request.expires_at,
            created_at: request.created_at,
        }
    }
}

/// Returns the router for /sharing endpoints (mounted at /sharing)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_share_requests))
        .route("/accept", post(accept::accept_share_request))
        .route("/{id}", delete_route(delete::delete_share_request))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list::list_share_requests,
        accept::accept_share_request,
        delete::delete_share_request,
    ),
    components(schemas(ShareRequestResponse, accept::AcceptShareRequest))
)]
pub struct ApiDoc;
