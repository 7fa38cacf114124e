use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::{in_transaction, traced, DbPool};
use crate::error::ApiError;
use crate::models::ShareRequest;
use crate::schema::recipe_share_requests;
use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use diesel::prelude::*;
use recipebox_core::ShareError;
use std::sync::Arc;
use uuid::Uuid;

/// Withdraw (sender) or decline (recipient) a pending share request.
#[utoipa::path(
    delete,
    path = "/sharing/{id}",
    tag = "sharing",
    params(
        ("id" = Uuid, Path, description = "Share request ID")
    ),
    responses(
        (status = 204, description = "Share request deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "No pending share request with this ID", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_share_request(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    in_transaction(&pool, |conn| {
        let request: Option<ShareRequest> = traced("lock_share_request", || {
            recipe_share_requests::table
                .filter(recipe_share_requests::id.eq(id))
                .filter(
                    recipe_share_requests::from_user_id
                        .eq(user.id)
                        .or(recipe_share_requests::to_user_id.eq(user.id)),
                )
                .select(ShareRequest::as_select())
                .for_update()
                .first(conn)
                .optional()
        })?;
        let request = request.ok_or(ShareError::NotFound)?;

        let mut grant = request.grant();
        grant.delete()?;

        traced("mark_share_deleted", || {
            diesel::update(recipe_share_requests::table.filter(recipe_share_requests::id.eq(id)))
                .set(recipe_share_requests::status.eq(grant.status.as_str()))
                .execute(conn)
        })?;

        Ok(())
    })?;

    tracing::info!(share_request_id = %id, "deleted share request");

    Ok(StatusCode::NO_CONTENT)
}
