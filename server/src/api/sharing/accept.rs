use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::{in_transaction, traced, DbPool};
use crate::error::ApiError;
use crate::models::ShareRequest;
use crate::schema::recipe_share_requests;
use crate::store;
use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use diesel::prelude::*;
use recipebox_core::{copy_for_recipient, Recipe, ShareError};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AcceptShareRequest {
    pub token: String,
}

/// Redeem a share token. The caller gets their own copy of the recipe with
/// all of its ingredients, instructions, tags and dietary restrictions, and
/// `parent_recipe_id` pointing at the original.
///
/// The share row is locked for the duration, so concurrent redemptions of the
/// same token produce exactly one copy.
#[utoipa::path(
    post,
    path = "/sharing/accept",
    tag = "sharing",
    request_body = AcceptShareRequest,
    responses(
        (status = 201, description = "Recipe copied into the caller's collection", body = Recipe),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Share request not found, already used, or expired", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn accept_share_request(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(req): Json<AcceptShareRequest>,
) -> Result<(StatusCode, Json<Recipe>), ApiError> {
    let recipe = in_transaction(&pool, |conn| {
        let request: Option<ShareRequest> = traced("lock_share_request", || {
            recipe_share_requests::table
                .filter(recipe_share_requests::token.eq(&req.token))
                .filter(recipe_share_requests::to_user_id.eq(user.id))
                .select(ShareRequest::as_select())
                .for_update()
                .first(conn)
                .optional()
        })?;
        let request = request.ok_or(ShareError::NotFound)?;

        let now = Utc::now();
        let mut grant = request.grant();
        grant.accept(now)?;

        traced("mark_share_accepted", || {
            diesel::update(recipe_share_requests::table.filter(recipe_share_requests::id.eq(request.id)))
                .set((
                    recipe_share_requests::status.eq(grant.status.as_str()),
                    recipe_share_requests::accepted_at.eq(Some(now)),
                ))
                .execute(conn)
        })?;

        let source = store::find_owned_recipe(conn, request.from_user_id, request.recipe_id)?;
        let source = store::populate_one(conn, source)?;

        let (record, children) = copy_for_recipient(&source, user.id, Uuid::new_v4(), now);
        store::insert_copy(conn, &record, &children)
    })?;

    tracing::info!(
        recipe_id = %recipe.id,
        parent_recipe_id = ?recipe.parent_recipe_id,
        "accepted share request"
    );

    Ok((StatusCode::CREATED, Json(recipe)))
}
