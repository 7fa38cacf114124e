use crate::api::sharing::ShareRequestResponse;
use crate::api::ErrorResponse;
use crate::auth::{generate_token, AuthUser};
use crate::db::{in_transaction, traced, DbPool};
use crate::error::ApiError;
use crate::models::{NewShareRequest, ShareRequest, User};
use crate::schema::{recipe_share_requests, users};
use crate::store;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use diesel::prelude::*;
use recipebox_core::notify::notify_user;
use recipebox_core::{NavigateTo, PushNotification, PushNotifier, ShareGrant};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ShareRecipeRequest {
    pub to_user_id: Uuid,
}

#[utoipa::path(
    post,
    path = "/recipes/{id}/share",
    tag = "sharing",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    request_body = ShareRecipeRequest,
    responses(
        (status = 201, description = "Share request created; expires in seven days", body = ShareRequestResponse),
        (status = 400, description = "Recipient not found", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn share_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    State(notifier): State<Arc<dyn PushNotifier>>,
    Path(id): Path<Uuid>,
    Json(req): Json<ShareRecipeRequest>,
) -> Result<(StatusCode, Json<ShareRequestResponse>), ApiError> {
    if req.to_user_id == user.id {
        return Err(ApiError::BadRequest(
            "Cannot share a recipe with yourself".to_string(),
        ));
    }

    let (request, recipe_name, recipient) = in_transaction(&pool, |conn| {
        let recipe = store::find_owned_recipe(conn, user.id, id)?;

        let recipient: Option<User> = traced("find_user", || {
            users::table
                .filter(users::id.eq(req.to_user_id))
                .select(User::as_select())
                .first(conn)
                .optional()
        })?;
        let recipient =
            recipient.ok_or_else(|| ApiError::BadRequest("Recipient not found".to_string()))?;

        let token = generate_token().map_err(|e| ApiError::Internal(e.to_string()))?;
        let grant = ShareGrant::new(Utc::now());

        let request: ShareRequest = traced("insert_share_request", || {
            diesel::insert_into(recipe_share_requests::table)
                .values(&NewShareRequest {
                    recipe_id: recipe.id,
                    from_user_id: user.id,
                    to_user_id: recipient.id,
                    token: &token,
                    status: grant.status.as_str(),
                    expires_at: grant.expires_at,
                })
                .returning(ShareRequest::as_returning())
                .get_result(conn)
        })?;

        Ok((request, recipe.name, recipient))
    })?;

    tracing::info!(
        share_request_id = %request.id,
        recipe_id = %id,
        to_user_id = %recipient.id,
        "created share request"
    );

    notify_user(
        notifier.as_ref(),
        recipient.push_permission(),
        recipient.expo_push_token.as_deref(),
        &PushNotification {
            message: format!("{} shared a recipe with you", user.name),
            navigate_to: Some(NavigateTo::SharedRecipes),
        },
    )
    .await;

    Ok((
        StatusCode::CREATED,
        Json(ShareRequestResponse::new(request, recipe_name, user.name)),
    ))
}
