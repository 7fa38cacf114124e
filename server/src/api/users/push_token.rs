use super::UserProfile;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::{in_transaction, traced, DbPool};
use crate::error::ApiError;
use crate::models::User;
use crate::schema::users;
use axum::{extract::State, Json};
use chrono::Utc;
use diesel::prelude::*;
use recipebox_core::PushPermission;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdatePushTokenRequest {
    /// Device token from the push service; omit or null to clear it
    #[serde(default)]
    pub expo_push_token: Option<String>,
    pub push_permission: PushPermission,
}

#[utoipa::path(
    post,
    path = "/users/push-token",
    tag = "users",
    request_body = UpdatePushTokenRequest,
    responses(
        (status = 200, description = "Updated profile", body = UserProfile),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_push_token(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(req): Json<UpdatePushTokenRequest>,
) -> Result<Json<UserProfile>, ApiError> {
    let token = req
        .expo_push_token
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());

    let updated: User = in_transaction(&pool, |conn| {
        Ok(traced("update_push_token", || {
            diesel::update(users::table.filter(users::id.eq(user.id)))
                .set((
                    users::expo_push_token.eq(token),
                    users::push_permission.eq(req.push_permission.as_str()),
                    users::updated_at.eq(Utc::now()),
                ))
                .returning(User::as_returning())
                .get_result(conn)
        })?)
    })?;

    tracing::info!(
        user_id = %updated.id,
        push_permission = req.push_permission.as_str(),
        "updated push settings"
    );

    Ok(Json(updated.into()))
}
