use super::ShareRequestResponse;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::{in_transaction, traced, DbPool};
use crate::error::ApiError;
use crate::models::ShareRequest;
use crate::schema::{recipe_share_requests, recipes, users};
use axum::{extract::State, Json};
use chrono::Utc;
use diesel::prelude::*;
use recipebox_core::ShareStatus;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/sharing",
    tag = "sharing",
    responses(
        (status = 200, description = "Pending, unexpired share requests addressed to the caller", body = Vec<ShareRequestResponse>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_share_requests(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> Result<Json<Vec<ShareRequestResponse>>, ApiError> {
    let response = in_transaction(&pool, |conn| {
        let pending: Vec<(ShareRequest, String)> = traced("pending_share_requests", || {
            recipe_share_requests::table
                .inner_join(recipes::table)
                .filter(recipe_share_requests::to_user_id.eq(user.id))
                .filter(recipe_share_requests::status.eq(ShareStatus::Pending.as_str()))
                .filter(recipe_share_requests::expires_at.gt(Utc::now()))
                .order(recipe_share_requests::created_at.desc())
                .select((ShareRequest::as_select(), recipes::name))
                .load(conn)
        })?;

        let sender_ids: Vec<Uuid> = pending.iter().map(|(r, _)| r.from_user_id).collect();
        let senders: HashMap<Uuid, String> = traced("share_senders", || {
            users::table
                .filter(users::id.eq_any(&sender_ids))
                .select((users::id, users::name))
                .load::<(Uuid, String)>(conn)
        })?
        .into_iter()
        .collect();

        Ok(pending
            .into_iter()
            .map(|(request, recipe_name)| {
                let sender = senders
                    .get(&request.from_user_id)
                    .cloned()
                    .unwrap_or_default();
                ShareRequestResponse::new(request, recipe_name, sender)
            })
            .collect::<Vec<_>>())
    })?;

    Ok(Json(response))
}
