use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::{in_transaction, traced, DbPool};
use crate::error::ApiError;
use crate::schema::recipe_cooks;
use crate::store;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;
use uuid::Uuid;

#[derive(Debug, Deserialize, IntoParams)]
pub struct DeleteCookParams {
    /// Timestamp of the entry to remove, exactly as returned by `GET /activity`
    pub cooked_at: DateTime<Utc>,
}

#[utoipa::path(
    delete,
    path = "/activity/{recipe_id}",
    tag = "activity",
    params(
        ("recipe_id" = Uuid, Path, description = "Recipe ID"),
        DeleteCookParams
    ),
    responses(
        (status = 204, description = "Entry removed"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "No such activity entry", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_cook(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(recipe_id): Path<Uuid>,
    Query(params): Query<DeleteCookParams>,
) -> Result<StatusCode, ApiError> {
    in_transaction(&pool, |conn| {
        let deleted = traced("delete_cook", || {
            diesel::delete(
                recipe_cooks::table
                    .filter(recipe_cooks::recipe_id.eq(recipe_id))
                    .filter(recipe_cooks::user_id.eq(user.id))
                    .filter(recipe_cooks::cooked_at.eq(params.cooked_at)),
            )
            .execute(conn)
        })?;

        if deleted == 0 {
            return Err(ApiError::not_found("Activity entry"));
        }

        store::refresh_last_made_at(conn, recipe_id)?;
        Ok(())
    })?;

    tracing::info!(%recipe_id, cooked_at = %params.cooked_at, "deleted cook");

    Ok(StatusCode::NO_CONTENT)
}
