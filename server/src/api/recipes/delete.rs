use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::{in_transaction, traced, DbPool};
use crate::error::ApiError;
use crate::schema::recipes;
use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

/// Child rows, cooks, recommendations and share requests go with the recipe
/// (ON DELETE CASCADE). Copies made from it keep existing with their
/// `parent_recipe_id` cleared.
#[utoipa::path(
    delete,
    path = "/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 204, description = "Recipe deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let deleted = in_transaction(&pool, |conn| {
        Ok(traced("delete_recipe", || {
            diesel::delete(
                recipes::table
                    .filter(recipes::id.eq(id))
                    .filter(recipes::user_id.eq(user.id)),
            )
            .execute(conn)
        })?)
    })?;

    if deleted == 0 {
        return Err(ApiError::not_found("Recipe"));
    }

    tracing::info!(recipe_id = %id, "deleted recipe");

    Ok(StatusCode::NO_CONTENT)
}
