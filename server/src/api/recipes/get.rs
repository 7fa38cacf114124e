use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::{in_transaction, DbPool};
use crate::error::ApiError;
use crate::store;
use axum::{
    extract::{Path, State},
    Json,
};
use recipebox_core::Recipe;
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Recipe with ingredients, instructions, tags and dietary restrictions", body = Recipe),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Recipe>, ApiError> {
    let recipe = in_transaction(&pool, |conn| {
        let record = store::find_owned_recipe(conn, user.id, id)?;
        store::populate_one(conn, record)
    })?;

    Ok(Json(recipe))
}
