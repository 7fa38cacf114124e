use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::{in_transaction, traced, DbPool};
use crate::error::ApiError;
use crate::models::NewRecipeCook;
use crate::schema::recipe_cooks;
use crate::store;
use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use recipebox_core::Recipe;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LogCookRequest {
    pub recipe_id: Uuid,
    /// Defaults to now
    #[serde(default)]
    pub cooked_at: Option<DateTime<Utc>>,
}

/// Record that the caller made one of their recipes. Updates the recipe's
/// `last_made_at`.
#[utoipa::path(
    post,
    path = "/activity",
    tag = "activity",
    request_body = LogCookRequest,
    responses(
        (status = 201, description = "Cook logged; returns the updated recipe", body = Recipe),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn log_cook(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(req): Json<LogCookRequest>,
) -> Result<(StatusCode, Json<Recipe>), ApiError> {
    let cooked_at = req.cooked_at.unwrap_or_else(Utc::now);

    let recipe = in_transaction(&pool, |conn| {
        store::find_owned_recipe(conn, user.id, req.recipe_id)?;

        traced("insert_cook", || {
            diesel::insert_into(recipe_cooks::table)
                .values(&NewRecipeCook {
                    recipe_id: req.recipe_id,
                    user_id: user.id,
                    cooked_at,
                })
                .execute(conn)
        })?;

        store::refresh_last_made_at(conn, req.recipe_id)?;

        let record = store::find_owned_recipe(conn, user.id, req.recipe_id)?;
        store::populate_one(conn, record)
    })?;

    tracing::info!(recipe_id = %recipe.id, %cooked_at, "logged cook");

    Ok((StatusCode::CREATED, Json(recipe)))
}
