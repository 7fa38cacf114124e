use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::{in_transaction, DbPool};
use crate::error::ApiError;
use crate::store::{self, PgRecommendationHistory};
use axum::{extract::State, Json};
use chrono::Utc;
use recipebox_core::{recommend, Recipe};
use std::sync::Arc;

/// Pick a recipe the caller hasn't made in a while. Successive calls cycle
/// through every recipe before any repeats.
#[utoipa::path(
    get,
    path = "/recipes/recommendation",
    tag = "recipes",
    responses(
        (status = 200, description = "Recommended recipe", body = Recipe),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Caller has no recipes", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn recommend_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> Result<Json<Recipe>, ApiError> {
    let recipe = in_transaction(&pool, |conn| {
        let candidates = store::load_candidates(conn, user.id)?;

        let chosen = recommend(
            &mut PgRecommendationHistory::new(conn),
            user.id,
            &candidates,
            Utc::now(),
            &mut rand::rng(),
        )?;

        let Some(recipe_id) = chosen else {
            return Err(ApiError::not_found("Recipe"));
        };

        tracing::debug!(%recipe_id, candidates = candidates.len(), "recommended recipe");

        let record = store::find_owned_recipe(conn, user.id, recipe_id)?;
        store::populate_one(conn, record)
    })?;

    Ok(Json(recipe))
}
