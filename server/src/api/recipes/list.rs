use crate::api::{ErrorResponse, Page, PaginationMetadata};
use crate::auth::AuthUser;
use crate::db::{in_transaction, traced, DbPool};
use crate::error::ApiError;
use crate::models::RecipeRow;
use crate::schema::recipes;
use crate::{raw_sql, recipe_has_tag, recipe_location_is, recipe_meets_restriction, store};
use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{Days, NaiveTime};
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::Text;
use recipebox_core::search::{like_pattern, parse_query};
use recipebox_core::Recipe;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Default, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    #[default]
    SavedAt,
    UpdatedAt,
    LastMadeAt,
    Name,
    Random,
}

#[derive(Debug, Default, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Desc,
    Asc,
}

/// Query parameters for listing recipes
///
/// The `q` parameter supports:
/// - Plain text: matches name, cuisine or author
/// - `tag:value` (repeatable, all must match)
/// - `cuisine:value`, `author:value`
/// - `diet:vegan` (repeatable)
/// - `location:online|cookbook|made_up`
/// - `meal:dinner`, `type:dessert`
/// - `saved:>2024-01-01`, `saved:<2024-12-31`, `saved:2024-01-01..2024-12-31`, `saved:2024-03-15`
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListRecipesParams {
    /// Number of items to return (default: 20, max: 100)
    pub limit: Option<i64>,
    /// Number of items to skip (default: 0)
    pub offset: Option<i64>,
    /// Search query
    pub q: Option<String>,
    #[serde(default)]
    #[param(inline)]
    pub sort_by: SortBy,
    #[serde(default)]
    #[param(inline)]
    pub sort_dir: Direction,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListRecipesResponse {
    pub recipes: Vec<Recipe>,
    pub pagination: PaginationMetadata,
}

#[utoipa::path(
    get,
    path = "/recipes",
    tag = "recipes",
    params(ListRecipesParams),
    responses(
        (status = 200, description = "Page of the caller's recipes", body = ListRecipesResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_recipes(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Query(params): Query<ListRecipesParams>,
) -> Result<Json<ListRecipesResponse>, ApiError> {
    let page = Page {
        limit: params.limit,
        offset: params.offset,
    };
    let (limit, offset) = (page.limit(), page.offset());

    let parsed = params.q.as_deref().map(parse_query).unwrap_or_default();

    let mut query = recipes::table
        .filter(recipes::user_id.eq(user.id))
        .into_boxed();

    for word in &parsed.text {
        let pattern = like_pattern(word);
        query = query.filter(
            recipes::name
                .ilike(pattern.clone())
                .or(recipes::cuisine.ilike(pattern.clone()))
                .or(recipes::author.ilike(pattern)),
        );
    }

    for tag in &parsed.tags {
        query = query.filter(recipe_has_tag!(tag.clone()));
    }

    for restriction in &parsed.diets {
        query = query.filter(recipe_meets_restriction!(restriction.as_str()));
    }

    if let Some(ref cuisine) = parsed.cuisine {
        query = query.filter(recipes::cuisine.ilike(like_pattern(cuisine)));
    }

    if let Some(ref author) = parsed.author {
        query = query.filter(recipes::author.ilike(like_pattern(author)));
    }

    if let Some(ref location) = parsed.location {
        query = query.filter(recipe_location_is!(location.clone()));
    }

    if let Some(meal) = parsed.meal {
        query = query.filter(recipes::meal.eq(meal.as_str()));
    }

    if let Some(recipe_type) = parsed.recipe_type {
        query = query.filter(recipes::recipe_type.eq(recipe_type.as_str()));
    }

    if let Some(after) = parsed.saved_after {
        query = query.filter(recipes::saved_at.ge(after.and_time(NaiveTime::MIN).and_utc()));
    }
    if let Some(next_day) = parsed
        .saved_before
        .and_then(|before| before.checked_add_days(Days::new(1)))
    {
        query = query.filter(recipes::saved_at.lt(next_day.and_time(NaiveTime::MIN).and_utc()));
    }

    let query = match (params.sort_by, params.sort_dir) {
        (SortBy::Random, _) => query.order(sql::<Text>("RANDOM()")),
        (SortBy::SavedAt, Direction::Desc) => query.order(recipes::saved_at.desc()),
        (SortBy::SavedAt, Direction::Asc) => query.order(recipes::saved_at.asc()),
        (SortBy::UpdatedAt, Direction::Desc) => query.order(recipes::updated_at.desc()),
        (SortBy::UpdatedAt, Direction::Asc) => query.order(recipes::updated_at.asc()),
        (SortBy::LastMadeAt, Direction::Desc) => {
            query.order(recipes::last_made_at.desc().nulls_last())
        }
        (SortBy::LastMadeAt, Direction::Asc) => {
            query.order(recipes::last_made_at.asc().nulls_first())
        }
        (SortBy::Name, Direction::Desc) => query.order(recipes::name.desc()),
        (SortBy::Name, Direction::Asc) => query.order(recipes::name.asc()),
    };

    let response = in_transaction(&pool, |conn| {
        let rows: Vec<(RecipeRow, i64)> = traced("list_recipes", || {
            query
                .select((RecipeRow::as_select(), raw_sql::count_over()))
                .limit(limit)
                .offset(offset)
                .load(conn)
        })?;

        let total = rows.first().map(|(_, count)| *count).unwrap_or(0);
        let rows = rows.into_iter().map(|(row, _)| row).collect();

        Ok(ListRecipesResponse {
            recipes: store::populate_many(conn, rows)?,
            pagination: PaginationMetadata {
                total,
                limit,
                offset,
            },
        })
    })?;

    Ok(Json(response))
}
