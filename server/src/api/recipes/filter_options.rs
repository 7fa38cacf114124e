use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::{in_transaction, traced, DbPool};
use crate::error::ApiError;
use crate::raw_sql;
use crate::schema::{recipe_dietary_restrictions, recipes};
use axum::{extract::State, Json};
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::Uuid as DieselUuid;
use recipebox_core::{DietaryRestriction, Meal, RecipeType};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

/// Values present across the caller's recipes, for building filter menus.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FilterOptionsResponse {
    pub cuisines: Vec<String>,
    pub tags: Vec<String>,
    pub dietary_restrictions: Vec<DietaryRestriction>,
    pub meals: Vec<Meal>,
    pub types: Vec<RecipeType>,
}

/// The members of `all` whose string form appears in `stored`, in the enum's
/// declared order.
fn present<T: Copy>(all: &[T], stored: &[String], as_str: impl Fn(&T) -> &'static str) -> Vec<T> {
    all.iter()
        .copied()
        .filter(|value| stored.iter().any(|s| s == as_str(value)))
        .collect()
}

#[derive(QueryableByName)]
struct TagRow {
    #[diesel(sql_type = diesel::sql_types::Text)]
    tag: String,
}

#[utoipa::path(
    get,
    path = "/recipes/filter-options",
    tag = "recipes",
    responses(
        (status = 200, description = "Distinct cuisines, tags, dietary restrictions, meals and types", body = FilterOptionsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_filter_options(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> Result<Json<FilterOptionsResponse>, ApiError> {
    let response = in_transaction(&pool, |conn| {
        let cuisines: Vec<String> = traced("distinct_cuisines", || {
            recipes::table
                .filter(recipes::user_id.eq(user.id))
                .select(recipes::cuisine)
                .distinct()
                .order(recipes::cuisine)
                .load(conn)
        })?;

        let tags: Vec<TagRow> = traced("distinct_tags", || {
            sql_query(raw_sql::DISTINCT_TAGS_QUERY)
                .bind::<DieselUuid, _>(user.id)
                .load(conn)
        })?;

        let restrictions: Vec<String> = traced("distinct_dietary_restrictions", || {
            recipe_dietary_restrictions::table
                .inner_join(recipes::table)
                .filter(recipes::user_id.eq(user.id))
                .select(recipe_dietary_restrictions::restriction)
                .distinct()
                .load(conn)
        })?;

        let meals: Vec<Option<String>> = traced("distinct_meals", || {
            recipes::table
                .filter(recipes::user_id.eq(user.id))
                .select(recipes::meal)
                .distinct()
                .load(conn)
        })?;

        let types: Vec<Option<String>> = traced("distinct_recipe_types", || {
            recipes::table
                .filter(recipes::user_id.eq(user.id))
                .select(recipes::recipe_type)
                .distinct()
                .load(conn)
        })?;

        let meals: Vec<String> = meals.into_iter().flatten().collect();
        let types: Vec<String> = types.into_iter().flatten().collect();

        Ok(FilterOptionsResponse {
            cuisines: cuisines.into_iter().filter(|c| !c.is_empty()).collect(),
            tags: tags.into_iter().map(|r| r.tag).collect(),
            dietary_restrictions: present(DietaryRestriction::ALL, &restrictions, |d| d.as_str()),
            meals: present(Meal::ALL, &meals, |m| m.as_str()),
            types: present(RecipeType::ALL, &types, |t| t.as_str()),
        })
    })?;

    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_present_keeps_declared_order() {
        let stored = vec!["other".to_string(), "breakfast".to_string(), "brunch".to_string()];
        assert_eq!(
            present(Meal::ALL, &stored, |m| m.as_str()),
            vec![Meal::Breakfast, Meal::Other]
        );

        let stored = vec!["salad".to_string(), "cocktail".to_string()];
        assert_eq!(
            present(RecipeType::ALL, &stored, |t| t.as_str()),
            vec![RecipeType::Cocktail, RecipeType::Salad]
        );

        assert!(present(RecipeType::ALL, &[], |t| t.as_str()).is_empty());
    }

    #[test]
    fn test_response_lists_meals_and_types() {
        let response = FilterOptionsResponse {
            cuisines: vec!["Thai".to_string()],
            tags: Vec::new(),
            dietary_restrictions: Vec::new(),
            meals: vec![Meal::Dinner],
            types: vec![RecipeType::Main],
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["meals"], serde_json::json!(["dinner"]));
        assert_eq!(json["types"], serde_json::json!(["main"]));
    }
}
