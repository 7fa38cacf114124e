//! Recipe persistence shared by the recipe, sharing and activity handlers.

mod children;
mod recommendations;

pub use children::{
    insert_children, replace_dietary_restrictions, replace_ingredients, replace_instructions,
    replace_tags, PgChildRows,
};
pub use recommendations::{load_candidates, PgRecommendationHistory};

use crate::db::traced;
use crate::error::ApiError;
use crate::models::{NewRecipe, RecipeRow};
use crate::schema::{recipe_cooks, recipes};
use diesel::prelude::*;
use recipebox_core::{
    populate_recipe, populate_recipes, Meal, Recipe, RecipeChildren, RecipeLocation, RecipeRecord,
    RecipeType,
};
use uuid::Uuid;

/// Load a recipe row owned by `user_id`, or 404.
pub fn find_owned_recipe(
    conn: &mut PgConnection,
    user_id: Uuid,
    recipe_id: Uuid,
) -> Result<RecipeRecord, ApiError> {
    let row: Option<RecipeRow> = traced("find_recipe", || {
        recipes::table
            .filter(recipes::id.eq(recipe_id))
            .filter(recipes::user_id.eq(user_id))
            .select(RecipeRow::as_select())
            .first(conn)
            .optional()
    })?;

    let row = row.ok_or_else(|| ApiError::not_found("Recipe"))?;
    Ok(row.into_record()?)
}

/// Aggregate one recipe with its children.
pub fn populate_one(conn: &mut PgConnection, record: RecipeRecord) -> Result<Recipe, ApiError> {
    Ok(populate_recipe(&mut PgChildRows::new(conn), record)?)
}

/// Aggregate many recipes, preserving order.
pub fn populate_many(conn: &mut PgConnection, rows: Vec<RecipeRow>) -> Result<Vec<Recipe>, ApiError> {
    let records = rows
        .into_iter()
        .map(RecipeRow::into_record)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(populate_recipes(&mut PgChildRows::new(conn), records)?)
}

/// Scalar fields of a recipe about to be inserted.
pub struct RecipeFields<'a> {
    pub name: &'a str,
    pub author: &'a str,
    pub cuisine: &'a str,
    pub location: &'a RecipeLocation,
    pub time_estimate_minutes: i32,
    pub notes: Option<&'a str>,
    pub meal: Option<Meal>,
    pub recipe_type: Option<RecipeType>,
}

/// Insert a new recipe and all of its children, returning the aggregated recipe.
/// Call inside a transaction.
pub fn insert_recipe(
    conn: &mut PgConnection,
    user_id: Uuid,
    fields: RecipeFields<'_>,
    children: &RecipeChildren,
) -> Result<Recipe, ApiError> {
    let new_recipe = NewRecipe {
        id: None,
        user_id,
        name: fields.name,
        author: fields.author,
        cuisine: fields.cuisine,
        location: serde_json::to_value(fields.location)?,
        time_estimate_minutes: fields.time_estimate_minutes,
        notes: fields.notes,
        meal: fields.meal.map(|m| m.as_str()),
        recipe_type: fields.recipe_type.map(|t| t.as_str()),
        parent_recipe_id: None,
        saved_at: None,
        updated_at: None,
    };

    insert_with_children(conn, &new_recipe, children)
}

/// Insert a fully built record as is, keeping its id, timestamps and parent.
/// Used for share copies. Call inside a transaction.
pub fn insert_copy(
    conn: &mut PgConnection,
    record: &RecipeRecord,
    children: &RecipeChildren,
) -> Result<Recipe, ApiError> {
    let new_recipe = NewRecipe {
        id: Some(record.id),
        user_id: record.user_id,
        name: &record.name,
        author: &record.author,
        cuisine: &record.cuisine,
        location: serde_json::to_value(&record.location)?,
        time_estimate_minutes: record.time_estimate_minutes,
        notes: record.notes.as_deref(),
        meal: record.meal.map(|m| m.as_str()),
        recipe_type: record.recipe_type.map(|t| t.as_str()),
        parent_recipe_id: record.parent_recipe_id,
        saved_at: Some(record.saved_at),
        updated_at: Some(record.updated_at),
    };

    insert_with_children(conn, &new_recipe, children)
}

fn insert_with_children(
    conn: &mut PgConnection,
    new_recipe: &NewRecipe<'_>,
    children: &RecipeChildren,
) -> Result<Recipe, ApiError> {
    let row: RecipeRow = traced("insert_recipe", || {
        diesel::insert_into(recipes::table)
            .values(new_recipe)
            .returning(RecipeRow::as_returning())
            .get_result(conn)
    })?;

    insert_children(conn, row.id, children)?;

    populate_one(conn, row.into_record()?)
}

/// Set `last_made_at` to the latest remaining cook of this recipe (or null).
pub fn refresh_last_made_at(conn: &mut PgConnection, recipe_id: Uuid) -> QueryResult<()> {
    let latest = traced("latest_cook", || {
        recipe_cooks::table
            .filter(recipe_cooks::recipe_id.eq(recipe_id))
            .select(diesel::dsl::max(recipe_cooks::cooked_at))
            .first::<Option<chrono::DateTime<chrono::Utc>>>(conn)
    })?;

    traced("update_last_made_at", || {
        diesel::update(recipes::table.filter(recipes::id.eq(recipe_id)))
            .set(recipes::last_made_at.eq(latest))
            .execute(conn)
    })?;

    Ok(())
}
