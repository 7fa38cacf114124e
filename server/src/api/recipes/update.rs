use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::{in_transaction, traced, DbPool};
use crate::error::ApiError;
use crate::models::RecipeChanges;
use crate::schema::recipes;
use crate::store;
use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use recipebox_core::{
    DietaryRestriction, Meal, Recipe, RecipeIngredient, RecipeInstruction, RecipeLocation,
    RecipeType,
};
use serde::{Deserialize, Deserializer};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Partial update. Scalar fields that are omitted stay as they are. A child
/// list that is present replaces the stored list entirely (an empty list
/// clears it).
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateRecipeRequest {
    pub name: Option<String>,
    pub author: Option<String>,
    pub cuisine: Option<String>,
    pub location: Option<RecipeLocation>,
    pub time_estimate_minutes: Option<i32>,
    /// `null` clears the notes
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub notes: Option<Option<String>>,
    /// `null` clears the meal
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<Meal>)]
    pub meal: Option<Option<Meal>>,
    /// `null` clears the type
    #[serde(default, rename = "type", deserialize_with = "double_option")]
    #[schema(value_type = Option<RecipeType>)]
    pub recipe_type: Option<Option<RecipeType>>,
    pub ingredients: Option<Vec<RecipeIngredient>>,
    pub instructions: Option<Vec<RecipeInstruction>>,
    pub tags: Option<Vec<String>>,
    pub dietary_restrictions_met: Option<Vec<DietaryRestriction>>,
}

impl UpdateRecipeRequest {
    fn validate(&self) -> Result<(), ApiError> {
        if matches!(self.name.as_deref(), Some(name) if name.trim().is_empty()) {
            return Err(ApiError::BadRequest("Name cannot be empty".to_string()));
        }
        if matches!(self.time_estimate_minutes, Some(minutes) if minutes < 0) {
            return Err(ApiError::BadRequest(
                "Time estimate cannot be negative".to_string(),
            ));
        }
        Ok(())
    }

    /// Scalar column updates. Text fields are stored trimmed.
    fn changes(&self, now: DateTime<Utc>) -> Result<RecipeChanges<'_>, serde_json::Error> {
        Ok(RecipeChanges {
            name: self.name.as_deref().map(str::trim),
            author: self.author.as_deref().map(str::trim),
            cuisine: self.cuisine.as_deref().map(str::trim),
            location: self.location.as_ref().map(serde_json::to_value).transpose()?,
            time_estimate_minutes: self.time_estimate_minutes,
            notes: self.notes.as_ref().map(|n| n.as_deref()),
            meal: self.meal.map(|m| m.map(|m| m.as_str())),
            recipe_type: self.recipe_type.map(|t| t.map(|t| t.as_str())),
            updated_at: now,
        })
    }
}

#[utoipa::path(
    patch,
    path = "/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    request_body = UpdateRecipeRequest,
    responses(
        (status = 200, description = "Updated recipe", body = Recipe),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateRecipeRequest>,
) -> Result<Json<Recipe>, ApiError> {
    req.validate()?;

    let recipe = in_transaction(&pool, |conn| {
        // 404 before touching anything
        store::find_owned_recipe(conn, user.id, id)?;

        let changes = req.changes(Utc::now())?;

        traced("update_recipe", || {
            diesel::update(recipes::table.filter(recipes::id.eq(id)))
                .set(&changes)
                .execute(conn)
        })?;

        if let Some(ref ingredients) = req.ingredients {
            store::replace_ingredients(conn, id, ingredients)?;
        }
        if let Some(ref instructions) = req.instructions {
            store::replace_instructions(conn, id, instructions)?;
        }
        if let Some(ref tags) = req.tags {
            store::replace_tags(conn, id, tags)?;
        }
        if let Some(ref restrictions) = req.dietary_restrictions_met {
            store::replace_dietary_restrictions(conn, id, restrictions)?;
        }

        let record = store::find_owned_recipe(conn, user.id, id)?;
        store::populate_one(conn, record)
    })?;

    tracing::info!(recipe_id = %id, "updated recipe");

    Ok(Json(recipe))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notes_absent_vs_null() {
        let absent: UpdateRecipeRequest = serde_json::from_str(r#"{"name": "Soup"}"#).unwrap();
        assert_eq!(absent.notes, None);

        let cleared: UpdateRecipeRequest = serde_json::from_str(r#"{"notes": null}"#).unwrap();
        assert_eq!(cleared.notes, Some(None));

        let set: UpdateRecipeRequest = serde_json::from_str(r#"{"notes": "less salt"}"#).unwrap();
        assert_eq!(set.notes, Some(Some("less salt".to_string())));
    }

    #[test]
    fn test_empty_list_is_a_replacement() {
        let req: UpdateRecipeRequest = serde_json::from_str(r#"{"tags": []}"#).unwrap();
        assert_eq!(req.tags, Some(Vec::new()));
        assert!(req.ingredients.is_none());
    }

    #[test]
    fn test_validate() {
        let req = UpdateRecipeRequest {
            name: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(req.validate().is_err());

        let req = UpdateRecipeRequest {
            time_estimate_minutes: Some(-1),
            ..Default::default()
        };
        assert!(req.validate().is_err());

        assert!(UpdateRecipeRequest::default().validate().is_ok());
    }

    #[test]
    fn test_text_fields_are_trimmed() {
        let req: UpdateRecipeRequest = serde_json::from_str(
            r#"{"name": " Soup ", "author": "  Nonna ", "cuisine": "Italian  "}"#,
        )
        .unwrap();
        let changes = req.changes(Utc::now()).unwrap();

        assert_eq!(changes.name, Some("Soup"));
        assert_eq!(changes.author, Some("Nonna"));
        assert_eq!(changes.cuisine, Some("Italian"));
        assert!(changes.location.is_none());
    }

    #[test]
    fn test_meal_and_type_changes() {
        let req: UpdateRecipeRequest =
            serde_json::from_str(r#"{"meal": "dinner", "type": null}"#).unwrap();
        assert_eq!(req.meal, Some(Some(Meal::Dinner)));
        assert_eq!(req.recipe_type, Some(None));

        let changes = req.changes(Utc::now()).unwrap();
        assert_eq!(changes.meal, Some(Some("dinner")));
        assert_eq!(changes.recipe_type, Some(None));

        let untouched_req = UpdateRecipeRequest::default();
        let untouched = untouched_req.changes(Utc::now()).unwrap();
        assert_eq!(untouched.meal, None);
        assert_eq!(untouched.recipe_type, None);
    }
}
