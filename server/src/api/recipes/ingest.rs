//! Creating recipes from unstructured input.
//!
//! All three entry points hand their input to the configured
//! [`RecipeExtractor`] and differ only in what they send it and which
//! location they record.

use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::{in_transaction, DbPool};
use crate::error::ApiError;
use crate::store::{self, RecipeFields};
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use recipebox_core::extract::{render_made_up_markdown, MadeUpRecipe};
use recipebox_core::{Meal, Recipe, RecipeDraft, RecipeExtractor, RecipeLocation, RecipeType};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

fn ingest(
    pool: &DbPool,
    user_id: Uuid,
    draft: RecipeDraft,
    location: RecipeLocation,
    notes: Option<&str>,
) -> Result<Recipe, ApiError> {
    let RecipeDraft {
        name,
        author,
        cuisine,
        time_estimate_minutes,
        meal,
        recipe_type,
        ..
    } = &draft;

    let fields = RecipeFields {
        name: name.trim(),
        author: author.trim(),
        cuisine: cuisine.trim(),
        location: &location,
        time_estimate_minutes: (*time_estimate_minutes).max(0),
        notes: notes.map(str::trim).filter(|n| !n.is_empty()),
        meal: *meal,
        recipe_type: *recipe_type,
    };
    let children = draft.clone().into_children();

    let recipe = in_transaction(pool, |conn| {
        store::insert_recipe(conn, user_id, fields, &children)
    })?;

    tracing::info!(
        recipe_id = %recipe.id,
        location = location.kind(),
        ingredients = recipe.ingredients.len(),
        "ingested recipe"
    );

    Ok(recipe)
}

#[utoipa::path(
    post,
    path = "/recipes/made-up",
    tag = "recipes",
    request_body = MadeUpRecipe,
    responses(
        (status = 201, description = "Recipe created", body = Recipe),
        (status = 400, description = "Could not parse recipe from input", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_made_up_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    State(extractor): State<Arc<dyn RecipeExtractor>>,
    Json(req): Json<MadeUpRecipe>,
) -> Result<(StatusCode, Json<Recipe>), ApiError> {
    let markdown = render_made_up_markdown(&req);
    let mut draft = extractor.from_markdown(&markdown).await?;
    draft.meal = req.meal.or(draft.meal);
    draft.recipe_type = req.recipe_type.or(draft.recipe_type);

    let recipe = ingest(
        &pool,
        user.id,
        draft,
        RecipeLocation::MadeUp,
        req.notes.as_deref(),
    )?;

    Ok((StatusCode::CREATED, Json(recipe)))
}

/// Multipart form for `/recipes/cookbook`. `files` may repeat.
#[derive(Debug, Default, ToSchema)]
pub struct CookbookUpload {
    #[schema(value_type = Vec<String>, format = Binary)]
    pub files: Vec<Vec<u8>>,
    pub author: String,
    pub cookbook_name: String,
    pub page_number: i32,
    pub notes: Option<String>,
    pub meal: Option<Meal>,
    /// Sent as the `type` form field.
    pub recipe_type: Option<RecipeType>,
}

impl CookbookUpload {
    async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let bad_request = |e: axum::extract::multipart::MultipartError| {
            ApiError::BadRequest(format!("Invalid multipart body: {}", e))
        };

        let mut files = Vec::new();
        let mut author = None;
        let mut cookbook_name = None;
        let mut page_number = None;
        let mut notes = None;
        let mut meal = None;
        let mut recipe_type = None;

        while let Some(field) = multipart.next_field().await.map_err(bad_request)? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "files" | "file" => files.push(field.bytes().await.map_err(bad_request)?.to_vec()),
                "author" => author = Some(field.text().await.map_err(bad_request)?),
                "cookbook_name" => cookbook_name = Some(field.text().await.map_err(bad_request)?),
                "page_number" => {
                    let raw = field.text().await.map_err(bad_request)?;
                    let parsed = raw.trim().parse::<i32>().map_err(|_| {
                        ApiError::BadRequest(format!("Invalid page_number: {}", raw))
                    })?;
                    page_number = Some(parsed);
                }
                "notes" => notes = Some(field.text().await.map_err(bad_request)?),
                "meal" => {
                    let raw = field.text().await.map_err(bad_request)?;
                    meal = Some(Meal::from_str(raw.trim()).ok_or_else(|| {
                        ApiError::BadRequest(format!("Invalid meal: {}", raw))
                    })?);
                }
                "type" => {
                    let raw = field.text().await.map_err(bad_request)?;
                    recipe_type = Some(RecipeType::from_str(raw.trim()).ok_or_else(|| {
                        ApiError::BadRequest(format!("Invalid type: {}", raw))
                    })?);
                }
                // The location field is always "cookbook" here
                "location" => {}
                other => tracing::debug!(field = other, "ignoring unknown multipart field"),
            }
        }

        let required = |value: Option<String>, field: &str| {
            value
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ApiError::BadRequest(format!("{} is required", field)))
        };

        let upload = CookbookUpload {
            author: required(author, "author")?,
            cookbook_name: required(cookbook_name, "cookbook_name")?,
            page_number: page_number
                .ok_or_else(|| ApiError::BadRequest("page_number is required".to_string()))?,
            notes,
            meal,
            recipe_type,
            files,
        };

        if upload.files.iter().all(|f| f.is_empty()) {
            return Err(ApiError::BadRequest(
                "At least one image is required".to_string(),
            ));
        }

        Ok(upload)
    }
}

#[utoipa::path(
    post,
    path = "/recipes/cookbook",
    tag = "recipes",
    request_body(content = CookbookUpload, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Recipe created", body = Recipe),
        (status = 400, description = "Could not parse recipe from image", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_cookbook_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    State(extractor): State<Arc<dyn RecipeExtractor>>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Recipe>), ApiError> {
    let upload = CookbookUpload::from_multipart(multipart).await?;

    let images: Vec<Vec<u8>> = upload.files.into_iter().filter(|f| !f.is_empty()).collect();
    let mut draft = extractor.from_images(&images).await?;
    draft.author = upload.author;
    draft.meal = upload.meal.or(draft.meal);
    draft.recipe_type = upload.recipe_type.or(draft.recipe_type);

    let location = RecipeLocation::Cookbook {
        cookbook_name: upload.cookbook_name.trim().to_string(),
        page_number: upload.page_number,
    };

    let recipe = ingest(&pool, user.id, draft, location, upload.notes.as_deref())?;

    Ok((StatusCode::CREATED, Json(recipe)))
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct OnlineRecipeRequest {
    pub url: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub meal: Option<Meal>,
    #[serde(default, rename = "type")]
    pub recipe_type: Option<RecipeType>,
}

fn validate_url(url: &str) -> Result<&str, ApiError> {
    let url = url.trim();
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    match rest {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(ApiError::BadRequest(
            "url must be an http or https URL".to_string(),
        )),
    }
}

#[utoipa::path(
    post,
    path = "/recipes/online",
    tag = "recipes",
    request_body = OnlineRecipeRequest,
    responses(
        (status = 201, description = "Recipe created", body = Recipe),
        (status = 400, description = "Could not parse recipe from URL", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_online_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    State(extractor): State<Arc<dyn RecipeExtractor>>,
    Json(req): Json<OnlineRecipeRequest>,
) -> Result<(StatusCode, Json<Recipe>), ApiError> {
    let url = validate_url(&req.url)?.to_string();
    let mut draft = extractor.from_url(&url).await?;
    draft.meal = req.meal.or(draft.meal);
    draft.recipe_type = req.recipe_type.or(draft.recipe_type);

    let recipe = ingest(
        &pool,
        user.id,
        draft,
        RecipeLocation::Online { url },
        req.notes.as_deref(),
    )?;

    Ok((StatusCode::CREATED, Json(recipe)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert_eq!(
            validate_url(" https://example.com/soup ").unwrap(),
            "https://example.com/soup"
        );
        assert!(validate_url("http://example.com").is_ok());
        assert!(validate_url("ftp://example.com").is_err());
        assert!(validate_url("https://").is_err());
        assert!(validate_url("").is_err());
    }
}
