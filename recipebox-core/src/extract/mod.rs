//! Recipe extraction.
//!
//! Turning unstructured content (a typed-up recipe, photos of a cookbook page,
//! a web page) into a structured [`RecipeDraft`] is delegated to an external
//! model behind the [`RecipeExtractor`] trait.

mod fake;

pub use fake::FakeExtractor;

use crate::error::ExtractError;
use crate::types::{DietaryRestriction, Meal, RecipeDraft, RecipeType};
use async_trait::async_trait;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use utoipa::ToSchema;

#[async_trait]
pub trait RecipeExtractor: Send + Sync + fmt::Debug {
    /// Extract a recipe from markdown text.
    async fn from_markdown(&self, markdown: &str) -> Result<RecipeDraft, ExtractError>;

    /// Extract a recipe from one or more photographed pages.
    async fn from_images(&self, images: &[Vec<u8>]) -> Result<RecipeDraft, ExtractError>;

    /// Fetch a web page and extract the recipe on it.
    async fn from_url(&self, url: &str) -> Result<RecipeDraft, ExtractError>;

    fn provider_name(&self) -> &'static str;
}

/// Select an extractor from the environment.
///
/// - RECIPE_EXTRACTOR: "fake" (default)
pub fn create_extractor_from_env() -> Result<Arc<dyn RecipeExtractor>, ExtractError> {
    let provider = std::env::var("RECIPE_EXTRACTOR").unwrap_or_else(|_| "fake".to_string());
    create_extractor(&provider)
}

pub fn create_extractor(provider: &str) -> Result<Arc<dyn RecipeExtractor>, ExtractError> {
    match provider {
        "fake" => Ok(Arc::new(FakeExtractor::default())),
        other => Err(ExtractError::NotConfigured(format!(
            "Unknown recipe extractor: {}",
            other
        ))),
    }
}

/// A recipe typed in by hand. Ingredients and instructions are free text.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct MadeUpRecipe {
    pub name: String,
    pub author: String,
    pub cuisine: String,
    pub time_estimate_minutes: i32,
    #[serde(default)]
    pub meal: Option<Meal>,
    #[serde(default, rename = "type")]
    pub recipe_type: Option<RecipeType>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub dietary_restrictions_met: Vec<DietaryRestriction>,
    pub ingredients: String,
    pub instructions: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Render a hand-written recipe as markdown for the extractor.
pub fn render_made_up_markdown(recipe: &MadeUpRecipe) -> String {
    let restrictions: Vec<&str> = recipe
        .dietary_restrictions_met
        .iter()
        .map(|d| d.as_str())
        .collect();

    format!(
        "# {name}\n\n\
         ## Cuisine\n{cuisine}\n\n\
         ## Author\n{author}\n\n\
         ## Time Estimate\n{minutes} minutes\n\n\
         ## Tags\n{tags}\n\n\
         ## Dietary Restrictions Met\n{restrictions}\n\n\
         ## Ingredients\n{ingredients}\n\n\
         ## Instructions\n{instructions}\n",
        name = recipe.name.trim(),
        cuisine = recipe.cuisine.trim(),
        author = recipe.author.trim(),
        minutes = recipe.time_estimate_minutes,
        tags = recipe.tags.join(", "),
        restrictions = restrictions.join(", "),
        ingredients = recipe.ingredients.trim(),
        instructions = recipe.instructions.trim(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_made_up_markdown() {
        let recipe = MadeUpRecipe {
            name: "  Weeknight Dal ".to_string(),
            author: "Priya".to_string(),
            cuisine: "Indian".to_string(),
            time_estimate_minutes: 35,
            meal: Some(Meal::Dinner),
            recipe_type: None,
            tags: vec!["lentils".to_string(), "quick".to_string()],
            dietary_restrictions_met: vec![DietaryRestriction::Vegan],
            ingredients: "1 cup red lentils\n1 onion".to_string(),
            instructions: "Rinse lentils. Simmer 20 minutes.".to_string(),
            notes: None,
        };

        let md = render_made_up_markdown(&recipe);
        assert!(md.starts_with("# Weeknight Dal\n"));
        assert!(md.contains("## Time Estimate\n35 minutes"));
        assert!(md.contains("## Tags\nlentils, quick"));
        assert!(md.contains("## Dietary Restrictions Met\nvegan"));
        assert!(md.contains("## Ingredients\n1 cup red lentils\n1 onion"));
    }

    #[test]
    fn test_unknown_extractor_is_rejected() {
        assert!(create_extractor("fake").is_ok());
        let err = create_extractor("gpt").unwrap_err();
        assert!(matches!(err, ExtractError::NotConfigured(_)));
    }
}
