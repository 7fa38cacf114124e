pub mod aggregate;
pub mod error;
pub mod extract;
pub mod notify;
pub mod recommend;
pub mod search;
pub mod sharing;
pub mod types;

pub use aggregate::{populate_recipe, populate_recipes, ChildRows, MemoryChildRows};
pub use error::{ExtractError, NotifyError, ShareError};
pub use extract::{create_extractor_from_env, FakeExtractor, RecipeExtractor};
pub use notify::{LoggingNotifier, NavigateTo, PushNotification, PushNotifier};
pub use recommend::{recommend, Candidate, MemoryHistory, RecommendationHistory};
pub use sharing::{copy_for_recipient, ShareGrant, ShareStatus, SHARE_REQUEST_TTL_DAYS};
pub use types::{
    DietaryRestriction, Meal, PushPermission, Recipe, RecipeChildren, RecipeDraft, RecipeIngredient,
    RecipeInstruction, RecipeLocation, RecipeRecord, RecipeType,
};
