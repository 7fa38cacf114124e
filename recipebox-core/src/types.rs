use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Where a recipe came from. Stored as a JSON blob on the recipe row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "location", rename_all = "snake_case")]
pub enum RecipeLocation {
    Online {
        url: String,
    },
    Cookbook {
        cookbook_name: String,
        page_number: i32,
    },
    MadeUp,
}

impl RecipeLocation {
    pub fn kind(&self) -> &'static str {
        match self {
            RecipeLocation::Online { .. } => "online",
            RecipeLocation::Cookbook { .. } => "cookbook",
            RecipeLocation::MadeUp => "made_up",
        }
    }

    /// Human-readable provenance, used in notification text and logs.
    pub fn describe(&self) -> String {
        match self {
            RecipeLocation::Online { url } => url.clone(),
            RecipeLocation::Cookbook {
                cookbook_name,
                page_number,
            } => format!("{}, p. {}", cookbook_name, page_number),
            RecipeLocation::MadeUp => "made up".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DietaryRestriction {
    Vegetarian,
    Vegan,
    Pescatarian,
    GlutenFree,
    DairyFree,
}

impl DietaryRestriction {
    pub const ALL: &'static [DietaryRestriction] = &[
        DietaryRestriction::Vegetarian,
        DietaryRestriction::Vegan,
        DietaryRestriction::Pescatarian,
        DietaryRestriction::GlutenFree,
        DietaryRestriction::DairyFree,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DietaryRestriction::Vegetarian => "vegetarian",
            DietaryRestriction::Vegan => "vegan",
            DietaryRestriction::Pescatarian => "pescatarian",
            DietaryRestriction::GlutenFree => "gluten_free",
            DietaryRestriction::DairyFree => "dairy_free",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "vegetarian" => Some(DietaryRestriction::Vegetarian),
            "vegan" => Some(DietaryRestriction::Vegan),
            "pescatarian" => Some(DietaryRestriction::Pescatarian),
            "gluten_free" => Some(DietaryRestriction::GlutenFree),
            "dairy_free" => Some(DietaryRestriction::DairyFree),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Meal {
    Breakfast,
    Lunch,
    Dinner,
    Other,
}

impl Meal {
    pub const ALL: &'static [Meal] = &[Meal::Breakfast, Meal::Lunch, Meal::Dinner, Meal::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Meal::Breakfast => "breakfast",
            Meal::Lunch => "lunch",
            Meal::Dinner => "dinner",
            Meal::Other => "other",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "breakfast" => Some(Meal::Breakfast),
            "lunch" => Some(Meal::Lunch),
            "dinner" => Some(Meal::Dinner),
            "other" => Some(Meal::Other),
            _ => None,
        }
    }
}

/// Kind of dish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RecipeType {
    Cocktail,
    Condiment,
    Dessert,
    Main,
    Salad,
    Snack,
    Starter,
    Other,
}

impl RecipeType {
    pub const ALL: &'static [RecipeType] = &[
        RecipeType::Cocktail,
        RecipeType::Condiment,
        RecipeType::Dessert,
        RecipeType::Main,
        RecipeType::Salad,
        RecipeType::Snack,
        RecipeType::Starter,
        RecipeType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecipeType::Cocktail => "cocktail",
            RecipeType::Condiment => "condiment",
            RecipeType::Dessert => "dessert",
            RecipeType::Main => "main",
            RecipeType::Salad => "salad",
            RecipeType::Snack => "snack",
            RecipeType::Starter => "starter",
            RecipeType::Other => "other",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cocktail" => Some(RecipeType::Cocktail),
            "condiment" => Some(RecipeType::Condiment),
            "dessert" => Some(RecipeType::Dessert),
            "main" => Some(RecipeType::Main),
            "salad" => Some(RecipeType::Salad),
            "snack" => Some(RecipeType::Snack),
            "starter" => Some(RecipeType::Starter),
            "other" => Some(RecipeType::Other),
            _ => None,
        }
    }
}

/// Push notification permission as reported by the client app.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PushPermission {
    #[default]
    None,
    Accepted,
    Rejected,
}

impl PushPermission {
    pub fn as_str(&self) -> &'static str {
        match self {
            PushPermission::None => "none",
            PushPermission::Accepted => "accepted",
            PushPermission::Rejected => "rejected",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "none" => Some(PushPermission::None),
            "accepted" => Some(PushPermission::Accepted),
            "rejected" => Some(PushPermission::Rejected),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RecipeIngredient {
    pub name: String,
    pub quantity: f64,
    #[serde(default)]
    pub units: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RecipeInstruction {
    pub step_number: i32,
    pub content: String,
}

/// A recipe row without its child collections.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub author: String,
    pub cuisine: String,
    pub location: RecipeLocation,
    pub time_estimate_minutes: i32,
    pub notes: Option<String>,
    pub meal: Option<Meal>,
    pub recipe_type: Option<RecipeType>,
    pub parent_recipe_id: Option<Uuid>,
    pub saved_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_made_at: Option<DateTime<Utc>>,
}

/// The four one-to-many collections hanging off a recipe.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeChildren {
    pub ingredients: Vec<RecipeIngredient>,
    pub instructions: Vec<RecipeInstruction>,
    pub tags: Vec<String>,
    pub dietary_restrictions_met: Vec<DietaryRestriction>,
}

/// Fully populated recipe, as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Recipe {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub author: String,
    pub cuisine: String,
    pub location: RecipeLocation,
    pub time_estimate_minutes: i32,
    pub notes: Option<String>,
    pub meal: Option<Meal>,
    #[serde(rename = "type")]
    pub recipe_type: Option<RecipeType>,
    /// Recipe this one was copied from when accepted through a share request
    pub parent_recipe_id: Option<Uuid>,
    pub saved_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_made_at: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
    pub dietary_restrictions_met: Vec<DietaryRestriction>,
    pub ingredients: Vec<RecipeIngredient>,
    pub instructions: Vec<RecipeInstruction>,
}

impl Recipe {
    pub fn from_parts(record: RecipeRecord, children: RecipeChildren) -> Self {
        Recipe {
            id: record.id,
            user_id: record.user_id,
            name: record.name,
            author: record.author,
            cuisine: record.cuisine,
            location: record.location,
            time_estimate_minutes: record.time_estimate_minutes,
            notes: record.notes,
            meal: record.meal,
            recipe_type: record.recipe_type,
            parent_recipe_id: record.parent_recipe_id,
            saved_at: record.saved_at,
            updated_at: record.updated_at,
            last_made_at: record.last_made_at,
            tags: children.tags,
            dietary_restrictions_met: children.dietary_restrictions_met,
            ingredients: children.ingredients,
            instructions: children.instructions,
        }
    }

    /// Child collections, cloned. Used when copying a recipe for a share recipient.
    pub fn children(&self) -> RecipeChildren {
        RecipeChildren {
            ingredients: self.ingredients.clone(),
            instructions: self.instructions.clone(),
            tags: self.tags.clone(),
            dietary_restrictions_met: self.dietary_restrictions_met.clone(),
        }
    }
}

/// Structured recipe content produced by a [`crate::RecipeExtractor`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RecipeDraft {
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
    #[serde(default)]
    pub ingredients: Vec<RecipeIngredient>,
    #[serde(default)]
    pub instructions: Vec<RecipeInstruction>,
}

impl RecipeDraft {
    pub fn into_children(self) -> RecipeChildren {
        RecipeChildren {
            ingredients: self.ingredients,
            instructions: self.instructions,
            tags: self.tags,
            dietary_restrictions_met: self.dietary_restrictions_met,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_json_shape() {
        let online = RecipeLocation::Online {
            url: "https://example.com/soup".to_string(),
        };
        let value = serde_json::to_value(&online).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"location": "online", "url": "https://example.com/soup"})
        );

        let made_up: RecipeLocation =
            serde_json::from_value(serde_json::json!({"location": "made_up"})).unwrap();
        assert_eq!(made_up, RecipeLocation::MadeUp);

        let cookbook: RecipeLocation = serde_json::from_value(serde_json::json!({
            "location": "cookbook",
            "cookbook_name": "Salt Fat Acid Heat",
            "page_number": 112
        }))
        .unwrap();
        assert_eq!(cookbook.kind(), "cookbook");
        assert_eq!(cookbook.describe(), "Salt Fat Acid Heat, p. 112");
    }

    #[test]
    fn test_location_rejects_unknown_tag() {
        let result: Result<RecipeLocation, _> =
            serde_json::from_value(serde_json::json!({"location": "restaurant"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_dietary_restriction_strings() {
        for restriction in DietaryRestriction::ALL {
            assert_eq!(
                DietaryRestriction::from_str(restriction.as_str()),
                Some(*restriction)
            );
        }
        assert_eq!(
            DietaryRestriction::from_str("Gluten-Free"),
            Some(DietaryRestriction::GlutenFree)
        );
        assert_eq!(DietaryRestriction::from_str("keto"), None);
    }

    #[test]
    fn test_meal_and_type_strings() {
        for meal in Meal::ALL {
            assert_eq!(Meal::from_str(meal.as_str()), Some(*meal));
        }
        for recipe_type in RecipeType::ALL {
            assert_eq!(RecipeType::from_str(recipe_type.as_str()), Some(*recipe_type));
        }
        assert_eq!(Meal::from_str("Dinner"), Some(Meal::Dinner));
        assert_eq!(Meal::from_str("brunch"), None);
        assert_eq!(RecipeType::from_str("entree"), None);
    }

    #[test]
    fn test_draft_type_field_name() {
        let draft: RecipeDraft = serde_json::from_value(serde_json::json!({
            "name": "Negroni",
            "author": "Bar",
            "cuisine": "Italian",
            "time_estimate_minutes": 5,
            "meal": "other",
            "type": "cocktail"
        }))
        .unwrap();
        assert_eq!(draft.meal, Some(Meal::Other));
        assert_eq!(draft.recipe_type, Some(RecipeType::Cocktail));

        let bare: RecipeDraft = serde_json::from_value(serde_json::json!({
            "name": "Toast",
            "author": "Me",
            "cuisine": "",
            "time_estimate_minutes": 2
        }))
        .unwrap();
        assert_eq!(bare.meal, None);
        assert_eq!(bare.recipe_type, None);
    }

    #[test]
    fn test_push_permission_default_is_none() {
        assert_eq!(PushPermission::default(), PushPermission::None);
        assert_eq!(PushPermission::from_str("rejected"), Some(PushPermission::Rejected));
        assert_eq!(PushPermission::from_str("maybe"), None);
    }
}
