use chrono::{DateTime, Utc};
use diesel::prelude::*;
use recipebox_core::{
    Meal, PushPermission, RecipeLocation, RecipeRecord, RecipeType, ShareGrant, ShareStatus,
};
use uuid::Uuid;

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub expo_push_token: Option<String>,
    pub push_permission: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn push_permission(&self) -> PushPermission {
        PushPermission::from_str(&self.push_permission).unwrap_or_default()
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser<'a> {
    pub email: &'a str,
    pub name: &'a str,
    pub password_hash: &'a str,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::sessions)]
pub struct NewSession<'a> {
    pub user_id: Uuid,
    pub token_hash: &'a str,
    pub expires_at: DateTime<Utc>,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RecipeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub author: String,
    pub cuisine: String,
    pub location: serde_json::Value,
    pub time_estimate_minutes: i32,
    pub notes: Option<String>,
    pub parent_recipe_id: Option<Uuid>,
    pub saved_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_made_at: Option<DateTime<Utc>>,
    pub meal: Option<String>,
    pub recipe_type: Option<String>,
}

impl RecipeRow {
    /// Decode the location blob. Fails only if the stored JSON is corrupt.
    pub fn into_record(self) -> Result<RecipeRecord, serde_json::Error> {
        let location: RecipeLocation = serde_json::from_value(self.location)?;
        Ok(RecipeRecord {
            id: self.id,
            user_id: self.user_id,
            name: self.name,
            author: self.author,
            cuisine: self.cuisine,
            location,
            time_estimate_minutes: self.time_estimate_minutes,
            notes: self.notes,
            meal: self.meal.as_deref().and_then(Meal::from_str),
            recipe_type: self.recipe_type.as_deref().and_then(RecipeType::from_str),
            parent_recipe_id: self.parent_recipe_id,
            saved_at: self.saved_at,
            updated_at: self.updated_at,
            last_made_at: self.last_made_at,
        })
    }
}

/// `None` in `id`, `saved_at` or `updated_at` inserts the column default.
#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipes)]
pub struct NewRecipe<'a> {
    pub id: Option<Uuid>,
    pub user_id: Uuid,
    pub name: &'a str,
    pub author: &'a str,
    pub cuisine: &'a str,
    pub location: serde_json::Value,
    pub time_estimate_minutes: i32,
    pub notes: Option<&'a str>,
    pub meal: Option<&'static str>,
    pub recipe_type: Option<&'static str>,
    pub parent_recipe_id: Option<Uuid>,
    pub saved_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Partial scalar update. `None` fields are left untouched; `notes: Some(None)`
/// clears the notes.
#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::recipes)]
pub struct RecipeChanges<'a> {
    pub name: Option<&'a str>,
    pub author: Option<&'a str>,
    pub cuisine: Option<&'a str>,
    pub location: Option<serde_json::Value>,
    pub time_estimate_minutes: Option<i32>,
    pub notes: Option<Option<&'a str>>,
    pub meal: Option<Option<&'static str>>,
    pub recipe_type: Option<Option<&'static str>>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipe_ingredients)]
pub struct NewIngredient<'a> {
    pub recipe_id: Uuid,
    pub position: i32,
    pub name: &'a str,
    pub quantity: f64,
    pub units: &'a str,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipe_instructions)]
pub struct NewInstruction<'a> {
    pub recipe_id: Uuid,
    pub step_number: i32,
    pub content: &'a str,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipe_tags)]
pub struct NewTag<'a> {
    pub recipe_id: Uuid,
    pub position: i32,
    pub tag: &'a str,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipe_dietary_restrictions)]
pub struct NewDietaryRestriction {
    pub recipe_id: Uuid,
    pub position: i32,
    pub restriction: &'static str,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::recipe_share_requests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ShareRequest {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub from_user_id: Uuid,
    pub to_user_id: Uuid,
    pub token: String,
    pub status: String,
    pub expires_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl ShareRequest {
    pub fn grant(&self) -> ShareGrant {
        ShareGrant {
            status: ShareStatus::from_str(&self.status).unwrap_or(ShareStatus::Deleted),
            expires_at: self.expires_at,
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipe_share_requests)]
pub struct NewShareRequest<'a> {
    pub recipe_id: Uuid,
    pub from_user_id: Uuid,
    pub to_user_id: Uuid,
    pub token: &'a str,
    pub status: &'static str,
    pub expires_at: DateTime<Utc>,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::friendships)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Friendship {
    pub id: Uuid,
    pub requester_id: Uuid,
    pub addressee_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::friendships)]
pub struct NewFriendship {
    pub requester_id: Uuid,
    pub addressee_id: Uuid,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipe_cooks)]
pub struct NewRecipeCook {
    pub recipe_id: Uuid,
    pub user_id: Uuid,
    pub cooked_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipe_recommendations)]
pub struct NewRecommendation {
    pub user_id: Uuid,
    pub recipe_id: Uuid,
    pub recommended_at: DateTime<Utc>,
}
