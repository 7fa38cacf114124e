//! Share request redemption.

use chrono::{Duration, Utc};
use recipebox_core::{
    copy_for_recipient, DietaryRestriction, Meal, Recipe, RecipeChildren, RecipeIngredient,
    RecipeInstruction, RecipeLocation, RecipeRecord, RecipeType, ShareError, ShareGrant,
    ShareStatus,
};
use uuid::Uuid;

#[test]
fn redeeming_twice_fails_the_second_time() {
    let now = Utc::now();
    let mut grant = ShareGrant::new(now);

    assert_eq!(grant.accept(now + Duration::hours(1)), Ok(()));
    assert_eq!(grant.status, ShareStatus::Accepted);
    assert_eq!(
        grant.accept(now + Duration::hours(2)),
        Err(ShareError::NotFound)
    );
    assert_eq!(grant.status, ShareStatus::Accepted);
}

#[test]
fn expired_grant_cannot_be_redeemed() {
    let now = Utc::now();
    let mut grant = ShareGrant::new(now - Duration::days(8));

    assert_eq!(grant.accept(now), Err(ShareError::Expired));
    assert_eq!(grant.status, ShareStatus::Pending);
    // Still expired on retry
    assert_eq!(grant.accept(now), Err(ShareError::Expired));
}

#[test]
fn grant_expires_exactly_at_deadline() {
    let created = Utc::now();
    let deadline = ShareGrant::new(created).expires_at;

    let mut early = ShareGrant::new(created);
    assert_eq!(early.accept(deadline - Duration::seconds(1)), Ok(()));

    let mut late = ShareGrant::new(created);
    assert_eq!(late.accept(deadline), Err(ShareError::Expired));
}

#[test]
fn deleted_grant_cannot_be_redeemed() {
    let now = Utc::now();
    let mut grant = ShareGrant::new(now);
    grant.delete().unwrap();

    assert_eq!(grant.accept(now), Err(ShareError::NotFound));
}

fn shared_source() -> Recipe {
    let now = Utc::now();
    let record = RecipeRecord {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        name: "Shakshuka".to_string(),
        author: "Ottolenghi".to_string(),
        cuisine: "Middle Eastern".to_string(),
        location: RecipeLocation::Cookbook {
            cookbook_name: "Jerusalem".to_string(),
            page_number: 57,
        },
        time_estimate_minutes: 40,
        notes: Some("extra cumin".to_string()),
        meal: Some(Meal::Breakfast),
        recipe_type: Some(RecipeType::Main),
        parent_recipe_id: None,
        saved_at: now - Duration::days(90),
        updated_at: now - Duration::days(10),
        last_made_at: Some(now - Duration::days(2)),
    };
    let children = RecipeChildren {
        ingredients: vec![
            RecipeIngredient {
                name: "eggs".to_string(),
                quantity: 4.0,
                units: String::new(),
            },
            RecipeIngredient {
                name: "tomatoes".to_string(),
                quantity: 800.0,
                units: "g".to_string(),
            },
        ],
        instructions: vec![
            RecipeInstruction {
                step_number: 1,
                content: "Simmer the sauce".to_string(),
            },
            RecipeInstruction {
                step_number: 2,
                content: "Crack in the eggs".to_string(),
            },
        ],
        tags: vec!["brunch".to_string(), "one-pan".to_string()],
        dietary_restrictions_met: vec![DietaryRestriction::Vegetarian],
    };
    Recipe::from_parts(record, children)
}

#[test]
fn accepted_copy_carries_children_and_provenance() {
    let source = shared_source();
    let recipient = Uuid::new_v4();
    let copy_id = Uuid::new_v4();
    let now = Utc::now();

    let (record, children) = copy_for_recipient(&source, recipient, copy_id, now);

    assert_eq!(children, source.children());
    assert_eq!(children.ingredients.len(), 2);
    assert_eq!(children.instructions.len(), 2);
    assert_eq!(children.tags, vec!["brunch", "one-pan"]);
    assert_eq!(
        children.dietary_restrictions_met,
        vec![DietaryRestriction::Vegetarian]
    );

    assert_eq!(record.id, copy_id);
    assert_eq!(record.user_id, recipient);
    assert_eq!(record.parent_recipe_id, Some(source.id));
    assert_eq!(record.name, source.name);
    assert_eq!(record.location, source.location);
    assert_eq!(record.notes, source.notes);
    assert_eq!(record.meal, Some(Meal::Breakfast));
    assert_eq!(record.recipe_type, Some(RecipeType::Main));
}

#[test]
fn accepted_copy_starts_fresh() {
    let source = shared_source();
    let now = Utc::now();

    let (record, _) = copy_for_recipient(&source, Uuid::new_v4(), Uuid::new_v4(), now);

    assert_eq!(record.saved_at, now);
    assert_eq!(record.updated_at, now);
    assert_eq!(record.last_made_at, None);
    assert!(source.last_made_at.is_some());
}
