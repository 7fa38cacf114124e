//! Recipe aggregation against the in-memory child store.

use chrono::{Duration, Utc};
use recipebox_core::aggregate::FetchCounts;
use recipebox_core::{
    populate_recipe, populate_recipes, DietaryRestriction, MemoryChildRows, RecipeChildren,
    RecipeIngredient, RecipeInstruction, RecipeLocation, RecipeRecord,
};
use uuid::Uuid;

fn record(name: &str) -> RecipeRecord {
    let now = Utc::now();
    RecipeRecord {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        name: name.to_string(),
        author: "Test Kitchen".to_string(),
        cuisine: "Italian".to_string(),
        location: RecipeLocation::MadeUp,
        time_estimate_minutes: 30,
        notes: None,
        meal: None,
        recipe_type: None,
        parent_recipe_id: None,
        saved_at: now - Duration::days(3),
        updated_at: now,
        last_made_at: None,
    }
}

fn children(tag: &str, steps: i32) -> RecipeChildren {
    RecipeChildren {
        ingredients: vec![
            RecipeIngredient {
                name: format!("{} base", tag),
                quantity: 2.0,
                units: "cups".to_string(),
            },
            RecipeIngredient {
                name: "salt".to_string(),
                quantity: 0.5,
                units: "tsp".to_string(),
            },
        ],
        instructions: (1..=steps)
            .map(|n| RecipeInstruction {
                step_number: n,
                content: format!("{} step {}", tag, n),
            })
            .collect(),
        tags: vec![tag.to_string()],
        dietary_restrictions_met: vec![DietaryRestriction::Vegetarian],
    }
}

#[test]
fn recipe_without_children_gets_empty_lists() {
    let mut store = MemoryChildRows::new();
    let recipe = populate_recipe(&mut store, record("Plain toast")).unwrap();

    assert!(recipe.ingredients.is_empty());
    assert!(recipe.instructions.is_empty());
    assert!(recipe.tags.is_empty());
    assert!(recipe.dietary_restrictions_met.is_empty());
}

#[test]
fn single_recipe_is_populated() {
    let mut store = MemoryChildRows::new();
    let soup = record("Soup");
    store.insert(soup.id, children("soup", 3));

    let recipe = populate_recipe(&mut store, soup.clone()).unwrap();
    assert_eq!(recipe.id, soup.id);
    assert_eq!(recipe.name, "Soup");
    assert_eq!(recipe.children(), children("soup", 3));
}

#[test]
fn many_recipes_use_one_fetch_per_child_kind() {
    let mut store = MemoryChildRows::new();
    let records: Vec<RecipeRecord> = (0..25).map(|i| record(&format!("Recipe {}", i))).collect();
    for (i, r) in records.iter().enumerate() {
        store.insert(r.id, children(&format!("tag{}", i), (i % 4) as i32));
    }

    let recipes = populate_recipes(&mut store, records).unwrap();
    assert_eq!(recipes.len(), 25);
    assert_eq!(
        store.fetch_counts(),
        FetchCounts {
            ingredients: 1,
            instructions: 1,
            tags: 1,
            dietary_restrictions: 1,
        }
    );
}

#[test]
fn output_follows_input_order_and_keeps_children_separate() {
    let mut store = MemoryChildRows::new();
    let a = record("A");
    let b = record("B");
    let c = record("C");

    // Stored in a different order than requested
    store.insert(c.id, children("c", 1));
    store.insert(a.id, children("a", 2));
    store.insert(b.id, RecipeChildren::default());

    let recipes = populate_recipes(&mut store, vec![b.clone(), a.clone(), c.clone()]).unwrap();
    let ids: Vec<Uuid> = recipes.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![b.id, a.id, c.id]);

    assert_eq!(recipes[0].children(), RecipeChildren::default());
    assert_eq!(recipes[1].children(), children("a", 2));
    assert_eq!(recipes[2].children(), children("c", 1));
}

#[test]
fn child_order_within_a_recipe_is_preserved() {
    let mut store = MemoryChildRows::new();
    let a = record("A");
    let b = record("B");
    store.insert(a.id, children("a", 2));
    store.insert(b.id, children("b", 2));
    store.insert(
        a.id,
        RecipeChildren {
            tags: vec!["late".to_string()],
            ..Default::default()
        },
    );

    let recipes = populate_recipes(&mut store, vec![a, b]).unwrap();
    assert_eq!(recipes[0].tags, vec!["a".to_string(), "late".to_string()]);
    assert_eq!(recipes[1].tags, vec!["b".to_string()]);
}

#[test]
fn repeated_id_is_populated_every_time() {
    let mut store = MemoryChildRows::new();
    let a = record("A");
    let b = record("B");
    store.insert(a.id, children("a", 2));
    store.insert(b.id, children("b", 1));

    let recipes = populate_recipes(&mut store, vec![a.clone(), b, a.clone()]).unwrap();
    assert_eq!(recipes.len(), 3);
    assert_eq!(recipes[0].id, a.id);
    assert_eq!(recipes[2].id, a.id);
    assert_eq!(recipes[0].children(), children("a", 2));
    assert_eq!(recipes[2].children(), children("a", 2));
    assert_eq!(recipes[1].children(), children("b", 1));
}
