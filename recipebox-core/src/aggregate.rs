//! Recipe aggregation.
//!
//! Recipes and their four child collections live in separate tables. Rather
//! than querying children once per recipe, the aggregator collects all recipe
//! ids, issues one grouped fetch per child kind, buckets the rows by parent id
//! and zips the buckets back onto the recipes in their original order.

use crate::types::{
    DietaryRestriction, Recipe, RecipeChildren, RecipeIngredient, RecipeInstruction, RecipeRecord,
};
use std::collections::HashMap;
use std::convert::Infallible;
use std::hash::Hash;
use uuid::Uuid;

/// Grouped child-row fetches for a set of recipes.
///
/// Each method receives every requested recipe id at once and returns
/// `(recipe_id, row)` pairs. Rows for the same recipe must come back in
/// display order; rows for different recipes may be interleaved.
pub trait ChildRows {
    type Error;

    fn ingredients(
        &mut self,
        recipe_ids: &[Uuid],
    ) -> Result<Vec<(Uuid, RecipeIngredient)>, Self::Error>;

    fn instructions(
        &mut self,
        recipe_ids: &[Uuid],
    ) -> Result<Vec<(Uuid, RecipeInstruction)>, Self::Error>;

    fn tags(&mut self, recipe_ids: &[Uuid]) -> Result<Vec<(Uuid, String)>, Self::Error>;

    fn dietary_restrictions(
        &mut self,
        recipe_ids: &[Uuid],
    ) -> Result<Vec<(Uuid, DietaryRestriction)>, Self::Error>;
}

fn bucket<K: Eq + Hash, V>(rows: Vec<(K, V)>) -> HashMap<K, Vec<V>> {
    let mut buckets: HashMap<K, Vec<V>> = HashMap::new();
    for (key, value) in rows {
        buckets.entry(key).or_default().push(value);
    }
    buckets
}

/// Populate a list of recipes with their child collections.
///
/// Output order follows `records`, regardless of the order child rows arrive in.
pub fn populate_recipes<S: ChildRows>(
    store: &mut S,
    records: Vec<RecipeRecord>,
) -> Result<Vec<Recipe>, S::Error> {
    if records.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<Uuid> = records.iter().map(|r| r.id).collect();

    let ingredients = bucket(store.ingredients(&ids)?);
    let instructions = bucket(store.instructions(&ids)?);
    let tags = bucket(store.tags(&ids)?);
    let restrictions = bucket(store.dietary_restrictions(&ids)?);

    let recipes = records
        .into_iter()
        .map(|record| {
            let children = RecipeChildren {
                ingredients: ingredients.get(&record.id).cloned().unwrap_or_default(),
                instructions: instructions.get(&record.id).cloned().unwrap_or_default(),
                tags: tags.get(&record.id).cloned().unwrap_or_default(),
                dietary_restrictions_met: restrictions.get(&record.id).cloned().unwrap_or_default(),
            };
            Recipe::from_parts(record, children)
        })
        .collect();

    Ok(recipes)
}

/// Populate a single recipe. Same queries as [`populate_recipes`] with one id.
pub fn populate_recipe<S: ChildRows>(
    store: &mut S,
    record: RecipeRecord,
) -> Result<Recipe, S::Error> {
    let ids = [record.id];

    let children = RecipeChildren {
        ingredients: values(store.ingredients(&ids)?),
        instructions: values(store.instructions(&ids)?),
        tags: values(store.tags(&ids)?),
        dietary_restrictions_met: values(store.dietary_restrictions(&ids)?),
    };

    Ok(Recipe::from_parts(record, children))
}

fn values<V>(rows: Vec<(Uuid, V)>) -> Vec<V> {
    rows.into_iter().map(|(_, v)| v).collect()
}

/// Number of grouped fetches issued per child kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchCounts {
    pub ingredients: usize,
    pub instructions: usize,
    pub tags: usize,
    pub dietary_restrictions: usize,
}

/// In-memory [`ChildRows`] that records how many fetches it served.
#[derive(Debug, Default)]
pub struct MemoryChildRows {
    ingredients: Vec<(Uuid, RecipeIngredient)>,
    instructions: Vec<(Uuid, RecipeInstruction)>,
    tags: Vec<(Uuid, String)>,
    restrictions: Vec<(Uuid, DietaryRestriction)>,
    counts: FetchCounts,
}

impl MemoryChildRows {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a recipe's children after any rows already stored.
    pub fn insert(&mut self, recipe_id: Uuid, children: RecipeChildren) {
        self.ingredients
            .extend(children.ingredients.into_iter().map(|i| (recipe_id, i)));
        self.instructions
            .extend(children.instructions.into_iter().map(|i| (recipe_id, i)));
        self.tags
            .extend(children.tags.into_iter().map(|t| (recipe_id, t)));
        self.restrictions.extend(
            children
                .dietary_restrictions_met
                .into_iter()
                .map(|d| (recipe_id, d)),
        );
    }

    pub fn fetch_counts(&self) -> FetchCounts {
        self.counts
    }
}

fn select<V: Clone>(rows: &[(Uuid, V)], recipe_ids: &[Uuid]) -> Vec<(Uuid, V)> {
    rows.iter()
        .filter(|(id, _)| recipe_ids.contains(id))
        .cloned()
        .collect()
}

impl ChildRows for MemoryChildRows {
    type Error = Infallible;

    fn ingredients(
        &mut self,
        recipe_ids: &[Uuid],
    ) -> Result<Vec<(Uuid, RecipeIngredient)>, Infallible> {
        self.counts.ingredients += 1;
        Ok(select(&self.ingredients, recipe_ids))
    }

    fn instructions(
        &mut self,
        recipe_ids: &[Uuid],
    ) -> Result<Vec<(Uuid, RecipeInstruction)>, Infallible> {
        self.counts.instructions += 1;
        Ok(select(&self.instructions, recipe_ids))
    }

    fn tags(&mut self, recipe_ids: &[Uuid]) -> Result<Vec<(Uuid, String)>, Infallible> {
        self.counts.tags += 1;
        Ok(select(&self.tags, recipe_ids))
    }

    fn dietary_restrictions(
        &mut self,
        recipe_ids: &[Uuid],
    ) -> Result<Vec<(Uuid, DietaryRestriction)>, Infallible> {
        self.counts.dietary_restrictions += 1;
        Ok(select(&self.restrictions, recipe_ids))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_preserves_row_order() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let buckets = bucket(vec![(a, 1), (b, 10), (a, 2), (a, 3), (b, 20)]);
        assert_eq!(buckets[&a], vec![1, 2, 3]);
        assert_eq!(buckets[&b], vec![10, 20]);
    }

    #[test]
    fn test_empty_input_skips_store() {
        let mut store = MemoryChildRows::new();
        let recipes = populate_recipes(&mut store, Vec::new()).unwrap();
        assert!(recipes.is_empty());
        assert_eq!(store.fetch_counts(), FetchCounts::default());
    }
}
