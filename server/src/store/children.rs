//! Child collections of a recipe: grouped reads for aggregation and
//! delete-then-insert writes.

use crate::db::traced;
use crate::models::{NewDietaryRestriction, NewIngredient, NewInstruction, NewTag};
use crate::schema::{
    recipe_dietary_restrictions, recipe_ingredients, recipe_instructions, recipe_tags,
};
use diesel::prelude::*;
use recipebox_core::{
    ChildRows, DietaryRestriction, RecipeChildren, RecipeIngredient, RecipeInstruction,
};
use uuid::Uuid;

/// [`ChildRows`] over a connection the caller has already opened (usually
/// inside a transaction). Each fetch is one `recipe_id = ANY(...)` query.
pub struct PgChildRows<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> PgChildRows<'a> {
    pub fn new(conn: &'a mut PgConnection) -> Self {
        Self { conn }
    }
}

impl ChildRows for PgChildRows<'_> {
    type Error = diesel::result::Error;

    fn ingredients(
        &mut self,
        recipe_ids: &[Uuid],
    ) -> QueryResult<Vec<(Uuid, RecipeIngredient)>> {
        let rows: Vec<(Uuid, String, f64, String)> = traced("recipe_ingredients", || {
            recipe_ingredients::table
                .filter(recipe_ingredients::recipe_id.eq_any(recipe_ids))
                .order((recipe_ingredients::recipe_id, recipe_ingredients::position))
                .select((
                    recipe_ingredients::recipe_id,
                    recipe_ingredients::name,
                    recipe_ingredients::quantity,
                    recipe_ingredients::units,
                ))
                .load(self.conn)
        })?;

        Ok(rows
            .into_iter()
            .map(|(recipe_id, name, quantity, units)| {
                (
                    recipe_id,
                    RecipeIngredient {
                        name,
                        quantity,
                        units,
                    },
                )
            })
            .collect())
    }

    fn instructions(
        &mut self,
        recipe_ids: &[Uuid],
    ) -> QueryResult<Vec<(Uuid, RecipeInstruction)>> {
        let rows: Vec<(Uuid, i32, String)> = traced("recipe_instructions", || {
            recipe_instructions::table
                .filter(recipe_instructions::recipe_id.eq_any(recipe_ids))
                .order((
                    recipe_instructions::recipe_id,
                    recipe_instructions::step_number,
                ))
                .select((
                    recipe_instructions::recipe_id,
                    recipe_instructions::step_number,
                    recipe_instructions::content,
                ))
                .load(self.conn)
        })?;

        Ok(rows
            .into_iter()
            .map(|(recipe_id, step_number, content)| {
                (
                    recipe_id,
                    RecipeInstruction {
                        step_number,
                        content,
                    },
                )
            })
            .collect())
    }

    fn tags(&mut self, recipe_ids: &[Uuid]) -> QueryResult<Vec<(Uuid, String)>> {
        traced("recipe_tags", || {
            recipe_tags::table
                .filter(recipe_tags::recipe_id.eq_any(recipe_ids))
                .order((recipe_tags::recipe_id, recipe_tags::position))
                .select((recipe_tags::recipe_id, recipe_tags::tag))
                .load(self.conn)
        })
    }

    fn dietary_restrictions(
        &mut self,
        recipe_ids: &[Uuid],
    ) -> QueryResult<Vec<(Uuid, DietaryRestriction)>> {
        let rows: Vec<(Uuid, String)> = traced("recipe_dietary_restrictions", || {
            recipe_dietary_restrictions::table
                .filter(recipe_dietary_restrictions::recipe_id.eq_any(recipe_ids))
                .order((
                    recipe_dietary_restrictions::recipe_id,
                    recipe_dietary_restrictions::position,
                ))
                .select((
                    recipe_dietary_restrictions::recipe_id,
                    recipe_dietary_restrictions::restriction,
                ))
                .load(self.conn)
        })?;

        Ok(rows
            .into_iter()
            .filter_map(|(recipe_id, value)| match DietaryRestriction::from_str(&value) {
                Some(restriction) => Some((recipe_id, restriction)),
                None => {
                    tracing::warn!(%recipe_id, value, "unknown dietary restriction in database");
                    None
                }
            })
            .collect())
    }
}

pub fn replace_ingredients(
    conn: &mut PgConnection,
    recipe_id: Uuid,
    ingredients: &[RecipeIngredient],
) -> QueryResult<()> {
    traced("delete_recipe_ingredients", || {
        diesel::delete(recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(recipe_id)))
            .execute(conn)
    })?;

    if ingredients.is_empty() {
        return Ok(());
    }

    let rows: Vec<NewIngredient> = ingredients
        .iter()
        .zip(0..)
        .map(|(ingredient, position)| NewIngredient {
            recipe_id,
            position,
            name: &ingredient.name,
            quantity: ingredient.quantity,
            units: &ingredient.units,
        })
        .collect();

    traced("insert_recipe_ingredients", || {
        diesel::insert_into(recipe_ingredients::table)
            .values(&rows)
            .execute(conn)
    })?;

    Ok(())
}

pub fn replace_instructions(
    conn: &mut PgConnection,
    recipe_id: Uuid,
    instructions: &[RecipeInstruction],
) -> QueryResult<()> {
    traced("delete_recipe_instructions", || {
        diesel::delete(
            recipe_instructions::table.filter(recipe_instructions::recipe_id.eq(recipe_id)),
        )
        .execute(conn)
    })?;

    if instructions.is_empty() {
        return Ok(());
    }

    let rows: Vec<NewInstruction> = instructions
        .iter()
        .map(|instruction| NewInstruction {
            recipe_id,
            step_number: instruction.step_number,
            content: &instruction.content,
        })
        .collect();

    traced("insert_recipe_instructions", || {
        diesel::insert_into(recipe_instructions::table)
            .values(&rows)
            .execute(conn)
    })?;

    Ok(())
}

pub fn replace_tags(conn: &mut PgConnection, recipe_id: Uuid, tags: &[String]) -> QueryResult<()> {
    traced("delete_recipe_tags", || {
        diesel::delete(recipe_tags::table.filter(recipe_tags::recipe_id.eq(recipe_id)))
            .execute(conn)
    })?;

    let mut seen = Vec::new();
    let mut rows = Vec::new();
    for tag in tags.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
        let lowered = tag.to_lowercase();
        if seen.contains(&lowered) {
            continue;
        }
        seen.push(lowered);
        rows.push(NewTag {
            recipe_id,
            position: rows.len() as i32,
            tag,
        });
    }

    if rows.is_empty() {
        return Ok(());
    }

    traced("insert_recipe_tags", || {
        diesel::insert_into(recipe_tags::table)
            .values(&rows)
            .execute(conn)
    })?;

    Ok(())
}

pub fn replace_dietary_restrictions(
    conn: &mut PgConnection,
    recipe_id: Uuid,
    restrictions: &[DietaryRestriction],
) -> QueryResult<()> {
    traced("delete_recipe_dietary_restrictions", || {
        diesel::delete(
            recipe_dietary_restrictions::table
                .filter(recipe_dietary_restrictions::recipe_id.eq(recipe_id)),
        )
        .execute(conn)
    })?;

    let mut rows: Vec<NewDietaryRestriction> = Vec::new();
    for restriction in restrictions {
        if rows.iter().any(|r| r.restriction == restriction.as_str()) {
            continue;
        }
        rows.push(NewDietaryRestriction {
            recipe_id,
            position: rows.len() as i32,
            restriction: restriction.as_str(),
        });
    }

    if rows.is_empty() {
        return Ok(());
    }

    traced("insert_recipe_dietary_restrictions", || {
        diesel::insert_into(recipe_dietary_restrictions::table)
            .values(&rows)
            .execute(conn)
    })?;

    Ok(())
}

/// Write all four collections for a freshly inserted recipe.
pub fn insert_children(
    conn: &mut PgConnection,
    recipe_id: Uuid,
    children: &RecipeChildren,
) -> QueryResult<()> {
    replace_ingredients(conn, recipe_id, &children.ingredients)?;
    replace_instructions(conn, recipe_id, &children.instructions)?;
    replace_tags(conn, recipe_id, &children.tags)?;
    replace_dietary_restrictions(conn, recipe_id, &children.dietary_restrictions_met)?;
    Ok(())
}
